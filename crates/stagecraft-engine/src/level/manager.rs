//! Level manager: owns the application context and at most one level.
//!
//! Loading a level always cleans up the current one first, so exactly one
//! level is ever live.

use std::collections::HashMap;

use tracing::{error, info};

use stagecraft_core::enums::LevelId;
use stagecraft_core::events::GameEvent;

use crate::config::EngineConfig;
use crate::context::{AppContext, LevelRequest};
use crate::error::LevelError;
use crate::level::runner::LevelRunner;
use crate::level::{Level, LevelState};
use crate::levels;

/// Builds a fresh level value.
pub type LevelFactory = fn(&EngineConfig) -> Box<dyn Level>;

pub struct LevelManager {
    ctx: AppContext,
    current: Option<(LevelId, LevelRunner)>,
    factories: HashMap<LevelId, LevelFactory>,
    quit_requested: bool,
}

impl LevelManager {
    /// A manager with the built-in levels registered.
    pub fn new(ctx: AppContext) -> Self {
        let mut manager = Self {
            ctx,
            current: None,
            factories: HashMap::new(),
            quit_requested: false,
        };
        levels::register_builtin(&mut manager);
        manager
    }

    /// Register (or replace) the factory for a level id.
    pub fn register(&mut self, id: LevelId, factory: LevelFactory) {
        self.factories.insert(id, factory);
    }

    pub fn ctx(&self) -> &AppContext {
        &self.ctx
    }

    pub fn ctx_mut(&mut self) -> &mut AppContext {
        &mut self.ctx
    }

    pub fn current_level(&self) -> Option<LevelId> {
        self.current.as_ref().map(|(id, _)| *id)
    }

    pub fn current_state(&self) -> Option<LevelState> {
        self.current.as_ref().map(|(_, runner)| runner.state())
    }

    pub fn runner(&self) -> Option<&LevelRunner> {
        self.current.as_ref().map(|(_, runner)| runner)
    }

    pub fn quit_requested(&self) -> bool {
        self.quit_requested
    }

    /// Clean up the current level, then construct and start `id`.
    /// Construction errors propagate and leave no level loaded.
    pub fn load(&mut self, id: LevelId) -> Result<(), LevelError> {
        self.unload();
        let factory = self
            .factories
            .get(&id)
            .copied()
            .unwrap_or_else(|| levels::builtin_factory(id));
        let level = factory(self.ctx.config());
        let mut runner = LevelRunner::new(level, &self.ctx)?;
        runner.start(&mut self.ctx)?;
        info!(level = %id, "level loaded");
        self.current = Some((id, runner));
        Ok(())
    }

    /// Clean up the current level, if any.
    pub fn unload(&mut self) {
        if let Some((id, mut runner)) = self.current.take() {
            runner.cleanup(&mut self.ctx);
            info!(level = %id, "level unloaded");
        }
    }

    /// Pause the current level's frame loop.
    pub fn stop(&mut self) {
        if let Some((_, runner)) = self.current.as_mut() {
            runner.stop(&mut self.ctx);
        }
    }

    /// Resume the current level's frame loop.
    pub fn resume(&mut self) -> Result<(), LevelError> {
        match self.current.as_mut() {
            Some((_, runner)) => runner.start(&mut self.ctx),
            None => Ok(()),
        }
    }

    /// Forward an input or host event to the bus.
    pub fn emit(&mut self, event: GameEvent) {
        self.ctx.emit(event);
    }

    /// Advance the current level by one frame and apply level requests
    /// raised during it.
    pub fn tick(&mut self, dt: f64) {
        if let Some((_, runner)) = self.current.as_mut() {
            runner.tick(&mut self.ctx, dt);
        }
        self.apply_requests();
    }

    fn apply_requests(&mut self) {
        for request in self.ctx.services.take_level_requests() {
            match request {
                LevelRequest::Load(id) => {
                    if let Err(err) = self.load(id) {
                        error!(level = %id, error = %err, "level load failed");
                    }
                }
                LevelRequest::Quit => {
                    info!("quit requested");
                    self.quit_requested = true;
                }
            }
        }
    }

    /// Tear down the current level for good.
    pub fn shutdown(&mut self) {
        self.unload();
    }
}
