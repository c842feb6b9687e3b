//! Level runner: drives one level through its lifecycle and frame loop.
//!
//! The host calls `tick(ctx, dt)` once per display frame. Setup waits
//! `EngineConfig::start_delay` after `start()`. While running, each frame
//! advances timers, runs the level's update, the world systems, physics
//! and rendering, in that order. Any frame error halts the loop; it is
//! logged once and not retried.

use tracing::{debug, error, info, warn};

use stagecraft_core::events::EventKind;

use crate::context::{AppContext, ContextSignal};
use crate::error::LevelError;
use crate::event_bus::ListenerId;
use crate::level::{CleanupQueue, Level, LevelScope, LevelState};
use crate::timers::TimerId;

/// Handle of a live frame loop. Dropped to cancel it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameHandle(u64);

pub struct LevelRunner {
    level: Box<dyn Level>,
    state: LevelState,
    start_timer: Option<TimerId>,
    frame: Option<FrameHandle>,
    frames_started: u64,
    context_listeners: Vec<ListenerId>,
    cleanup: CleanupQueue,
    set_up: bool,
    /// Rendering context lost; frames are skipped until it is restored.
    paused: bool,
    /// Renderer was not ready at setup; frames run without drawing.
    degraded: bool,
    last_error: Option<String>,
}

impl LevelRunner {
    /// Wrap a level, failing if the context lacks anything it requires.
    pub fn new(level: Box<dyn Level>, ctx: &AppContext) -> Result<Self, LevelError> {
        for &capability in level.requirements() {
            if !ctx.has_capability(capability) {
                return Err(LevelError::MissingDependency {
                    level: level.name(),
                    capability,
                });
            }
        }
        Ok(Self {
            level,
            state: LevelState::Constructed,
            start_timer: None,
            frame: None,
            frames_started: 0,
            context_listeners: Vec::new(),
            cleanup: CleanupQueue::default(),
            set_up: false,
            paused: false,
            degraded: false,
            last_error: None,
        })
    }

    pub fn name(&self) -> &'static str {
        self.level.name()
    }

    pub fn state(&self) -> LevelState {
        self.state
    }

    pub fn frame_handle(&self) -> Option<FrameHandle> {
        self.frame
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn is_degraded(&self) -> bool {
        self.degraded
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Number of resources still waiting in the cleanup queue.
    pub fn pending_cleanups(&self) -> usize {
        self.cleanup.len()
    }

    /// Begin the lifecycle, or resume the frame loop after `stop()`.
    pub fn start(&mut self, ctx: &mut AppContext) -> Result<(), LevelError> {
        match self.state {
            LevelState::Cleaned => Err(LevelError::InvalidState {
                level: self.level.name(),
                operation: "start",
                state: self.state.as_str(),
            }),
            LevelState::Starting | LevelState::Running => Ok(()),
            LevelState::Constructed => {
                self.schedule_setup(ctx);
                Ok(())
            }
            LevelState::Stopping => {
                if self.set_up {
                    self.attach_context_listeners(ctx);
                    self.begin_frames();
                    self.state = LevelState::Running;
                    info!(level = self.level.name(), "level resumed");
                } else {
                    self.schedule_setup(ctx);
                }
                Ok(())
            }
        }
    }

    fn schedule_setup(&mut self, ctx: &mut AppContext) {
        let delay = ctx.config().start_delay;
        self.start_timer = Some(ctx.services.timers.schedule_once(delay));
        self.attach_context_listeners(ctx);
        self.state = LevelState::Starting;
        debug!(level = self.level.name(), delay, "level starting");
    }

    fn attach_context_listeners(&mut self, ctx: &mut AppContext) {
        if !self.context_listeners.is_empty() {
            return;
        }
        let lost = ctx.on(EventKind::ContextLost, |_, services| {
            services.signal_context(ContextSignal::Lost);
        });
        let restored = ctx.on(EventKind::ContextRestored, |_, services| {
            services.signal_context(ContextSignal::Restored);
        });
        self.context_listeners = vec![lost, restored];
    }

    fn begin_frames(&mut self) {
        self.frames_started += 1;
        self.frame = Some(FrameHandle(self.frames_started));
    }

    /// Advance by one display frame.
    pub fn tick(&mut self, ctx: &mut AppContext, dt: f64) {
        let dt = dt.max(0.0);
        match self.state {
            LevelState::Starting => {
                let due = ctx.services.timers.advance(dt);
                if let Some(start) = self.start_timer {
                    if due.contains(&start) {
                        self.start_timer = None;
                        self.complete_start(ctx);
                    }
                }
            }
            LevelState::Running => {
                self.handle_context_signals(ctx);
                if self.frame.is_some() && !self.paused {
                    if let Err(err) = self.frame(ctx, dt) {
                        error!(level = self.level.name(), error = %err, "frame failed, loop halted");
                        self.last_error = Some(err.to_string());
                        self.stop(ctx);
                    }
                }
            }
            LevelState::Constructed | LevelState::Stopping | LevelState::Cleaned => {}
        }
    }

    fn complete_start(&mut self, ctx: &mut AppContext) {
        self.state = LevelState::Running;
        self.degraded = !ctx.renderer().is_some_and(|r| r.is_ready());
        if self.degraded {
            warn!(level = self.level.name(), "renderer not ready, running without rendering");
        }
        let mut scope = LevelScope::new(ctx, &mut self.cleanup);
        if let Err(err) = self.level.setup(&mut scope) {
            error!(level = self.level.name(), error = %err, "level setup failed, running degraded");
            self.last_error = Some(err.to_string());
            self.degraded = true;
        }
        self.set_up = true;
        self.begin_frames();
        info!(level = self.level.name(), degraded = self.degraded, "level running");
    }

    fn handle_context_signals(&mut self, ctx: &mut AppContext) {
        for signal in ctx.services.take_context_signals() {
            match signal {
                ContextSignal::Lost => {
                    if !self.paused {
                        warn!(level = self.level.name(), "rendering context lost, frame loop paused");
                        self.paused = true;
                    }
                }
                ContextSignal::Restored => {
                    if !self.paused {
                        continue;
                    }
                    if let Some(renderer) = ctx.services.renderer.as_mut() {
                        renderer.reinitialize_context();
                    }
                    let mut scope = LevelScope::new(ctx, &mut self.cleanup);
                    match self.level.on_context_restored(&mut scope) {
                        Ok(()) => {
                            self.paused = false;
                            info!(level = self.level.name(), "rendering context restored, frame loop resumed");
                        }
                        Err(err) => {
                            error!(level = self.level.name(), error = %err, "scene rebuild failed, loop halted");
                            self.last_error = Some(err.to_string());
                            self.stop(ctx);
                            return;
                        }
                    }
                }
            }
        }
    }

    fn frame(&mut self, ctx: &mut AppContext, dt: f64) -> Result<(), LevelError> {
        let due = ctx.services.timers.advance(dt);
        let mut scope = LevelScope::new(ctx, &mut self.cleanup);
        for timer in due {
            self.level.on_timer(&mut scope, timer)?;
        }
        self.level.update(&mut scope, dt)?;
        ctx.update(dt);
        ctx.step_physics(dt);
        if !self.degraded {
            ctx.render();
        }
        Ok(())
    }

    /// Cancel the frame loop and detach context listeners. Entities stay.
    /// A lost context stays lost: after `start()` the loop remains paused
    /// until `ContextRestored` arrives.
    pub fn stop(&mut self, ctx: &mut AppContext) {
        if matches!(self.state, LevelState::Cleaned) {
            return;
        }
        self.frame = None;
        if let Some(start) = self.start_timer.take() {
            ctx.services.timers.cancel(start);
        }
        for id in self.context_listeners.drain(..) {
            ctx.off(id);
        }
        ctx.services.take_context_signals();
        if !matches!(self.state, LevelState::Constructed) {
            self.state = LevelState::Stopping;
        }
        debug!(level = self.level.name(), "level stopped");
    }

    /// Stop, tear down, and release everything the level created.
    /// Safe to call more than once; the runner is unusable afterward.
    pub fn cleanup(&mut self, ctx: &mut AppContext) {
        if self.state == LevelState::Cleaned {
            return;
        }
        self.stop(ctx);
        let mut scope = LevelScope::new(ctx, &mut self.cleanup);
        if self.set_up {
            self.level.teardown(&mut scope);
        }
        self.cleanup.run(ctx);
        self.state = LevelState::Cleaned;
        info!(level = self.level.name(), "level cleaned up");
    }
}
