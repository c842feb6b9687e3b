//! Levels: scene setup scripts driven through a fixed lifecycle.
//!
//! A level is a value implementing `Level`; `LevelRunner` owns it and
//! walks it through `constructed → starting → running → stopping →
//! cleaned`. Everything a level creates goes through a `LevelScope`,
//! which records it in the level's `CleanupQueue` so cleanup can undo it.

pub mod manager;
pub mod runner;

use hecs::Entity;
use tracing::debug;

use stagecraft_core::components::SceneHandle;
use stagecraft_core::events::{EventKind, GameEvent};
use stagecraft_core::prefab::Prefab;
use stagecraft_core::types::ObjectId;

use crate::context::{AppContext, Services};
use crate::error::LevelError;
use crate::event_bus::ListenerId;
use crate::render::{ObjectKind, SceneObject};
use crate::systems::registration::SceneRegistration;
use crate::timers::TimerId;
use crate::world_ext::entity_id;

/// External systems a level may need.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    Renderer,
    Physics,
}

/// Lifecycle state of a level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelState {
    /// Built and validated, nothing scheduled yet.
    Constructed,
    /// Waiting out the start delay.
    Starting,
    /// Set up; the frame loop is live.
    Running,
    /// Frame loop halted; entities are kept.
    Stopping,
    /// Torn down. Terminal.
    Cleaned,
}

impl LevelState {
    pub fn as_str(&self) -> &'static str {
        match self {
            LevelState::Constructed => "constructed",
            LevelState::Starting => "starting",
            LevelState::Running => "running",
            LevelState::Stopping => "stopping",
            LevelState::Cleaned => "cleaned",
        }
    }
}

/// Behavior of one level. Only `name` and `setup` are required.
pub trait Level {
    fn name(&self) -> &'static str;

    /// Capabilities checked when the level is constructed.
    fn requirements(&self) -> &'static [Capability] {
        &[Capability::Renderer]
    }

    /// Build the scene. Runs once, after the start delay.
    fn setup(&mut self, scope: &mut LevelScope<'_>) -> Result<(), LevelError>;

    /// Per-frame level logic, before world systems.
    fn update(&mut self, _scope: &mut LevelScope<'_>, _dt: f64) -> Result<(), LevelError> {
        Ok(())
    }

    /// A timer this level scheduled came due.
    fn on_timer(&mut self, _scope: &mut LevelScope<'_>, _timer: TimerId) -> Result<(), LevelError> {
        Ok(())
    }

    /// The rendering context came back. Rebuilds every owned visual by
    /// default.
    fn on_context_restored(&mut self, scope: &mut LevelScope<'_>) -> Result<(), LevelError> {
        scope.rebuild_scene();
        Ok(())
    }

    /// Level-specific teardown, before the cleanup queue runs.
    fn teardown(&mut self, _scope: &mut LevelScope<'_>) {}
}

/// Something a level created that cleanup must undo.
#[derive(Debug, Clone, PartialEq)]
pub enum Cleanup {
    Listener(ListenerId),
    Timer(TimerId),
    Entity { entity: Entity, template: String },
    SceneObject(ObjectId),
    /// A prefab registered under `name`; `previous` is what it replaced.
    Prefab { name: String, previous: Option<Prefab> },
}

/// Undo list collected during a level's life.
#[derive(Debug, Default)]
pub struct CleanupQueue {
    items: Vec<Cleanup>,
}

impl CleanupQueue {
    pub fn push(&mut self, item: Cleanup) {
        self.items.push(item);
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Entities created through the scope, oldest first.
    pub fn entities(&self) -> impl Iterator<Item = (Entity, &str)> {
        self.items.iter().filter_map(|item| match item {
            Cleanup::Entity { entity, template } => Some((*entity, template.as_str())),
            _ => None,
        })
    }

    /// Undo everything, newest first. Leaves the queue empty.
    pub fn run(&mut self, ctx: &mut AppContext) {
        let count = self.items.len();
        for item in self.items.drain(..).rev() {
            match item {
                Cleanup::Listener(id) => {
                    ctx.off(id);
                }
                Cleanup::Timer(id) => {
                    ctx.services.timers.cancel(id);
                }
                Cleanup::Entity { entity, .. } => {
                    ctx.despawn(entity);
                }
                Cleanup::SceneObject(id) => {
                    if let Some(renderer) = ctx.services.renderer.as_mut() {
                        renderer.remove_from_scene(id);
                    }
                }
                Cleanup::Prefab { name, previous } => match previous {
                    Some(prefab) => {
                        ctx.register_prefab(prefab);
                    }
                    None => {
                        ctx.services.prefabs.remove(&name);
                    }
                },
            }
        }
        debug!(count, "cleanup queue ran");
    }
}

/// What a level gets to work with: the context plus its own cleanup queue.
pub struct LevelScope<'a> {
    pub ctx: &'a mut AppContext,
    cleanup: &'a mut CleanupQueue,
}

impl<'a> LevelScope<'a> {
    pub fn new(ctx: &'a mut AppContext, cleanup: &'a mut CleanupQueue) -> Self {
        Self { ctx, cleanup }
    }

    pub fn services(&mut self) -> &mut Services {
        &mut self.ctx.services
    }

    /// Register a prefab and instantiate it once, tracking the entity.
    /// Cleanup unregisters the prefab and restores any prefab it replaced.
    pub fn spawn(&mut self, prefab: Prefab) -> Result<Entity, LevelError> {
        let name = prefab.name.clone();
        let previous = self.ctx.register_prefab(prefab);
        self.cleanup.push(Cleanup::Prefab {
            name: name.clone(),
            previous,
        });
        self.spawn_registered(&name)
    }

    /// Instantiate an already registered prefab, tracking the entity.
    pub fn spawn_registered(&mut self, name: &str) -> Result<Entity, LevelError> {
        let entity = self
            .ctx
            .create_entity_from_prefab(name)
            .ok_or_else(|| LevelError::UnknownPrefab(name.to_string()))?;
        self.cleanup.push(Cleanup::Entity {
            entity,
            template: name.to_string(),
        });
        Ok(entity)
    }

    /// Attach a listener that is detached on cleanup.
    pub fn on<F>(&mut self, kind: EventKind, handler: F) -> ListenerId
    where
        F: FnMut(&GameEvent, &mut Services) + 'static,
    {
        let id = self.ctx.on(kind, handler);
        self.cleanup.push(Cleanup::Listener(id));
        id
    }

    /// Repeating timer, cancelled on cleanup.
    pub fn every(&mut self, period: f64) -> TimerId {
        let id = self.ctx.services.timers.schedule_repeating(period);
        self.cleanup.push(Cleanup::Timer(id));
        id
    }

    /// One-shot timer, cancelled on cleanup if still pending.
    pub fn after(&mut self, delay: f64) -> TimerId {
        let id = self.ctx.services.timers.schedule_once(delay);
        self.cleanup.push(Cleanup::Timer(id));
        id
    }

    /// Add a screen-space text node owned by this level.
    pub fn add_overlay(&mut self, text: &str) -> Option<ObjectId> {
        let renderer = self.ctx.services.renderer.as_mut()?;
        let id = renderer.allocate_id();
        renderer.add_to_scene(SceneObject {
            id,
            name: "overlay".to_string(),
            kind: ObjectKind::Overlay {
                text: text.to_string(),
            },
            transform: Default::default(),
        });
        self.cleanup.push(Cleanup::SceneObject(id));
        Some(id)
    }

    pub fn emit(&mut self, event: GameEvent) {
        self.ctx.emit(event);
    }

    /// Drop and re-attach the scene objects of every owned entity.
    /// Returns how many were attached again.
    pub fn rebuild_scene(&mut self) -> usize {
        let owned: Vec<(Entity, String)> = self
            .cleanup
            .entities()
            .map(|(e, t)| (e, t.to_string()))
            .collect();
        let registration = SceneRegistration::default();
        let services = &mut self.ctx.services;
        let mut attached = 0;
        for (entity, template) in owned {
            if let Ok(handle) = services.world.remove_one::<SceneHandle>(entity) {
                if let Some(renderer) = services.renderer.as_mut() {
                    renderer.remove_from_scene(handle.object);
                }
            }
            if matches!(
                registration.attach(services, entity_id(entity), &template),
                crate::systems::registration::Attach::Attached(_)
            ) {
                attached += 1;
            }
        }
        debug!(attached, "scene rebuilt");
        attached
    }
}
