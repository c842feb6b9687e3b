//! Application context: the one owner of the world, prefabs, timers,
//! event bus, renderer and physics handles.
//!
//! Everything that was a process-wide singleton by convention is a field
//! here and is passed explicitly to whoever needs it.

use hecs::{Entity, World};
use tracing::{debug, warn};

use stagecraft_core::components::{Camera, SceneHandle, Transform};
use stagecraft_core::enums::LevelId;
use stagecraft_core::events::{EventKind, GameEvent};
use stagecraft_core::factories::ComponentFactories;
use stagecraft_core::prefab::{ComponentData, Prefab};

use crate::config::EngineConfig;
use crate::event_bus::{EventBus, EventQueue, ListenerId};
use crate::level::Capability;
use crate::physics::{ContactEvent, PhysicsBackend};
use crate::prefab_registry::PrefabRegistry;
use crate::render::RenderBackend;
use crate::systems;
use crate::timers::TimerQueue;
use crate::world_ext::{entity_from_id, entity_id, spawn_components};

/// Pause/resume requests raised by render-context listeners and consumed
/// by the level runner at the start of the next frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextSignal {
    Lost,
    Restored,
}

/// Level changes requested from inside event handlers (menu actions).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelRequest {
    Load(LevelId),
    Quit,
}

/// Shared state handed to systems and event listeners.
pub struct Services {
    pub world: World,
    pub prefabs: PrefabRegistry,
    pub factories: ComponentFactories,
    pub timers: TimerQueue,
    pub renderer: Option<Box<dyn RenderBackend>>,
    pub physics: Option<Box<dyn PhysicsBackend>>,
    pub config: EngineConfig,
    queued_events: Vec<GameEvent>,
    context_signals: Vec<ContextSignal>,
    level_requests: Vec<LevelRequest>,
}

impl Services {
    /// Raise an event from inside a listener. Dispatched before the
    /// current `emit` returns.
    pub fn queue_event(&mut self, event: GameEvent) {
        self.queued_events.push(event);
    }

    pub fn signal_context(&mut self, signal: ContextSignal) {
        self.context_signals.push(signal);
    }

    pub fn take_context_signals(&mut self) -> Vec<ContextSignal> {
        std::mem::take(&mut self.context_signals)
    }

    pub fn request_level(&mut self, request: LevelRequest) {
        self.level_requests.push(request);
    }

    pub fn take_level_requests(&mut self) -> Vec<LevelRequest> {
        std::mem::take(&mut self.level_requests)
    }

    /// Remove an entity together with its scene object and physics body.
    pub fn despawn(&mut self, entity: Entity) -> bool {
        let handle = self.world.get::<&SceneHandle>(entity).ok().map(|h| *h);
        if let (Some(handle), Some(renderer)) = (handle, self.renderer.as_mut()) {
            renderer.remove_from_scene(handle.object);
        }
        if let Some(physics) = self.physics.as_mut() {
            physics.remove_body(entity_id(entity));
        }
        self.world.despawn(entity).is_ok()
    }
}

impl EventQueue<GameEvent> for Services {
    fn drain_queued(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.queued_events)
    }
}

/// A per-frame world system.
pub type SystemFn = fn(&mut Services, f64);

/// World systems, run in the order they were added.
#[derive(Default)]
pub struct SystemSchedule {
    systems: Vec<(&'static str, SystemFn)>,
}

impl SystemSchedule {
    pub fn add(&mut self, name: &'static str, system: SystemFn) {
        self.systems.push((name, system));
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.systems.iter().map(|(name, _)| *name).collect()
    }

    pub fn run(&self, services: &mut Services, dt: f64) {
        for (_, system) in &self.systems {
            system(services, dt);
        }
    }
}

/// Builds an `AppContext` with the backends available in this process.
#[derive(Default)]
pub struct AppContextBuilder {
    config: EngineConfig,
    factories: Option<ComponentFactories>,
    renderer: Option<Box<dyn RenderBackend>>,
    physics: Option<Box<dyn PhysicsBackend>>,
}

impl AppContextBuilder {
    pub fn config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn factories(mut self, factories: ComponentFactories) -> Self {
        self.factories = Some(factories);
        self
    }

    pub fn renderer(mut self, renderer: impl RenderBackend + 'static) -> Self {
        self.renderer = Some(Box::new(renderer));
        self
    }

    pub fn physics(mut self, physics: impl PhysicsBackend + 'static) -> Self {
        self.physics = Some(Box::new(physics));
        self
    }

    pub fn build(self) -> AppContext {
        let services = Services {
            world: World::new(),
            prefabs: PrefabRegistry::new(),
            factories: self.factories.unwrap_or_default(),
            timers: TimerQueue::new(),
            renderer: self.renderer,
            physics: self.physics,
            config: self.config.validated(),
            queued_events: Vec::new(),
            context_signals: Vec::new(),
            level_requests: Vec::new(),
        };
        let mut ctx = AppContext {
            services,
            bus: EventBus::new(),
            systems: SystemSchedule::default(),
        };
        systems::install_core(&mut ctx);
        ctx
    }
}

/// The application context.
pub struct AppContext {
    pub services: Services,
    bus: EventBus<GameEvent, Services>,
    systems: SystemSchedule,
}

impl AppContext {
    pub fn builder() -> AppContextBuilder {
        AppContextBuilder::default()
    }

    pub fn world(&self) -> &World {
        &self.services.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.services.world
    }

    pub fn config(&self) -> &EngineConfig {
        &self.services.config
    }

    pub fn has_capability(&self, capability: Capability) -> bool {
        match capability {
            Capability::Renderer => self.services.renderer.is_some(),
            Capability::Physics => self.services.physics.is_some(),
        }
    }

    pub fn renderer(&self) -> Option<&dyn RenderBackend> {
        self.services.renderer.as_deref()
    }

    pub fn physics(&self) -> Option<&dyn PhysicsBackend> {
        self.services.physics.as_deref()
    }

    /// Downcast the renderer to a concrete backend.
    pub fn renderer_as<T: 'static>(&self) -> Option<&T> {
        self.renderer()?.as_any().downcast_ref::<T>()
    }

    pub fn renderer_as_mut<T: 'static>(&mut self) -> Option<&mut T> {
        self.services
            .renderer
            .as_deref_mut()?
            .as_any_mut()
            .downcast_mut::<T>()
    }

    /// Downcast the physics backend to a concrete type.
    pub fn physics_as<T: 'static>(&self) -> Option<&T> {
        self.physics()?.as_any().downcast_ref::<T>()
    }

    pub fn physics_as_mut<T: 'static>(&mut self) -> Option<&mut T> {
        self.services
            .physics
            .as_deref_mut()?
            .as_any_mut()
            .downcast_mut::<T>()
    }

    // --- Event bus ---

    pub fn on<F>(&mut self, kind: EventKind, handler: F) -> ListenerId
    where
        F: FnMut(&GameEvent, &mut Services) + 'static,
    {
        self.bus.on(kind, handler)
    }

    pub fn off(&mut self, id: ListenerId) -> bool {
        self.bus.off(id)
    }

    /// Dispatch synchronously to every listener of the event's kind.
    pub fn emit(&mut self, event: GameEvent) {
        self.bus.emit(event, &mut self.services);
    }

    pub fn listener_count(&self) -> usize {
        self.bus.listener_count()
    }

    // --- Systems ---

    pub fn add_system(&mut self, name: &'static str, system: SystemFn) {
        self.systems.add(name, system);
    }

    pub fn system_names(&self) -> Vec<&'static str> {
        self.systems.names()
    }

    /// Run every world system once.
    pub fn update(&mut self, dt: f64) {
        self.systems.run(&mut self.services, dt);
    }

    /// Step physics and broadcast the contacts it reports.
    pub fn step_physics(&mut self, dt: f64) {
        let Some(physics) = self.services.physics.as_mut() else {
            return;
        };
        for contact in physics.step(dt) {
            let event = match contact {
                ContactEvent::Started { sensor, target } => {
                    GameEvent::CollisionStarted { sensor, target }
                }
                ContactEvent::Ended { sensor, target } => GameEvent::CollisionEnded { sensor, target },
            };
            self.emit(event);
        }
    }

    /// Push transforms into the scene and draw through the first camera.
    pub fn render(&mut self) {
        if self.services.renderer.is_none() {
            return;
        }
        systems::scene_sync::run(&mut self.services);
        let camera = self
            .services
            .world
            .query::<(&Camera, &Transform)>()
            .iter()
            .next()
            .map(|(_, (camera, _))| *camera)
            .unwrap_or_default();
        if let Some(renderer) = self.services.renderer.as_mut() {
            renderer.render(&camera);
        }
    }

    // --- Prefabs ---

    /// Store a prefab, replacing any prefab of the same name.
    pub fn register_prefab(&mut self, prefab: Prefab) -> Option<Prefab> {
        self.services.prefabs.register(prefab)
    }

    /// Instantiate a registered prefab and announce it with `EntityCreated`.
    /// Unknown names log a warning and produce nothing.
    pub fn create_entity_from_prefab(&mut self, name: &str) -> Option<Entity> {
        let Some(prefab) = self.services.prefabs.get(name) else {
            warn!(prefab = %name, "no prefab registered under this name");
            return None;
        };
        let components = prefab.components.clone();
        Some(self.spawn(name, &components))
    }

    /// Spawn an entity from loose components and announce it with
    /// `EntityCreated`, labeled with `template`.
    pub fn spawn(&mut self, template: &str, components: &[ComponentData]) -> Entity {
        let entity = spawn_components(&mut self.services.world, components);
        debug!(entity = ?entity, template = %template, "entity created");
        self.emit(GameEvent::EntityCreated {
            entity: entity_id(entity),
            template: template.to_string(),
        });
        entity
    }

    /// Remove an entity together with its scene object and physics body.
    pub fn despawn(&mut self, entity: Entity) -> bool {
        self.services.despawn(entity)
    }

    /// Resolve an event id back to a live entity.
    pub fn resolve(&self, id: stagecraft_core::types::EntityId) -> Option<Entity> {
        entity_from_id(id).filter(|&e| self.services.world.contains(e))
    }
}
