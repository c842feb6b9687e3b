//! Physics demo: boxes kept in motion by periodic impulses, and a sensor
//! pad that recolors whatever overlaps it.
//!
//! Impulses are only sent to bodies the physics backend already knows
//! about. The original color of a highlighted target lives in a
//! side-table owned by the collision handler, never on the material.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use glam::Vec3;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info, warn};

use stagecraft_core::components::{ImpulseTarget, Material, RigidBody};
use stagecraft_core::constants::*;
use stagecraft_core::enums::{BodyKind, LightKind};
use stagecraft_core::events::{EventKind, GameEvent};
use stagecraft_core::types::{Color, EntityId};

use crate::config::EngineConfig;
use crate::context::Services;
use crate::error::LevelError;
use crate::level::{Capability, Level, LevelScope};
use crate::prefabs::{
    self, BoxConfig, CameraConfig, GroundConfig, LightConfig, SensorConfig,
};
use crate::timers::TimerId;
use crate::world_ext::{entity_from_id, entity_id};

/// Recolors targets while they overlap one sensor.
#[derive(Debug)]
pub struct ColorToggle {
    sensor: EntityId,
    highlight: Color,
    originals: HashMap<EntityId, Color>,
}

impl ColorToggle {
    pub fn new(sensor: EntityId, highlight: Color) -> Self {
        Self {
            sensor,
            highlight,
            originals: HashMap::new(),
        }
    }

    /// Original color cached for `target`, if it is highlighted.
    pub fn cached(&self, target: EntityId) -> Option<Color> {
        self.originals.get(&target).copied()
    }

    pub fn on_start(&mut self, services: &mut Services, sensor: EntityId, target: EntityId) {
        if sensor != self.sensor {
            return;
        }
        let Some(mut material) = material_mut(services, target) else {
            warn!(entity = %target, "collision target has no material, not highlighted");
            return;
        };
        self.originals.entry(target).or_insert(material.color);
        material.color = self.highlight;
        debug!(entity = %target, "target highlighted");
    }

    pub fn on_end(&mut self, services: &mut Services, sensor: EntityId, target: EntityId) {
        if sensor != self.sensor {
            return;
        }
        let Some(original) = self.originals.remove(&target) else {
            info!(entity = %target, "no cached color for target, nothing to restore");
            return;
        };
        match material_mut(services, target) {
            Some(mut material) => material.color = original,
            None => debug!(entity = %target, "target gone before its color was restored"),
        }
    }
}

fn material_mut(services: &mut Services, id: EntityId) -> Option<hecs::RefMut<'_, Material>> {
    let entity = entity_from_id(id)?;
    services.world.get::<&mut Material>(entity).ok()
}

pub struct PhysicsDemoLevel {
    seed: u64,
    impulse_period: f64,
    torque_period: f64,
    rng: ChaCha8Rng,
    impulse_timer: Option<TimerId>,
    torque_timer: Option<TimerId>,
    toggle: Option<Rc<RefCell<ColorToggle>>>,
}

impl PhysicsDemoLevel {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            seed: config.seed,
            impulse_period: config.impulse_period,
            torque_period: config.torque_period,
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            impulse_timer: None,
            torque_timer: None,
            toggle: None,
        }
    }

    /// Dynamic impulse targets the backend has registered.
    fn registered_targets(services: &Services) -> Vec<(EntityId, ImpulseTarget)> {
        let Some(physics) = services.physics.as_deref() else {
            return Vec::new();
        };
        let mut targets = Vec::new();
        for (entity, (target, body)) in services
            .world
            .query::<(&ImpulseTarget, &RigidBody)>()
            .iter()
        {
            if body.kind != BodyKind::Dynamic {
                continue;
            }
            let id = entity_id(entity);
            if physics.is_body_registered(id) {
                targets.push((id, *target));
            } else {
                debug!(entity = %id, "body not registered yet, impulse skipped");
            }
        }
        targets
    }

    fn jitter(&mut self) -> Vec3 {
        Vec3::new(
            self.rng.gen_range(-IMPULSE_JITTER..=IMPULSE_JITTER),
            0.0,
            self.rng.gen_range(-IMPULSE_JITTER..=IMPULSE_JITTER),
        )
    }

    fn push_bodies(&mut self, scope: &mut LevelScope<'_>) {
        for (body, target) in Self::registered_targets(scope.services()) {
            let impulse = target.impulse + self.jitter();
            scope.emit(GameEvent::ApplyImpulse { body, impulse });
        }
    }

    fn twist_bodies(&mut self, scope: &mut LevelScope<'_>) {
        for (body, target) in Self::registered_targets(scope.services()) {
            scope.emit(GameEvent::ApplyTorqueImpulse {
                body,
                torque: target.torque,
            });
        }
    }
}

impl Level for PhysicsDemoLevel {
    fn name(&self) -> &'static str {
        "physics-demo"
    }

    fn requirements(&self) -> &'static [Capability] {
        &[Capability::Renderer, Capability::Physics]
    }

    fn setup(&mut self, scope: &mut LevelScope<'_>) -> Result<(), LevelError> {
        self.rng = ChaCha8Rng::seed_from_u64(self.seed);

        scope.spawn(prefabs::camera_prefab(&CameraConfig {
            position: Vec3::new(0.0, 8.0, 14.0),
            ..Default::default()
        }))?;
        scope.spawn(prefabs::light_prefab(&LightConfig {
            name: "ambient".to_string(),
            intensity: 0.5,
            ..Default::default()
        }))?;
        scope.spawn(prefabs::light_prefab(&LightConfig {
            name: "sun".to_string(),
            kind: LightKind::Directional,
            ..Default::default()
        }))?;
        scope.spawn(prefabs::ground_prefab(&GroundConfig::default()))?;

        let sensor = scope.spawn(prefabs::sensor_prefab(&SensorConfig::default()))?;
        scope.spawn(prefabs::dynamic_box_prefab(&BoxConfig {
            name: "target".to_string(),
            position: Vec3::new(0.0, 3.0, 0.0),
            color: Color(0x22cc66),
            ..Default::default()
        }))?;
        for i in 0..3 {
            scope.spawn(prefabs::dynamic_box_prefab(&BoxConfig {
                name: format!("bouncer-{i}"),
                position: Vec3::new(i as f32 * 2.0 - 2.0, 1.0, -3.0),
                impulse_target: Some(ImpulseTarget::default()),
                ..Default::default()
            }))?;
        }

        let toggle = Rc::new(RefCell::new(ColorToggle::new(
            entity_id(sensor),
            Color(HIGHLIGHT_COLOR),
        )));
        let on_start = Rc::clone(&toggle);
        scope.on(EventKind::CollisionStarted, move |event, services| {
            if let GameEvent::CollisionStarted { sensor, target } = event {
                on_start.borrow_mut().on_start(services, *sensor, *target);
            }
        });
        let on_end = Rc::clone(&toggle);
        scope.on(EventKind::CollisionEnded, move |event, services| {
            if let GameEvent::CollisionEnded { sensor, target } = event {
                on_end.borrow_mut().on_end(services, *sensor, *target);
            }
        });

        self.impulse_timer = Some(scope.every(self.impulse_period));
        self.torque_timer = Some(scope.every(self.torque_period));
        self.toggle = Some(toggle);
        scope.add_overlay("Physics demo");
        Ok(())
    }

    fn on_timer(&mut self, scope: &mut LevelScope<'_>, timer: TimerId) -> Result<(), LevelError> {
        if Some(timer) == self.impulse_timer {
            self.push_bodies(scope);
        } else if Some(timer) == self.torque_timer {
            self.twist_bodies(scope);
        }
        Ok(())
    }

    fn teardown(&mut self, _scope: &mut LevelScope<'_>) {
        self.impulse_timer = None;
        self.torque_timer = None;
        self.toggle = None;
    }
}
