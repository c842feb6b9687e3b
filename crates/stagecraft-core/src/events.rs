//! Events broadcast over the engine's event bus.
//!
//! A closed set: every event kind and its payload is spelled out here,
//! so listeners match on variants instead of string keys.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::types::EntityId;

/// Everything that can travel over the event bus.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GameEvent {
    /// An entity was instantiated from a named prefab.
    EntityCreated { entity: EntityId, template: String },
    /// A body started overlapping a sensor volume.
    CollisionStarted { sensor: EntityId, target: EntityId },
    /// A body stopped overlapping a sensor volume.
    CollisionEnded { sensor: EntityId, target: EntityId },
    /// Request a linear impulse on a physics body.
    ApplyImpulse { body: EntityId, impulse: Vec3 },
    /// Request an angular impulse on a physics body.
    ApplyTorqueImpulse { body: EntityId, torque: Vec3 },
    /// The rendering context went away; drawing must pause.
    ContextLost,
    /// The rendering context is back; the scene must be rebuilt.
    ContextRestored,
    /// Move the menu cursor.
    MenuNavigate { direction: NavDirection },
    /// Activate the selected menu item.
    MenuActivate,
    /// A menu item was activated.
    MenuActivated { action: MenuAction },
}

/// Subscription key for `GameEvent` variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    EntityCreated,
    CollisionStarted,
    CollisionEnded,
    ApplyImpulse,
    ApplyTorqueImpulse,
    ContextLost,
    ContextRestored,
    MenuNavigate,
    MenuActivate,
    MenuActivated,
}

impl GameEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            GameEvent::EntityCreated { .. } => EventKind::EntityCreated,
            GameEvent::CollisionStarted { .. } => EventKind::CollisionStarted,
            GameEvent::CollisionEnded { .. } => EventKind::CollisionEnded,
            GameEvent::ApplyImpulse { .. } => EventKind::ApplyImpulse,
            GameEvent::ApplyTorqueImpulse { .. } => EventKind::ApplyTorqueImpulse,
            GameEvent::ContextLost => EventKind::ContextLost,
            GameEvent::ContextRestored => EventKind::ContextRestored,
            GameEvent::MenuNavigate { .. } => EventKind::MenuNavigate,
            GameEvent::MenuActivate => EventKind::MenuActivate,
            GameEvent::MenuActivated { .. } => EventKind::MenuActivated,
        }
    }
}
