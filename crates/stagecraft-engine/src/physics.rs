//! Physics engine boundary.
//!
//! Bodies are keyed by `EntityId`. The glue asks `is_body_registered`
//! directly before nudging a body instead of round-tripping a callback
//! through the event bus. `HeadlessPhysics` records what it is asked to do
//! and replays contacts queued by the caller; it does not integrate motion.

use std::any::Any;
use std::collections::{HashMap, VecDeque};

use glam::Vec3;

use stagecraft_core::components::{Collider, RigidBody};
use stagecraft_core::types::EntityId;

/// Contact notification produced by a physics step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactEvent {
    Started { sensor: EntityId, target: EntityId },
    Ended { sensor: EntityId, target: EntityId },
}

pub trait PhysicsBackend {
    fn register_body(&mut self, id: EntityId, body: RigidBody, collider: Collider);

    /// Returns false if the body was not registered.
    fn remove_body(&mut self, id: EntityId) -> bool;

    fn is_body_registered(&self, id: EntityId) -> bool;

    fn body_count(&self) -> usize;

    fn apply_impulse(&mut self, id: EntityId, impulse: Vec3);

    fn apply_torque_impulse(&mut self, id: EntityId, torque: Vec3);

    /// Advance the simulation and report contacts that began or ended.
    fn step(&mut self, dt: f64) -> Vec<ContactEvent>;

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

#[derive(Debug, Clone, Copy)]
struct BodyRecord {
    body: RigidBody,
    collider: Collider,
    linear_impulse: Vec3,
    angular_impulse: Vec3,
}

/// Recording physics backend.
#[derive(Debug, Default)]
pub struct HeadlessPhysics {
    bodies: HashMap<EntityId, BodyRecord>,
    contacts: VecDeque<ContactEvent>,
    impulses_applied: usize,
    torques_applied: usize,
    elapsed: f64,
}

impl HeadlessPhysics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a contact to be reported by the next `step`.
    pub fn inject_contact(&mut self, contact: ContactEvent) {
        self.contacts.push_back(contact);
    }

    /// Sum of linear impulses applied to a body.
    pub fn linear_impulse(&self, id: EntityId) -> Option<Vec3> {
        self.bodies.get(&id).map(|b| b.linear_impulse)
    }

    /// Sum of angular impulses applied to a body.
    pub fn angular_impulse(&self, id: EntityId) -> Option<Vec3> {
        self.bodies.get(&id).map(|b| b.angular_impulse)
    }

    pub fn is_sensor(&self, id: EntityId) -> bool {
        self.bodies.get(&id).is_some_and(|b| b.collider.sensor)
    }

    pub fn body(&self, id: EntityId) -> Option<RigidBody> {
        self.bodies.get(&id).map(|b| b.body)
    }

    pub fn impulses_applied(&self) -> usize {
        self.impulses_applied
    }

    pub fn torques_applied(&self) -> usize {
        self.torques_applied
    }

    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }
}

impl PhysicsBackend for HeadlessPhysics {
    fn register_body(&mut self, id: EntityId, body: RigidBody, collider: Collider) {
        self.bodies.insert(
            id,
            BodyRecord {
                body,
                collider,
                linear_impulse: Vec3::ZERO,
                angular_impulse: Vec3::ZERO,
            },
        );
    }

    fn remove_body(&mut self, id: EntityId) -> bool {
        self.bodies.remove(&id).is_some()
    }

    fn is_body_registered(&self, id: EntityId) -> bool {
        self.bodies.contains_key(&id)
    }

    fn body_count(&self) -> usize {
        self.bodies.len()
    }

    fn apply_impulse(&mut self, id: EntityId, impulse: Vec3) {
        if let Some(record) = self.bodies.get_mut(&id) {
            record.linear_impulse += impulse;
            self.impulses_applied += 1;
        }
    }

    fn apply_torque_impulse(&mut self, id: EntityId, torque: Vec3) {
        if let Some(record) = self.bodies.get_mut(&id) {
            record.angular_impulse += torque;
            self.torques_applied += 1;
        }
    }

    fn step(&mut self, dt: f64) -> Vec<ContactEvent> {
        self.elapsed += dt;
        self.contacts.drain(..).collect()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
