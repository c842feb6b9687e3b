//! Rotation system.
//!
//! Advances `Transform::rotation` by `Spin::speed * dt` each frame. Angles
//! are not wrapped.

use hecs::World;

use stagecraft_core::components::{Spin, Transform};

use crate::context::Services;

/// Run rotation for every entity with Spin + Transform.
pub fn run(services: &mut Services, dt: f64) {
    advance(&mut services.world, dt);
}

/// Rotate everything in `world` by one step of `dt` seconds.
pub fn advance(world: &mut World, dt: f64) {
    let dt = dt.max(0.0) as f32;
    for (_entity, (transform, spin)) in world.query_mut::<(&mut Transform, &Spin)>() {
        transform.rotation += spin.speed * dt;
    }
}
