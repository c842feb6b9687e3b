//! Physics glue: registers new bodies with the physics backend and
//! forwards impulse requests to it.

use tracing::{debug, warn};

use stagecraft_core::components::{Collider, RigidBody};
use stagecraft_core::events::{EventKind, GameEvent};
use stagecraft_core::types::EntityId;

use crate::context::{AppContext, Services};
use crate::world_ext::entity_from_id;

/// Hand an entity with RigidBody + Collider to the physics backend.
/// Returns whether a body was registered.
pub fn register_body(services: &mut Services, id: EntityId) -> bool {
    let Some(physics) = services.physics.as_mut() else {
        return false;
    };
    let Some(entity) = entity_from_id(id) else {
        return false;
    };
    let Ok(mut query) = services
        .world
        .query_one::<(&RigidBody, &Collider)>(entity)
    else {
        return false;
    };
    let Some((body, collider)) = query.get().map(|(b, c)| (*b, *c)) else {
        return false;
    };
    physics.register_body(id, body, collider);
    debug!(entity = %id, kind = ?body.kind, sensor = collider.sensor, "body registered");
    true
}

fn forward(event: &GameEvent, services: &mut Services) {
    let Some(physics) = services.physics.as_mut() else {
        return;
    };
    match event {
        GameEvent::ApplyImpulse { body, impulse } => {
            if physics.is_body_registered(*body) {
                physics.apply_impulse(*body, *impulse);
            } else {
                warn!(entity = %body, "impulse at unregistered body dropped");
            }
        }
        GameEvent::ApplyTorqueImpulse { body, torque } => {
            if physics.is_body_registered(*body) {
                physics.apply_torque_impulse(*body, *torque);
            } else {
                warn!(entity = %body, "torque impulse at unregistered body dropped");
            }
        }
        _ => {}
    }
}

pub fn install(ctx: &mut AppContext) {
    ctx.on(EventKind::EntityCreated, |event, services| {
        if let GameEvent::EntityCreated { entity, .. } = event {
            register_body(services, *entity);
        }
    });
    ctx.on(EventKind::ApplyImpulse, forward);
    ctx.on(EventKind::ApplyTorqueImpulse, forward);
}
