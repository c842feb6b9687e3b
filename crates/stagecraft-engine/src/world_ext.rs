//! Tag-driven access to the hecs world.
//!
//! hecs is typed; prefabs and queries in this crate speak in
//! `ComponentTag`s. These helpers bridge the two.

use hecs::{Entity, EntityBuilder, World};

use stagecraft_core::components::*;
use stagecraft_core::enums::ComponentTag;
use stagecraft_core::prefab::ComponentData;
use stagecraft_core::types::EntityId;

/// Convert an ECS entity into the id used in events and side-tables.
pub fn entity_id(entity: Entity) -> EntityId {
    EntityId(entity.to_bits().get())
}

/// Convert back. `None` for ids that were never valid entity bits.
pub fn entity_from_id(id: EntityId) -> Option<Entity> {
    Entity::from_bits(id.0)
}

/// Spawn an entity carrying every component in `components`, in order.
/// A later component with the same tag replaces an earlier one.
pub fn spawn_components(world: &mut World, components: &[ComponentData]) -> Entity {
    let mut builder = EntityBuilder::new();
    for component in components {
        add_to_builder(&mut builder, component.clone());
    }
    world.spawn(builder.build())
}

fn add_to_builder(builder: &mut EntityBuilder, component: ComponentData) {
    match component {
        ComponentData::Transform(c) => builder.add(c),
        ComponentData::Spin(c) => builder.add(c),
        ComponentData::SpinningCube(c) => builder.add(c),
        ComponentData::Mesh(c) => builder.add(c),
        ComponentData::Text(c) => builder.add(c),
        ComponentData::MenuItem(c) => builder.add(c),
        ComponentData::Material(c) => builder.add(c),
        ComponentData::RigidBody(c) => builder.add(c),
        ComponentData::Collider(c) => builder.add(c),
        ComponentData::ImpulseTarget(c) => builder.add(c),
        ComponentData::Camera(c) => builder.add(c),
        ComponentData::Light(c) => builder.add(c),
        ComponentData::Character(c) => builder.add(c),
    };
}

/// Whether `entity` carries the component identified by `tag`.
/// Dead entities carry nothing.
pub fn has_tag(world: &World, entity: Entity, tag: ComponentTag) -> bool {
    let Ok(e) = world.entity(entity) else {
        return false;
    };
    match tag {
        ComponentTag::Transform => e.has::<Transform>(),
        ComponentTag::Spin => e.has::<Spin>(),
        ComponentTag::SpinningCube => e.has::<SpinningCube>(),
        ComponentTag::Mesh => e.has::<Mesh>(),
        ComponentTag::Text => e.has::<Text>(),
        ComponentTag::MenuItem => e.has::<MenuItem>(),
        ComponentTag::Material => e.has::<Material>(),
        ComponentTag::RigidBody => e.has::<RigidBody>(),
        ComponentTag::Collider => e.has::<Collider>(),
        ComponentTag::ImpulseTarget => e.has::<ImpulseTarget>(),
        ComponentTag::Camera => e.has::<Camera>(),
        ComponentTag::Light => e.has::<Light>(),
        ComponentTag::Character => e.has::<Character>(),
    }
}

/// Remove the component identified by `tag`. Returns whether one was removed.
pub fn remove_tag(world: &mut World, entity: Entity, tag: ComponentTag) -> bool {
    match tag {
        ComponentTag::Transform => world.remove_one::<Transform>(entity).is_ok(),
        ComponentTag::Spin => world.remove_one::<Spin>(entity).is_ok(),
        ComponentTag::SpinningCube => world.remove_one::<SpinningCube>(entity).is_ok(),
        ComponentTag::Mesh => world.remove_one::<Mesh>(entity).is_ok(),
        ComponentTag::Text => world.remove_one::<Text>(entity).is_ok(),
        ComponentTag::MenuItem => world.remove_one::<MenuItem>(entity).is_ok(),
        ComponentTag::Material => world.remove_one::<Material>(entity).is_ok(),
        ComponentTag::RigidBody => world.remove_one::<RigidBody>(entity).is_ok(),
        ComponentTag::Collider => world.remove_one::<Collider>(entity).is_ok(),
        ComponentTag::ImpulseTarget => world.remove_one::<ImpulseTarget>(entity).is_ok(),
        ComponentTag::Camera => world.remove_one::<Camera>(entity).is_ok(),
        ComponentTag::Light => world.remove_one::<Light>(entity).is_ok(),
        ComponentTag::Character => world.remove_one::<Character>(entity).is_ok(),
    }
}

/// All entities whose component set is a superset of `tags`.
/// An empty tag set matches every entity.
pub fn entities_with(world: &World, tags: &[ComponentTag]) -> Vec<Entity> {
    world
        .iter()
        .map(|e| e.entity())
        .filter(|&entity| tags.iter().all(|&tag| has_tag(world, entity, tag)))
        .collect()
}
