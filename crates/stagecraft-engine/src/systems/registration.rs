//! Registration system: attaches the visuals of newly created entities to
//! the scene graph.
//!
//! Listens for `EntityCreated`. Handlers are tried in order, specialized
//! ones first and the generic mesh handler last; the first handler whose
//! tag is present decides. An entity whose visual tag lacks the nested
//! renderable is logged and skipped. This system only ever adds to the
//! scene.

use hecs::{Entity, World};
use tracing::{debug, warn};

use stagecraft_core::components::*;
use stagecraft_core::enums::Geometry;
use stagecraft_core::events::{EventKind, GameEvent};
use stagecraft_core::types::EntityId;

use crate::context::{AppContext, Services};
use crate::render::{ObjectKind, SceneObject};
use crate::world_ext::entity_from_id;

/// Turns one visual tag into a scene object.
pub trait VisualHandler {
    fn name(&self) -> &'static str;

    /// Whether the entity carries this handler's tag.
    fn matches(&self, world: &World, entity: Entity) -> bool;

    /// Build the drawable, or `None` if the nested renderable is missing.
    fn build(&self, world: &World, entity: Entity) -> Option<ObjectKind>;
}

/// Outcome of one registration attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attach {
    Attached(stagecraft_core::types::ObjectId),
    AlreadyAttached,
    NotVisual,
    MissingRenderable,
    NoRenderer,
    NoSuchEntity,
}

/// Ordered handler chain.
pub struct SceneRegistration {
    handlers: Vec<Box<dyn VisualHandler>>,
}

impl Default for SceneRegistration {
    fn default() -> Self {
        Self::new(vec![
            Box::new(SpinningCubeHandler),
            Box::new(MenuItemHandler),
            Box::new(TextHandler),
            Box::new(LightHandler),
        ])
    }
}

impl SceneRegistration {
    /// Specialized handlers in priority order; the mesh handler is
    /// appended as the fallback.
    pub fn new(mut specialized: Vec<Box<dyn VisualHandler>>) -> Self {
        specialized.push(Box::new(MeshHandler));
        Self {
            handlers: specialized,
        }
    }

    pub fn handler_names(&self) -> Vec<&'static str> {
        self.handlers.iter().map(|h| h.name()).collect()
    }

    pub fn attach(&self, services: &mut Services, id: EntityId, template: &str) -> Attach {
        let Some(entity) = entity_from_id(id).filter(|&e| services.world.contains(e)) else {
            debug!(entity = %id, template = %template, "entity gone before registration");
            return Attach::NoSuchEntity;
        };
        if services.world.get::<&SceneHandle>(entity).is_ok() {
            return Attach::AlreadyAttached;
        }
        let Some(handler) = self
            .handlers
            .iter()
            .find(|h| h.matches(&services.world, entity))
        else {
            return Attach::NotVisual;
        };
        let Some(kind) = handler.build(&services.world, entity) else {
            warn!(
                entity = %id,
                template = %template,
                handler = handler.name(),
                "visual tag present but nested renderable missing, skipped"
            );
            return Attach::MissingRenderable;
        };
        let Some(renderer) = services.renderer.as_mut() else {
            debug!(entity = %id, "no renderer, visual not attached");
            return Attach::NoRenderer;
        };

        let transform = services
            .world
            .get::<&Transform>(entity)
            .map(|t| *t)
            .unwrap_or_default();
        let object = renderer.allocate_id();
        renderer.add_to_scene(SceneObject {
            id: object,
            name: template.to_string(),
            kind,
            transform,
        });
        // The entity was checked above; insert cannot fail.
        let _ = services.world.insert_one(entity, SceneHandle { object });
        debug!(entity = %id, template = %template, handler = handler.name(), "visual attached");
        Attach::Attached(object)
    }
}

/// Listen for `EntityCreated` and attach visuals.
pub fn install(ctx: &mut AppContext) {
    let registration = SceneRegistration::default();
    ctx.on(EventKind::EntityCreated, move |event, services| {
        if let GameEvent::EntityCreated { entity, template } = event {
            registration.attach(services, *entity, template);
        }
    });
}

fn material_color(world: &World, entity: Entity) -> Option<stagecraft_core::types::Color> {
    world.get::<&Material>(entity).ok().map(|m| m.color)
}

/// Spinning cubes: cube geometry sized from the tag, shadows on.
pub struct SpinningCubeHandler;

impl VisualHandler for SpinningCubeHandler {
    fn name(&self) -> &'static str {
        "spinning-cube"
    }

    fn matches(&self, world: &World, entity: Entity) -> bool {
        world.get::<&SpinningCube>(entity).is_ok()
    }

    fn build(&self, world: &World, entity: Entity) -> Option<ObjectKind> {
        let size = world.get::<&SpinningCube>(entity).ok()?.size;
        let desc = world.get::<&Mesh>(entity).ok()?.renderable?;
        Some(ObjectKind::Mesh(MeshDesc {
            geometry: Geometry::Box {
                width: size,
                height: size,
                depth: size,
            },
            color: material_color(world, entity).unwrap_or(desc.color),
            cast_shadow: true,
        }))
    }
}

/// Menu items: a panel widget with the label drawn on it.
pub struct MenuItemHandler;

impl VisualHandler for MenuItemHandler {
    fn name(&self) -> &'static str {
        "menu-item"
    }

    fn matches(&self, world: &World, entity: Entity) -> bool {
        world.get::<&MenuItem>(entity).is_ok()
    }

    fn build(&self, world: &World, entity: Entity) -> Option<ObjectKind> {
        let item = world.get::<&MenuItem>(entity).ok()?;
        let panel = item.panel?;
        Some(ObjectKind::Widget {
            label: item.label.clone(),
            width: item.width,
            height: item.height,
            font_size: item.font_size,
            panel,
        })
    }
}

/// Free-standing text. Empty text has no glyphs to draw.
pub struct TextHandler;

impl VisualHandler for TextHandler {
    fn name(&self) -> &'static str {
        "text"
    }

    fn matches(&self, world: &World, entity: Entity) -> bool {
        world.get::<&Text>(entity).is_ok()
    }

    fn build(&self, world: &World, entity: Entity) -> Option<ObjectKind> {
        let text = world.get::<&Text>(entity).ok()?;
        if text.content.is_empty() {
            return None;
        }
        Some(ObjectKind::Text {
            content: text.content.clone(),
            font_size: text.font_size,
            color: text.color,
        })
    }
}

pub struct LightHandler;

impl VisualHandler for LightHandler {
    fn name(&self) -> &'static str {
        "light"
    }

    fn matches(&self, world: &World, entity: Entity) -> bool {
        world.get::<&Light>(entity).is_ok()
    }

    fn build(&self, world: &World, entity: Entity) -> Option<ObjectKind> {
        let light = world.get::<&Light>(entity).ok()?;
        Some(ObjectKind::Light {
            kind: light.kind,
            color: light.color,
            intensity: light.intensity,
        })
    }
}

/// Fallback for any entity with a plain mesh.
pub struct MeshHandler;

impl VisualHandler for MeshHandler {
    fn name(&self) -> &'static str {
        "mesh"
    }

    fn matches(&self, world: &World, entity: Entity) -> bool {
        world.get::<&Mesh>(entity).is_ok()
    }

    fn build(&self, world: &World, entity: Entity) -> Option<ObjectKind> {
        let desc = world.get::<&Mesh>(entity).ok()?.renderable?;
        Some(ObjectKind::Mesh(MeshDesc {
            color: material_color(world, entity).unwrap_or(desc.color),
            ..desc
        }))
    }
}
