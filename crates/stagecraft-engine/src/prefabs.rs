//! Prefab construction functions.
//!
//! Each takes a config with a default for every field and returns a
//! template ready for `AppContext::register_prefab`. They register
//! nothing themselves.

use std::time::{SystemTime, UNIX_EPOCH};

use glam::Vec3;

use stagecraft_core::components::*;
use stagecraft_core::constants::*;
use stagecraft_core::enums::*;
use stagecraft_core::prefab::{ComponentData, Prefab};
use stagecraft_core::types::Color;

/// Menu entry settings.
#[derive(Debug, Clone)]
pub struct MenuItemConfig {
    pub label: String,
    pub action: MenuAction,
    pub index: u32,
    /// Top of the menu; items stack downward by `MENU_ITEM_SPACING`.
    pub origin: Vec3,
    pub width: f32,
    pub height: f32,
    pub font_size: f32,
    pub panel_color: Color,
}

impl Default for MenuItemConfig {
    fn default() -> Self {
        Self {
            label: "Item".to_string(),
            action: MenuAction::None,
            index: 0,
            origin: Vec3::ZERO,
            width: MENU_ITEM_WIDTH,
            height: MENU_ITEM_HEIGHT,
            font_size: DEFAULT_FONT_SIZE,
            panel_color: Color(MENU_PANEL_COLOR),
        }
    }
}

pub fn menu_item_prefab(config: &MenuItemConfig) -> Prefab {
    let position = config.origin - Vec3::Y * (config.index as f32 * MENU_ITEM_SPACING);
    Prefab::new(format!("menu-item-{}", config.index))
        .with(ComponentData::Transform(Transform::at(position)))
        .with(ComponentData::MenuItem(
            MenuItem {
                label: config.label.clone(),
                action: config.action,
                index: config.index,
                width: config.width,
                height: config.height,
                font_size: config.font_size,
                selected: false,
                panel: Some(PanelDesc {
                    color: config.panel_color,
                    opacity: 1.0,
                }),
            }
            .validated(),
        ))
}

/// Spinning cube settings.
#[derive(Debug, Clone)]
pub struct CubeConfig {
    pub name: String,
    pub position: Vec3,
    pub size: f32,
    pub color: Color,
    pub spin: Vec3,
}

impl Default for CubeConfig {
    fn default() -> Self {
        Self {
            name: "spinning-cube".to_string(),
            position: Vec3::ZERO,
            size: CUBE_SIZE,
            color: Color(CUBE_COLOR),
            spin: Vec3::new(0.0, 1.0, 0.0),
        }
    }
}

pub fn spinning_cube_prefab(config: &CubeConfig) -> Prefab {
    let size = config.size.max(MIN_EXTENT);
    Prefab::new(config.name.clone())
        .with(ComponentData::Transform(Transform::at(config.position)))
        .with(ComponentData::Spin(Spin { speed: config.spin }.validated()))
        .with(ComponentData::SpinningCube(SpinningCube { size }))
        .with(ComponentData::Mesh(Mesh {
            renderable: Some(MeshDesc {
                geometry: Geometry::Box {
                    width: size,
                    height: size,
                    depth: size,
                },
                color: config.color,
                cast_shadow: true,
            }),
        }))
        .with(ComponentData::Material(Material {
            color: config.color,
        }))
}

/// Text label settings.
#[derive(Debug, Clone)]
pub struct TextConfig {
    pub name: String,
    pub content: String,
    pub position: Vec3,
    pub font_size: f32,
    pub color: Color,
}

impl Default for TextConfig {
    fn default() -> Self {
        Self {
            name: "text".to_string(),
            content: String::new(),
            position: Vec3::ZERO,
            font_size: DEFAULT_FONT_SIZE,
            color: Color(MENU_TEXT_COLOR),
        }
    }
}

pub fn text_prefab(config: &TextConfig) -> Prefab {
    Prefab::new(config.name.clone())
        .with(ComponentData::Transform(Transform::at(config.position)))
        .with(ComponentData::Text(
            Text {
                content: config.content.clone(),
                font_size: config.font_size,
                color: config.color,
            }
            .validated(),
        ))
}

/// Ground plane settings.
#[derive(Debug, Clone)]
pub struct GroundConfig {
    pub name: String,
    pub width: f32,
    pub depth: f32,
    pub color: Color,
    /// Adds a static body so things can land on it.
    pub solid: bool,
}

impl Default for GroundConfig {
    fn default() -> Self {
        Self {
            name: "ground".to_string(),
            width: 20.0,
            depth: 20.0,
            color: Color(0x555555),
            solid: true,
        }
    }
}

pub fn ground_prefab(config: &GroundConfig) -> Prefab {
    let mut prefab = Prefab::new(config.name.clone())
        .with(ComponentData::Transform(Transform::default()))
        .with(ComponentData::Mesh(Mesh {
            renderable: Some(MeshDesc {
                geometry: Geometry::Plane {
                    width: config.width,
                    depth: config.depth,
                },
                color: config.color,
                cast_shadow: false,
            }),
        }))
        .with(ComponentData::Material(Material {
            color: config.color,
        }));
    if config.solid {
        prefab = prefab
            .with(ComponentData::RigidBody(RigidBody {
                kind: BodyKind::Static,
                mass: 0.0,
                ..Default::default()
            }))
            .with(ComponentData::Collider(
                Collider {
                    shape: ColliderShape::Cuboid {
                        half_extents: Vec3::new(config.width / 2.0, 0.05, config.depth / 2.0),
                    },
                    sensor: false,
                }
                .validated(),
            ));
    }
    prefab
}

/// Dynamic box settings.
#[derive(Debug, Clone)]
pub struct BoxConfig {
    pub name: String,
    pub position: Vec3,
    pub size: f32,
    pub mass: f32,
    pub color: Color,
    /// Make the physics demo nudge this box.
    pub impulse_target: Option<ImpulseTarget>,
}

impl Default for BoxConfig {
    fn default() -> Self {
        Self {
            name: "box".to_string(),
            position: Vec3::new(0.0, 2.0, 0.0),
            size: 1.0,
            mass: 1.0,
            color: Color(0x3366ff),
            impulse_target: None,
        }
    }
}

pub fn dynamic_box_prefab(config: &BoxConfig) -> Prefab {
    let size = config.size.max(MIN_EXTENT);
    let mut prefab = Prefab::new(config.name.clone())
        .with(ComponentData::Transform(Transform::at(config.position)))
        .with(ComponentData::Mesh(Mesh {
            renderable: Some(MeshDesc {
                geometry: Geometry::Box {
                    width: size,
                    height: size,
                    depth: size,
                },
                color: config.color,
                cast_shadow: true,
            }),
        }))
        .with(ComponentData::Material(Material {
            color: config.color,
        }))
        .with(ComponentData::RigidBody(
            RigidBody {
                kind: BodyKind::Dynamic,
                mass: config.mass,
                ..Default::default()
            }
            .validated(),
        ))
        .with(ComponentData::Collider(Collider {
            shape: ColliderShape::Cuboid {
                half_extents: Vec3::splat(size / 2.0),
            },
            sensor: false,
        }));
    if let Some(target) = config.impulse_target {
        prefab = prefab.with(ComponentData::ImpulseTarget(target));
    }
    prefab
}

/// Sensor volume settings. Sensors have no mesh.
#[derive(Debug, Clone)]
pub struct SensorConfig {
    pub name: String,
    pub position: Vec3,
    pub half_extents: Vec3,
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            name: "sensor".to_string(),
            position: Vec3::new(0.0, 0.5, 0.0),
            half_extents: Vec3::new(2.0, 0.5, 2.0),
        }
    }
}

pub fn sensor_prefab(config: &SensorConfig) -> Prefab {
    Prefab::new(config.name.clone())
        .with(ComponentData::Transform(Transform::at(config.position)))
        .with(ComponentData::RigidBody(RigidBody {
            kind: BodyKind::Static,
            mass: 0.0,
            ..Default::default()
        }))
        .with(ComponentData::Collider(
            Collider {
                shape: ColliderShape::Cuboid {
                    half_extents: config.half_extents,
                },
                sensor: true,
            }
            .validated(),
        ))
}

/// Camera settings.
#[derive(Debug, Clone)]
pub struct CameraConfig {
    pub position: Vec3,
    pub look_at: Vec3,
    pub fov_degrees: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 5.0, 10.0),
            look_at: Vec3::ZERO,
            fov_degrees: 75.0,
        }
    }
}

pub fn camera_prefab(config: &CameraConfig) -> Prefab {
    Prefab::new("camera")
        .with(ComponentData::Transform(Transform::at(config.position)))
        .with(ComponentData::Camera(
            Camera {
                fov_degrees: config.fov_degrees,
                look_at: config.look_at,
                ..Default::default()
            }
            .validated(),
        ))
}

/// Light settings.
#[derive(Debug, Clone)]
pub struct LightConfig {
    pub name: String,
    pub kind: LightKind,
    pub position: Vec3,
    pub color: Color,
    pub intensity: f32,
}

impl Default for LightConfig {
    fn default() -> Self {
        Self {
            name: "light".to_string(),
            kind: LightKind::Ambient,
            position: Vec3::new(5.0, 10.0, 5.0),
            color: Color::WHITE,
            intensity: 1.0,
        }
    }
}

pub fn light_prefab(config: &LightConfig) -> Prefab {
    Prefab::new(config.name.clone())
        .with(ComponentData::Transform(Transform::at(config.position)))
        .with(ComponentData::Light(
            Light {
                kind: config.kind,
                color: config.color,
                intensity: config.intensity,
            }
            .validated(),
        ))
}

/// Character settings.
#[derive(Debug, Clone)]
pub struct CharacterConfig {
    pub display_name: String,
    pub position: Vec3,
    pub speed: f32,
    pub color: Color,
}

impl Default for CharacterConfig {
    fn default() -> Self {
        Self {
            display_name: "Player".to_string(),
            position: Vec3::ZERO,
            speed: CHARACTER_SPEED,
            color: Color(0xffaa00),
        }
    }
}

/// Character template. The name embeds the wall-clock time in nanoseconds
/// so repeated calls do not collide in the registry; do not rely on it
/// being stable between calls.
pub fn character_prefab(config: &CharacterConfig) -> Prefab {
    let stamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or_default();
    Prefab::new(format!("character-{stamp}"))
        .with(ComponentData::Transform(Transform::at(config.position)))
        .with(ComponentData::Character(
            Character {
                name: config.display_name.clone(),
                speed: config.speed,
            }
            .validated(),
        ))
        .with(ComponentData::Mesh(Mesh {
            renderable: Some(MeshDesc {
                geometry: Geometry::Sphere { radius: 0.5 },
                color: config.color,
                cast_shadow: true,
            }),
        }))
        .with(ComponentData::Material(Material {
            color: config.color,
        }))
}
