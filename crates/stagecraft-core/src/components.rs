//! ECS components for hecs entities.
//!
//! Components are plain data structs. The only behavior they carry is
//! `validated()`, which clamps numeric fields into their legal range.
//! Game logic lives in systems, not components.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::enums::*;
use crate::types::{Color, ObjectId};

/// Spatial transform. Rotation is Euler angles in radians and is never
/// wrapped; renderers normalize for display.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Vec3,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    pub fn validated(self) -> Self {
        self
    }
}

/// Angular velocity applied by the rotation system (radians per second).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Spin {
    pub speed: Vec3,
}

impl Spin {
    pub fn validated(self) -> Self {
        Self {
            speed: self
                .speed
                .clamp(Vec3::splat(-MAX_SPIN_SPEED), Vec3::splat(MAX_SPIN_SPEED)),
        }
    }
}

/// Marks a mesh entity as a spinning cube. Picked up by the specialized
/// registration handler before the generic mesh handler.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpinningCube {
    pub size: f32,
}

impl Default for SpinningCube {
    fn default() -> Self {
        Self { size: CUBE_SIZE }
    }
}

impl SpinningCube {
    pub fn validated(self) -> Self {
        Self {
            size: self.size.max(MIN_EXTENT),
        }
    }
}

/// Geometry plus material for a drawable mesh.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeshDesc {
    pub geometry: Geometry,
    pub color: Color,
    pub cast_shadow: bool,
}

/// Generic mesh tag. The nested renderable may be absent, in which case
/// nothing is attached to the scene.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Mesh {
    pub renderable: Option<MeshDesc>,
}

/// Text rendered as glyphs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Text {
    pub content: String,
    pub font_size: f32,
    pub color: Color,
}

impl Default for Text {
    fn default() -> Self {
        Self {
            content: String::new(),
            font_size: DEFAULT_FONT_SIZE,
            color: Color(MENU_TEXT_COLOR),
        }
    }
}

impl Text {
    pub fn validated(self) -> Self {
        Self {
            font_size: self.font_size.clamp(MIN_FONT_SIZE, MAX_FONT_SIZE),
            color: self.color.validated(),
            ..self
        }
    }
}

/// Background plate drawn behind a menu label.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PanelDesc {
    pub color: Color,
    pub opacity: f32,
}

impl Default for PanelDesc {
    fn default() -> Self {
        Self {
            color: Color(MENU_PANEL_COLOR),
            opacity: 1.0,
        }
    }
}

/// A selectable menu entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MenuItem {
    pub label: String,
    pub action: MenuAction,
    /// Position in the menu, top to bottom.
    pub index: u32,
    pub width: f32,
    pub height: f32,
    pub font_size: f32,
    pub selected: bool,
    pub panel: Option<PanelDesc>,
}

impl Default for MenuItem {
    fn default() -> Self {
        Self {
            label: String::new(),
            action: MenuAction::None,
            index: 0,
            width: MENU_ITEM_WIDTH,
            height: MENU_ITEM_HEIGHT,
            font_size: DEFAULT_FONT_SIZE,
            selected: false,
            panel: Some(PanelDesc::default()),
        }
    }
}

impl MenuItem {
    pub fn validated(self) -> Self {
        Self {
            width: self.width.max(MIN_EXTENT),
            height: self.height.max(MIN_EXTENT),
            font_size: self.font_size.clamp(MIN_FONT_SIZE, MAX_FONT_SIZE),
            panel: self.panel.map(|p| PanelDesc {
                color: p.color.validated(),
                opacity: p.opacity.clamp(0.0, 1.0),
            }),
            ..self
        }
    }
}

/// Surface color of an entity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Material {
    pub color: Color,
}

impl Material {
    pub fn validated(self) -> Self {
        Self {
            color: self.color.validated(),
        }
    }
}

/// Rigid-body parameters handed to the physics backend.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RigidBody {
    pub kind: BodyKind,
    pub mass: f32,
    pub linear_damping: f32,
    pub angular_damping: f32,
}

impl Default for RigidBody {
    fn default() -> Self {
        Self {
            kind: BodyKind::Dynamic,
            mass: 1.0,
            linear_damping: 0.0,
            angular_damping: 0.05,
        }
    }
}

impl RigidBody {
    pub fn validated(self) -> Self {
        let mass = match self.kind {
            BodyKind::Dynamic => self.mass.max(MIN_BODY_MASS),
            BodyKind::Static | BodyKind::Kinematic => self.mass.max(0.0),
        };
        Self {
            mass,
            linear_damping: self.linear_damping.clamp(0.0, 1.0),
            angular_damping: self.angular_damping.clamp(0.0, 1.0),
            ..self
        }
    }
}

/// Collision shape.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ColliderShape {
    Cuboid { half_extents: Vec3 },
    Ball { radius: f32 },
}

impl Default for ColliderShape {
    fn default() -> Self {
        ColliderShape::Cuboid {
            half_extents: Vec3::splat(0.5),
        }
    }
}

/// Collider attached to a rigid body. Sensors detect overlap only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Collider {
    pub shape: ColliderShape,
    pub sensor: bool,
}

impl Collider {
    pub fn validated(self) -> Self {
        let shape = match self.shape {
            ColliderShape::Cuboid { half_extents } => ColliderShape::Cuboid {
                half_extents: half_extents.max(Vec3::splat(MIN_EXTENT)),
            },
            ColliderShape::Ball { radius } => ColliderShape::Ball {
                radius: radius.max(MIN_EXTENT),
            },
        };
        Self { shape, ..self }
    }
}

/// Marks a dynamic body the physics demo keeps nudging.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImpulseTarget {
    pub impulse: Vec3,
    pub torque: Vec3,
}

impl Default for ImpulseTarget {
    fn default() -> Self {
        Self {
            impulse: Vec3::new(0.0, IMPULSE_STRENGTH, 0.0),
            torque: Vec3::new(0.0, TORQUE_STRENGTH, 0.0),
        }
    }
}

/// Perspective camera.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Camera {
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
    pub look_at: Vec3,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            fov_degrees: 75.0,
            near: 0.1,
            far: 1000.0,
            look_at: Vec3::ZERO,
        }
    }
}

impl Camera {
    pub fn validated(self) -> Self {
        let near = self.near.max(MIN_EXTENT);
        Self {
            fov_degrees: self.fov_degrees.clamp(MIN_FOV_DEGREES, MAX_FOV_DEGREES),
            near,
            far: self.far.max(near + MIN_EXTENT),
            ..self
        }
    }
}

/// Light source.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Light {
    pub kind: LightKind,
    pub color: Color,
    pub intensity: f32,
}

impl Default for Light {
    fn default() -> Self {
        Self {
            kind: LightKind::Ambient,
            color: Color::WHITE,
            intensity: 1.0,
        }
    }
}

impl Light {
    pub fn validated(self) -> Self {
        Self {
            color: self.color.validated(),
            intensity: self.intensity.max(0.0),
            ..self
        }
    }
}

/// A playable/animated character.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Character {
    pub name: String,
    pub speed: f32,
}

impl Default for Character {
    fn default() -> Self {
        Self {
            name: String::new(),
            speed: CHARACTER_SPEED,
        }
    }
}

impl Character {
    pub fn validated(self) -> Self {
        Self {
            speed: self.speed.max(0.0),
            ..self
        }
    }
}

/// Set by the registration system once an entity's visual is in the scene.
/// Its presence means the entity is never attached again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SceneHandle {
    pub object: ObjectId,
}
