//! Enumeration types used throughout the engine.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Kind tag of a component. Determines which systems process it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ComponentTag {
    Transform,
    Spin,
    SpinningCube,
    Mesh,
    Text,
    MenuItem,
    Material,
    RigidBody,
    Collider,
    ImpulseTarget,
    Camera,
    Light,
    Character,
}

impl ComponentTag {
    pub const ALL: [ComponentTag; 13] = [
        ComponentTag::Transform,
        ComponentTag::Spin,
        ComponentTag::SpinningCube,
        ComponentTag::Mesh,
        ComponentTag::Text,
        ComponentTag::MenuItem,
        ComponentTag::Material,
        ComponentTag::RigidBody,
        ComponentTag::Collider,
        ComponentTag::ImpulseTarget,
        ComponentTag::Camera,
        ComponentTag::Light,
        ComponentTag::Character,
    ];

    /// Stable string name, also used as the component factory key.
    pub fn as_str(&self) -> &'static str {
        match self {
            ComponentTag::Transform => "transform",
            ComponentTag::Spin => "spin",
            ComponentTag::SpinningCube => "spinning-cube",
            ComponentTag::Mesh => "mesh",
            ComponentTag::Text => "text",
            ComponentTag::MenuItem => "menu-item",
            ComponentTag::Material => "material",
            ComponentTag::RigidBody => "rigid-body",
            ComponentTag::Collider => "collider",
            ComponentTag::ImpulseTarget => "impulse-target",
            ComponentTag::Camera => "camera",
            ComponentTag::Light => "light",
            ComponentTag::Character => "character",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|tag| tag.as_str() == name)
    }
}

impl fmt::Display for ComponentTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identifies one of the built-in levels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LevelId {
    #[default]
    MainMenu,
    SpinningCubes,
    PhysicsDemo,
}

impl LevelId {
    pub const ALL: [LevelId; 3] = [LevelId::MainMenu, LevelId::SpinningCubes, LevelId::PhysicsDemo];

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|level| level.as_str() == name)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LevelId::MainMenu => "main-menu",
            LevelId::SpinningCubes => "spinning-cubes",
            LevelId::PhysicsDemo => "physics-demo",
        }
    }
}

impl fmt::Display for LevelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a menu item does when activated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "level")]
pub enum MenuAction {
    /// Nothing; used for decorative entries.
    #[default]
    None,
    /// Tear down the current level and load another.
    LoadLevel(LevelId),
    /// Leave the application.
    Quit,
}

/// Menu cursor movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NavDirection {
    Up,
    Down,
}

/// How a rigid body participates in the simulation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BodyKind {
    #[default]
    Dynamic,
    Static,
    Kinematic,
}

/// Light source flavor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LightKind {
    #[default]
    Ambient,
    Directional,
    Point,
}

/// Primitive geometry for meshes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Geometry {
    Box { width: f32, height: f32, depth: f32 },
    Sphere { radius: f32 },
    Plane { width: f32, depth: f32 },
}

impl Default for Geometry {
    fn default() -> Self {
        Geometry::Box {
            width: 1.0,
            height: 1.0,
            depth: 1.0,
        }
    }
}
