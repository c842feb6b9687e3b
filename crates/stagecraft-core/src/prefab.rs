//! Prefab templates: named, ordered lists of component data.

use serde::{Deserialize, Serialize};

use crate::components::*;
use crate::enums::ComponentTag;

/// One tagged component value. The variant fixes the tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "tag", content = "data", rename_all = "kebab-case")]
pub enum ComponentData {
    Transform(Transform),
    Spin(Spin),
    SpinningCube(SpinningCube),
    Mesh(Mesh),
    Text(Text),
    MenuItem(MenuItem),
    Material(Material),
    RigidBody(RigidBody),
    Collider(Collider),
    ImpulseTarget(ImpulseTarget),
    Camera(Camera),
    Light(Light),
    Character(Character),
}

impl ComponentData {
    pub fn tag(&self) -> ComponentTag {
        match self {
            ComponentData::Transform(_) => ComponentTag::Transform,
            ComponentData::Spin(_) => ComponentTag::Spin,
            ComponentData::SpinningCube(_) => ComponentTag::SpinningCube,
            ComponentData::Mesh(_) => ComponentTag::Mesh,
            ComponentData::Text(_) => ComponentTag::Text,
            ComponentData::MenuItem(_) => ComponentTag::MenuItem,
            ComponentData::Material(_) => ComponentTag::Material,
            ComponentData::RigidBody(_) => ComponentTag::RigidBody,
            ComponentData::Collider(_) => ComponentTag::Collider,
            ComponentData::ImpulseTarget(_) => ComponentTag::ImpulseTarget,
            ComponentData::Camera(_) => ComponentTag::Camera,
            ComponentData::Light(_) => ComponentTag::Light,
            ComponentData::Character(_) => ComponentTag::Character,
        }
    }

    /// Clamp every numeric field into range.
    pub fn validated(self) -> Self {
        match self {
            ComponentData::Transform(c) => ComponentData::Transform(c.validated()),
            ComponentData::Spin(c) => ComponentData::Spin(c.validated()),
            ComponentData::SpinningCube(c) => ComponentData::SpinningCube(c.validated()),
            ComponentData::Mesh(c) => ComponentData::Mesh(c),
            ComponentData::Text(c) => ComponentData::Text(c.validated()),
            ComponentData::MenuItem(c) => ComponentData::MenuItem(c.validated()),
            ComponentData::Material(c) => ComponentData::Material(c.validated()),
            ComponentData::RigidBody(c) => ComponentData::RigidBody(c.validated()),
            ComponentData::Collider(c) => ComponentData::Collider(c.validated()),
            ComponentData::ImpulseTarget(c) => ComponentData::ImpulseTarget(c),
            ComponentData::Camera(c) => ComponentData::Camera(c.validated()),
            ComponentData::Light(c) => ComponentData::Light(c.validated()),
            ComponentData::Character(c) => ComponentData::Character(c.validated()),
        }
    }
}

/// A named template describing how to build an entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prefab {
    pub name: String,
    pub components: Vec<ComponentData>,
}

impl Prefab {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            components: Vec::new(),
        }
    }

    /// Append a component, keeping insertion order.
    pub fn with(mut self, component: ComponentData) -> Self {
        self.components.push(component);
        self
    }

    /// Tags in template order.
    pub fn tags(&self) -> Vec<ComponentTag> {
        self.components.iter().map(ComponentData::tag).collect()
    }

    pub fn has_tag(&self, tag: ComponentTag) -> bool {
        self.components.iter().any(|c| c.tag() == tag)
    }
}
