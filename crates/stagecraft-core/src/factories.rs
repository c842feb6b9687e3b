//! Component factories: map a factory name and a raw JSON data bag to a
//! validated component.
//!
//! Prefab files reference components by factory name, so the built-in
//! tags are registered under their tag names and callers may add more
//! (e.g. presets that fill in a fixed color).

use std::collections::HashMap;

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use crate::enums::ComponentTag;
use crate::prefab::{ComponentData, Prefab};

/// Pure constructor from a data bag.
pub type FactoryFn = fn(&Value) -> Result<ComponentData, FactoryError>;

#[derive(Debug, Error)]
pub enum FactoryError {
    #[error("no component factory named `{0}`")]
    UnknownFactory(String),
    #[error("invalid data for `{factory}`: {source}")]
    InvalidData {
        factory: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("malformed prefab definition: {0}")]
    MalformedPrefab(#[from] serde_json::Error),
}

/// Named component factories.
pub struct ComponentFactories {
    factories: HashMap<String, FactoryFn>,
}

/// Raw prefab definition as stored in JSON files.
#[derive(Debug, Deserialize)]
struct PrefabDef {
    name: String,
    #[serde(default)]
    components: Vec<ComponentDef>,
}

#[derive(Debug, Deserialize)]
struct ComponentDef {
    factory: String,
    #[serde(default)]
    data: Value,
}

impl Default for ComponentFactories {
    fn default() -> Self {
        Self::with_builtins()
    }
}

impl ComponentFactories {
    /// An empty set of factories.
    pub fn empty() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    /// Factories for every built-in component tag, keyed by tag name.
    pub fn with_builtins() -> Self {
        let mut factories = Self::empty();
        factories.register(ComponentTag::Transform.as_str(), |v| {
            parse(v, "transform").map(ComponentData::Transform)
        });
        factories.register(ComponentTag::Spin.as_str(), |v| {
            parse(v, "spin").map(ComponentData::Spin)
        });
        factories.register(ComponentTag::SpinningCube.as_str(), |v| {
            parse(v, "spinning-cube").map(ComponentData::SpinningCube)
        });
        factories.register(ComponentTag::Mesh.as_str(), |v| {
            parse(v, "mesh").map(ComponentData::Mesh)
        });
        factories.register(ComponentTag::Text.as_str(), |v| {
            parse(v, "text").map(ComponentData::Text)
        });
        factories.register(ComponentTag::MenuItem.as_str(), |v| {
            parse(v, "menu-item").map(ComponentData::MenuItem)
        });
        factories.register(ComponentTag::Material.as_str(), |v| {
            parse(v, "material").map(ComponentData::Material)
        });
        factories.register(ComponentTag::RigidBody.as_str(), |v| {
            parse(v, "rigid-body").map(ComponentData::RigidBody)
        });
        factories.register(ComponentTag::Collider.as_str(), |v| {
            parse(v, "collider").map(ComponentData::Collider)
        });
        factories.register(ComponentTag::ImpulseTarget.as_str(), |v| {
            parse(v, "impulse-target").map(ComponentData::ImpulseTarget)
        });
        factories.register(ComponentTag::Camera.as_str(), |v| {
            parse(v, "camera").map(ComponentData::Camera)
        });
        factories.register(ComponentTag::Light.as_str(), |v| {
            parse(v, "light").map(ComponentData::Light)
        });
        factories.register(ComponentTag::Character.as_str(), |v| {
            parse(v, "character").map(ComponentData::Character)
        });
        factories
    }

    /// Register a factory. An existing factory with the same name is replaced.
    pub fn register(&mut self, name: &str, factory: FactoryFn) {
        self.factories.insert(name.to_string(), factory);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Build one validated component.
    pub fn create(&self, name: &str, data: &Value) -> Result<ComponentData, FactoryError> {
        let factory = self
            .factories
            .get(name)
            .ok_or_else(|| FactoryError::UnknownFactory(name.to_string()))?;
        factory(data).map(ComponentData::validated)
    }

    /// Build a prefab from its JSON definition:
    /// `{"name": "...", "components": [{"factory": "spin", "data": {...}}]}`.
    pub fn prefab_from_json(&self, json: &str) -> Result<Prefab, FactoryError> {
        let def: PrefabDef = serde_json::from_str(json)?;
        let mut prefab = Prefab::new(def.name);
        for component in &def.components {
            prefab
                .components
                .push(self.create(&component.factory, &component.data)?);
        }
        Ok(prefab)
    }
}

/// Deserialize a data bag, treating `null` as "all defaults".
fn parse<T: DeserializeOwned + Default>(value: &Value, factory: &str) -> Result<T, FactoryError> {
    if value.is_null() {
        return Ok(T::default());
    }
    T::deserialize(value).map_err(|source| FactoryError::InvalidData {
        factory: factory.to_string(),
        source,
    })
}
