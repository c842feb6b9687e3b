//! Named prefab storage.

use std::collections::HashMap;
use std::path::Path;

use tracing::debug;

use stagecraft_core::factories::ComponentFactories;
use stagecraft_core::prefab::Prefab;

use crate::error::PrefabError;

/// Prefabs by name. Registering a name that exists replaces the old
/// template outright; nothing is merged.
#[derive(Debug, Default)]
pub struct PrefabRegistry {
    prefabs: HashMap<String, Prefab>,
}

impl PrefabRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a prefab, returning the one it replaced.
    pub fn register(&mut self, prefab: Prefab) -> Option<Prefab> {
        let name = prefab.name.clone();
        let previous = self.prefabs.insert(name.clone(), prefab);
        if previous.is_some() {
            debug!(prefab = %name, "prefab re-registered, previous definition replaced");
        }
        previous
    }

    pub fn get(&self, name: &str) -> Option<&Prefab> {
        self.prefabs.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.prefabs.contains_key(name)
    }

    pub fn remove(&mut self, name: &str) -> Option<Prefab> {
        self.prefabs.remove(name)
    }

    pub fn len(&self) -> usize {
        self.prefabs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prefabs.is_empty()
    }

    /// Sorted prefab names.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.prefabs.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Load a JSON prefab definition from disk and register it.
    /// Returns the registered name.
    pub fn load_file(
        &mut self,
        path: &Path,
        factories: &ComponentFactories,
    ) -> Result<String, PrefabError> {
        let json = std::fs::read_to_string(path).map_err(|source| PrefabError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let prefab = factories.prefab_from_json(&json)?;
        let name = prefab.name.clone();
        self.register(prefab);
        Ok(name)
    }
}
