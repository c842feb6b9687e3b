//! Error types for setup-time failures.
//!
//! Only setup paths return these. Steady-state problems (a missing
//! component during a frame, an impulse at an unknown body) are logged
//! and skipped instead.

use thiserror::Error;

use stagecraft_core::factories::FactoryError;

use crate::level::Capability;

#[derive(Debug, Error)]
pub enum LevelError {
    #[error("level `{level}` requires {capability:?}, which is not available")]
    MissingDependency {
        level: &'static str,
        capability: Capability,
    },
    #[error("prefab `{0}` is not registered")]
    UnknownPrefab(String),
    #[error("level `{level}` cannot {operation} while {state}")]
    InvalidState {
        level: &'static str,
        operation: &'static str,
        state: &'static str,
    },
    #[error("frame update failed: {0}")]
    Frame(String),
    #[error(transparent)]
    Prefab(#[from] PrefabError),
}

#[derive(Debug, Error)]
pub enum PrefabError {
    #[error("failed to read prefab file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Factory(#[from] FactoryError),
}
