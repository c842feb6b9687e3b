//! Runtime glue for STAGECRAFT.
//!
//! Owns the hecs ECS world through an explicit `AppContext`, dispatches
//! typed events, instantiates prefabs, attaches visuals to the renderer's
//! scene graph, and drives levels through their lifecycle. The renderer and
//! physics engine sit behind traits with headless implementations.

pub mod config;
pub mod context;
pub mod error;
pub mod event_bus;
pub mod level;
pub mod levels;
pub mod physics;
pub mod prefab_registry;
pub mod prefabs;
pub mod render;
pub mod systems;
pub mod timers;
pub mod world_ext;

pub use context::AppContext;
pub use level::manager::LevelManager;
pub use stagecraft_core as core;

#[cfg(test)]
mod tests;
