//! Systems that operate on the world each frame or react to events.
//!
//! Per-frame systems are plain functions over `Services`. Reactive
//! systems are event-bus listeners installed once when the context is
//! built.

pub mod menu;
pub mod physics;
pub mod registration;
pub mod rotation;
pub mod scene_sync;

use crate::context::AppContext;

/// Install the listeners and per-frame systems every context carries.
pub fn install_core(ctx: &mut AppContext) {
    registration::install(ctx);
    physics::install(ctx);
    menu::install(ctx);
    ctx.add_system("rotation", rotation::run);
}
