//! Built-in demo levels.

pub mod main_menu;
pub mod physics_demo;
pub mod spinning_cubes;

use stagecraft_core::enums::LevelId;

use crate::config::EngineConfig;
use crate::level::manager::{LevelFactory, LevelManager};
use crate::level::Level;

pub use main_menu::MainMenuLevel;
pub use physics_demo::PhysicsDemoLevel;
pub use spinning_cubes::SpinningCubesLevel;

fn main_menu(_config: &EngineConfig) -> Box<dyn Level> {
    Box::new(MainMenuLevel::new())
}

fn spinning_cubes(config: &EngineConfig) -> Box<dyn Level> {
    Box::new(SpinningCubesLevel::new(config))
}

fn physics_demo(config: &EngineConfig) -> Box<dyn Level> {
    Box::new(PhysicsDemoLevel::new(config))
}

pub fn builtin_factory(id: LevelId) -> LevelFactory {
    match id {
        LevelId::MainMenu => main_menu,
        LevelId::SpinningCubes => spinning_cubes,
        LevelId::PhysicsDemo => physics_demo,
    }
}

pub fn register_builtin(manager: &mut LevelManager) {
    for id in LevelId::ALL {
        manager.register(id, builtin_factory(id));
    }
}
