//! Main menu: a title and a column of selectable entries.

use glam::Vec3;

use stagecraft_core::enums::{LevelId, MenuAction, NavDirection};

use crate::error::LevelError;
use crate::level::{Level, LevelScope};
use crate::prefabs::{self, CameraConfig, LightConfig, MenuItemConfig, TextConfig};
use crate::systems::menu;

const ENTRIES: [(&str, MenuAction); 3] = [
    ("Spinning Cubes", MenuAction::LoadLevel(LevelId::SpinningCubes)),
    ("Physics Demo", MenuAction::LoadLevel(LevelId::PhysicsDemo)),
    ("Quit", MenuAction::Quit),
];

#[derive(Debug, Default)]
pub struct MainMenuLevel;

impl MainMenuLevel {
    pub fn new() -> Self {
        Self
    }
}

impl Level for MainMenuLevel {
    fn name(&self) -> &'static str {
        "main-menu"
    }

    fn setup(&mut self, scope: &mut LevelScope<'_>) -> Result<(), LevelError> {
        scope.spawn(prefabs::camera_prefab(&CameraConfig {
            position: Vec3::new(0.0, 0.0, 8.0),
            ..Default::default()
        }))?;
        scope.spawn(prefabs::light_prefab(&LightConfig::default()))?;
        scope.spawn(prefabs::text_prefab(&TextConfig {
            name: "title".to_string(),
            content: "STAGECRAFT".to_string(),
            position: Vec3::new(0.0, 3.0, 0.0),
            font_size: 96.0,
            ..Default::default()
        }))?;

        for (index, (label, action)) in ENTRIES.iter().enumerate() {
            scope.spawn(prefabs::menu_item_prefab(&MenuItemConfig {
                label: label.to_string(),
                action: *action,
                index: index as u32,
                origin: Vec3::new(0.0, 1.0, 0.0),
                ..Default::default()
            }))?;
        }
        menu::navigate(&mut scope.services().world, NavDirection::Down);
        scope.add_overlay("Up/Down to choose, Enter to select");
        Ok(())
    }
}
