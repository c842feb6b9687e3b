//! Spinning cubes: a lit grid of cubes turning at random speeds.

use glam::Vec3;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use stagecraft_core::enums::LightKind;
use stagecraft_core::types::Color;

use crate::config::EngineConfig;
use crate::error::LevelError;
use crate::level::{Level, LevelScope};
use crate::prefabs::{
    self, CameraConfig, CharacterConfig, CubeConfig, GroundConfig, LightConfig,
};

/// Distance between cube centers.
const CUBE_SPACING: f32 = 2.0;

pub struct SpinningCubesLevel {
    seed: u64,
    grid: u32,
}

impl SpinningCubesLevel {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            seed: config.seed,
            grid: config.cube_grid,
        }
    }
}

impl Level for SpinningCubesLevel {
    fn name(&self) -> &'static str {
        "spinning-cubes"
    }

    fn setup(&mut self, scope: &mut LevelScope<'_>) -> Result<(), LevelError> {
        let mut rng = ChaCha8Rng::seed_from_u64(self.seed);

        scope.spawn(prefabs::camera_prefab(&CameraConfig::default()))?;
        scope.spawn(prefabs::light_prefab(&LightConfig {
            name: "ambient".to_string(),
            intensity: 0.4,
            ..Default::default()
        }))?;
        scope.spawn(prefabs::light_prefab(&LightConfig {
            name: "sun".to_string(),
            kind: LightKind::Directional,
            ..Default::default()
        }))?;
        scope.spawn(prefabs::ground_prefab(&GroundConfig {
            solid: false,
            ..Default::default()
        }))?;

        let offset = (self.grid as f32 - 1.0) * CUBE_SPACING / 2.0;
        for row in 0..self.grid {
            for col in 0..self.grid {
                let config = CubeConfig {
                    name: format!("cube-{row}-{col}"),
                    position: Vec3::new(
                        col as f32 * CUBE_SPACING - offset,
                        1.0,
                        row as f32 * CUBE_SPACING - offset,
                    ),
                    color: Color::rgb(rng.gen(), rng.gen(), rng.gen()),
                    spin: Vec3::new(
                        rng.gen_range(-2.0..2.0),
                        rng.gen_range(-2.0..2.0),
                        rng.gen_range(-2.0..2.0),
                    ),
                    ..Default::default()
                };
                scope.spawn(prefabs::spinning_cube_prefab(&config))?;
            }
        }

        scope.spawn(prefabs::character_prefab(&CharacterConfig {
            position: Vec3::new(0.0, 0.5, offset + CUBE_SPACING),
            ..Default::default()
        }))?;
        scope.add_overlay("Spinning cubes");
        Ok(())
    }
}
