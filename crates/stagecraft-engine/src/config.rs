//! Engine configuration.

use serde::{Deserialize, Serialize};

use stagecraft_core::constants::*;

/// Tunables for the engine and the demo levels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// RNG seed for placement and impulse jitter. Same seed = same scene.
    pub seed: u64,
    /// Seconds between `start()` and level setup.
    pub start_delay: f64,
    /// Seconds between periodic impulses in the physics demo.
    pub impulse_period: f64,
    /// Seconds between periodic torque impulses in the physics demo.
    pub torque_period: f64,
    /// Spinning cube grid edge (cubes per side).
    pub cube_grid: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            start_delay: LEVEL_START_DELAY,
            impulse_period: IMPULSE_PERIOD,
            torque_period: TORQUE_PERIOD,
            cube_grid: 3,
        }
    }
}

impl EngineConfig {
    /// Clamp values that would stall or flood the timers.
    pub fn validated(self) -> Self {
        Self {
            start_delay: self.start_delay.max(0.0),
            impulse_period: self.impulse_period.max(0.05),
            torque_period: self.torque_period.max(0.05),
            cube_grid: self.cube_grid.clamp(1, 16),
            ..self
        }
    }
}
