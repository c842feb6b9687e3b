//! Application configuration: optional JSON file, CLI flags on top.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use stagecraft_core::constants::DEFAULT_FRAME_RATE;
use stagecraft_core::enums::LevelId;
use stagecraft_engine::config::EngineConfig;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Frames per second of the frame loop.
    pub frame_rate: u32,
    pub start_level: LevelId,
    /// Stop after this many frames. `None` runs until quit.
    pub frame_limit: Option<u64>,
    /// Sleep between frames to hold `frame_rate`. Off runs as fast as possible.
    pub realtime: bool,
    /// Extra tracing directives, comma separated.
    pub log_filter: Option<String>,
    /// Directory of `*.json` prefab definitions loaded at startup.
    pub prefab_dir: Option<PathBuf>,
    pub engine: EngineConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            frame_rate: DEFAULT_FRAME_RATE,
            start_level: LevelId::MainMenu,
            frame_limit: None,
            realtime: true,
            log_filter: None,
            prefab_dir: None,
            engine: EngineConfig::default(),
        }
    }
}

impl AppConfig {
    /// Read a config file. Missing fields take their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config: AppConfig = serde_json::from_str(&text)
            .with_context(|| format!("parsing config {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Defaults when `path` is `None`.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.frame_rate == 0 || self.frame_rate > 1000 {
            bail!("frame_rate must be in 1..=1000, got {}", self.frame_rate);
        }
        Ok(())
    }

    /// Seconds per frame.
    pub fn frame_dt(&self) -> f64 {
        1.0 / self.frame_rate.max(1) as f64
    }
}

/// Parse a level name as given on the command line.
pub fn parse_level(name: &str) -> Result<LevelId, String> {
    LevelId::from_name(name).ok_or_else(|| {
        let known: Vec<&str> = LevelId::ALL.iter().map(|l| l.as_str()).collect();
        format!("unknown level '{name}', expected one of: {}", known.join(", "))
    })
}
