use std::path::PathBuf;

use anyhow::{anyhow, Result};
use clap::Parser;
use tracing::info;

use stagecraft_app::config::{parse_level, AppConfig};
use stagecraft_app::frame_loop;
use stagecraft_app::logger;
use stagecraft_core::enums::LevelId;

#[derive(Debug, Parser)]
#[command(author, version, about = "STAGECRAFT headless level runner")]
struct Cli {
    /// Path to a JSON config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Level to load first (main-menu, spinning-cubes, physics-demo)
    #[arg(long, value_parser = parse_level)]
    level: Option<LevelId>,

    /// Stop after this many frames
    #[arg(long)]
    frames: Option<u64>,

    /// Override the frame rate
    #[arg(long)]
    frame_rate: Option<u32>,

    /// Directory of prefab JSON files to register at startup
    #[arg(long)]
    prefabs: Option<PathBuf>,

    /// Read commands (up, down, enter, load <level>, quit, ...) from stdin
    #[arg(long)]
    interactive: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut config = AppConfig::load_or_default(cli.config.as_deref())?;
    if let Some(level) = cli.level {
        config.start_level = level;
    }
    if let Some(frames) = cli.frames {
        config.frame_limit = Some(frames);
    }
    if let Some(rate) = cli.frame_rate {
        config.frame_rate = rate;
    }
    if let Some(dir) = cli.prefabs {
        config.prefab_dir = Some(dir);
    }
    config.validate()?;
    logger::init(config.log_filter.as_deref())?;

    info!(level = %config.start_level, frame_rate = config.frame_rate, "starting");
    let (cmd_tx, handle) = frame_loop::spawn_frame_loop(config)?;

    if cli.interactive {
        frame_loop::spawn_console(cmd_tx.clone())?;
    }

    let report = handle
        .join()
        .map_err(|_| anyhow!("frame loop thread panicked"))??;
    println!(
        "Ran {} frames; last level: {}{}",
        report.frames,
        report
            .final_level
            .map(|l| l.to_string())
            .unwrap_or_else(|| "none".to_string()),
        if report.quit_requested { " (quit from menu)" } else { "" }
    );
    Ok(())
}
