//! Frame loop thread: ticks the level manager at a fixed rate.
//!
//! The application context is created inside this thread since the world
//! and backends never leave it. Commands arrive via an `mpsc` channel and
//! are drained at the top of every frame.

use std::io::BufRead;
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use tracing::{debug, error, info, warn};

use stagecraft_core::enums::{LevelId, NavDirection};
use stagecraft_core::events::GameEvent;
use stagecraft_engine::physics::HeadlessPhysics;
use stagecraft_engine::render::HeadlessRenderer;
use stagecraft_engine::{AppContext, LevelManager};

use crate::config::{parse_level, AppConfig};

/// Commands sent to the frame loop thread.
#[derive(Debug, Clone, PartialEq)]
pub enum LoopCommand {
    /// Input or host event, forwarded to the event bus.
    Event(GameEvent),
    /// Replace the current level.
    LoadLevel(LevelId),
    /// Halt the current level's frames, keeping its entities.
    Stop,
    Resume,
    /// Shut down the frame loop thread gracefully.
    Shutdown,
}

/// Summary returned when the loop exits.
#[derive(Debug, Clone, PartialEq)]
pub struct LoopReport {
    pub frames: u64,
    /// Level loaded when the loop stopped, before shutdown.
    pub final_level: Option<LevelId>,
    pub quit_requested: bool,
}

/// Nominal duration of one frame.
pub fn frame_duration(frame_rate: u32) -> Duration {
    Duration::from_nanos(1_000_000_000 / frame_rate.max(1) as u64)
}

/// Parse one line of console input.
///
/// Accepts `up`, `down`, `enter`, `lose`, `restore`, `stop`, `resume`,
/// `load <level>`, `quit`, or a JSON-encoded `GameEvent`.
pub fn parse_command(line: &str) -> Result<LoopCommand, String> {
    let line = line.trim();
    if line.starts_with('{') {
        return serde_json::from_str(line)
            .map(LoopCommand::Event)
            .map_err(|e| format!("bad event: {e}"));
    }
    let mut words = line.split_whitespace();
    let command = match (words.next(), words.next()) {
        (Some("up"), None) => LoopCommand::Event(GameEvent::MenuNavigate {
            direction: NavDirection::Up,
        }),
        (Some("down"), None) => LoopCommand::Event(GameEvent::MenuNavigate {
            direction: NavDirection::Down,
        }),
        (Some("enter"), None) => LoopCommand::Event(GameEvent::MenuActivate),
        (Some("lose"), None) => LoopCommand::Event(GameEvent::ContextLost),
        (Some("restore"), None) => LoopCommand::Event(GameEvent::ContextRestored),
        (Some("stop"), None) => LoopCommand::Stop,
        (Some("resume"), None) => LoopCommand::Resume,
        (Some("load"), Some(level)) => LoopCommand::LoadLevel(parse_level(level)?),
        (Some("quit"), None) => LoopCommand::Shutdown,
        _ => return Err(format!("unknown command '{line}'")),
    };
    Ok(command)
}

/// Forward console lines to the frame loop until `quit`, end of input, or
/// the loop hangs up. Blank and unparseable lines are skipped.
pub fn pump_commands<R: BufRead>(reader: R, cmd_tx: &mpsc::Sender<LoopCommand>) -> Result<()> {
    for line in reader.lines() {
        let line = line.context("reading console input")?;
        if line.trim().is_empty() {
            continue;
        }
        let command = match parse_command(&line) {
            Ok(command) => command,
            Err(err) => {
                warn!(input = %line, "{err}");
                continue;
            }
        };
        let shutdown = command == LoopCommand::Shutdown;
        if cmd_tx.send(command).is_err() {
            debug!("frame loop gone, console closed");
            return Ok(());
        }
        if shutdown {
            return Ok(());
        }
    }
    // End of input still stops the loop.
    let _ = cmd_tx.send(LoopCommand::Shutdown);
    Ok(())
}

/// Run `pump_commands` over stdin on its own thread.
///
/// The thread is detached: a read blocked on stdin never holds up exit.
pub fn spawn_console(cmd_tx: mpsc::Sender<LoopCommand>) -> Result<()> {
    std::thread::Builder::new()
        .name("stagecraft-console".into())
        .spawn(move || {
            if let Err(err) = pump_commands(std::io::stdin().lock(), &cmd_tx) {
                error!(error = %err, "console stopped");
            }
        })
        .context("spawning console thread")?;
    Ok(())
}

/// Build a context with the headless backends and any prefab files.
pub fn build_context(config: &AppConfig) -> Result<AppContext> {
    let mut ctx = AppContext::builder()
        .config(config.engine.clone())
        .renderer(HeadlessRenderer::new())
        .physics(HeadlessPhysics::new())
        .build();
    if let Some(dir) = &config.prefab_dir {
        let count = load_prefab_dir(&mut ctx, dir)?;
        info!(count, dir = %dir.display(), "prefabs loaded");
    }
    Ok(ctx)
}

/// Register every `*.json` prefab in `dir`, in file name order.
pub fn load_prefab_dir(ctx: &mut AppContext, dir: &Path) -> Result<usize> {
    let mut paths: Vec<PathBuf> = std::fs::read_dir(dir)
        .with_context(|| format!("reading prefab dir {}", dir.display()))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.extension().is_some_and(|ext| ext == "json"))
        .collect();
    paths.sort();

    let services = &mut ctx.services;
    for path in &paths {
        let name = services
            .prefabs
            .load_file(path, &services.factories)
            .with_context(|| format!("loading prefab {}", path.display()))?;
        debug!(prefab = %name, "prefab registered");
    }
    Ok(paths.len())
}

/// Spawns the frame loop in a new thread.
///
/// Returns the command sender and a handle yielding the loop's report.
pub fn spawn_frame_loop(
    config: AppConfig,
) -> Result<(mpsc::Sender<LoopCommand>, JoinHandle<Result<LoopReport>>)> {
    let (cmd_tx, cmd_rx) = mpsc::channel::<LoopCommand>();
    let handle = std::thread::Builder::new()
        .name("stagecraft-frame-loop".into())
        .spawn(move || run_frame_loop(&config, &cmd_rx))
        .context("spawning frame loop thread")?;
    Ok((cmd_tx, handle))
}

/// The frame loop. Runs until `Shutdown`, a quit request from the menu,
/// or the configured frame limit.
pub fn run_frame_loop(config: &AppConfig, cmd_rx: &mpsc::Receiver<LoopCommand>) -> Result<LoopReport> {
    let mut manager = LevelManager::new(build_context(config)?);
    manager
        .load(config.start_level)
        .with_context(|| format!("loading level {}", config.start_level))?;

    let frame = frame_duration(config.frame_rate);
    let dt = config.frame_dt();
    let mut frames = 0u64;
    let mut input_open = true;
    let mut next_frame_time = Instant::now();

    'frames: loop {
        // 1. Drain pending commands
        while input_open {
            match cmd_rx.try_recv() {
                Ok(LoopCommand::Event(event)) => manager.emit(event),
                Ok(LoopCommand::LoadLevel(id)) => {
                    if let Err(err) = manager.load(id) {
                        error!(level = %id, error = %err, "level load failed");
                    }
                }
                Ok(LoopCommand::Stop) => manager.stop(),
                Ok(LoopCommand::Resume) => {
                    if let Err(err) = manager.resume() {
                        warn!(error = %err, "resume failed");
                    }
                }
                Ok(LoopCommand::Shutdown) => break 'frames,
                Err(mpsc::TryRecvError::Empty) => break,
                Err(mpsc::TryRecvError::Disconnected) => {
                    debug!("command channel closed");
                    input_open = false;
                }
            }
        }

        if config.frame_limit.is_some_and(|limit| frames >= limit) {
            break;
        }

        // 2. Advance one frame
        manager.tick(dt);
        frames += 1;
        if manager.quit_requested() {
            break;
        }

        // 3. Sleep until the next frame
        if config.realtime {
            next_frame_time += frame;
            let now = Instant::now();
            if next_frame_time > now {
                std::thread::sleep(next_frame_time - now);
            } else if now - next_frame_time > frame * 2 {
                // Too far behind; drop the backlog.
                next_frame_time = now;
            }
        }
    }

    let report = LoopReport {
        frames,
        final_level: manager.current_level(),
        quit_requested: manager.quit_requested(),
    };
    manager.shutdown();
    info!(frames, "frame loop finished");
    Ok(report)
}
