use tracing::level_filters::LevelFilter;
use tracing_subscriber::{fmt::time, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install the global tracing subscriber.
///
/// `RUST_LOG` is read first; `extra` (from config, e.g. `"stagecraft_engine=trace"`)
/// is added on top. Debug builds default to debug output for the engine crates,
/// release builds to info. Call once, early in `main`.
pub fn init(extra: Option<&str>) -> anyhow::Result<()> {
    let engine_level = if cfg!(debug_assertions) { "debug" } else { "info" };

    let mut filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env()?
        .add_directive(format!("stagecraft_engine={engine_level}").parse()?)
        .add_directive(format!("stagecraft_app={engine_level}").parse()?);
    if let Some(extra) = extra {
        for directive in extra.split(',').filter(|d| !d.trim().is_empty()) {
            filter = filter.add_directive(directive.trim().parse()?);
        }
    }

    tracing_subscriber::Registry::default()
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(true)
                .with_timer(time::uptime()),
        )
        .with(filter)
        .try_init()?;
    Ok(())
}
