use anyhow::{Result, anyhow};
use tracing_subscriber::{EnvFilter, fmt};

/// Crates whose debug output drowns the application's own events.
const QUIET_TARGETS: &[&str] = &["sqlx=warn", "hyper=info", "tower_http=info"];

/// `RUST_LOG` wins; otherwise `default_level` applies with noisy
/// dependencies capped.
pub fn init_logging(default_level: &str) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(filter_directives(default_level)))
        .map_err(|e| anyhow!("invalid log filter '{default_level}': {e}"))?;

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .compact()
        .try_init()
        .map_err(|e| anyhow!("failed to init logging: {e}"))?;

    Ok(())
}

fn filter_directives(default_level: &str) -> String {
    std::iter::once(default_level)
        .chain(QUIET_TARGETS.iter().copied())
        .collect::<Vec<_>>()
        .join(",")
}
