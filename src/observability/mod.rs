pub mod metrics;

pub use metrics::*;

use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::LogFormat;

/// Transport crates that are chatty at debug on every upgrade and request
const QUIET_TARGETS: &[&str] = &["hyper", "h2", "reqwest", "tungstenite", "tokio_tungstenite"];

/// Directives for `level`, holding transport crates at warn.
/// An unparseable level falls back to info.
pub fn default_directives(level: &str) -> String {
    let level = level.trim().parse::<LevelFilter>().unwrap_or(LevelFilter::INFO);
    let mut directives = level.to_string().to_lowercase();
    for target in QUIET_TARGETS {
        directives.push_str(&format!(",{}=warn", target));
    }
    directives
}

/// `RUST_LOG` wins when set, otherwise [`default_directives`]
pub fn log_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directives(level)))
}

/// Install the daemon's subscriber. Fails if one is already installed.
pub fn init_tracing(format: LogFormat, level: &str) -> anyhow::Result<()> {
    let registry = tracing_subscriber::registry().with(log_filter(level));

    match format {
        LogFormat::Json => registry
            .with(fmt::layer().json().with_current_span(false))
            .try_init()?,
        LogFormat::Pretty => registry.with(fmt::layer().pretty()).try_init()?,
    }
    Ok(())
}

/// Compact stderr logging for the command-line tools
pub fn init_cli_tracing() {
    let _ = fmt()
        .with_env_filter(log_filter("info"))
        .with_writer(std::io::stderr)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directives() {
        let directives = default_directives("debug");
        assert!(directives.starts_with("debug,"));
        assert!(directives.contains("hyper=warn"));
        assert!(directives.contains("tokio_tungstenite=warn"));
        EnvFilter::try_new(&directives).unwrap();
    }

    #[test]
    fn test_unknown_level_falls_back_to_info() {
        assert!(default_directives("chatty").starts_with("info,"));
        assert!(default_directives(" WARN ").starts_with("warn,"));
    }

    #[test]
    fn test_second_init_is_an_error() {
        let _ = init_tracing(LogFormat::Json, "info");
        assert!(init_tracing(LogFormat::Pretty, "info").is_err());
    }
}
