use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;

use filingcast::AppState;
use filingcast::api::create_router;
use filingcast::config::AppConfig;
use filingcast::observability::{init_metrics, init_tracing};

#[derive(Parser)]
#[command(name = "filingcast", about = "Filing summary service with WebSocket fan-out", version)]
struct Cli {
    /// Path to config directory
    #[arg(short, long, default_value = "/etc/filingcast", env = "FILINGCAST_CONFIG")]
    config: PathBuf,

    /// Override listen address
    #[arg(long, env = "FILINGCAST_LISTEN")]
    listen: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load config
    let config = AppConfig::load(&cli.config)?;

    // Init logging
    init_tracing(
        config.settings.observability.log_format,
        &config.settings.observability.log_level,
    )?;
    init_metrics();

    tracing::info!(
        config_dir = %cli.config.display(),
        summarizer_mode = ?config.settings.summarizer.mode,
        feed_mode = ?config.settings.feed.mode,
        "starting filingcast"
    );

    let state = AppState::from_settings(config.settings.clone())?;

    // Start feed scheduler
    if state.settings.feed.enabled {
        let scheduler = state.scheduler.clone();
        let shutdown_rx = state.subscribe_shutdown();
        tokio::spawn(async move {
            scheduler.run(shutdown_rx).await;
        });
    } else {
        tracing::info!("feed scheduler disabled");
    }

    // Start HTTP server
    let listen = cli
        .listen
        .unwrap_or_else(|| state.settings.http.listen.clone());

    let router = create_router(state.clone());
    let listener = tokio::net::TcpListener::bind(&listen).await?;
    tracing::info!(listen = %listen, "HTTP server starting");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal(state))
        .await?;

    Ok(())
}

async fn shutdown_signal(state: Arc<AppState>) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    state.drain().await;
}

#[cfg(test)]
mod tests {
    use super::*;
    use filingcast::config::{Settings, SummarizerMode};

    fn assert_send<T: Send>(_: T) {}

    #[test]
    fn test_shutdown_signal_is_send() {
        let mut settings = Settings::default();
        settings.summarizer.mode = SummarizerMode::Mock;
        let state = AppState::from_settings(settings).unwrap();

        // Required by axum::serve(..).with_graceful_shutdown
        assert_send(shutdown_signal(state));
    }
}
