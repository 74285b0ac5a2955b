use std::future::Future;
use std::pin::Pin;
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use futures_util::{SinkExt, StreamExt};
use tokio::time::Instant;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;

use filingcast::domain::FilingSummary;
use filingcast::observability::init_cli_tracing;

#[derive(Parser)]
#[command(name = "filingwatch", about = "Watch filing summaries broadcast by a filingcast server", version)]
struct Cli {
    /// Server base URL
    #[arg(short, long, default_value = "http://localhost:8787", env = "FILINGWATCH_SERVER")]
    server: String,

    /// Reconnect attempts before giving up
    #[arg(long, default_value = "5")]
    reconnect_attempts: u32,

    /// Delay between reconnect attempts in milliseconds
    #[arg(long, default_value = "3000")]
    reconnect_delay: u64,

    /// Skip triggering /test-scheduled after the first connect
    #[arg(long)]
    no_scheduled: bool,

    /// Delay before triggering /test-scheduled in milliseconds
    #[arg(long, default_value = "2000")]
    scheduled_delay: u64,

    /// Seconds to watch before exiting (0 watches until Ctrl+C)
    #[arg(long, default_value = "30")]
    max_wait: u64,
}

/// `http://host` -> `ws://host/ws`, `https://host` -> `wss://host/ws`
fn ws_url(server: &str) -> String {
    let base = server.trim_end_matches('/');
    let base = if let Some(rest) = base.strip_prefix("https://") {
        format!("wss://{}", rest)
    } else if let Some(rest) = base.strip_prefix("http://") {
        format!("ws://{}", rest)
    } else {
        base.to_string()
    };
    format!("{}/ws", base)
}

fn render(text: &str) -> String {
    match serde_json::from_str::<FilingSummary>(text) {
        Ok(summary) => {
            let mut out = format!("filing {}", summary.filing_id);
            if let Some(company) = &summary.company {
                out.push_str(&format!(" | {}", company));
            }
            if let Some(date) = &summary.date {
                out.push_str(&format!(" | {}", date));
            }
            if let Some(event_type) = &summary.event_type {
                out.push_str(&format!(" | {}", event_type));
            }
            out.push('\n');
            out.push_str(&summary.summary);
            out
        }
        Err(_) => format!("(unparsed) {}", text),
    }
}

async fn trigger_scheduled(server: String, delay: Duration) {
    tokio::time::sleep(delay).await;
    let url = format!("{}/test-scheduled", server.trim_end_matches('/'));
    match reqwest::get(&url).await {
        Ok(resp) if resp.status().is_success() => {
            tracing::info!(status = %resp.status(), "scheduled cycle triggered");
        }
        Ok(resp) => {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            tracing::warn!(status = %status, body = %body, "scheduled trigger failed");
        }
        Err(e) => tracing::warn!(error = %e, "scheduled trigger request failed"),
    }
}

#[derive(Debug, PartialEq, Eq)]
enum Exit {
    Deadline,
    Interrupted,
    Closed,
}

/// Resolves once the watch deadline passes or Ctrl+C arrives
async fn stop_signal(deadline: Option<Instant>) -> Exit {
    let deadline_sleep = async {
        match deadline {
            Some(at) => tokio::time::sleep_until(at).await,
            None => std::future::pending().await,
        }
    };
    tokio::select! {
        _ = deadline_sleep => Exit::Deadline,
        Ok(()) = tokio::signal::ctrl_c() => Exit::Interrupted,
    }
}

/// Drive `fut` to completion unless `stop` resolves first
async fn or_stop<T, S>(fut: impl Future<Output = T>, stop: Pin<&mut S>) -> Result<T, Exit>
where
    S: Future<Output = Exit>,
{
    tokio::select! {
        out = fut => Ok(out),
        exit = stop => Err(exit),
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    init_cli_tracing();

    let cli = Cli::parse();
    let url = ws_url(&cli.server);
    let deadline = (cli.max_wait > 0).then(|| Instant::now() + Duration::from_secs(cli.max_wait));
    let reconnect_delay = Duration::from_millis(cli.reconnect_delay);

    let mut received = 0u64;
    let mut failures = 0u32;
    let mut triggered = cli.no_scheduled;

    // Raced against every wait in the loop below
    let stop = stop_signal(deadline);
    tokio::pin!(stop);

    let exit = 'outer: loop {
        tracing::info!(url = %url, "connecting");
        let connected = match or_stop(connect_async(url.as_str()), stop.as_mut()).await {
            Ok(connected) => connected,
            Err(exit) => break exit,
        };
        let mut ws = match connected {
            Ok((ws, _)) => {
                failures = 0;
                tracing::info!(url = %url, "connected");
                ws
            }
            Err(e) => {
                failures += 1;
                tracing::warn!(error = %e, attempt = failures, max = cli.reconnect_attempts, "connect failed");
                if failures > cli.reconnect_attempts {
                    break Exit::Closed;
                }
                if let Err(exit) = or_stop(tokio::time::sleep(reconnect_delay), stop.as_mut()).await {
                    break exit;
                }
                continue;
            }
        };

        if !triggered {
            triggered = true;
            tokio::spawn(trigger_scheduled(
                cli.server.clone(),
                Duration::from_millis(cli.scheduled_delay),
            ));
        }

        loop {
            tokio::select! {
                msg = ws.next() => match msg {
                    Some(Ok(Message::Text(text))) => {
                        received += 1;
                        println!("#{} {}\n", received, render(text.as_str()));
                    }
                    Some(Ok(Message::Close(frame))) => {
                        tracing::info!(frame = ?frame, "server closed connection");
                        break;
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        tracing::warn!(error = %e, "connection error");
                        break;
                    }
                    None => break,
                },
                exit = stop.as_mut() => {
                    let _ = ws.send(Message::Close(None)).await;
                    break 'outer exit;
                }
            }
        }

        failures += 1;
        if failures > cli.reconnect_attempts {
            break Exit::Closed;
        }
        tracing::info!(attempt = failures, max = cli.reconnect_attempts, "reconnecting");
        if let Err(exit) = or_stop(tokio::time::sleep(reconnect_delay), stop.as_mut()).await {
            break exit;
        }
    };

    tracing::info!(received, "watch finished");
    match exit {
        Exit::Deadline | Exit::Interrupted => ExitCode::SUCCESS,
        Exit::Closed => {
            eprintln!("error: maximum reconnection attempts reached");
            ExitCode::FAILURE
        }
    }
}
