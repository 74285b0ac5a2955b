use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;

use filingcast::observability::init_cli_tracing;
use filingcast::simulate::{FilingGenerator, SimulatedFiling};

const LOCAL_SERVER: &str = "http://localhost:8787";

#[derive(Parser)]
#[command(name = "filingsim", about = "Stream mock 8-K filings to a filingcast server", version)]
struct Cli {
    /// Target server
    #[arg(short, long, default_value = "local")]
    mode: Mode,

    /// Server URL (required for production mode, overrides local default)
    #[arg(short, long, env = "FILINGSIM_SERVER")]
    server: Option<String>,

    /// Delay between filings in milliseconds
    #[arg(short, long, default_value = "5000")]
    rate: u64,

    /// Number of filings to send
    #[arg(long, default_value = "50")]
    max: u32,

    /// Generate everything up front and send with a short fixed gap
    #[arg(short, long)]
    batch: bool,

    /// Seed for reproducible event/company/content choices
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
enum Mode {
    Local,
    Production,
}

struct Client {
    base_url: String,
    http: reqwest::Client,
}

impl Client {
    fn new(base_url: String) -> Result<Self, String> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(concat!("filingsim/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| format!("failed to build HTTP client: {}", e))?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    async fn send(&self, filing: &SimulatedFiling) -> Result<String, String> {
        let resp = self
            .http
            .post(format!("{}/simulate", self.base_url))
            .json(filing)
            .send()
            .await
            .map_err(|e| format!("request failed: {}", e))?;

        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        if !status.is_success() {
            return Err(format!("{}: {}", status, body));
        }
        Ok(body)
    }
}

fn preview(content: &str) -> &str {
    match content.char_indices().nth(100) {
        Some((idx, _)) => &content[..idx],
        None => content,
    }
}

async fn send_one(client: &Client, n: u32, filing: &SimulatedFiling) -> bool {
    let event_type = filing.filing.event_type.as_deref().unwrap_or("UNKNOWN");
    let company = filing.filing.company.as_deref().unwrap_or("unknown");

    match client.send(filing).await {
        Ok(response) => {
            tracing::info!(
                n,
                filing_id = %filing.filing_id,
                event_type,
                company,
                response = %response,
                content = preview(&filing.filing.content),
                "filing sent"
            );
            true
        }
        Err(e) => {
            tracing::warn!(n, filing_id = %filing.filing_id, error = %e, "failed to send filing");
            false
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    init_cli_tracing();

    let cli = Cli::parse();

    let server = match (cli.mode, cli.server) {
        (_, Some(server)) => server,
        (Mode::Local, None) => LOCAL_SERVER.to_string(),
        (Mode::Production, None) => {
            eprintln!("error: --server is required in production mode");
            return ExitCode::FAILURE;
        }
    };

    let client = match Client::new(server) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    tracing::info!(
        server = %client.base_url,
        mode = ?cli.mode,
        rate_ms = cli.rate,
        max = cli.max,
        batch = cli.batch,
        "starting filing simulation"
    );

    let mut generator = FilingGenerator::new(cli.seed);
    let mut sent = 0u32;
    let mut failed = 0u32;

    if cli.batch {
        let filings: Vec<_> = (0..cli.max).map(|_| generator.next_filing()).collect();
        for (i, filing) in filings.iter().enumerate() {
            if send_one(&client, i as u32 + 1, filing).await {
                sent += 1;
            } else {
                failed += 1;
            }
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
    } else {
        for n in 1..=cli.max {
            let filing = generator.next_filing();
            if send_one(&client, n, &filing).await {
                sent += 1;
            } else {
                failed += 1;
            }
            if n < cli.max {
                tokio::time::sleep(Duration::from_millis(cli.rate)).await;
            }
        }
    }

    tracing::info!(sent, failed, "filing simulation completed");
    ExitCode::SUCCESS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview_truncates_on_char_boundary() {
        assert_eq!(preview("short"), "short");
        let long = "é".repeat(150);
        assert_eq!(preview(&long).chars().count(), 100);
    }

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["filingsim"]);
        assert!(matches!(cli.mode, Mode::Local));
        assert_eq!(cli.rate, 5000);
        assert_eq!(cli.max, 50);
        assert!(!cli.batch);
    }
}
