use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::domain::Filing;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub summarizer: SummarizerConfig,
    #[serde(default)]
    pub feed: FeedConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub ws: WsConfig,
    #[serde(default)]
    pub observability: ObservabilityConfig,
    #[serde(default)]
    pub shutdown: ShutdownConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    #[serde(default = "default_listen")]
    pub listen: String,
    #[serde(default)]
    pub cors_origin: Option<String>,
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            cors_origin: None,
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

fn default_listen() -> String { "127.0.0.1:8787".to_string() }
fn default_max_body_bytes() -> usize { 1024 * 1024 }

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummarizerConfig {
    #[serde(default = "default_summarizer_mode")]
    pub mode: SummarizerMode,
    /// Name of the env var holding the API key
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

impl Default for SummarizerConfig {
    fn default() -> Self {
        Self {
            mode: default_summarizer_mode(),
            api_key_env: default_api_key_env(),
            endpoint: default_endpoint(),
            model: default_model(),
            timeout_seconds: default_timeout(),
        }
    }
}

fn default_summarizer_mode() -> SummarizerMode { SummarizerMode::Auto }
fn default_api_key_env() -> String { "GROQ_API_KEY".to_string() }
fn default_endpoint() -> String { "https://api.groq.com/openai/v1/chat/completions".to_string() }
fn default_model() -> String { "llama3-8b-8192".to_string() }
fn default_timeout() -> u64 { 30 }

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SummarizerMode {
    /// Groq when a real key is present, mock otherwise
    Auto,
    Mock,
    Groq,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_feed_mode")]
    pub mode: FeedMode,
    /// JSON endpoint for `http` mode
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default = "default_feed_interval")]
    pub interval_seconds: u64,
    /// Filings served in `static` mode
    #[serde(default = "default_filings")]
    pub filings: Vec<Filing>,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            mode: default_feed_mode(),
            url: None,
            interval_seconds: default_feed_interval(),
            filings: default_filings(),
        }
    }
}

fn default_true() -> bool { true }
fn default_feed_mode() -> FeedMode { FeedMode::Static }
fn default_feed_interval() -> u64 { 300 }
fn default_filings() -> Vec<Filing> {
    vec![Filing::new("123", "Sample 8-K content").with_url("https://www.sec.gov/example")]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedMode {
    Static,
    Http,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Oldest entries are evicted past this size; unbounded when unset
    #[serde(default)]
    pub max_entries: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WsConfig {
    /// Per-connection queue of pending outbound messages
    #[serde(default = "default_outbound_buffer")]
    pub outbound_buffer: usize,
}

impl Default for WsConfig {
    fn default() -> Self {
        Self {
            outbound_buffer: default_outbound_buffer(),
        }
    }
}

fn default_outbound_buffer() -> usize { 64 }

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    #[serde(default = "default_log_format")]
    pub log_format: LogFormat,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_format: default_log_format(),
            log_level: default_log_level(),
        }
    }
}

fn default_log_format() -> LogFormat { LogFormat::Pretty }
fn default_log_level() -> String { "info".to_string() }

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Json,
    Pretty,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShutdownConfig {
    #[serde(default = "default_drain_timeout")]
    pub drain_timeout_seconds: u64,
}

impl Default for ShutdownConfig {
    fn default() -> Self {
        Self {
            drain_timeout_seconds: default_drain_timeout(),
        }
    }
}

fn default_drain_timeout() -> u64 { 5 }

impl Settings {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let settings: Settings = serde_yaml::from_str(&content)?;
        Ok(settings)
    }
}
