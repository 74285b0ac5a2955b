use thiserror::Error;

#[derive(Error, Debug)]
pub enum FilingcastError {
    // API errors
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("service shutting down")]
    ShuttingDown,

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    // Summarizer errors
    #[error("summarizer request failed: {0}")]
    SummarizerTransport(String),

    #[error("summarizer returned {status}: {body}")]
    SummarizerStatus { status: u16, body: String },

    #[error("invalid response format from summarizer: {0}")]
    SummarizerFormat(String),

    // Collaborator errors
    #[error("filing source error: {0}")]
    FilingSource(String),

    // Config errors
    #[error("configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, FilingcastError>;

impl FilingcastError {
    pub fn status_code(&self) -> axum::http::StatusCode {
        use axum::http::StatusCode;
        match self {
            Self::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::ShuttingDown => StatusCode::SERVICE_UNAVAILABLE,
            Self::SummarizerTransport(_)
            | Self::SummarizerStatus { .. }
            | Self::SummarizerFormat(_) => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
