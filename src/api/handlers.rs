use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use std::sync::Arc;

use crate::AppState;
use crate::domain::{Filing, FilingSummary};
use crate::error::FilingcastError;

// Response types

#[derive(Serialize)]
pub struct HealthResponse {
    status: String,
    version: String,
    /// Live members of the broadcast registry
    connections: usize,
    cached_summaries: usize,
    summarizer: String,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    error: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CachedSummaryResponse {
    filing_id: String,
    summary: String,
}

pub struct AppError(pub FilingcastError);

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status = self.0.status_code();
        let body = Json(ErrorResponse {
            error: self.0.to_string(),
        });
        (status, body).into_response()
    }
}

// Handlers

pub async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let status = if state.is_shutting_down() {
        "shutting_down"
    } else {
        "ok"
    };

    Json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        connections: state.registry.len().await,
        cached_summaries: state.cache.len().await,
        summarizer: state.processor.summarizer_name().to_string(),
    })
}

pub async fn metrics() -> impl IntoResponse {
    crate::observability::gather_metrics()
}

/// Summarize, cache and broadcast one simulated filing
pub async fn simulate(
    State(state): State<Arc<AppState>>,
    Json(filing): Json<Filing>,
) -> Response {
    if state.is_shutting_down() {
        return AppError(FilingcastError::ShuttingDown).into_response();
    }

    tracing::info!(filing_id = %filing.id, company = ?filing.company, "processing simulated filing");

    match state.processor.process(&filing, "simulate").await {
        Ok(processed) => {
            tracing::info!(
                filing_id = %filing.id,
                delivered = processed.broadcast.delivered,
                "simulated filing processed and stored"
            );
            (StatusCode::OK, "Simulated filing processed and broadcast").into_response()
        }
        Err(FilingcastError::InvalidRequest(msg)) => (StatusCode::BAD_REQUEST, msg).into_response(),
        Err(e) => {
            tracing::error!(filing_id = %filing.id, error = %e, "error processing simulated filing");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Error processing simulated filing",
            )
                .into_response()
        }
    }
}

/// Fan a payload out to every open WebSocket connection
pub async fn broadcast(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<FilingSummary>,
) -> Result<impl IntoResponse, AppError> {
    let json = serde_json::to_string(&payload).map_err(|e| AppError(e.into()))?;
    let outcome = state.registry.broadcast(json).await;

    tracing::debug!(
        filing_id = %payload.filing_id,
        attempted = outcome.attempted,
        "broadcast requested"
    );

    Ok((StatusCode::OK, "Broadcast sent"))
}

/// Run one scheduled feed cycle immediately
pub async fn test_scheduled(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    tracing::info!("triggering scheduled logic for testing");

    match state.scheduler.run_cycle().await {
        Ok(report) => {
            tracing::info!(
                processed = report.processed,
                failed = report.failed,
                "manual scheduled cycle finished"
            );
            (StatusCode::OK, "Scheduled logic executed")
        }
        Err(e) => {
            tracing::error!(error = %e, "manual scheduled cycle failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Error executing scheduled logic",
            )
        }
    }
}

pub async fn get_summary(
    State(state): State<Arc<AppState>>,
    Path(filing_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let summary = state
        .cache
        .get(&filing_id)
        .await
        .map_err(AppError)?
        .ok_or_else(|| AppError(FilingcastError::NotFound(format!("summary for {}", filing_id))))?;

    Ok(Json(CachedSummaryResponse { filing_id, summary }))
}
