use once_cell::sync::Lazy;
use prometheus::{
    CounterVec, Encoder, Gauge, GaugeVec, HistogramVec, IntCounter, TextEncoder,
    register_counter_vec, register_gauge, register_gauge_vec, register_histogram_vec,
    register_int_counter,
};

// WebSocket metrics
pub static WS_CONNECTIONS_ACTIVE: Lazy<Gauge> = Lazy::new(|| {
    register_gauge!(
        "filingcast_ws_connections_active",
        "Number of connections currently in the broadcast registry"
    )
    .unwrap()
});

pub static BROADCASTS_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "filingcast_broadcasts_total",
        "Total number of broadcast calls"
    )
    .unwrap()
});

pub static DELIVERIES_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "filingcast_deliveries_total",
        "Per-connection delivery attempts",
        &["status"]
    )
    .unwrap()
});

// Pipeline metrics
pub static FILINGS_PROCESSED: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "filingcast_filings_processed_total",
        "Filings run through the summarize/cache/broadcast pipeline",
        &["source", "status"]
    )
    .unwrap()
});

pub static SUMMARIZER_LATENCY: Lazy<HistogramVec> = Lazy::new(|| {
    register_histogram_vec!(
        "filingcast_summarizer_latency_seconds",
        "Summarizer call latency in seconds",
        &["summarizer", "status"],
        vec![0.001, 0.01, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0]
    )
    .unwrap()
});

pub static SCHEDULED_CYCLES: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "filingcast_scheduled_cycles_total",
        "Total number of scheduled feed cycles",
        &["status"]
    )
    .unwrap()
});

// HTTP metrics
pub static HTTP_REQUESTS_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "filingcast_http_requests_total",
        "Total HTTP requests",
        &["method", "route", "status_class"]
    )
    .unwrap()
});

pub static HTTP_REQUEST_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    register_histogram_vec!(
        "filingcast_http_request_duration_seconds",
        "HTTP request duration in seconds",
        &["method", "route", "status_class"],
        vec![
            0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0
        ]
    )
    .unwrap()
});

pub static HTTP_IN_FLIGHT: Lazy<GaugeVec> = Lazy::new(|| {
    register_gauge_vec!(
        "filingcast_http_in_flight_requests",
        "In-flight HTTP requests",
        &["method", "route"]
    )
    .unwrap()
});

/// Generate Prometheus metrics output
pub fn gather_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        tracing::error!(error = %e, "failed to encode metrics");
        return String::new();
    }
    String::from_utf8(buffer).unwrap_or_default()
}

/// Initialize all metrics (forces lazy statics to be created)
pub fn init_metrics() {
    Lazy::force(&WS_CONNECTIONS_ACTIVE);
    Lazy::force(&BROADCASTS_TOTAL);
    Lazy::force(&DELIVERIES_TOTAL);
    Lazy::force(&FILINGS_PROCESSED);
    Lazy::force(&SUMMARIZER_LATENCY);
    Lazy::force(&SCHEDULED_CYCLES);
    Lazy::force(&HTTP_REQUESTS_TOTAL);
    Lazy::force(&HTTP_REQUEST_DURATION);
    Lazy::force(&HTTP_IN_FLIGHT);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gather_includes_registered_metrics() {
        init_metrics();
        BROADCASTS_TOTAL.inc();
        let output = gather_metrics();
        assert!(output.contains("filingcast_broadcasts_total"));
        assert!(output.contains("filingcast_ws_connections_active"));
    }
}
