//! HTTP metrics middleware for Prometheus

use axum::{body::Body, extract::MatchedPath, http::Request, middleware::Next, response::Response};
use std::time::Instant;

use crate::observability::metrics::{HTTP_IN_FLIGHT, HTTP_REQUESTS_TOTAL, HTTP_REQUEST_DURATION};

/// Routes that are not worth timing
const UNTRACKED_ROUTES: &[&str] = &["/metrics", "/health"];

fn status_class(status: u16) -> &'static str {
    match status {
        100..=199 => "1xx",
        200..=299 => "2xx",
        300..=399 => "3xx",
        400..=499 => "4xx",
        _ => "5xx",
    }
}

/// Middleware to collect HTTP metrics (requests, duration, in-flight)
pub async fn http_metrics(req: Request<Body>, next: Next) -> Response {
    let route = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| "unmatched".to_string());

    if UNTRACKED_ROUTES.contains(&route.as_str()) {
        return next.run(req).await;
    }

    let method = req.method().to_string();
    let in_flight = HTTP_IN_FLIGHT.with_label_values(&[&method, &route]);
    in_flight.inc();
    let start = Instant::now();

    let response = next.run(req).await;

    // A websocket upgrade "finishes" at the 101; the session itself is not timed
    let class = status_class(response.status().as_u16());
    in_flight.dec();
    HTTP_REQUESTS_TOTAL
        .with_label_values(&[&method, &route, class])
        .inc();
    HTTP_REQUEST_DURATION
        .with_label_values(&[&method, &route, class])
        .observe(start.elapsed().as_secs_f64());

    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_class() {
        assert_eq!(status_class(101), "1xx");
        assert_eq!(status_class(200), "2xx");
        assert_eq!(status_class(400), "4xx");
        assert_eq!(status_class(502), "5xx");
    }
}
