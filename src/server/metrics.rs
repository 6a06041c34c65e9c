use axum::{http::StatusCode, response::IntoResponse};
use lazy_static::lazy_static;
use prometheus::{
    CounterVec, Encoder, Gauge, HistogramOpts, HistogramVec, IntGauge, Opts, Registry,
    TextEncoder,
};
use std::time::Duration;

/// Metric name prefix for all vocabulary server metrics
const PREFIX: &str = "vocabulary";

lazy_static! {
    // Global Prometheus registry
    pub static ref REGISTRY: Registry = Registry::new();

    // HTTP Request Metrics
    pub static ref HTTP_REQUESTS_TOTAL: CounterVec = CounterVec::new(
        Opts::new(format!("{PREFIX}_http_requests_total"), "Total number of HTTP requests"),
        &["method", "path", "status"]
    ).expect("Failed to create http_requests_total metric");

    pub static ref HTTP_REQUEST_DURATION_SECONDS: HistogramVec = HistogramVec::new(
        HistogramOpts::new(
            format!("{PREFIX}_http_request_duration_seconds"),
            "HTTP request duration in seconds"
        )
        .buckets(vec![0.001, 0.01, 0.05, 0.1, 0.5, 1.0, 2.0, 5.0, 10.0]),
        &["method", "path"]
    ).expect("Failed to create http_request_duration_seconds metric");

    // Vocabulary Metrics
    pub static ref VOCABULARY_LOOKUPS_TOTAL: CounterVec = CounterVec::new(
        Opts::new(format!("{PREFIX}_lookups_total"), "Vocabulary lookups by outcome"),
        &["vocabulary", "outcome"]
    ).expect("Failed to create lookups_total metric");

    pub static ref VOCABULARY_PROVIDERS: IntGauge = IntGauge::new(
        format!("{PREFIX}_providers"),
        "Number of registered vocabulary providers"
    ).expect("Failed to create providers metric");

    pub static ref PROCESS_MEMORY_BYTES: Gauge = Gauge::new(
        format!("{PREFIX}_process_memory_bytes"),
        "Process memory usage in bytes"
    ).expect("Failed to create process_memory_bytes metric");
}

/// Registers every metric with [`REGISTRY`]. Safe to call more than once.
pub fn init_metrics() {
    let _ = REGISTRY.register(Box::new(HTTP_REQUESTS_TOTAL.clone()));
    let _ = REGISTRY.register(Box::new(HTTP_REQUEST_DURATION_SECONDS.clone()));
    let _ = REGISTRY.register(Box::new(VOCABULARY_LOOKUPS_TOTAL.clone()));
    let _ = REGISTRY.register(Box::new(VOCABULARY_PROVIDERS.clone()));
    let _ = REGISTRY.register(Box::new(PROCESS_MEMORY_BYTES.clone()));

    tracing::info!("Registered {} metric families", REGISTRY.gather().len());
}

pub fn set_registered_providers(count: usize) {
    VOCABULARY_PROVIDERS.set(count as i64);
}

pub fn record_http_request(method: &str, path: &str, status: u16, duration: Duration) {
    HTTP_REQUESTS_TOTAL
        .with_label_values(&[method, path, &status.to_string()])
        .inc();

    HTTP_REQUEST_DURATION_SECONDS
        .with_label_values(&[method, path])
        .observe(duration.as_secs_f64());
}

/// Record the outcome of a vocabulary lookup.
/// `outcome` is one of ok, soft_error, error, denied, bad_request.
pub fn record_vocabulary_lookup(vocabulary: &str, outcome: &str) {
    VOCABULARY_LOOKUPS_TOTAL
        .with_label_values(&[vocabulary, outcome])
        .inc();
}

/// Collapses request paths under `/v1/vocabulary/` so the path label stays bounded.
pub fn categorize_endpoint(path: &str) -> &'static str {
    if path == "/" {
        "/"
    } else if path == "/v1/vocabulary" || path.starts_with("/v1/vocabulary/") {
        "/v1/vocabulary"
    } else {
        "other"
    }
}

/// Resident set size of this process, read from `/proc/self/status`.
fn resident_memory_bytes() -> Option<f64> {
    let status = std::fs::read_to_string("/proc/self/status").ok()?;
    let kilobytes = status
        .lines()
        .find_map(|line| line.strip_prefix("VmRSS:"))?
        .split_whitespace()
        .next()?
        .parse::<f64>()
        .ok()?;
    Some(kilobytes * 1024.0)
}

pub fn update_memory_usage() {
    if let Some(bytes) = resident_memory_bytes() {
        PROCESS_MEMORY_BYTES.set(bytes);
    }
}

pub async fn metrics_handler() -> impl IntoResponse {
    update_memory_usage();

    let mut buffer = Vec::new();
    if let Err(e) = TextEncoder::new().encode(&REGISTRY.gather(), &mut buffer) {
        tracing::error!("Failed to encode metrics: {}", e);
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Failed to encode metrics: {}", e),
        );
    }
    (StatusCode::OK, String::from_utf8_lossy(&buffer).into_owned())
}
