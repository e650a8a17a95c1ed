//! Prometheus metrics for summarization-service.
//!
//! Provides HTTP and model-gateway metrics for observability.

use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounterVec, Opts, Registry, TextEncoder,
};
use std::sync::{Once, OnceLock};

// Global registry
pub static REGISTRY: OnceLock<Registry> = OnceLock::new();

// HTTP metrics
pub static HTTP_REQUESTS_TOTAL: OnceLock<IntCounterVec> = OnceLock::new();
pub static HTTP_REQUEST_DURATION_SECONDS: OnceLock<HistogramVec> = OnceLock::new();
pub static GATE_REJECTIONS_TOTAL: OnceLock<IntCounterVec> = OnceLock::new();

// Model gateway metrics
pub static GENAI_REQUESTS_TOTAL: OnceLock<IntCounterVec> = OnceLock::new();
pub static GENAI_PROVIDER_LATENCY_SECONDS: OnceLock<HistogramVec> = OnceLock::new();
pub static GENAI_PROVIDER_ERRORS_TOTAL: OnceLock<IntCounterVec> = OnceLock::new();
pub static GENAI_PROMPT_BYTES: OnceLock<HistogramVec> = OnceLock::new();

/// Initialize all metrics. Later calls are no-ops.
pub fn init_metrics() {
    static INIT: Once = Once::new();
    INIT.call_once(register_metrics);
}

fn register_metrics() {
    let registry = Registry::new();

    let http_requests_total = IntCounterVec::new(
        Opts::new("http_requests_total", "Total number of HTTP requests"),
        &["method", "route", "status"],
    )
    .expect("Failed to create http_requests_total metric");

    let http_request_duration = HistogramVec::new(
        HistogramOpts::new(
            "http_request_duration_seconds",
            "HTTP request duration in seconds",
        )
        .buckets(vec![0.01, 0.05, 0.1, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0, 60.0]),
        &["route"],
    )
    .expect("Failed to create http_request_duration_seconds metric");

    let gate_rejections = IntCounterVec::new(
        Opts::new(
            "gate_rejections_total",
            "Requests rejected for a wrong or missing client_secret",
        ),
        &["route"],
    )
    .expect("Failed to create gate_rejections_total metric");

    let genai_requests = IntCounterVec::new(
        Opts::new("genai_requests_total", "Total generation requests"),
        &["endpoint", "backend", "outcome"], // outcome: success, error
    )
    .expect("Failed to create genai_requests_total metric");

    let provider_latency = HistogramVec::new(
        HistogramOpts::new(
            "genai_provider_latency_seconds",
            "Model gateway latency in seconds",
        )
        .buckets(vec![0.1, 0.5, 1.0, 2.0, 5.0, 10.0, 30.0, 60.0, 120.0]),
        &["backend"],
    )
    .expect("Failed to create genai_provider_latency_seconds metric");

    let provider_errors = IntCounterVec::new(
        Opts::new("genai_provider_errors_total", "Total model gateway errors"),
        &["backend", "error_type"],
    )
    .expect("Failed to create genai_provider_errors_total metric");

    let prompt_bytes = HistogramVec::new(
        HistogramOpts::new("genai_prompt_bytes", "Rendered prompt size in bytes").buckets(
            prometheus::exponential_buckets(1024.0, 4.0, 8)
                .expect("Failed to create prompt size buckets"),
        ),
        &["endpoint"],
    )
    .expect("Failed to create genai_prompt_bytes metric");

    registry
        .register(Box::new(http_requests_total.clone()))
        .expect("Failed to register http_requests_total");
    registry
        .register(Box::new(http_request_duration.clone()))
        .expect("Failed to register http_request_duration_seconds");
    registry
        .register(Box::new(gate_rejections.clone()))
        .expect("Failed to register gate_rejections_total");
    registry
        .register(Box::new(genai_requests.clone()))
        .expect("Failed to register genai_requests_total");
    registry
        .register(Box::new(provider_latency.clone()))
        .expect("Failed to register genai_provider_latency_seconds");
    registry
        .register(Box::new(provider_errors.clone()))
        .expect("Failed to register genai_provider_errors_total");
    registry
        .register(Box::new(prompt_bytes.clone()))
        .expect("Failed to register genai_prompt_bytes");

    let _ = REGISTRY.set(registry);
    let _ = HTTP_REQUESTS_TOTAL.set(http_requests_total);
    let _ = HTTP_REQUEST_DURATION_SECONDS.set(http_request_duration);
    let _ = GATE_REJECTIONS_TOTAL.set(gate_rejections);
    let _ = GENAI_REQUESTS_TOTAL.set(genai_requests);
    let _ = GENAI_PROVIDER_LATENCY_SECONDS.set(provider_latency);
    let _ = GENAI_PROVIDER_ERRORS_TOTAL.set(provider_errors);
    let _ = GENAI_PROMPT_BYTES.set(prompt_bytes);

    tracing::info!("Prometheus metrics initialized");
}

/// Get metrics in Prometheus text format.
pub fn get_metrics() -> String {
    let mut buffer = Vec::new();
    let encoder = TextEncoder::new();

    let registry = match REGISTRY.get() {
        Some(r) => r,
        None => {
            tracing::error!("Metrics registry not initialized");
            return "# Metrics registry not initialized\n".to_string();
        }
    };

    let metric_families = registry.gather();

    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        tracing::error!(error = %e, "Failed to encode metrics");
        return format!("# Failed to encode metrics: {}\n", e);
    }

    match String::from_utf8(buffer) {
        Ok(s) => s,
        Err(e) => {
            tracing::error!(error = %e, "Failed to convert metrics to UTF-8");
            format!("# Failed to convert metrics to UTF-8: {}\n", e)
        }
    }
}

/// Record a completed HTTP request.
pub fn record_http_request(method: &str, route: &str, status: u16, duration_secs: f64) {
    if let Some(counter) = HTTP_REQUESTS_TOTAL.get() {
        counter
            .with_label_values(&[method, route, &status.to_string()])
            .inc();
    }
    if let Some(histogram) = HTTP_REQUEST_DURATION_SECONDS.get() {
        histogram.with_label_values(&[route]).observe(duration_secs);
    }
}

/// Record a request turned away by the client-secret gate.
pub fn record_gate_rejection(route: &str) {
    if let Some(counter) = GATE_REJECTIONS_TOTAL.get() {
        counter.with_label_values(&[route]).inc();
    }
}

/// Record a finished generation and its gateway latency.
pub fn record_generation(endpoint: &str, backend: &str, success: bool, duration_secs: f64) {
    let outcome = if success { "success" } else { "error" };
    if let Some(counter) = GENAI_REQUESTS_TOTAL.get() {
        counter
            .with_label_values(&[endpoint, backend, outcome])
            .inc();
    }
    if let Some(histogram) = GENAI_PROVIDER_LATENCY_SECONDS.get() {
        histogram.with_label_values(&[backend]).observe(duration_secs);
    }
}

/// Record a gateway error.
pub fn record_provider_error(backend: &str, error_type: &str) {
    if let Some(counter) = GENAI_PROVIDER_ERRORS_TOTAL.get() {
        counter.with_label_values(&[backend, error_type]).inc();
    }
}

/// Record the size of a rendered prompt.
pub fn record_prompt_size(endpoint: &str, bytes: usize) {
    if let Some(histogram) = GENAI_PROMPT_BYTES.get() {
        histogram.with_label_values(&[endpoint]).observe(bytes as f64);
    }
}
