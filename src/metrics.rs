use lazy_static::lazy_static;
use prometheus::{
    Counter, CounterVec, Encoder, Gauge, Histogram, TextEncoder, register_counter,
    register_counter_vec, register_gauge, register_histogram,
};

// Process-level counters exported at /metrics. The rolling window the
// coordinator reports is kept separately in `latency::RollingLatencyRecorder`.
lazy_static! {
    pub static ref REQUEST_TOTAL: Counter =
        register_counter!("rai_requests_total", "Total number of prediction requests").unwrap();
    pub static ref REQUEST_REJECTED: CounterVec = register_counter_vec!(
        "rai_requests_rejected_total",
        "Requests refused by the rate limiter or validator",
        &["kind"]
    )
    .unwrap();
    pub static ref PREDICTIONS: CounterVec = register_counter_vec!(
        "rai_predictions_total",
        "Served predictions by label",
        &["label"]
    )
    .unwrap();
    pub static ref REQUEST_LATENCY: Histogram = register_histogram!(
        "rai_request_latency_seconds",
        "Request latency in seconds"
    )
    .unwrap();
    pub static ref WINDOW_OCCUPANCY: Gauge =
        register_gauge!("rai_window_occupancy", "Admitted requests in the current rate window")
            .unwrap();
}

// Text exposition of the default registry
pub fn render() -> String {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        tracing::error!(error = %e, "failed to encode metrics");
        return String::new();
    }
    String::from_utf8(buffer).unwrap_or_default()
}
