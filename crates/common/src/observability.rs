use axum::http::StatusCode;
use once_cell::sync::Lazy;
use prometheus::{register_int_counter, register_int_counter_vec, Encoder, IntCounter, IntCounterVec, TextEncoder};

// Prometheus metrics (default registry)
pub static MOCKS_CREATED_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "mock_server_mocks_created_total",
        "Total mock sets registered"
    )
    .expect("register mocks_created_total")
});

pub static SNAPSHOT_UPDATES_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "mock_server_snapshot_updates_total",
        "Total snapshot mutations by mode",
        &["mode"]
    )
    .expect("register snapshot_updates_total")
});

pub static ENDPOINT_HITS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "mock_server_endpoint_hits_total",
        "Total resolved mock responses by method",
        &["method"]
    )
    .expect("register endpoint_hits_total")
});

pub static ENDPOINT_MISSES_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "mock_server_endpoint_misses_total",
        "Total lookups that found no endpoint or method"
    )
    .expect("register endpoint_misses_total")
});

pub static PERSIST_FAILURES_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "mock_server_persist_failures_total",
        "Total failed snapshot writes"
    )
    .expect("register persist_failures_total")
});

pub fn encode_metrics() -> (StatusCode, String) {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("metrics encode error: {e}"),
        );
    }
    (StatusCode::OK, String::from_utf8(buffer).unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encoded_metrics_include_touched_counters() {
        MOCKS_CREATED_TOTAL.inc();
        ENDPOINT_HITS_TOTAL.with_label_values(&["GET"]).inc();
        let (status, body) = encode_metrics();
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("mock_server_mocks_created_total"));
        assert!(body.contains("mock_server_endpoint_hits_total"));
    }
}
