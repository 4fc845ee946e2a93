use axum::http::StatusCode;
use once_cell::sync::Lazy;
use prometheus::{register_int_counter, register_int_counter_vec, Encoder, IntCounter, IntCounterVec, TextEncoder};

// Prometheus metrics (default registry)
pub static POST_OPERATIONS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "postboard_post_operations_total",
        "Post store operations by kind",
        &["op"]
    )
    .expect("register post_operations_total")
});

pub static IMAGE_DECODE_FAILURES_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "postboard_image_decode_failures_total",
        "Image uploads that could not be decoded or written"
    )
    .expect("register image_decode_failures_total")
});

pub fn record_op(op: &str) {
    POST_OPERATIONS_TOTAL.with_label_values(&[op]).inc();
}

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
    fn recorded_ops_show_up_in_exposition() {
        record_op("create");
        IMAGE_DECODE_FAILURES_TOTAL.inc();
        let (status, body) = encode_metrics();
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("postboard_post_operations_total"));
        assert!(body.contains("op=\"create\""));
        assert!(body.contains("postboard_image_decode_failures_total"));
    }
}
