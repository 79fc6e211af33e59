//! Process-wide Prometheus metrics.

use once_cell::sync::Lazy;
use prometheus::{
    register_histogram_vec, register_int_counter_vec, Encoder, HistogramVec, IntCounterVec, TextEncoder,
};

pub static HTTP_REQUESTS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "back_office_http_requests_total",
        "HTTP requests by method and status",
        &["method", "status"]
    )
    .expect("register back_office_http_requests_total")
});

pub static HTTP_REQUEST_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    register_histogram_vec!(
        "back_office_http_request_duration_seconds",
        "HTTP request latency",
        &["method"]
    )
    .expect("register back_office_http_request_duration_seconds")
});

/// Approval workflow outcomes, labelled by document kind and result.
pub static APPROVALS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "back_office_approvals_total",
        "Document approvals by kind and outcome",
        &["kind", "outcome"]
    )
    .expect("register back_office_approvals_total")
});

pub static BOOKINGS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "back_office_bookings_total",
        "Booking mutations by operation",
        &["op"]
    )
    .expect("register back_office_bookings_total")
});

pub fn record_approval(kind: &str, outcome: &str) {
    APPROVALS_TOTAL.with_label_values(&[kind, outcome]).inc();
}

pub fn record_booking(op: &str) {
    BOOKINGS_TOTAL.with_label_values(&[op]).inc();
}

/// Text exposition of the default registry.
pub fn gather_text() -> anyhow::Result<String> {
    // force registration so the families appear before the first event
    Lazy::force(&HTTP_REQUESTS_TOTAL);
    Lazy::force(&HTTP_REQUEST_DURATION);
    Lazy::force(&APPROVALS_TOTAL);
    Lazy::force(&BOOKINGS_TOTAL);
    let mut buf = Vec::new();
    TextEncoder::new().encode(&prometheus::gather(), &mut buf)?;
    Ok(String::from_utf8(buf)?)
}
