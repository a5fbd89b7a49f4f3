//! Prometheus metrics for ordering-service.

use once_cell::sync::Lazy;
use prometheus::{
    register_counter_vec, register_histogram_vec, CounterVec, HistogramVec, TextEncoder,
};

/// Order line events by outcome.
pub static ORDER_LINES_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "ordering_order_lines_total",
        "Total number of order line events",
        &["event"] // created, updated, deleted
    )
    .expect("Failed to register order_lines_total")
});

/// Order lines rejected by the inventory availability check.
pub static INVENTORY_REJECTIONS_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "ordering_inventory_rejections_total",
        "Order lines rejected by admission control",
        &["variant_id"]
    )
    .expect("Failed to register inventory_rejections_total")
});

/// Quotation lifecycle events by resulting status.
pub static QUOTATIONS_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "ordering_quotations_total",
        "Total number of quotation transitions by resulting status",
        &["status"] // pending, sent, rejected, expired, converted
    )
    .expect("Failed to register quotations_total")
});

/// Invoices materialized from accepted quotations.
pub static INVOICES_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "ordering_invoices_total",
        "Total number of invoices by status",
        &["status"]
    )
    .expect("Failed to register invoices_total")
});

/// Error counter for alerting.
pub static ERRORS_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "ordering_errors_total",
        "Total number of errors by kind",
        &["error_kind"]
    )
    .expect("Failed to register errors_total")
});

/// Admission check duration.
pub static ADMISSION_CHECK_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    register_histogram_vec!(
        "ordering_admission_check_duration_seconds",
        "Inventory admission check duration in seconds",
        &["outcome"],
        vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0]
    )
    .expect("Failed to register admission_check_duration")
});

/// Initialize all metrics (forces lazy initialization).
pub fn init_metrics() {
    Lazy::force(&ORDER_LINES_TOTAL);
    Lazy::force(&INVENTORY_REJECTIONS_TOTAL);
    Lazy::force(&QUOTATIONS_TOTAL);
    Lazy::force(&INVOICES_TOTAL);
    Lazy::force(&ERRORS_TOTAL);
    Lazy::force(&ADMISSION_CHECK_DURATION);
}

/// Get metrics in Prometheus text format.
pub fn get_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    encoder
        .encode_to_string(&metric_families)
        .unwrap_or_default()
}
