use lazy_static::lazy_static;
use prometheus::{register_int_counter, Encoder, IntCounter, TextEncoder};

lazy_static! {
    pub static ref CYCLES_TOTAL: IntCounter = register_int_counter!(
        "stormwatch_cycles_total",
        "Total number of completed polling cycles."
    )
    .unwrap();
    pub static ref CYCLE_FAILURES_TOTAL: IntCounter = register_int_counter!(
        "stormwatch_cycle_failures_total",
        "Polling cycles that ended with an unhandled error."
    )
    .unwrap();
    pub static ref ALERTS_NOTIFIED_TOTAL: IntCounter = register_int_counter!(
        "stormwatch_alerts_notified_total",
        "New or changed alerts dispatched to the notification sink."
    )
    .unwrap();
    pub static ref FETCH_ERRORS_TOTAL: IntCounter = register_int_counter!(
        "stormwatch_fetch_errors_total",
        "Per-zone feed fetch failures."
    )
    .unwrap();
    pub static ref NOTIFY_ERRORS_TOTAL: IntCounter = register_int_counter!(
        "stormwatch_notify_errors_total",
        "Notification sends that failed."
    )
    .unwrap();
}

/// Force registration of every counter. Lazy statics only register on
/// first use, so an early scrape would otherwise miss untouched counters.
pub fn register_metrics() {
    lazy_static::initialize(&CYCLES_TOTAL);
    lazy_static::initialize(&CYCLE_FAILURES_TOTAL);
    lazy_static::initialize(&ALERTS_NOTIFIED_TOTAL);
    lazy_static::initialize(&FETCH_ERRORS_TOTAL);
    lazy_static::initialize(&NOTIFY_ERRORS_TOTAL);
}

/// Text exposition of the default registry for `GET /metrics`.
pub fn gather_metrics() -> String {
    register_metrics();
    let mut buffer = vec![];
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    encoder
        .encode(&metric_families, &mut buffer)
        .expect("Failed to encode metrics");
    String::from_utf8(buffer).expect("Failed to convert metrics to string")
}
