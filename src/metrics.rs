use lazy_static::lazy_static;
use prometheus::{Counter, Gauge, Histogram, register_counter, register_gauge, register_histogram};


lazy_static! {
    pub static ref REQUEST_TOTAL: Counter =
        register_counter!("summarize_requests_total", "Total number of summarize requests").unwrap();
    pub static ref RATE_LIMITED_TOTAL: Counter =
        register_counter!("summarize_rate_limited_total", "Requests rejected by the rate limiter").unwrap();
    pub static ref INFERENCE_FAILURES: Counter =
        register_counter!("summarize_inference_failures_total", "Failed inference backend calls").unwrap();
    pub static ref INFERENCE_LATENCY: Histogram = register_histogram!(
        "summarize_inference_latency_seconds",
        "Inference backend latency in seconds"
    )
    .unwrap();
    pub static ref TRACKED_CLIENTS: Gauge =
        register_gauge!("summarize_rate_limit_clients", "Client keys currently held by the rate limiter").unwrap();
}
