use lazy_static::lazy_static;
use prometheus::{
    register_histogram_vec, register_int_counter, register_int_counter_vec, HistogramVec,
    IntCounter, IntCounterVec,
};

lazy_static! {
    /// Feed pages served, segmented by query shape (ranked vs fallback).
    pub static ref FEED_REQUEST_TOTAL: IntCounterVec = register_int_counter_vec!(
        "feed_request_total",
        "Feed pages served segmented by query shape",
        &["mode"]
    )
    .expect("failed to register feed_request_total");

    /// Duration of feed page assembly segmented by query shape.
    pub static ref FEED_REQUEST_DURATION_SECONDS: HistogramVec = register_histogram_vec!(
        "feed_request_duration_seconds",
        "Feed page assembly duration segmented by query shape",
        &["mode"]
    )
    .expect("failed to register feed_request_duration_seconds");

    /// Retries into the recency shape after a ranking-unavailable error.
    pub static ref FEED_FALLBACK_TOTAL: IntCounter = register_int_counter!(
        "feed_fallback_total",
        "Feed requests that degraded to the recency query shape"
    )
    .expect("failed to register feed_fallback_total");
}
