use lazy_static::lazy_static;
use prometheus::{
    register_histogram_vec, register_int_counter, register_int_counter_vec, HistogramVec,
    IntCounter, IntCounterVec,
};

lazy_static! {
    /// Duration of feed page reads, split by whether a search filter applied.
    pub static ref FEED_REQUEST_DURATION_SECONDS: HistogramVec = register_histogram_vec!(
        "feed_request_duration_seconds",
        "Feed page read duration segmented by query kind",
        &["query"]
    )
    .expect("failed to register feed_request_duration_seconds");

    /// Posts created.
    pub static ref POSTS_CREATED_TOTAL: IntCounter = register_int_counter!(
        "posts_created_total",
        "Posts created"
    )
    .expect("failed to register posts_created_total");

    /// Like toggles by result (liked/unliked/already_liked).
    pub static ref LIKE_TOGGLES_TOTAL: IntCounterVec = register_int_counter_vec!(
        "like_toggles_total",
        "Like toggles segmented by outcome",
        &["outcome"]
    )
    .expect("failed to register like_toggles_total");

    /// Notification attempts by type and outcome
    /// (published/channel_failed/channel_timeout/skipped_self/persist_failed).
    pub static ref NOTIFICATIONS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "notifications_total",
        "Notification attempts segmented by type and outcome",
        &["type", "outcome"]
    )
    .expect("failed to register notifications_total");

    /// Store calls abandoned after their timeout.
    pub static ref STORE_TIMEOUTS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "store_timeouts_total",
        "Store operations that exceeded their timeout",
        &["operation"]
    )
    .expect("failed to register store_timeouts_total");
}
