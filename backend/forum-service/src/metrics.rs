//! Prometheus metrics for forum-service.
//!
//! Counters for votes and content writes plus the `/metrics` handler.

use actix_web::HttpResponse;
use lazy_static::lazy_static;
use prometheus::{register_int_counter, register_int_counter_vec, IntCounter, IntCounterVec};
use prometheus::{Encoder, TextEncoder};

use crate::models::{VoteAction, VoteState};

lazy_static! {
    /// Vote toggles by action and resulting state.
    pub static ref VOTES_TOTAL: IntCounterVec = register_int_counter_vec!(
        "forum_votes_total",
        "Vote toggles segmented by action and resulting state",
        &["action", "state"]
    )
    .expect("failed to register forum_votes_total");

    pub static ref POSTS_CREATED_TOTAL: IntCounter = register_int_counter!(
        "forum_posts_created_total",
        "Posts created"
    )
    .expect("failed to register forum_posts_created_total");

    pub static ref POSTS_DELETED_TOTAL: IntCounter = register_int_counter!(
        "forum_posts_deleted_total",
        "Posts deleted"
    )
    .expect("failed to register forum_posts_deleted_total");

    pub static ref COMMENTS_CREATED_TOTAL: IntCounter = register_int_counter!(
        "forum_comments_created_total",
        "Comments created"
    )
    .expect("failed to register forum_comments_created_total");
}

pub fn record_vote(action: VoteAction, state: VoteState) {
    VOTES_TOTAL
        .with_label_values(&[action.as_str(), state.as_str()])
        .inc();
}

/// Actix handler that renders Prometheus metrics in text format.
pub async fn serve_metrics() -> HttpResponse {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();

    let mut buffer = Vec::new();
    if let Err(err) = encoder.encode(&metric_families, &mut buffer) {
        return HttpResponse::InternalServerError().body(err.to_string());
    }

    HttpResponse::Ok()
        .content_type(encoder.format_type())
        .body(buffer)
}
