//! Bucket count and summary statistics endpoints.

use axum::Json;
use serde::Serialize;

use crate::calls::{SummaryStatistics, TimeWindowBucket};
use crate::store::CALL_STORE;

#[derive(Serialize)]
pub struct BucketsResponse {
    pub buckets: Vec<TimeWindowBucket>,
    pub last_refresh: Option<String>,
}

/// GET /api/buckets - Counts per fixed recency window.
pub async fn get_buckets() -> Json<BucketsResponse> {
    let store = CALL_STORE.read().unwrap();
    Json(BucketsResponse {
        buckets: store.buckets.clone(),
        last_refresh: store.last_refresh.map(|t| t.to_rfc3339()),
    })
}

/// GET /api/stats - Summary statistics, `null` while no call matches.
pub async fn get_stats() -> Json<Option<SummaryStatistics>> {
    let store = CALL_STORE.read().unwrap();
    Json(store.summary.clone())
}
