//! Filtered call list endpoint.

use axum::{extract::Query, Json};
use serde::{Deserialize, Serialize};

use crate::calls::CallRecord;
use crate::store::CALL_STORE;

#[derive(Deserialize)]
pub struct CallsQuery {
    /// Max records to return (default 500, capped at 2000).
    pub limit: Option<usize>,
}

/// Response wrapper with refresh metadata.
#[derive(Serialize)]
pub struct CallsResponse {
    pub calls: Vec<CallRecord>,
    pub total_raw: usize,
    pub total_filtered: usize,
    pub last_refresh: Option<String>,
}

/// GET /api/calls - Filtered records, newest first.
pub async fn get_calls(Query(query): Query<CallsQuery>) -> Json<CallsResponse> {
    let limit = query.limit.unwrap_or(500).min(2000);

    let store = CALL_STORE.read().unwrap();
    Json(CallsResponse {
        calls: store.filtered.iter().take(limit).cloned().collect(),
        total_raw: store.raw.len(),
        total_filtered: store.filtered.len(),
        last_refresh: store.last_refresh.map(|t| t.to_rfc3339()),
    })
}
