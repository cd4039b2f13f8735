//! Filter configuration endpoints.

use axum::{http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::calls::{Direction, FilterCriteria};
use crate::store::{broadcast_update, CALL_STORE, DATABASE};

#[derive(Debug, Serialize)]
pub struct ConfigResponse {
    pub min_duration_secs: i64,
    pub allowed_directions: BTreeSet<Direction>,
}

#[derive(Debug, Deserialize)]
pub struct ConfigUpdate {
    pub min_duration_secs: Option<i64>,
    pub allowed_directions: Option<BTreeSet<Direction>>,
}

/// GET /api/config - Current filter criteria.
pub async fn get_config() -> Json<ConfigResponse> {
    let store = CALL_STORE.read().unwrap();
    Json(ConfigResponse {
        min_duration_secs: store.criteria.min_duration_secs,
        allowed_directions: store.criteria.allowed_directions.clone(),
    })
}

/// PUT /api/config - Update criteria, persist, and refilter.
pub async fn put_config(
    Json(update): Json<ConfigUpdate>,
) -> Result<Json<ConfigResponse>, StatusCode> {
    if let Some(min) = update.min_duration_secs {
        if min < 0 {
            return Err(StatusCode::UNPROCESSABLE_ENTITY);
        }
    }
    if let Some(directions) = &update.allowed_directions {
        if directions.is_empty() {
            return Err(StatusCode::UNPROCESSABLE_ENTITY);
        }
    }

    let criteria = {
        let mut store = CALL_STORE.write().unwrap();
        let mut criteria = store.criteria.clone();
        if let Some(min) = update.min_duration_secs {
            criteria.min_duration_secs = min;
        }
        if let Some(directions) = update.allowed_directions {
            criteria.allowed_directions = directions;
        }
        store.set_criteria(criteria.clone(), chrono::Local::now());
        criteria
    };

    persist_criteria(&criteria);
    broadcast_update("config_change", &criteria);

    Ok(Json(ConfigResponse {
        min_duration_secs: criteria.min_duration_secs,
        allowed_directions: criteria.allowed_directions,
    }))
}

fn persist_criteria(criteria: &FilterCriteria) {
    let persisted = DATABASE
        .as_ref()
        .and_then(|db| db.lock().ok())
        .map(|db| db.set_criteria(criteria));
    match persisted {
        Some(Ok(())) => {}
        Some(Err(e)) => tracing::error!(?e, "Failed to persist filter criteria"),
        None => tracing::warn!("Settings database unavailable, criteria not persisted"),
    }
}
