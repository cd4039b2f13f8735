//! Number allowlist endpoints.
//!
//! An empty allowlist places no restriction; a non-empty one excludes
//! every number not in it.

use axum::Json;
use serde::{Deserialize, Serialize};

use crate::calls::Allowlist;
use crate::store::{broadcast_update, CALL_STORE, DATABASE};

#[derive(Serialize)]
pub struct AllowlistResponse {
    pub numbers: Vec<String>,
    pub unrestricted: bool,
}

#[derive(Deserialize)]
pub struct AllowlistUpdate {
    pub numbers: Vec<String>,
}

/// GET /api/allowlist - The configured allowlist.
pub async fn get_allowlist() -> Json<AllowlistResponse> {
    let store = CALL_STORE.read().unwrap();
    Json(response_for(&store.allowlist))
}

/// PUT /api/allowlist - Replace the allowlist wholesale.
pub async fn put_allowlist(Json(update): Json<AllowlistUpdate>) -> Json<AllowlistResponse> {
    let allowlist = Allowlist::from_numbers(update.numbers);

    {
        let mut store = CALL_STORE.write().unwrap();
        store.set_allowlist(allowlist.clone(), chrono::Local::now());
    }

    let persisted = DATABASE
        .as_ref()
        .and_then(|db| db.lock().ok())
        .map(|db| db.set_allowlist(&allowlist));
    match persisted {
        Some(Ok(())) => {}
        Some(Err(e)) => tracing::error!(?e, "Failed to persist allowlist"),
        None => tracing::warn!("Settings database unavailable, allowlist not persisted"),
    }

    broadcast_update("allowlist_change", &allowlist);

    Json(response_for(&allowlist))
}

fn response_for(allowlist: &Allowlist) -> AllowlistResponse {
    AllowlistResponse {
        numbers: allowlist.numbers().iter().cloned().collect(),
        unrestricted: allowlist.is_unrestricted(),
    }
}
