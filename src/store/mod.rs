//! Shared state module.
//!
//! Holds the global call store, the settings database handle, and the
//! WebSocket broadcast channel used to push refresh events to clients.

pub mod call_store;

pub use call_store::*;

use crate::database::Database;
use once_cell::sync::Lazy;
use std::sync::{Arc, Mutex, RwLock};

/// Global thread-safe call store.
pub static CALL_STORE: Lazy<Arc<RwLock<CallStore>>> =
    Lazy::new(|| Arc::new(RwLock::new(CallStore::new())));

/// Global settings database (initialized on first use).
pub static DATABASE: Lazy<Option<Arc<Mutex<Database>>>> = Lazy::new(|| match Database::open() {
    Ok(db) => {
        tracing::info!("Settings database initialized");
        Some(Arc::new(Mutex::new(db)))
    }
    Err(e) => {
        tracing::error!(
            ?e,
            "Failed to initialize settings database, running with defaults"
        );
        None
    }
});

/// Global WebSocket broadcast sender (set by HTTP server).
pub static BROADCAST_TX: once_cell::sync::OnceCell<tokio::sync::broadcast::Sender<String>> =
    once_cell::sync::OnceCell::new();

/// Sends an update to all connected WebSocket clients.
pub fn broadcast_update(update_type: &str, data: &impl serde::Serialize) {
    if let Some(tx) = BROADCAST_TX.get() {
        let message = serde_json::json!({
            "type": update_type,
            "data": data,
            "timestamp": chrono::Utc::now().to_rfc3339(),
        });
        if let Ok(json) = serde_json::to_string(&message) {
            let _ = tx.send(json);
        }
    }
}

/// Loads persisted criteria and allowlist into the call store.
///
/// Called once at startup, before the first refresh cycle.
pub fn load_persisted_settings() {
    let Some(db_arc) = DATABASE.as_ref() else {
        return;
    };
    let Ok(db) = db_arc.lock() else {
        return;
    };

    let now = chrono::Local::now();
    if let Ok(mut store) = CALL_STORE.write() {
        match db.get_criteria() {
            Ok(criteria) => store.set_criteria(criteria, now),
            Err(e) => tracing::warn!(?e, "Failed to load persisted criteria"),
        }
        match db.get_allowlist() {
            Ok(allowlist) => store.set_allowlist(allowlist, now),
            Err(e) => tracing::warn!(?e, "Failed to load persisted allowlist"),
        }
    }
}
