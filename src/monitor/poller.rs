//! Refresh polling loop.
//!
//! A background thread periodically fetches the recent call history,
//! replaces the store's raw set, and broadcasts a refresh event. The
//! whole fetch-filter-summarize pipeline runs end-to-end on each cycle;
//! there is no cancellation, and a failed fetch leaves the previous
//! results in place until the next cycle.

use crate::calls::anchors::months_ago;
use crate::source::{CallLogSource, SqliteCallLog};
use crate::store::CALL_STORE;
use chrono::Local;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Configuration for the refresh poller.
#[derive(Debug, Clone)]
pub struct PollerConfig {
    /// How often to refresh from the call log (default: 30s).
    pub poll_interval: Duration,

    /// How far back each fetch reaches, in calendar months.
    pub lookback_months: u32,
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(30),
            lookback_months: 1,
        }
    }
}

/// Spawns the refresh polling thread.
///
/// Each cycle opens the call log read-only, fetches the lookback range,
/// and applies the result to the global store. Opening per cycle means
/// a log that appears or recovers later is picked up without restart.
///
/// # Arguments
/// * `calllog_path` - Path to the call-history SQLite file
/// * `shutdown` - Atomic flag to signal thread termination
/// * `config` - Polling configuration
pub fn spawn_polling_thread(
    calllog_path: PathBuf,
    shutdown: Arc<AtomicBool>,
    config: PollerConfig,
) -> JoinHandle<()> {
    thread::spawn(move || {
        tracing::info!(
            interval_secs = config.poll_interval.as_secs(),
            lookback_months = config.lookback_months,
            path = ?calllog_path,
            "Refresh polling thread started"
        );

        loop {
            if shutdown.load(Ordering::SeqCst) {
                break;
            }

            match SqliteCallLog::open(&calllog_path) {
                Ok(source) => refresh_cycle(&source, config.lookback_months),
                Err(e) => {
                    tracing::warn!(error = %e, "Call log not readable, keeping last good results");
                }
            }

            // Sleep in short slices so shutdown is prompt.
            let mut remaining = config.poll_interval;
            while !remaining.is_zero() && !shutdown.load(Ordering::SeqCst) {
                let slice = remaining.min(Duration::from_millis(250));
                thread::sleep(slice);
                remaining -= slice;
            }
        }

        tracing::info!("Refresh polling thread shutting down");
    })
}

/// Runs one fetch-filter-summarize cycle against the given source.
pub fn refresh_cycle(source: &dyn CallLogSource, lookback_months: u32) {
    let now = Local::now();
    let from_millis = months_ago(now, lookback_months).timestamp_millis();
    let result = source.query(from_millis, now.timestamp_millis());

    let Ok(mut store) = CALL_STORE.write() else {
        tracing::error!("Call store lock poisoned, skipping refresh");
        return;
    };

    if store.apply_fetch(result, now) {
        let snapshot = serde_json::json!({
            "total": store.raw.len(),
            "filtered": store.filtered.len(),
            "last_refresh": store.last_refresh.map(|t| t.to_rfc3339()),
        });
        tracing::debug!(
            total = store.raw.len(),
            filtered = store.filtered.len(),
            "Refresh cycle complete"
        );
        drop(store);
        crate::store::broadcast_update("refresh", &snapshot);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_poller_config_default() {
        let config = PollerConfig::default();
        assert_eq!(config.poll_interval, Duration::from_secs(30));
        assert_eq!(config.lookback_months, 1);
    }
}
