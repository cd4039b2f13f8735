//! Call store holding raw records and the values derived from them.
//!
//! Each refresh cycle replaces the raw set wholesale and re-derives the
//! filtered list, bucket counts, and summary statistics. Nothing is
//! carried across cycles except the filter criteria and allowlist.

use crate::calls::{
    bucket_counts, filter_calls, summarize, Allowlist, CallRecord, FilterCriteria,
    SummaryStatistics, TimeWindowBucket,
};
use crate::source::SourceError;
use chrono::{DateTime, Local};

/// The main store for call data and derived statistics.
///
/// Wrapped in `Arc<RwLock<CallStore>>` for access from the poller and
/// HTTP server threads; each cycle's data is never mutated concurrently.
#[derive(Debug, Default)]
pub struct CallStore {
    /// Current filter criteria (persisted in the settings database).
    pub criteria: FilterCriteria,

    /// Configured number allowlist (empty = no restriction).
    pub allowlist: Allowlist,

    /// Raw records from the last successful fetch, descending by timestamp.
    pub raw: Vec<CallRecord>,

    /// Records passing the current criteria, same order as `raw`.
    pub filtered: Vec<CallRecord>,

    /// Counts per fixed recency window.
    pub buckets: Vec<TimeWindowBucket>,

    /// Aggregate statistics; `None` while `filtered` is empty.
    pub summary: Option<SummaryStatistics>,

    /// When the last successful refresh completed.
    pub last_refresh: Option<DateTime<Local>>,
}

impl CallStore {
    /// Creates an empty store with default criteria.
    pub fn new() -> Self {
        Self::default()
    }

    /// Re-derives filtered records, buckets, and summary from `raw`.
    pub fn recompute(&mut self, now: DateTime<Local>) {
        self.filtered = filter_calls(&self.raw, &self.criteria, &self.allowlist);
        self.buckets = bucket_counts(&self.filtered, now);
        self.summary = summarize(&self.filtered, now);
    }

    /// Replaces the raw set with a fresh fetch and recomputes.
    pub fn replace_raw(&mut self, records: Vec<CallRecord>, now: DateTime<Local>) {
        self.raw = records;
        self.last_refresh = Some(now);
        self.recompute(now);
    }

    /// Applies a fetch result.
    ///
    /// A failed fetch keeps the last good result set; the poller simply
    /// fetches again on the next cycle. Returns whether the store was
    /// updated.
    pub fn apply_fetch(
        &mut self,
        result: Result<Vec<CallRecord>, SourceError>,
        now: DateTime<Local>,
    ) -> bool {
        match result {
            Ok(records) => {
                self.replace_raw(records, now);
                true
            }
            Err(e) => {
                tracing::warn!(error = %e, "Call log fetch failed, keeping last good results");
                false
            }
        }
    }

    /// Updates the criteria and recomputes the derived values.
    pub fn set_criteria(&mut self, criteria: FilterCriteria, now: DateTime<Local>) {
        self.criteria = criteria;
        self.recompute(now);
    }

    /// Updates the allowlist and recomputes the derived values.
    pub fn set_allowlist(&mut self, allowlist: Allowlist, now: DateTime<Local>) {
        self.allowlist = allowlist;
        self.recompute(now);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calls::Direction;
    use chrono::TimeZone;
    use std::collections::BTreeSet;

    fn now_fixed() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 3, 15, 14, 30, 0).unwrap()
    }

    fn incoming(now: DateTime<Local>, minutes_ago: i64, duration: i64) -> CallRecord {
        CallRecord::new(
            (now - chrono::Duration::minutes(minutes_ago)).timestamp_millis(),
            "1230",
            duration,
            Direction::Incoming,
        )
    }

    #[test]
    fn test_replace_raw_recomputes_everything() {
        let now = now_fixed();
        let mut store = CallStore::new();
        assert!(store.summary.is_none());

        store.replace_raw(vec![incoming(now, 10, 45), incoming(now, 20, 5)], now);

        assert_eq!(store.raw.len(), 2);
        assert_eq!(store.filtered.len(), 2);
        assert!(!store.buckets.is_empty());
        assert_eq!(store.summary.as_ref().unwrap().longest_call.duration_secs, 45);
        assert_eq!(store.last_refresh, Some(now));
    }

    #[test]
    fn test_refresh_replaces_rather_than_merges() {
        let now = now_fixed();
        let mut store = CallStore::new();
        store.replace_raw(vec![incoming(now, 10, 45), incoming(now, 20, 5)], now);
        store.replace_raw(vec![incoming(now, 5, 30)], now);

        assert_eq!(store.raw.len(), 1);
        assert_eq!(store.filtered.len(), 1);
    }

    #[test]
    fn test_criteria_change_refilters() {
        let now = now_fixed();
        let mut store = CallStore::new();
        store.replace_raw(vec![incoming(now, 10, 45), incoming(now, 20, 5)], now);

        store.set_criteria(
            FilterCriteria {
                min_duration_secs: 30,
                allowed_directions: BTreeSet::from([Direction::Incoming]),
            },
            now,
        );

        assert_eq!(store.raw.len(), 2);
        assert_eq!(store.filtered.len(), 1);
        assert_eq!(store.filtered[0].duration_secs, 45);
    }

    #[test]
    fn test_outgoing_only_raw_yields_no_summary() {
        let now = now_fixed();
        let mut store = CallStore::new();
        store.replace_raw(
            vec![CallRecord::new(
                now.timestamp_millis(),
                "1230",
                30,
                Direction::Outgoing,
            )],
            now,
        );

        // Default criteria allow only incoming calls.
        assert!(store.filtered.is_empty());
        assert!(store.summary.is_none());
        assert!(store.buckets.iter().all(|b| b.count == 0));
    }

    #[test]
    fn test_allowlist_change_refilters() {
        let now = now_fixed();
        let mut store = CallStore::new();
        store.replace_raw(vec![incoming(now, 10, 45)], now);
        assert_eq!(store.filtered.len(), 1);

        store.set_allowlist(Allowlist::from_numbers(["555"]), now);
        assert!(store.filtered.is_empty());

        store.set_allowlist(Allowlist::default(), now);
        assert_eq!(store.filtered.len(), 1);
    }

    #[test]
    fn test_failed_fetch_keeps_last_good_results() {
        let now = now_fixed();
        let mut store = CallStore::new();
        store.replace_raw(vec![incoming(now, 10, 45)], now);

        let updated = store.apply_fetch(
            Err(SourceError::Unavailable("permission revoked".into())),
            now,
        );

        assert!(!updated);
        assert_eq!(store.raw.len(), 1);
        assert_eq!(store.filtered.len(), 1);
        assert!(store.summary.is_some());
    }

    #[test]
    fn test_successful_fetch_applies() {
        let now = now_fixed();
        let mut store = CallStore::new();

        let updated = store.apply_fetch(Ok(vec![incoming(now, 10, 45)]), now);

        assert!(updated);
        assert_eq!(store.raw.len(), 1);
    }
}
