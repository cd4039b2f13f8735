//! Time window bucketizer.
//!
//! Counts filtered records into the fixed set of recency windows. Each
//! bucket pairs a named anchor with the count of records at or after
//! that boundary.

use super::anchors;
use super::types::{CallRecord, TimeWindowBucket, WindowLabel};
use chrono::{DateTime, Local};

/// Resolves a window label to its anchor for the given `now`.
pub fn anchor_for(label: WindowLabel, now: DateTime<Local>) -> DateTime<Local> {
    match label {
        WindowLabel::StartOfHour => anchors::start_of_hour(now),
        WindowLabel::LastHour => anchors::hours_ago(now, 1),
        WindowLabel::LastTwoHours => anchors::hours_ago(now, 2),
        WindowLabel::StartOfDay => anchors::start_of_day(now),
        WindowLabel::LastDay => anchors::days_ago(now, 1),
        WindowLabel::LastTwoDays => anchors::days_ago(now, 2),
        WindowLabel::StartOfWeek => anchors::start_of_week(now),
        WindowLabel::LastWeek => anchors::weeks_ago(now, 1),
        WindowLabel::LastTwoWeeks => anchors::weeks_ago(now, 2),
        WindowLabel::StartOfMonth => anchors::start_of_month(now),
        WindowLabel::LastMonth => anchors::months_ago(now, 1),
    }
}

/// Counts records at or after an anchor timestamp.
fn count_since(records: &[CallRecord], anchor_millis: i64) -> usize {
    records
        .iter()
        .filter(|r| r.timestamp_millis >= anchor_millis)
        .count()
}

/// Computes the count for every window label, in display order.
pub fn bucket_counts(filtered: &[CallRecord], now: DateTime<Local>) -> Vec<TimeWindowBucket> {
    WindowLabel::ALL
        .iter()
        .map(|&label| {
            let anchor_millis = anchor_for(label, now).timestamp_millis();
            TimeWindowBucket {
                label,
                anchor_millis,
                count: count_since(filtered, anchor_millis),
            }
        })
        .collect()
}
