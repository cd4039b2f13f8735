//! Summary statistics over the filtered call list.

use super::anchors;
use super::types::{CallRecord, SummaryStatistics, TotalsWindow};
use chrono::{DateTime, Local};
use std::collections::HashMap;

/// Computes aggregate statistics, or `None` for an empty input.
///
/// Ties for the longest call go to the first record in input order.
/// Ties for the busiest hour go to the hour whose record appears first
/// in input order, which with descending input is the most recent one.
pub fn summarize(filtered: &[CallRecord], now: DateTime<Local>) -> Option<SummaryStatistics> {
    let mut longest = filtered.first()?;
    for record in &filtered[1..] {
        if record.duration_secs > longest.duration_secs {
            longest = record;
        }
    }

    let mut per_hour: HashMap<i64, usize> = HashMap::new();
    for record in filtered {
        *per_hour
            .entry(anchors::hour_floor_millis(record.timestamp_millis))
            .or_default() += 1;
    }
    let max_count = per_hour.values().copied().max().unwrap_or(0);
    let busiest_hour_start_millis = filtered
        .iter()
        .map(|r| anchors::hour_floor_millis(r.timestamp_millis))
        .find(|hour| per_hour[hour] == max_count)?;

    let window_starts = [
        (TotalsWindow::Hour, anchors::start_of_hour(now)),
        (TotalsWindow::Day, anchors::start_of_day(now)),
        (TotalsWindow::Week, anchors::start_of_week(now)),
        (TotalsWindow::Month, anchors::start_of_month(now)),
    ];
    let total_duration_secs = window_starts
        .iter()
        .map(|&(window, start)| {
            let anchor_millis = start.timestamp_millis();
            let total: i64 = filtered
                .iter()
                .filter(|r| r.timestamp_millis >= anchor_millis)
                .map(|r| r.duration_secs)
                .sum();
            (window, total)
        })
        .collect();

    Some(SummaryStatistics {
        longest_call: longest.clone(),
        busiest_hour_start_millis,
        total_duration_secs,
    })
}
