//! Calendar anchor computation.
//!
//! All anchors are derived from an explicit `now` in local time so the
//! same boundaries apply to anchor computation and record comparison.
//! "Start of" anchors truncate to the boundary; "N units ago" anchors
//! subtract a calendar unit without truncation, so day/week/month
//! arithmetic follows the local timezone and DST rather than fixed
//! second spans.

use chrono::{DateTime, Datelike, Days, Local, LocalResult, Months, TimeZone, Timelike, Weekday};

/// The week starts on Friday.
pub const WEEK_START: Weekday = Weekday::Fri;

/// Truncates to the start of the current hour.
pub fn start_of_hour(now: DateTime<Local>) -> DateTime<Local> {
    now.with_minute(0)
        .and_then(|t| t.with_second(0))
        .and_then(|t| t.with_nanosecond(0))
        .unwrap_or(now)
}

/// Truncates to the start of the current day (local midnight).
pub fn start_of_day(now: DateTime<Local>) -> DateTime<Local> {
    // Falls back to `now` on DST transitions where midnight is skipped.
    now.with_hour(0)
        .and_then(|t| t.with_minute(0))
        .and_then(|t| t.with_second(0))
        .and_then(|t| t.with_nanosecond(0))
        .unwrap_or(now)
}

/// Truncates to local midnight of the most recent week start.
pub fn start_of_week(now: DateTime<Local>) -> DateTime<Local> {
    let days_back = now.weekday().days_since(WEEK_START) as u64;
    let day = now.checked_sub_days(Days::new(days_back)).unwrap_or(now);
    start_of_day(day)
}

/// Truncates to local midnight of the first day of the current month.
pub fn start_of_month(now: DateTime<Local>) -> DateTime<Local> {
    let first = now.with_day(1).unwrap_or(now);
    start_of_day(first)
}

/// `now` minus N hours.
pub fn hours_ago(now: DateTime<Local>, n: i64) -> DateTime<Local> {
    now - chrono::Duration::hours(n)
}

/// `now` minus N calendar days.
pub fn days_ago(now: DateTime<Local>, n: u64) -> DateTime<Local> {
    now.checked_sub_days(Days::new(n)).unwrap_or(now)
}

/// `now` minus N calendar weeks.
pub fn weeks_ago(now: DateTime<Local>, n: u64) -> DateTime<Local> {
    days_ago(now, n * 7)
}

/// `now` minus N calendar months.
pub fn months_ago(now: DateTime<Local>, n: u32) -> DateTime<Local> {
    now.checked_sub_months(Months::new(n)).unwrap_or(now)
}

/// Floors an epoch-millisecond timestamp to the start of its local hour.
pub fn hour_floor_millis(timestamp_millis: i64) -> i64 {
    match Local.timestamp_millis_opt(timestamp_millis) {
        LocalResult::Single(dt) => start_of_hour(dt).timestamp_millis(),
        // Out-of-range or ambiguous local time: fall back to a UTC hour floor.
        _ => timestamp_millis - timestamp_millis.rem_euclid(3_600_000),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn local(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<Local> {
        Local.with_ymd_and_hms(y, mo, d, h, mi, s).unwrap()
    }

    #[test]
    fn test_start_of_hour_zeroes_smaller_fields() {
        let now = local(2024, 3, 15, 14, 37, 25);
        let anchor = start_of_hour(now);
        assert_eq!(anchor, local(2024, 3, 15, 14, 0, 0));
        assert_eq!(anchor.timestamp_subsec_millis(), 0);
    }

    #[test]
    fn test_start_of_day() {
        let now = local(2024, 3, 15, 14, 37, 25);
        assert_eq!(start_of_day(now), local(2024, 3, 15, 0, 0, 0));
    }

    #[test]
    fn test_start_of_week_on_a_friday_is_today() {
        // 2024-03-15 is a Friday.
        let now = local(2024, 3, 15, 14, 37, 25);
        assert_eq!(start_of_week(now), local(2024, 3, 15, 0, 0, 0));
    }

    #[test]
    fn test_start_of_week_reaches_back_to_friday() {
        // 2024-03-14 is a Thursday; the week began Friday 2024-03-08.
        let now = local(2024, 3, 14, 10, 0, 0);
        assert_eq!(start_of_week(now), local(2024, 3, 8, 0, 0, 0));
    }

    #[test]
    fn test_start_of_month() {
        let now = local(2024, 3, 15, 14, 37, 25);
        assert_eq!(start_of_month(now), local(2024, 3, 1, 0, 0, 0));
    }

    #[test]
    fn test_units_ago_do_not_truncate() {
        let now = local(2024, 3, 15, 14, 37, 25);
        assert_eq!(hours_ago(now, 2).minute(), 37);
        assert_eq!(days_ago(now, 1), local(2024, 3, 14, 14, 37, 25));
        assert_eq!(weeks_ago(now, 2), local(2024, 3, 1, 14, 37, 25));
        assert_eq!(months_ago(now, 1), local(2024, 2, 15, 14, 37, 25));
    }

    #[test]
    fn test_months_ago_clamps_short_months() {
        // One month before March 31 lands on the end of February.
        let now = local(2024, 3, 31, 9, 0, 0);
        assert_eq!(months_ago(now, 1), local(2024, 2, 29, 9, 0, 0));
    }

    #[test]
    fn test_hour_floor_millis_matches_start_of_hour() {
        let now = local(2024, 3, 15, 14, 37, 25);
        assert_eq!(
            hour_floor_millis(now.timestamp_millis()),
            local(2024, 3, 15, 14, 0, 0).timestamp_millis()
        );
    }

    #[test]
    fn test_anchor_ordering() {
        let now = local(2024, 3, 15, 14, 37, 25);
        assert!(start_of_hour(now) <= now);
        assert!(start_of_day(now) <= start_of_hour(now));
        assert!(start_of_week(now) <= start_of_day(now));
        assert!(start_of_month(now) <= start_of_week(now));
        assert!(months_ago(now, 1) < weeks_ago(now, 2));
    }
}
