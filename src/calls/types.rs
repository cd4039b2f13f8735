//! Data types for call history analysis.
//!
//! Defines the core data structures for call records, filter criteria,
//! recency buckets, and summary statistics.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Classification of a call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Incoming,
    Outgoing,
    Missed,
}

impl Direction {
    /// Maps a raw call-log type code to a direction.
    ///
    /// Codes follow the usual call-log convention (1 = incoming,
    /// 2 = outgoing); any unrecognized code is treated as missed.
    pub fn from_type_code(code: i64) -> Self {
        match code {
            1 => Direction::Incoming,
            2 => Direction::Outgoing,
            _ => Direction::Missed,
        }
    }

    /// Stable lowercase name used in the settings database.
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Incoming => "incoming",
            Direction::Outgoing => "outgoing",
            Direction::Missed => "missed",
        }
    }

    /// Parses a stored name back into a direction.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "incoming" => Some(Direction::Incoming),
            "outgoing" => Some(Direction::Outgoing),
            "missed" => Some(Direction::Missed),
            _ => None,
        }
    }
}

/// A single entry from the call history.
///
/// Immutable once built from a source row. Identity is positional;
/// duplicates are permitted and not collapsed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallRecord {
    /// When the call happened, in milliseconds since the Unix epoch.
    pub timestamp_millis: i64,

    /// The remote phone number as stored in the log.
    pub number: String,

    /// Call duration in seconds.
    pub duration_secs: i64,

    /// Incoming, outgoing, or missed.
    pub direction: Direction,
}

impl CallRecord {
    /// Creates a record from raw source fields.
    pub fn new(timestamp_millis: i64, number: impl Into<String>, duration_secs: i64, direction: Direction) -> Self {
        Self {
            timestamp_millis,
            number: number.into(),
            duration_secs,
            direction,
        }
    }
}

/// User-selected filter criteria.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterCriteria {
    /// Minimum duration in seconds. Zero disables the duration check.
    pub min_duration_secs: i64,

    /// Directions that pass the filter.
    pub allowed_directions: BTreeSet<Direction>,
}

impl Default for FilterCriteria {
    fn default() -> Self {
        Self {
            min_duration_secs: 0,
            allowed_directions: BTreeSet::from([Direction::Incoming]),
        }
    }
}

/// Set of phone numbers permitted to pass the filter.
///
/// An empty allowlist places no restriction on numbers; a non-empty
/// allowlist excludes every number not in it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Allowlist {
    numbers: BTreeSet<String>,
}

impl Allowlist {
    /// Builds an allowlist from a set of numbers.
    pub fn from_numbers<I>(numbers: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        Self {
            numbers: numbers.into_iter().map(Into::into).collect(),
        }
    }

    /// Returns true if the number passes this allowlist.
    pub fn permits(&self, number: &str) -> bool {
        self.numbers.is_empty() || self.numbers.contains(number)
    }

    /// True when no restriction is configured.
    pub fn is_unrestricted(&self) -> bool {
        self.numbers.is_empty()
    }

    /// The configured numbers.
    pub fn numbers(&self) -> &BTreeSet<String> {
        &self.numbers
    }
}

/// Names of the fixed recency windows, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WindowLabel {
    StartOfHour,
    LastHour,
    LastTwoHours,
    StartOfDay,
    LastDay,
    LastTwoDays,
    StartOfWeek,
    LastWeek,
    LastTwoWeeks,
    StartOfMonth,
    LastMonth,
}

impl WindowLabel {
    /// All window labels in display order.
    pub const ALL: [WindowLabel; 11] = [
        WindowLabel::StartOfHour,
        WindowLabel::LastHour,
        WindowLabel::LastTwoHours,
        WindowLabel::StartOfDay,
        WindowLabel::LastDay,
        WindowLabel::LastTwoDays,
        WindowLabel::StartOfWeek,
        WindowLabel::LastWeek,
        WindowLabel::LastTwoWeeks,
        WindowLabel::StartOfMonth,
        WindowLabel::LastMonth,
    ];
}

/// Count of filtered records at or after a named recency boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindowBucket {
    /// Which window this bucket represents.
    pub label: WindowLabel,

    /// The window's start boundary in milliseconds since the epoch.
    pub anchor_millis: i64,

    /// Number of filtered records with `timestamp_millis >= anchor_millis`.
    pub count: usize,
}

/// Windows used for the per-window duration totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TotalsWindow {
    Hour,
    Day,
    Week,
    Month,
}

/// Aggregate figures over the filtered call list.
///
/// Only well-defined for a non-empty filtered list; recomputed
/// wholesale on every refresh, never updated incrementally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryStatistics {
    /// The record with the maximum duration (ties: first in input order).
    pub longest_call: CallRecord,

    /// Hour-aligned start of the hour containing the most records.
    pub busiest_hour_start_millis: i64,

    /// Total duration of records at or after each window start.
    pub total_duration_secs: BTreeMap<TotalsWindow, i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_from_type_code() {
        assert_eq!(Direction::from_type_code(1), Direction::Incoming);
        assert_eq!(Direction::from_type_code(2), Direction::Outgoing);
        assert_eq!(Direction::from_type_code(3), Direction::Missed);
        assert_eq!(Direction::from_type_code(0), Direction::Missed);
        assert_eq!(Direction::from_type_code(99), Direction::Missed);
    }

    #[test]
    fn test_direction_name_round_trip() {
        for d in [Direction::Incoming, Direction::Outgoing, Direction::Missed] {
            assert_eq!(Direction::from_name(d.as_str()), Some(d));
        }
        assert_eq!(Direction::from_name("unknown"), None);
    }

    #[test]
    fn test_criteria_default() {
        let criteria = FilterCriteria::default();
        assert_eq!(criteria.min_duration_secs, 0);
        assert!(criteria.allowed_directions.contains(&Direction::Incoming));
        assert_eq!(criteria.allowed_directions.len(), 1);
    }

    #[test]
    fn test_allowlist_empty_permits_everything() {
        let allowlist = Allowlist::default();
        assert!(allowlist.is_unrestricted());
        assert!(allowlist.permits("0533131310"));
        assert!(allowlist.permits(""));
    }

    #[test]
    fn test_allowlist_restricted() {
        let allowlist = Allowlist::from_numbers(["1230", "0533131310"]);
        assert!(!allowlist.is_unrestricted());
        assert!(allowlist.permits("1230"));
        assert!(!allowlist.permits("5551234"));
    }

    #[test]
    fn test_serialization() {
        let record = CallRecord::new(1_700_000_000_000, "1230", 45, Direction::Incoming);
        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains("\"incoming\""));
        assert!(json.contains("1230"));

        let back: CallRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
    }
}
