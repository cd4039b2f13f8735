//! Call filtering.
//!
//! A record passes when its direction is selected, its duration meets
//! the configured minimum (zero disables the check), and its number is
//! permitted by the allowlist. Input order is preserved.

use super::types::{Allowlist, CallRecord, FilterCriteria};

/// Returns true if a single record satisfies all filter predicates.
pub fn passes(record: &CallRecord, criteria: &FilterCriteria, allowlist: &Allowlist) -> bool {
    criteria.allowed_directions.contains(&record.direction)
        && (criteria.min_duration_secs == 0 || record.duration_secs >= criteria.min_duration_secs)
        && allowlist.permits(&record.number)
}

/// Filters raw records by the given criteria and allowlist.
///
/// Preserves input order (the source supplies records descending by
/// timestamp). Empty input yields empty output.
pub fn filter_calls(
    raw: &[CallRecord],
    criteria: &FilterCriteria,
    allowlist: &Allowlist,
) -> Vec<CallRecord> {
    raw.iter()
        .filter(|record| passes(record, criteria, allowlist))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calls::types::Direction;
    use std::collections::BTreeSet;

    fn incoming(ts: i64, number: &str, duration: i64) -> CallRecord {
        CallRecord::new(ts, number, duration, Direction::Incoming)
    }

    fn criteria(min_duration: i64, directions: &[Direction]) -> FilterCriteria {
        FilterCriteria {
            min_duration_secs: min_duration,
            allowed_directions: directions.iter().copied().collect::<BTreeSet<_>>(),
        }
    }

    #[test]
    fn test_empty_input_yields_empty_output() {
        let result = filter_calls(&[], &FilterCriteria::default(), &Allowlist::default());
        assert!(result.is_empty());
    }

    #[test]
    fn test_three_incoming_calls_all_pass() {
        let raw = vec![
            incoming(3_000, "1230", 5),
            incoming(2_000, "1230", 20),
            incoming(1_000, "1230", 45),
        ];
        let c = criteria(0, &[Direction::Incoming]);

        let filtered = filter_calls(&raw, &c, &Allowlist::default());

        assert_eq!(filtered.len(), 3);
        assert_eq!(filtered, raw);
    }

    #[test]
    fn test_direction_mismatch_excluded() {
        let raw = vec![CallRecord::new(1_000, "1230", 30, Direction::Outgoing)];
        let c = criteria(0, &[Direction::Incoming]);

        let filtered = filter_calls(&raw, &c, &Allowlist::default());
        assert!(filtered.is_empty());
    }

    #[test]
    fn test_min_duration_zero_disables_check() {
        let raw = vec![incoming(1_000, "1230", 0)];
        let c = criteria(0, &[Direction::Incoming]);

        assert_eq!(filter_calls(&raw, &c, &Allowlist::default()).len(), 1);
    }

    #[test]
    fn test_min_duration_applied() {
        let raw = vec![
            incoming(3_000, "1230", 5),
            incoming(2_000, "1230", 20),
            incoming(1_000, "1230", 45),
        ];
        let c = criteria(20, &[Direction::Incoming]);

        let filtered = filter_calls(&raw, &c, &Allowlist::default());
        assert_eq!(filtered.len(), 2);
        assert!(filtered.iter().all(|r| r.duration_secs >= 20));
    }

    #[test]
    fn test_allowlist_excludes_regardless_of_other_criteria() {
        let allowlist = Allowlist::from_numbers(["1230"]);
        let raw = vec![
            incoming(2_000, "1230", 60),
            incoming(1_000, "5551234", 60),
        ];
        let c = criteria(0, &[Direction::Incoming]);

        let filtered = filter_calls(&raw, &c, &allowlist);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].number, "1230");
    }

    #[test]
    fn test_output_is_subset_of_input() {
        let raw = vec![
            incoming(3_000, "1230", 5),
            CallRecord::new(2_000, "1230", 20, Direction::Missed),
            CallRecord::new(1_000, "999", 45, Direction::Outgoing),
        ];
        let c = criteria(10, &[Direction::Incoming, Direction::Missed]);

        let filtered = filter_calls(&raw, &c, &Allowlist::from_numbers(["1230"]));
        for record in &filtered {
            assert!(raw.contains(record));
            assert!(passes(record, &c, &Allowlist::from_numbers(["1230"])));
        }
    }

    #[test]
    fn test_idempotent() {
        let raw = vec![
            incoming(4_000, "1230", 5),
            CallRecord::new(3_000, "1230", 90, Direction::Outgoing),
            incoming(2_000, "777", 30),
            incoming(1_000, "1230", 45),
        ];
        let c = criteria(10, &[Direction::Incoming]);
        let allowlist = Allowlist::from_numbers(["1230", "777"]);

        let once = filter_calls(&raw, &c, &allowlist);
        let twice = filter_calls(&once, &c, &allowlist);
        assert_eq!(once, twice);
    }
}
