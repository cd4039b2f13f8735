//! SQLite-backed call log source.
//!
//! Reads a call-history database with the conventional schema
//! `calls (date, number, duration, type)`: epoch milliseconds, number
//! text, duration in seconds, and an integer type code (1 = incoming,
//! 2 = outgoing, anything else = missed).

use super::{CallLogSource, SourceError};
use crate::calls::{CallRecord, Direction};
use rusqlite::{params, Connection, OpenFlags};
use std::path::Path;

/// Rows fetched per page while accumulating one query's results.
const PAGE_SIZE: usize = 512;

/// Call log source reading from a SQLite database file.
pub struct SqliteCallLog {
    conn: Connection,
}

impl SqliteCallLog {
    /// Opens the call log read-only.
    ///
    /// The file is opened fresh for each refresh cycle by the poller,
    /// so a log that appears later (or becomes unreadable) is picked up
    /// on the next cycle without restart.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, SourceError> {
        let conn = Connection::open_with_flags(
            path.as_ref(),
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        Ok(Self { conn })
    }

    /// Opens an in-memory call log with the schema created (for testing).
    #[cfg(test)]
    pub fn open_in_memory() -> Result<Self, SourceError> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(
            "CREATE TABLE calls (
                date INTEGER NOT NULL,
                number TEXT NOT NULL,
                duration INTEGER NOT NULL DEFAULT 0,
                type INTEGER NOT NULL
            );",
        )?;
        Ok(Self { conn })
    }

    #[cfg(test)]
    pub fn insert(&self, date: i64, number: &str, duration: i64, type_code: i64) {
        self.conn
            .execute(
                "INSERT INTO calls (date, number, duration, type) VALUES (?1, ?2, ?3, ?4)",
                params![date, number, duration, type_code],
            )
            .unwrap();
    }
}

impl CallLogSource for SqliteCallLog {
    fn query(&self, from_millis: i64, to_millis: i64) -> Result<Vec<CallRecord>, SourceError> {
        let mut stmt = self.conn.prepare(
            "SELECT date, number, duration, type FROM calls
             WHERE date >= ?1 AND date <= ?2
             ORDER BY date DESC
             LIMIT ?3 OFFSET ?4",
        )?;

        // Accumulate page by page within this one fetch.
        let mut records = Vec::new();
        let mut offset: usize = 0;
        loop {
            let rows = stmt.query_map(
                params![from_millis, to_millis, PAGE_SIZE as i64, offset as i64],
                |row| {
                    Ok(CallRecord {
                        timestamp_millis: row.get(0)?,
                        number: row.get(1)?,
                        duration_secs: row.get(2)?,
                        direction: Direction::from_type_code(row.get(3)?),
                    })
                },
            )?;

            let before = records.len();
            for row in rows {
                records.push(row?);
            }
            let fetched = records.len() - before;
            if fetched < PAGE_SIZE {
                break;
            }
            offset += fetched;
        }

        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_sorted_descending() {
        let log = SqliteCallLog::open_in_memory().unwrap();
        log.insert(1_000, "1230", 10, 1);
        log.insert(3_000, "1230", 30, 1);
        log.insert(2_000, "1230", 20, 2);

        let records = log.query(0, 10_000).unwrap();

        assert_eq!(records.len(), 3);
        assert_eq!(records[0].timestamp_millis, 3_000);
        assert_eq!(records[1].timestamp_millis, 2_000);
        assert_eq!(records[2].timestamp_millis, 1_000);
    }

    #[test]
    fn test_query_respects_date_range() {
        let log = SqliteCallLog::open_in_memory().unwrap();
        log.insert(1_000, "1230", 10, 1);
        log.insert(2_000, "1230", 20, 1);
        log.insert(3_000, "1230", 30, 1);

        let records = log.query(2_000, 2_500).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].timestamp_millis, 2_000);
    }

    #[test]
    fn test_type_code_mapping() {
        let log = SqliteCallLog::open_in_memory().unwrap();
        log.insert(3_000, "a", 1, 1);
        log.insert(2_000, "b", 1, 2);
        log.insert(1_000, "c", 1, 7);

        let records = log.query(0, 10_000).unwrap();
        assert_eq!(records[0].direction, Direction::Incoming);
        assert_eq!(records[1].direction, Direction::Outgoing);
        assert_eq!(records[2].direction, Direction::Missed);
    }

    #[test]
    fn test_paging_accumulates_all_rows() {
        let log = SqliteCallLog::open_in_memory().unwrap();
        let total = PAGE_SIZE * 2 + 17;
        for i in 0..total {
            log.insert(i as i64, "1230", 5, 1);
        }

        let records = log.query(0, total as i64).unwrap();
        assert_eq!(records.len(), total);
    }

    #[test]
    fn test_open_missing_file_is_an_error() {
        let result = SqliteCallLog::open("/nonexistent/path/calllog.db");
        assert!(result.is_err());
    }
}
