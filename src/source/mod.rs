//! Call log sources.
//!
//! A source answers date-range queries over the device call history,
//! returning records sorted descending by timestamp.

pub mod sqlite;

pub use sqlite::SqliteCallLog;

use crate::calls::CallRecord;
use thiserror::Error;

/// Errors raised while fetching from a call log source.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("call log database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("call log unavailable: {0}")]
    Unavailable(String),
}

/// A queryable call history.
pub trait CallLogSource: Send {
    /// Returns all records with `from_millis <= timestamp <= to_millis`,
    /// sorted descending by timestamp.
    fn query(&self, from_millis: i64, to_millis: i64) -> Result<Vec<CallRecord>, SourceError>;
}
