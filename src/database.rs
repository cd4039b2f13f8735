//! SQLite database for persistent settings.
//!
//! Persists the user's filter preferences (minimum duration, allowed
//! directions) and the configurable number allowlist across restarts.

use crate::calls::{Allowlist, Direction, FilterCriteria};
use chrono::Utc;
use rusqlite::{params, Connection, Result as SqlResult};
use std::collections::BTreeSet;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

/// Settings key for the minimum-duration filter, in seconds.
pub const MIN_DURATION_KEY: &str = "min_duration_secs";

/// Settings key for the allowed directions, stored comma-separated.
pub const ALLOWED_DIRECTIONS_KEY: &str = "allowed_directions";

/// Database wrapper with thread-safe connection.
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    /// Opens or creates the settings database at the default location.
    pub fn open() -> SqlResult<Self> {
        let db_path = Self::get_db_path();

        // Ensure parent directory exists
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent).ok();
        }

        tracing::info!(path = ?db_path, "Opening settings database");

        let conn = Connection::open(&db_path)?;

        // Enable WAL mode for better crash safety
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "synchronous", "NORMAL")?;

        let db = Self {
            conn: Arc::new(Mutex::new(conn)),
        };

        db.init_schema()?;

        Ok(db)
    }

    /// Opens an in-memory database (for testing).
    #[cfg(test)]
    pub fn open_in_memory() -> SqlResult<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        db.init_schema()?;
        Ok(db)
    }

    /// Returns the default database path.
    fn get_db_path() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("calltally")
            .join("settings.db")
    }

    /// Initializes the database schema and seeds default settings.
    fn init_schema(&self) -> SqlResult<()> {
        let conn = self.conn.lock().unwrap();

        conn.execute_batch(
            r#"
            -- Filter preferences
            CREATE TABLE IF NOT EXISTS config (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );

            -- Numbers permitted by the filter (empty table = no restriction)
            CREATE TABLE IF NOT EXISTS allowlist (
                number TEXT PRIMARY KEY,
                added_at TEXT NOT NULL
            );
            "#,
        )?;

        // Seed default criteria on first run
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM config", [], |r| r.get(0))?;
        if count == 0 {
            let now = Utc::now().to_rfc3339();
            let defaults = FilterCriteria::default();
            conn.execute(
                "INSERT INTO config (key, value, updated_at) VALUES (?1, ?2, ?3)",
                params![MIN_DURATION_KEY, defaults.min_duration_secs.to_string(), &now],
            )?;
            conn.execute(
                "INSERT INTO config (key, value, updated_at) VALUES (?1, ?2, ?3)",
                params![
                    ALLOWED_DIRECTIONS_KEY,
                    join_directions(&defaults.allowed_directions),
                    &now
                ],
            )?;
            tracing::info!("Seeded default filter settings");
        }

        Ok(())
    }

    // === Config Methods ===

    /// Gets a configuration value by key.
    pub fn get_config(&self, key: &str) -> SqlResult<Option<String>> {
        let conn = self.conn.lock().unwrap();
        match conn.query_row(
            "SELECT value FROM config WHERE key = ?1",
            params![key],
            |row| row.get(0),
        ) {
            Ok(value) => Ok(Some(value)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Sets a configuration value.
    pub fn set_config(&self, key: &str, value: &str) -> SqlResult<()> {
        let conn = self.conn.lock().unwrap();
        let now = Utc::now().to_rfc3339();
        conn.execute(
            "INSERT INTO config (key, value, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET value = ?2, updated_at = ?3",
            params![key, value, &now],
        )?;
        Ok(())
    }

    /// Loads the persisted filter criteria, falling back to defaults for
    /// missing or malformed values.
    pub fn get_criteria(&self) -> SqlResult<FilterCriteria> {
        let defaults = FilterCriteria::default();

        let min_duration_secs = self
            .get_config(MIN_DURATION_KEY)?
            .and_then(|v| v.parse::<i64>().ok())
            .unwrap_or(defaults.min_duration_secs);

        let allowed_directions = match self.get_config(ALLOWED_DIRECTIONS_KEY)? {
            Some(stored) => {
                let parsed: BTreeSet<Direction> = stored
                    .split(',')
                    .filter_map(|name| Direction::from_name(name.trim()))
                    .collect();
                if parsed.is_empty() {
                    defaults.allowed_directions
                } else {
                    parsed
                }
            }
            None => defaults.allowed_directions,
        };

        Ok(FilterCriteria {
            min_duration_secs,
            allowed_directions,
        })
    }

    /// Persists the filter criteria.
    pub fn set_criteria(&self, criteria: &FilterCriteria) -> SqlResult<()> {
        self.set_config(MIN_DURATION_KEY, &criteria.min_duration_secs.to_string())?;
        self.set_config(
            ALLOWED_DIRECTIONS_KEY,
            &join_directions(&criteria.allowed_directions),
        )?;
        Ok(())
    }

    // === Allowlist Methods ===

    /// Loads the configured number allowlist.
    pub fn get_allowlist(&self) -> SqlResult<Allowlist> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare("SELECT number FROM allowlist ORDER BY number")?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
        let numbers: Vec<String> = rows.collect::<SqlResult<_>>()?;
        Ok(Allowlist::from_numbers(numbers))
    }

    /// Replaces the allowlist wholesale.
    pub fn set_allowlist(&self, allowlist: &Allowlist) -> SqlResult<()> {
        let mut conn = self.conn.lock().unwrap();
        let tx = conn.transaction()?;
        tx.execute("DELETE FROM allowlist", [])?;
        let now = Utc::now().to_rfc3339();
        for number in allowlist.numbers() {
            tx.execute(
                "INSERT INTO allowlist (number, added_at) VALUES (?1, ?2)",
                params![number, &now],
            )?;
        }
        tx.commit()
    }
}

fn join_directions(directions: &BTreeSet<Direction>) -> String {
    directions
        .iter()
        .map(|d| d.as_str())
        .collect::<Vec<_>>()
        .join(",")
}
