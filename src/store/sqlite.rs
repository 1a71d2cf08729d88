// Copyright (C) 2026  Caprica Software Limited
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! SQLite backed key-value store.
//!
//! # Tables
//!
//! * `string_sets` - One row per stored value, unique per key, with the
//!   position it was added at so that reads return values in insertion order.

use std::path::Path;

use log::info;
use rusqlite::{Connection, params};

use crate::{error::StoreError, store::KeyValueStore};

pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Opens a connection to the SQLite database and ensures the schema exists.
    ///
    /// This function performs the following setup:
    /// * **WAL Mode**: Enables Write-Ahead Logging.
    /// * **Durability**: Sets synchronous mode to `FULL`, every committed write
    ///   is on disk before the call that made it returns.
    /// * **Schema**: Executes [`create_schema`] to ensure the table exists.
    ///
    /// # Arguments
    ///
    /// * `path` - The file system path to the SQLite database file.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// * The database file cannot be opened.
    /// * The initial PRAGMA configurations fail.
    /// * The schema initialization fails.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        let conn = Connection::open(path)?;

        let journal_mode: String = conn.query_row("PRAGMA journal_mode = WAL", [], |r| r.get(0))?;
        if journal_mode != "wal" {
            return Err(StoreError::Unavailable(format!(
                "Failed to switch to WAL mode. Current mode: {}",
                journal_mode
            )));
        }

        conn.execute_batch("PRAGMA synchronous = FULL;")?;
        conn.set_prepared_statement_cache_capacity(16);

        create_schema(&conn)?;

        info!("Opened playlist database {}", path.display());

        Ok(Self { conn })
    }
}

/// Create the database schema.
///
/// This operation is wrapped in a single SQL transaction to ensure the schema
/// is updated atomically.
fn create_schema(conn: &Connection) -> Result<(), StoreError> {
    conn.execute_batch(
        "BEGIN;

        CREATE TABLE IF NOT EXISTS string_sets (
            key TEXT NOT NULL,
            position INTEGER NOT NULL,
            value TEXT NOT NULL,
            UNIQUE (key, value)
        );

        CREATE INDEX IF NOT EXISTS idx_string_sets_key ON string_sets (key, position);

        COMMIT;",
    )?;

    Ok(())
}

impl KeyValueStore for SqliteStore {
    fn get_strings(&self, key: &str) -> Result<Vec<String>, StoreError> {
        let mut stmt = self
            .conn
            .prepare_cached("SELECT value FROM string_sets WHERE key = ? ORDER BY position")?;
        let results = stmt
            .query_map([key], |row| row.get(0))?
            .collect::<Result<Vec<String>, _>>()?;

        Ok(results)
    }

    fn put_strings(&mut self, key: &str, values: &[String]) -> Result<(), StoreError> {
        let tx = self.conn.transaction()?;

        tx.execute("DELETE FROM string_sets WHERE key = ?", [key])?;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT OR IGNORE INTO string_sets (key, position, value) VALUES (?1, ?2, ?3)",
            )?;
            for (position, value) in values.iter().enumerate() {
                stmt.execute(params![key, position as i64, value])?;
            }
        }

        tx.commit()?;

        Ok(())
    }
}
