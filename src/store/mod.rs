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

//! Playlist persistence.
//!
//! The playlist is persisted as a list of identifier strings under a single
//! fixed key of a [`KeyValueStore`]. Values are unique per key, so adding an
//! identifier that is already stored changes nothing.
//!
//! # Backends
//!
//! * [`SqliteStore`]: durable, backed by a SQLite database file.
//! * [`MemoryStore`]: process lifetime only, used by tests and as a fallback
//!   when the database cannot be opened.

mod memory;
mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use log::{debug, warn};

use crate::{
    error::StoreError,
    model::{Playlist, VideoEntry},
};

/// Key under which the playlist identifiers are stored.
pub const PLAYLIST_KEY: &str = "videoList";

/// A persistent string-keyed store of string collections.
///
/// Values under a key are unique. Implementations return them in the order
/// they were first added.
pub trait KeyValueStore {
    /// Returns the strings stored under `key`, or an empty list if there are
    /// none.
    fn get_strings(&self, key: &str) -> Result<Vec<String>, StoreError>;

    /// Replaces the strings stored under `key`.
    ///
    /// The write is durable when this returns.
    fn put_strings(&mut self, key: &str, values: &[String]) -> Result<(), StoreError>;
}

/// Round trips the playlist through a [`KeyValueStore`].
pub struct PlaylistStore {
    store: Box<dyn KeyValueStore>,
}

impl PlaylistStore {
    pub fn new(store: Box<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Loads the persisted playlist with the cursor on the first entry.
    ///
    /// An unreadable store is treated as empty; the failure is logged.
    pub fn load(&self) -> Playlist {
        let identifiers = match self.store.get_strings(PLAYLIST_KEY) {
            Ok(identifiers) => identifiers,
            Err(e) => {
                warn!("Failed to read persisted playlist, starting empty: {}", e);
                Vec::new()
            }
        };

        debug!("Loaded {} persisted playlist entries", identifiers.len());

        Playlist::from_entries(identifiers.into_iter().map(VideoEntry::new).collect())
    }

    /// Adds an identifier to the persisted playlist.
    ///
    /// Adding an identifier that is already persisted is a no-op.
    pub fn append(&mut self, identifier: &str) -> Result<(), StoreError> {
        let mut identifiers = self.store.get_strings(PLAYLIST_KEY)?;
        if identifiers.iter().any(|stored| stored == identifier) {
            return Ok(());
        }

        identifiers.push(identifier.to_string());
        self.store.put_strings(PLAYLIST_KEY, &identifiers)
    }
}
