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

//! Playlist management.
//!
//! This module provides the in-memory playlist and its cursor, with wraparound
//! navigation and the single mutation path used by imports.

use log::{info, warn};

use crate::{
    error::{PlayerError, Result, StoreError},
    model::{Playlist, VideoEntry},
    store::PlaylistStore,
};

pub struct PlaylistController {
    store: PlaylistStore,
    playlist: Playlist,
}

impl PlaylistController {
    /// Creates a controller with an empty playlist; call [`initialize`] to
    /// populate it from the store.
    ///
    /// [`initialize`]: PlaylistController::initialize
    pub fn new(store: PlaylistStore) -> Self {
        Self {
            store,
            playlist: Playlist::new(),
        }
    }

    /// Replaces the in-memory playlist with the persisted one.
    pub fn initialize(&mut self) {
        self.playlist = self.store.load();
        info!("Playlist initialised with {} entries", self.playlist.len());
    }

    pub fn playlist(&self) -> &Playlist {
        &self.playlist
    }

    pub fn entries(&self) -> &[VideoEntry] {
        self.playlist.entries()
    }

    pub fn current_index(&self) -> Option<usize> {
        self.playlist.current_index()
    }

    pub fn current(&self) -> Option<&VideoEntry> {
        self.playlist.current()
    }

    /// Moves the cursor forward, wrapping past the last entry to the first.
    pub fn next(&mut self) -> Result<&VideoEntry> {
        let len = self.playlist.len();
        let index = self.playlist.current_index().ok_or(PlayerError::EmptyPlaylist)?;
        self.move_to((index + 1) % len)
    }

    /// Moves the cursor back, wrapping before the first entry to the last.
    pub fn previous(&mut self) -> Result<&VideoEntry> {
        let len = self.playlist.len();
        let index = self.playlist.current_index().ok_or(PlayerError::EmptyPlaylist)?;
        self.move_to(if index == 0 { len - 1 } else { index - 1 })
    }

    /// Moves the cursor to a specific entry.
    pub fn select(&mut self, index: usize) -> Result<&VideoEntry> {
        if self.playlist.is_empty() {
            return Err(PlayerError::EmptyPlaylist);
        }
        self.move_to(index)
    }

    /// Appends a new entry, persists it and makes it current.
    ///
    /// The in-memory playlist is authoritative: the entry is added and becomes
    /// current even when persisting it fails, in which case the store error is
    /// returned for the caller to report.
    pub fn add_entry(&mut self, identifier: &str) -> std::result::Result<(), StoreError> {
        self.playlist.push(VideoEntry::new(identifier));
        info!("Added {} to the playlist", identifier);

        self.store.append(identifier).inspect_err(|e| {
            warn!("Failed to persist {}: {}", identifier, e);
        })
    }

    fn move_to(&mut self, index: usize) -> Result<&VideoEntry> {
        if !self.playlist.set_current_index(index) {
            // Out of range against a non-empty list; leave the cursor where it was.
            warn!("Ignoring cursor move to {} of {}", index, self.playlist.len());
        }
        self.playlist.current().ok_or(PlayerError::EmptyPlaylist)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{KeyValueStore, MemoryStore, PLAYLIST_KEY};

    fn controller_with(identifiers: &[&str]) -> PlaylistController {
        let mut kv = MemoryStore::new();
        let values: Vec<String> = identifiers.iter().map(|s| s.to_string()).collect();
        kv.put_strings(PLAYLIST_KEY, &values).unwrap();

        let mut controller = PlaylistController::new(PlaylistStore::new(Box::new(kv)));
        controller.initialize();
        controller
    }

    fn current_id(controller: &PlaylistController) -> Option<&str> {
        controller.current().map(VideoEntry::identifier)
    }

    #[test]
    fn initialize_puts_cursor_on_first_entry() {
        let controller = controller_with(&["v1", "v2"]);
        assert_eq!(controller.current_index(), Some(0));
        assert_eq!(current_id(&controller), Some("v1"));
    }

    #[test]
    fn next_wraps_to_first_entry() {
        let mut controller = controller_with(&["v1", "v2", "v3"]);
        controller.select(2).unwrap();

        assert_eq!(controller.next().unwrap().identifier(), "v1");
        assert_eq!(controller.current_index(), Some(0));
    }

    #[test]
    fn previous_wraps_to_last_entry() {
        let mut controller = controller_with(&["v1", "v2", "v3"]);

        assert_eq!(controller.previous().unwrap().identifier(), "v3");
        assert_eq!(controller.current_index(), Some(2));
    }

    #[test]
    fn next_cycles_back_to_start() {
        for len in 1..6 {
            let ids: Vec<String> = (0..len).map(|i| format!("v{}", i)).collect();
            let refs: Vec<&str> = ids.iter().map(String::as_str).collect();

            for start in 0..len {
                let mut controller = controller_with(&refs);
                controller.select(start).unwrap();
                for _ in 0..len {
                    controller.next().unwrap();
                }
                assert_eq!(controller.current_index(), Some(start));
            }
        }
    }

    #[test]
    fn previous_undoes_next() {
        let mut controller = controller_with(&["v1", "v2", "v3", "v4"]);
        for start in 0..4 {
            controller.select(start).unwrap();
            controller.next().unwrap();
            controller.previous().unwrap();
            assert_eq!(controller.current_index(), Some(start));

            controller.previous().unwrap();
            controller.next().unwrap();
            assert_eq!(controller.current_index(), Some(start));
        }
    }

    #[test]
    fn navigation_on_empty_playlist_signals_empty() {
        let mut controller = controller_with(&[]);

        assert!(matches!(controller.next(), Err(PlayerError::EmptyPlaylist)));
        assert!(matches!(controller.previous(), Err(PlayerError::EmptyPlaylist)));
        assert!(matches!(controller.select(0), Err(PlayerError::EmptyPlaylist)));
        assert_eq!(controller.current_index(), None);
        assert!(controller.current().is_none());
    }

    #[test]
    fn add_entry_becomes_current() {
        let mut controller = controller_with(&["v1", "v2", "v3"]);
        controller.select(1).unwrap();

        controller.add_entry("v4").unwrap();

        assert_eq!(controller.entries().len(), 4);
        assert_eq!(controller.current_index(), Some(3));
        assert_eq!(current_id(&controller), Some("v4"));
    }

    #[test]
    fn add_entry_allows_duplicates_in_memory() {
        let mut controller = controller_with(&["v1"]);
        controller.add_entry("v1").unwrap();

        assert_eq!(controller.entries().len(), 2);
        assert_eq!(controller.current_index(), Some(1));
    }

    #[test]
    fn add_entry_to_empty_playlist() {
        let mut controller = controller_with(&[]);
        controller.add_entry("v1").unwrap();

        assert_eq!(controller.current_index(), Some(0));
        assert_eq!(current_id(&controller), Some("v1"));
    }

    #[test]
    fn select_out_of_range_keeps_cursor() {
        let mut controller = controller_with(&["v1", "v2"]);
        controller.select(1).unwrap();

        assert_eq!(controller.select(7).unwrap().identifier(), "v2");
    }
}
