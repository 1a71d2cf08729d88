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

//! Domain models and core data structures.
//!
//! This module defines the playlist entities: a [`VideoEntry`] naming a
//! playable resource, and the [`Playlist`] holding entries together with the
//! cursor used for sequential playback.

use serde::{Deserialize, Serialize};

/// Display name used when an identifier has no usable last path segment.
pub const UNKNOWN_NAME: &str = "unknown";

/// A playable video resource.
///
/// The identifier is the string form of a content or file URI and never
/// changes once the entry exists. The display name is derived from it and is
/// not persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoEntry {
    identifier: String,
    display_name: String,
}

impl VideoEntry {
    pub fn new(identifier: impl Into<String>) -> Self {
        let identifier = identifier.into();
        let display_name = display_name(&identifier);
        Self {
            identifier,
            display_name,
        }
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }
}

/// Derives a display name from the last path segment of an identifier.
///
/// Any scheme and authority (`file://`, `content://media`) are skipped, as are
/// a query string and fragment. Percent-encoded segments are decoded.
///
/// # Examples
///
/// ```
/// use reelist::model::display_name;
///
/// assert_eq!(display_name("file:///videos/My%20Clip.mp4"), "My Clip.mp4");
/// assert_eq!(display_name("content://media/external/video/media/42"), "42");
/// assert_eq!(display_name(""), "unknown");
/// ```
pub fn display_name(identifier: &str) -> String {
    let without_suffix = identifier
        .split(['?', '#'])
        .next()
        .unwrap_or_default();

    let path = match without_suffix.split_once("://") {
        // The authority is the first segment after the scheme, not a path segment.
        Some((_, rest)) => rest.split_once('/').map(|(_, path)| path).unwrap_or(""),
        None => without_suffix,
    };

    match path.rsplit('/').find(|segment| !segment.is_empty()) {
        Some(segment) => urlencoding::decode(segment)
            .map(|decoded| decoded.into_owned())
            .unwrap_or_else(|_| segment.to_string()),
        None => UNKNOWN_NAME.to_string(),
    }
}

/// An ordered collection of entries plus the current-position cursor.
///
/// The cursor is `Some` exactly when the playlist has entries, and then always
/// indexes a valid entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Playlist {
    entries: Vec<VideoEntry>,
    current_index: Option<usize>,
}

impl Playlist {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a playlist whose cursor is on the first entry, if there is one.
    pub fn from_entries(entries: Vec<VideoEntry>) -> Self {
        let current_index = if entries.is_empty() { None } else { Some(0) };
        Self {
            entries,
            current_index,
        }
    }

    pub fn entries(&self) -> &[VideoEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current_index
    }

    pub fn current(&self) -> Option<&VideoEntry> {
        self.current_index.and_then(|index| self.entries.get(index))
    }

    /// Appends an entry and moves the cursor onto it.
    pub(crate) fn push(&mut self, entry: VideoEntry) {
        self.entries.push(entry);
        self.current_index = Some(self.entries.len() - 1);
    }

    /// Moves the cursor, returning `false` when `index` is out of range.
    pub(crate) fn set_current_index(&mut self, index: usize) -> bool {
        if index < self.entries.len() {
            self.current_index = Some(index);
            true
        } else {
            false
        }
    }

    pub fn position_of(&self, identifier: &str) -> Option<usize> {
        self.entries
            .iter()
            .position(|entry| entry.identifier() == identifier)
    }
}

/// State captured when the application suspends, used to resume playback on
/// the next start.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub position_millis: u64,
    pub is_playing: bool,
    pub current_index: usize,
    pub current_identifier: String,
}
