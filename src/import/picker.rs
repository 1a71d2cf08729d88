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

//! Video discovery for the file picker.
//!
//! This module walks the configured media directories for video files using
//! `WalkDir`, and presents them as a list the user picks from.

use std::path::{Path, PathBuf};

use log::{debug, warn};
use walkdir::WalkDir;

use crate::import::{RequestTicket, ResourcePicker};

const VIDEO_EXTENSIONS: &[&str] = &["mp4", "m4v", "mkv", "webm", "mov", "avi", "3gp", "ts"];

/// Recursively scans directories for video files.
///
/// Unreadable directories and entries are skipped. Identifiers are returned as
/// `file://` URIs, sorted by path.
pub fn scan_media<P: AsRef<Path>>(dirs: &[P]) -> Vec<String> {
    let mut paths: Vec<PathBuf> = Vec::new();

    for dir in dirs {
        let dir = dir.as_ref();
        debug!("Scanning {} for videos", dir.display());

        for entry in WalkDir::new(dir)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.inspect_err(|e| warn!("Skipping entry: {}", e)).ok())
            .filter(|e| e.file_type().is_file())
        {
            if is_video(entry.path()) {
                paths.push(entry.into_path());
            }
        }
    }

    paths.sort();
    paths.dedup();
    paths.iter().map(|path| file_uri(path)).collect()
}

fn is_video(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| VIDEO_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
}

/// Converts a filesystem path into a percent-encoded `file://` URI.
///
/// # Examples
///
/// ```
/// use reelist::import::file_uri;
///
/// assert_eq!(file_uri("/videos/My Clip.mp4"), "file:///videos/My%20Clip.mp4");
/// ```
pub fn file_uri(path: impl AsRef<Path>) -> String {
    let path = path.as_ref();
    let absolute = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());

    let encoded = absolute
        .to_string_lossy()
        .split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/");

    format!("file://{}", encoded)
}

/// A [`ResourcePicker`] offering the videos found in the media directories.
///
/// Picking opens the list; the front end moves the selection and closes it
/// with [`confirm`](FilePicker::confirm) or [`cancel`](FilePicker::cancel).
#[derive(Debug, Default)]
pub struct FilePicker {
    media_dirs: Vec<PathBuf>,
    items: Vec<String>,
    selected: usize,
    active: Option<RequestTicket>,
}

impl FilePicker {
    pub fn new(media_dirs: Vec<PathBuf>) -> Self {
        Self {
            media_dirs,
            ..Default::default()
        }
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    pub fn items(&self) -> &[String] {
        &self.items
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn select_next(&mut self) {
        if !self.items.is_empty() {
            self.selected = (self.selected + 1) % self.items.len();
        }
    }

    pub fn select_previous(&mut self) {
        if !self.items.is_empty() {
            self.selected = self.selected.checked_sub(1).unwrap_or(self.items.len() - 1);
        }
    }

    /// Closes the picker with the highlighted item, or with nothing if there
    /// are no items.
    pub fn confirm(&mut self) -> Option<(RequestTicket, Option<String>)> {
        let ticket = self.active.take()?;
        Some((ticket, self.items.get(self.selected).cloned()))
    }

    /// Closes the picker without a selection.
    pub fn cancel(&mut self) -> Option<(RequestTicket, Option<String>)> {
        self.active.take().map(|ticket| (ticket, None))
    }
}

impl ResourcePicker for FilePicker {
    fn pick(&mut self, ticket: RequestTicket) {
        self.items = scan_media(&self.media_dirs);
        self.selected = 0;
        self.active = Some(ticket);
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    #[test]
    fn recognises_video_extensions() {
        assert!(is_video(Path::new("/a/b.mp4")));
        assert!(is_video(Path::new("/a/b.MKV")));
        assert!(!is_video(Path::new("/a/b.mp3")));
        assert!(!is_video(Path::new("/a/README")));
    }

    #[test]
    fn file_uri_encodes_segments() {
        assert_eq!(file_uri("/v/a b/c#1.mp4"), "file:///v/a%20b/c%231.mp4");
    }

    #[test]
    fn scan_finds_nested_videos() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("nested")).unwrap();
        fs::write(dir.path().join("one.mp4"), b"").unwrap();
        fs::write(dir.path().join("nested").join("two.webm"), b"").unwrap();
        fs::write(dir.path().join("notes.txt"), b"").unwrap();

        let found = scan_media(&[dir.path()]);

        assert_eq!(found.len(), 2);
        assert!(found.iter().any(|uri| uri.ends_with("/one.mp4")));
        assert!(found.iter().any(|uri| uri.ends_with("/nested/two.webm")));
    }

    #[test]
    fn scan_of_missing_directory_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        assert!(scan_media(&[dir.path().join("missing")]).is_empty());
    }

    #[test]
    fn picker_confirms_highlighted_item() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.mp4"), b"").unwrap();
        fs::write(dir.path().join("b.mp4"), b"").unwrap();

        let mut picker = FilePicker::new(vec![dir.path().to_path_buf()]);
        picker.pick(RequestTicket(3));
        assert!(picker.is_active());

        picker.select_next();
        let (ticket, selection) = picker.confirm().unwrap();

        assert_eq!(ticket, RequestTicket(3));
        assert!(selection.unwrap().ends_with("/b.mp4"));
        assert!(!picker.is_active());
    }

    #[test]
    fn picker_selection_wraps() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.mp4"), b"").unwrap();
        fs::write(dir.path().join("b.mp4"), b"").unwrap();

        let mut picker = FilePicker::new(vec![dir.path().to_path_buf()]);
        picker.pick(RequestTicket(1));
        picker.select_previous();
        assert_eq!(picker.selected(), 1);
        picker.select_next();
        assert_eq!(picker.selected(), 0);
    }

    #[test]
    fn empty_picker_confirms_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let mut picker = FilePicker::new(vec![dir.path().to_path_buf()]);
        picker.pick(RequestTicket(1));

        assert_eq!(picker.confirm(), Some((RequestTicket(1), None)));
    }

    #[test]
    fn cancel_closes_without_selection() {
        let mut picker = FilePicker::new(vec![]);
        assert_eq!(picker.cancel(), None);

        picker.pick(RequestTicket(2));
        assert_eq!(picker.cancel(), Some((RequestTicket(2), None)));
    }
}
