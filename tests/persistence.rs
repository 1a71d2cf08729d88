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
mod common;

use std::sync::mpsc;

use common::RecordingEngine;
use reelist::{
    events::PlayerEvent,
    import::{ConfigPermissionGate, ImportStage, RequestTicket, ResourcePicker},
    player::{Player, PlayerOptions},
    store::{KeyValueStore, PLAYLIST_KEY, PlaylistStore, SqliteStore},
};

struct OneShotPicker(Option<RequestTicket>);

impl ResourcePicker for OneShotPicker {
    fn pick(&mut self, ticket: RequestTicket) {
        self.0 = Some(ticket);
    }
}

fn identifiers(store: &PlaylistStore) -> Vec<String> {
    store
        .load()
        .entries()
        .iter()
        .map(|entry| entry.identifier().to_string())
        .collect()
}

#[test]
fn appended_entries_survive_reopening_in_order() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("playlist.db");

    {
        let mut store = PlaylistStore::new(Box::new(SqliteStore::open(&path).unwrap()));
        store.append("file:///v/b.mp4").unwrap();
        store.append("file:///v/a.mp4").unwrap();
        store.append("file:///v/c.mp4").unwrap();
    }

    let store = PlaylistStore::new(Box::new(SqliteStore::open(&path).unwrap()));
    assert_eq!(
        identifiers(&store),
        vec!["file:///v/b.mp4", "file:///v/a.mp4", "file:///v/c.mp4"]
    );
    assert_eq!(store.load().current_index(), Some(0));
}

#[test]
fn appending_an_existing_identifier_is_a_no_op() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("playlist.db");

    let mut store = PlaylistStore::new(Box::new(SqliteStore::open(&path).unwrap()));
    store.append("v1").unwrap();
    store.append("v2").unwrap();
    store.append("v1").unwrap();

    assert_eq!(identifiers(&store), vec!["v1", "v2"]);
}

#[test]
fn empty_database_loads_an_empty_playlist() {
    let dir = tempfile::tempdir().unwrap();
    let store = PlaylistStore::new(Box::new(SqliteStore::open(dir.path().join("new.db")).unwrap()));

    let playlist = store.load();
    assert!(playlist.is_empty());
    assert_eq!(playlist.current_index(), None);
}

#[test]
fn duplicate_values_are_stored_once() {
    let dir = tempfile::tempdir().unwrap();
    let mut kv = SqliteStore::open(dir.path().join("kv.db")).unwrap();

    kv.put_strings(PLAYLIST_KEY, &["x".to_string(), "y".to_string(), "x".to_string()])
        .unwrap();

    assert_eq!(kv.get_strings(PLAYLIST_KEY).unwrap(), vec!["x", "y"]);
    assert!(kv.get_strings("other").unwrap().is_empty());
}

#[test]
fn imported_video_is_in_the_playlist_after_restart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("playlist.db");

    {
        let store = PlaylistStore::new(Box::new(SqliteStore::open(&path).unwrap()));
        let mut player = Player::new(store, RecordingEngine::default(), PlayerOptions::default());
        let (tx, _rx) = mpsc::channel::<PlayerEvent>();
        player.start(tx);

        let mut gate = ConfigPermissionGate::new(true);
        let mut picker = OneShotPicker(None);
        let ImportStage::AwaitingSelection(ticket) = player.request_import(&mut gate, &mut picker)
        else {
            panic!("permission was already granted");
        };
        assert_eq!(picker.0, Some(ticket));

        let added = player
            .on_selection(ticket, Some("file:///v/new.mp4".to_string()))
            .unwrap();
        assert_eq!(added.as_deref(), Some("file:///v/new.mp4"));
        player.shutdown();
    }

    let store = PlaylistStore::new(Box::new(SqliteStore::open(&path).unwrap()));
    assert_eq!(identifiers(&store), vec!["file:///v/new.mp4"]);
}
