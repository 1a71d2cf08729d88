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

//! Application state and the main event loop.
//!
//! Every event, whether a key press, an engine signal or a progress tick,
//! arrives on one channel and is processed here, on the main thread, before
//! the UI is redrawn. Nothing else touches the [`Player`].

use std::{
    fs,
    io::Stdout,
    sync::mpsc::{self, Receiver, Sender},
};

use anyhow::Result;
use crossterm::event::KeyEvent;
use log::{info, warn};
use ratatui::{Terminal, prelude::CrosstermBackend};
use reelist::{
    config::{self, AppConfig},
    error::{PlayerError, Result as PlayerResult},
    events::PlayerEvent,
    import::{ConfigPermissionGate, FilePicker, PermissionGate},
    playback::mpv_engine::MpvEngine,
    player::Player,
    store::{KeyValueStore, MemoryStore, PlaylistStore, SqliteStore},
};

use crate::{keys::process_key_event, render::draw, theme::Theme};

#[derive(Debug)]
pub(crate) enum AppEvent {
    Key(KeyEvent),
    Player(PlayerEvent),
    ExitApplication,
}

impl From<PlayerEvent> for AppEvent {
    fn from(event: PlayerEvent) -> Self {
        AppEvent::Player(event)
    }
}

/// Application state.
pub(crate) struct App {
    pub config: AppConfig,
    pub theme: Theme,

    pub event_tx: Sender<AppEvent>,
    pub event_rx: Receiver<AppEvent>,

    pub player: Player<MpvEngine>,
    pub gate: ConfigPermissionGate,
    pub picker: FilePicker,

    /// The playlist row the cursor keys move.
    pub highlighted: usize,
    /// The latest message for the status line.
    pub notice: Option<String>,
}

impl App {
    pub fn new(config: AppConfig) -> Self {
        let (event_tx, event_rx) = mpsc::channel();

        let engine = MpvEngine::new(event_tx.clone());
        let store = PlaylistStore::new(open_store(&config));
        let player = Player::new(store, engine, config.player_options());

        let gate = ConfigPermissionGate::new(config.storage_access_granted);
        let picker = FilePicker::new(config.media_dirs());

        Self {
            config,
            theme: Theme::default(),
            event_tx,
            event_rx,
            player,
            gate,
            picker,
            highlighted: 0,
            notice: None,
        }
    }

    /// Loads the playlist, starts the ticker and resumes the last session.
    pub fn start(&mut self) {
        self.player.start(self.event_tx.clone());

        let snapshot = if self.config.resume_session {
            config::load_session()
        } else {
            None
        };

        let result = self.player.resume(snapshot);
        self.report(result);
        self.follow_current();
    }

    /// Saves the session and config, then releases the player.
    pub fn shutdown(&mut self) {
        if let Some(snapshot) = self.player.snapshot() {
            if let Err(e) = config::save_session(&snapshot) {
                warn!("Failed to save session: {}", e);
            }
        }

        self.player.shutdown();

        self.config.storage_access_granted = self.gate.is_granted();
        if let Err(e) = config::save_config(&self.config) {
            warn!("Failed to save config: {}", e);
        }
    }

    /// Shows a failed operation on the status line.
    pub fn report<T>(&mut self, result: PlayerResult<T>) {
        match result {
            Ok(_) => {}
            Err(e) if e.is_silent() => {}
            Err(e) => {
                warn!("{}", e);
                self.notice = Some(notice_for(&e));
            }
        }
    }

    /// Moves the highlighted row to the current entry.
    pub fn follow_current(&mut self) {
        if let Some(index) = self.player.playlist().current_index() {
            self.highlighted = index;
        }
    }
}

fn notice_for(error: &PlayerError) -> String {
    match error {
        PlayerError::PermissionDenied => {
            "Storage permission denied, videos cannot be added".to_string()
        }
        PlayerError::PersistenceFailure(_) => {
            "Video added, but the playlist could not be saved".to_string()
        }
        e => e.to_string(),
    }
}

fn open_store(config: &AppConfig) -> Box<dyn KeyValueStore> {
    let path = config::data_path(&config.database_file);
    if let Some(dir) = path.parent() {
        if let Err(e) = fs::create_dir_all(dir) {
            warn!("Failed to create {}: {}", dir.display(), e);
        }
    }

    match SqliteStore::open(&path) {
        Ok(store) => {
            info!("Using playlist database {}", path.display());
            Box::new(store)
        }
        Err(e) => {
            warn!(
                "Failed to open {}, the playlist will not be saved: {}",
                path.display(),
                e
            );
            Box::new(MemoryStore::new())
        }
    }
}

/// Runs the main application loop, handling events and rendering the UI in the
/// terminal.
///
/// This function loops until an exit event is received or the event channel
/// is closed.
pub(crate) fn process_events(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    app: &mut App,
) -> Result<()> {
    terminal.draw(|f| draw(f, app))?;

    while let Ok(event) = app.event_rx.recv() {
        match event {
            AppEvent::ExitApplication => break,
            AppEvent::Key(key) => process_key_event(app, key)?,
            AppEvent::Player(event) => {
                let is_tick = matches!(event, PlayerEvent::Tick(_));
                let result = app.player.handle_event(event);
                app.report(result);
                if !is_tick {
                    app.follow_current();
                }
            }
        }

        // Render after every event processed
        terminal.draw(|f| draw(f, app))?;
    }

    Ok(())
}
