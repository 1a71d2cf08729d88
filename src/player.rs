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

//! The playlist player.
//!
//! [`Player`] owns the playlist, the playback session, the progress ticker and
//! the import flow, and is the only thing that mutates them. Front ends call
//! its transport methods and feed it the [`PlayerEvent`]s produced by the
//! engine and ticker threads; all of this happens on one thread.
//!
//! # Lifecycle
//!
//! 1. [`Player::new`] wires the parts together.
//! 2. [`Player::start`] loads the persisted playlist and starts the ticker.
//! 3. [`Player::resume`] restores the previous session, or loads the current
//!    entry.
//! 4. [`Player::shutdown`] stops the ticker and tears down the session.

use std::{sync::mpsc::Sender, time::Duration};

use log::{debug, info, warn};

use crate::{
    error::{PlayerError, Result},
    events::PlayerEvent,
    import::{ImportFlow, ImportStage, PermissionGate, RequestTicket, ResourcePicker},
    model::{Playlist, SessionSnapshot, VideoEntry},
    playback::{EngineEvent, LoadTicket, MediaEngine, PlaybackSession, PlaybackState},
    playlist::PlaylistController,
    store::PlaylistStore,
    ticker::{DEFAULT_TICK_INTERVAL, ProgressTicker},
};

#[derive(Debug, Clone)]
pub struct PlayerOptions {
    pub tick_interval: Duration,
    /// Move on to the next entry when a video plays to its end.
    pub auto_advance: bool,
}

impl Default for PlayerOptions {
    fn default() -> Self {
        Self {
            tick_interval: DEFAULT_TICK_INTERVAL,
            auto_advance: false,
        }
    }
}

/// The last known playback position and duration, in milliseconds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Progress {
    pub position_millis: u64,
    pub duration_millis: u64,
}

/// What to do once a restored entry is ready.
#[derive(Debug)]
struct PendingRestore {
    ticket: LoadTicket,
    position_millis: u64,
    resume: bool,
}

pub struct Player<E: MediaEngine> {
    playlist: PlaylistController,
    session: PlaybackSession<E>,
    ticker: ProgressTicker,
    import: ImportFlow,
    progress: Progress,
    pending_restore: Option<PendingRestore>,
    options: PlayerOptions,
}

impl<E: MediaEngine> Player<E> {
    pub fn new(store: PlaylistStore, engine: E, options: PlayerOptions) -> Self {
        Self {
            playlist: PlaylistController::new(store),
            session: PlaybackSession::new(engine),
            ticker: ProgressTicker::new(),
            import: ImportFlow::new(),
            progress: Progress::default(),
            pending_restore: None,
            options,
        }
    }

    /// Loads the persisted playlist and starts progress sampling.
    ///
    /// # Arguments
    ///
    /// * `event_tx` - The channel ticks are sent on; the receiving end must
    ///   pass them back to [`handle_event`](Player::handle_event).
    pub fn start<T>(&mut self, event_tx: Sender<T>)
    where
        T: From<PlayerEvent> + Send + 'static,
    {
        self.playlist.initialize();
        self.ticker.start(self.options.tick_interval, event_tx);
    }

    /// Picks up where the last session left off.
    ///
    /// With a snapshot, the identified entry is reloaded and, once ready,
    /// seeked and paused or resumed as it was. Without one, the current entry
    /// (if any) is loaded and plays when ready.
    pub fn resume(&mut self, snapshot: Option<SessionSnapshot>) -> Result<()> {
        match snapshot {
            Some(snapshot) => self.restore(snapshot),
            None if self.playlist.current().is_some() => self.load_current().map(|_| ()),
            None => Ok(()),
        }
    }

    /// Stops the ticker and releases the media engine.
    pub fn shutdown(&mut self) {
        self.ticker.stop();
        self.session.teardown();
        self.import.cancel();
        info!("Player shut down");
    }

    pub fn playlist(&self) -> &Playlist {
        self.playlist.playlist()
    }

    pub fn current(&self) -> Option<&VideoEntry> {
        self.playlist.current()
    }

    pub fn state(&self) -> PlaybackState {
        self.session.state()
    }

    pub fn progress(&self) -> Progress {
        self.progress
    }

    pub fn import_stage(&self) -> Option<ImportStage> {
        self.import.stage()
    }

    pub fn session(&self) -> &PlaybackSession<E> {
        &self.session
    }

    /// Toggles between playing and paused.
    ///
    /// With nothing loaded, the current entry is loaded and plays once ready.
    pub fn play_pause(&mut self) -> Result<()> {
        match self.session.state() {
            PlaybackState::Playing => self.session.pause(),
            PlaybackState::Paused => {
                self.session.play()?;
                self.progress.position_millis = self.session.position_millis();
                Ok(())
            }
            // Playback starts on its own once the engine is ready.
            PlaybackState::Preparing => Ok(()),
            PlaybackState::Idle | PlaybackState::Stopped => {
                if self.session.resource().is_some() {
                    self.session.play()
                } else {
                    self.load_current().map(|_| ())
                }
            }
        }
    }

    pub fn next(&mut self) -> Result<()> {
        self.playlist.next()?;
        self.load_current().map(|_| ())
    }

    pub fn previous(&mut self) -> Result<()> {
        self.playlist.previous()?;
        self.load_current().map(|_| ())
    }

    /// Makes the entry at `index` current and plays it.
    pub fn play_index(&mut self, index: usize) -> Result<()> {
        self.playlist.select(index)?;
        self.load_current().map(|_| ())
    }

    pub fn seek(&mut self, position_millis: u64) -> Result<()> {
        self.session.seek(position_millis)?;
        self.progress.position_millis = self.session.position_millis();
        Ok(())
    }

    /// Seeks relative to the last known position, clamped to the video.
    pub fn seek_relative(&mut self, delta_millis: i64) -> Result<()> {
        let target = self
            .progress
            .position_millis
            .saturating_add_signed(delta_millis);
        self.seek(target)
    }

    pub fn request_import(
        &mut self,
        gate: &mut impl PermissionGate,
        picker: &mut impl ResourcePicker,
    ) -> ImportStage {
        self.import.request_import(gate, picker)
    }

    pub fn on_permission_result(
        &mut self,
        ticket: RequestTicket,
        granted: bool,
        picker: &mut impl ResourcePicker,
    ) -> Result<()> {
        self.import
            .on_permission_result(ticket, granted, picker)
            .map(|_| ())
    }

    /// Completes an import: the chosen video is added, becomes current and
    /// starts loading.
    ///
    /// Returns the added identifier, or `None` for a stale answer.
    ///
    /// # Errors
    ///
    /// * [`PlayerError::NoSelectionMade`] if the picker was cancelled.
    /// * [`PlayerError::PersistenceFailure`] if the entry could not be saved;
    ///   it is still added and loaded for this session.
    /// * [`PlayerError::EngineLoadFailure`] if the engine refused the load.
    pub fn on_selection(
        &mut self,
        ticket: RequestTicket,
        selection: Option<String>,
    ) -> Result<Option<String>> {
        let Some(identifier) = self.import.on_selection(ticket, selection)? else {
            return Ok(None);
        };

        let persisted = self.playlist.add_entry(&identifier);
        self.load_current()?;
        persisted?;

        Ok(Some(identifier))
    }

    /// Reacts to an event from the engine or ticker thread.
    pub fn handle_event(&mut self, event: PlayerEvent) -> Result<()> {
        match event {
            PlayerEvent::Engine(EngineEvent::Ready {
                ticket,
                duration_millis,
            }) => self.on_ready(ticket, duration_millis),
            PlayerEvent::Engine(EngineEvent::LoadFailed { ticket, reason }) => {
                if self.pending_restore.as_ref().is_some_and(|r| r.ticket == ticket) {
                    self.pending_restore = None;
                }
                self.session.on_load_failed(ticket, &reason)
            }
            PlayerEvent::Engine(EngineEvent::Finished { ticket }) => {
                if self.session.on_finished(ticket) {
                    self.progress.position_millis = self.session.position_millis();
                    if self.options.auto_advance {
                        return self.next();
                    }
                }
                Ok(())
            }
            PlayerEvent::Tick(tick) => {
                let progress = &mut self.progress;
                self.ticker.on_tick(tick, &mut self.session, |position, duration| {
                    progress.position_millis = position;
                    progress.duration_millis = duration;
                });
                Ok(())
            }
        }
    }

    /// Captures what is needed to resume on the next start.
    ///
    /// Returns `None` when nothing is selected.
    pub fn snapshot(&self) -> Option<SessionSnapshot> {
        let current_index = self.playlist.current_index()?;
        let current = self.playlist.current()?;

        Some(SessionSnapshot {
            position_millis: self.progress.position_millis,
            is_playing: self.session.state() == PlaybackState::Playing,
            current_index,
            current_identifier: current.identifier().to_string(),
        })
    }

    /// Reloads the entry named by a snapshot.
    ///
    /// The entry is found by identifier, falling back to the snapshot's index
    /// if the identifier is no longer in the playlist.
    pub fn restore(&mut self, snapshot: SessionSnapshot) -> Result<()> {
        if self.playlist.playlist().is_empty() {
            return Err(PlayerError::EmptyPlaylist);
        }

        let index = self
            .playlist
            .playlist()
            .position_of(&snapshot.current_identifier)
            .or_else(|| {
                warn!(
                    "{} is no longer in the playlist, restoring by position",
                    snapshot.current_identifier
                );
                (snapshot.current_index < self.playlist.entries().len())
                    .then_some(snapshot.current_index)
            })
            .unwrap_or(0);

        self.playlist.select(index)?;
        let ticket = self.load_current()?;

        self.pending_restore = Some(PendingRestore {
            ticket,
            position_millis: snapshot.position_millis,
            resume: snapshot.is_playing,
        });

        Ok(())
    }

    fn on_ready(&mut self, ticket: LoadTicket, duration_millis: u64) -> Result<()> {
        if !self.session.on_ready(ticket, duration_millis)? {
            return Ok(());
        }

        self.progress = Progress {
            position_millis: 0,
            duration_millis,
        };

        if let Some(restore) = self.pending_restore.take_if(|r| r.ticket == ticket) {
            debug!("Applying restored session {:?}", restore);
            if restore.position_millis > 0 {
                self.seek(restore.position_millis)?;
            }
            if !restore.resume {
                self.session.pause()?;
            }
        }

        Ok(())
    }

    fn load_current(&mut self) -> Result<LoadTicket> {
        let entry = self
            .playlist
            .current()
            .cloned()
            .ok_or(PlayerError::EmptyPlaylist)?;

        self.pending_restore = None;
        self.progress = Progress::default();
        self.session.load(entry)
    }
}
