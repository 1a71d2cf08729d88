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

//! Video playback control and state management.
//!
//! This module provides [`PlaybackSession`], the state machine for the one
//! resource currently bound to a [`MediaEngine`]:
//!
//! ```text
//! Idle -> Preparing -> Playing <-> Paused
//!         Playing/Paused -> Stopped (teardown)
//! ```
//!
//! Only the engine's ready signal for the current load starts playback after
//! a load. Ready signals carrying any other ticket are discarded.

mod engine;
#[cfg_attr(not(feature = "mpv"), allow(dead_code))]
mod loads;
#[cfg(feature = "mpv")]
pub mod mpv_engine;

pub use engine::{EngineEvent, LoadTicket, MediaEngine};

use std::fmt;

use log::{debug, info, warn};

use crate::{
    error::{PlayerError, Result},
    model::VideoEntry,
};

/// Represents the current playback status of a session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum PlaybackState {
    #[default]
    Idle,
    Preparing,
    Playing,
    Paused,
    Stopped,
}

impl fmt::Display for PlaybackState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PlaybackState::Idle => "idle",
            PlaybackState::Preparing => "preparing",
            PlaybackState::Playing => "playing",
            PlaybackState::Paused => "paused",
            PlaybackState::Stopped => "stopped",
        };
        f.write_str(name)
    }
}

pub struct PlaybackSession<E: MediaEngine> {
    engine: E,
    resource: Option<VideoEntry>,
    state: PlaybackState,
    position_millis: u64,
    duration_millis: u64,
    /// Ticket of the current binding; `None` once torn down.
    ticket: Option<LoadTicket>,
    last_ticket: u64,
    /// Paused because the resource played to its end.
    at_end: bool,
}

impl<E: MediaEngine> PlaybackSession<E> {
    pub fn new(engine: E) -> Self {
        Self {
            engine,
            resource: None,
            state: PlaybackState::Idle,
            position_millis: 0,
            duration_millis: 0,
            ticket: None,
            last_ticket: 0,
            at_end: false,
        }
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn resource(&self) -> Option<&VideoEntry> {
        self.resource.as_ref()
    }

    pub fn position_millis(&self) -> u64 {
        self.position_millis
    }

    pub fn duration_millis(&self) -> u64 {
        self.duration_millis
    }

    /// Binds `entry` to the engine and starts preparing it.
    ///
    /// Any previous binding is torn down first, and any ready signal still in
    /// flight for it will be ignored.
    ///
    /// # Errors
    ///
    /// Returns [`PlayerError::EngineLoadFailure`] if the engine refuses the
    /// load; the session is then `Idle` with nothing bound.
    pub fn load(&mut self, entry: VideoEntry) -> Result<LoadTicket> {
        if matches!(self.state, PlaybackState::Playing | PlaybackState::Paused) {
            self.teardown();
        }

        self.last_ticket += 1;
        let ticket = LoadTicket(self.last_ticket);

        info!("Loading {} ({})", entry.identifier(), ticket);

        self.ticket = Some(ticket);
        self.state = PlaybackState::Preparing;
        self.at_end = false;
        self.position_millis = 0;
        self.duration_millis = 0;

        if let Err(e) = self.engine.load(entry.identifier(), ticket) {
            self.reset_to_idle();
            return Err(PlayerError::EngineLoadFailure {
                identifier: entry.identifier().to_string(),
                reason: e.to_string(),
            });
        }

        self.resource = Some(entry);
        Ok(ticket)
    }

    /// Handles the engine's ready signal, starting playback if it answers the
    /// current load.
    ///
    /// Returns `Ok(false)` when the signal was stale and has been discarded.
    pub fn on_ready(&mut self, ticket: LoadTicket, duration_millis: u64) -> Result<bool> {
        if !self.is_pending(ticket) {
            debug!("Discarding stale ready signal for {}", ticket);
            return Ok(false);
        }

        self.duration_millis = duration_millis;

        if let Err(e) = self.engine.start() {
            let identifier = self.identifier();
            self.reset_to_idle();
            return Err(PlayerError::EngineLoadFailure {
                identifier,
                reason: e.to_string(),
            });
        }

        self.state = PlaybackState::Playing;
        Ok(true)
    }

    /// Handles the engine failing to prepare a resource.
    ///
    /// A failure for the current load returns the session to `Idle` and is
    /// reported as [`PlayerError::EngineLoadFailure`]; stale failures are
    /// ignored.
    pub fn on_load_failed(&mut self, ticket: LoadTicket, reason: &str) -> Result<()> {
        if !self.is_pending(ticket) {
            debug!("Discarding stale load failure for {}", ticket);
            return Ok(());
        }

        let identifier = self.identifier();
        warn!("Failed to load {}: {}", identifier, reason);
        self.reset_to_idle();

        Err(PlayerError::EngineLoadFailure {
            identifier,
            reason: reason.to_string(),
        })
    }

    /// Handles the bound resource reaching its end, leaving it paused at the
    /// end position. Returns whether the event applied to this binding.
    pub fn on_finished(&mut self, ticket: LoadTicket) -> bool {
        if self.ticket != Some(ticket) || self.state != PlaybackState::Playing {
            return false;
        }

        self.position_millis = self.duration_millis;
        self.state = PlaybackState::Paused;
        self.at_end = true;
        true
    }

    /// Resumes playback of the bound resource.
    ///
    /// A resource that played to its end starts again from the beginning.
    pub fn play(&mut self) -> Result<()> {
        let can_start = match self.state {
            PlaybackState::Paused => true,
            PlaybackState::Idle | PlaybackState::Stopped => self.resource.is_some(),
            _ => false,
        };

        if !can_start {
            return Err(PlayerError::InvalidState {
                operation: "play",
                state: self.state,
            });
        }

        if self.at_end {
            self.engine.seek(0)?;
            self.position_millis = 0;
            self.at_end = false;
        }

        self.engine.start()?;
        self.state = PlaybackState::Playing;
        Ok(())
    }

    pub fn pause(&mut self) -> Result<()> {
        if self.state != PlaybackState::Playing {
            return Err(PlayerError::InvalidState {
                operation: "pause",
                state: self.state,
            });
        }

        self.engine.pause()?;
        self.state = PlaybackState::Paused;
        Ok(())
    }

    /// Repositions playback, clamped to the known duration. The state does not
    /// change.
    pub fn seek(&mut self, target_millis: u64) -> Result<()> {
        if !matches!(self.state, PlaybackState::Playing | PlaybackState::Paused) {
            return Err(PlayerError::InvalidState {
                operation: "seek",
                state: self.state,
            });
        }

        let target = if self.duration_millis > 0 {
            target_millis.min(self.duration_millis)
        } else {
            target_millis
        };

        self.engine.seek(target)?;
        self.position_millis = target;
        self.at_end = false;
        Ok(())
    }

    /// Stops the engine and releases the bound resource.
    ///
    /// Any ready signal still in flight is discarded when it arrives.
    pub fn teardown(&mut self) {
        if self.resource.is_some() || self.state == PlaybackState::Preparing {
            if let Err(e) = self.engine.stop() {
                warn!("Failed to stop media engine: {}", e);
            }
        }

        self.resource = None;
        self.ticket = None;
        self.at_end = false;
        self.state = PlaybackState::Stopped;
    }

    /// Samples position and duration from the engine while playing.
    ///
    /// Returns `None` without querying the engine in any other state.
    pub fn sample(&mut self) -> Option<(u64, u64)> {
        if self.state != PlaybackState::Playing {
            return None;
        }

        self.position_millis = self.engine.position_millis();
        let duration = self.engine.duration_millis();
        if duration > 0 {
            self.duration_millis = duration;
        }

        Some((self.position_millis, self.duration_millis))
    }

    fn is_pending(&self, ticket: LoadTicket) -> bool {
        self.state == PlaybackState::Preparing && self.ticket == Some(ticket)
    }

    fn identifier(&self) -> String {
        self.resource
            .as_ref()
            .map(|entry| entry.identifier().to_string())
            .unwrap_or_default()
    }

    fn reset_to_idle(&mut self) {
        self.resource = None;
        self.ticket = None;
        self.at_end = false;
        self.state = PlaybackState::Idle;
    }
}

impl<E: MediaEngine> Drop for PlaybackSession<E> {
    fn drop(&mut self) {
        if self.resource.is_some() {
            self.teardown();
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::{cell::RefCell, rc::Rc};

    use super::*;
    use crate::error::EngineError;

    #[derive(Debug, Clone, PartialEq, Eq)]
    pub(crate) enum Call {
        Load(String, LoadTicket),
        Start,
        Pause,
        Seek(u64),
        Stop,
    }

    /// Records every command; the log is shared so tests can inspect it after
    /// the engine has been moved into a session.
    #[derive(Clone, Default)]
    pub(crate) struct FakeEngine {
        pub(crate) calls: Rc<RefCell<Vec<Call>>>,
        pub(crate) position: Rc<RefCell<u64>>,
        pub(crate) duration: Rc<RefCell<u64>>,
        pub(crate) reject_loads: Rc<RefCell<bool>>,
    }

    impl FakeEngine {
        pub(crate) fn calls(&self) -> Vec<Call> {
            self.calls.borrow().clone()
        }

        pub(crate) fn last_ticket(&self) -> Option<LoadTicket> {
            self.calls.borrow().iter().rev().find_map(|call| match call {
                Call::Load(_, ticket) => Some(*ticket),
                _ => None,
            })
        }
    }

    impl MediaEngine for FakeEngine {
        fn load(&mut self, identifier: &str, ticket: LoadTicket) -> Result<(), EngineError> {
            if *self.reject_loads.borrow() {
                return Err(EngineError::Command(format!("cannot open {}", identifier)));
            }
            self.calls
                .borrow_mut()
                .push(Call::Load(identifier.to_string(), ticket));
            Ok(())
        }

        fn start(&mut self) -> Result<(), EngineError> {
            self.calls.borrow_mut().push(Call::Start);
            Ok(())
        }

        fn pause(&mut self) -> Result<(), EngineError> {
            self.calls.borrow_mut().push(Call::Pause);
            Ok(())
        }

        fn seek(&mut self, position_millis: u64) -> Result<(), EngineError> {
            self.calls.borrow_mut().push(Call::Seek(position_millis));
            Ok(())
        }

        fn stop(&mut self) -> Result<(), EngineError> {
            self.calls.borrow_mut().push(Call::Stop);
            Ok(())
        }

        fn position_millis(&self) -> u64 {
            *self.position.borrow()
        }

        fn duration_millis(&self) -> u64 {
            *self.duration.borrow()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::{Call, FakeEngine};
    use super::*;

    fn session() -> (PlaybackSession<FakeEngine>, FakeEngine) {
        let engine = FakeEngine::default();
        (PlaybackSession::new(engine.clone()), engine)
    }

    #[test]
    fn load_prepares_without_starting() {
        let (mut session, engine) = session();
        let ticket = session.load(VideoEntry::new("a.mp4")).unwrap();

        assert_eq!(session.state(), PlaybackState::Preparing);
        assert_eq!(engine.calls(), vec![Call::Load("a.mp4".to_string(), ticket)]);
    }

    #[test]
    fn ready_starts_playback() {
        let (mut session, engine) = session();
        let ticket = session.load(VideoEntry::new("a.mp4")).unwrap();

        assert!(session.on_ready(ticket, 90_000).unwrap());
        assert_eq!(session.state(), PlaybackState::Playing);
        assert_eq!(session.duration_millis(), 90_000);
        assert_eq!(engine.calls().last(), Some(&Call::Start));
    }

    #[test]
    fn superseded_ready_is_discarded() {
        let (mut session, _engine) = session();
        let first = session.load(VideoEntry::new("a.mp4")).unwrap();
        let second = session.load(VideoEntry::new("b.mp4")).unwrap();

        assert!(session.on_ready(second, 1_000).unwrap());
        assert!(!session.on_ready(first, 2_000).unwrap());

        assert_eq!(session.state(), PlaybackState::Playing);
        assert_eq!(session.resource().unwrap().identifier(), "b.mp4");
        assert_eq!(session.duration_millis(), 1_000);
    }

    #[test]
    fn stale_ready_before_current_ready_does_not_start() {
        let (mut session, engine) = session();
        let first = session.load(VideoEntry::new("a.mp4")).unwrap();
        session.load(VideoEntry::new("b.mp4")).unwrap();

        assert!(!session.on_ready(first, 2_000).unwrap());
        assert_eq!(session.state(), PlaybackState::Preparing);
        assert!(!engine.calls().contains(&Call::Start));
    }

    #[test]
    fn teardown_discards_pending_ready() {
        let (mut session, engine) = session();
        let ticket = session.load(VideoEntry::new("a.mp4")).unwrap();
        session.teardown();

        assert!(!session.on_ready(ticket, 1_000).unwrap());
        assert_eq!(session.state(), PlaybackState::Stopped);
        assert!(session.resource().is_none());
        assert_eq!(engine.calls().last(), Some(&Call::Stop));
    }

    #[test]
    fn load_while_playing_tears_down_previous() {
        let (mut session, engine) = session();
        let ticket = session.load(VideoEntry::new("a.mp4")).unwrap();
        session.on_ready(ticket, 1_000).unwrap();

        let next = session.load(VideoEntry::new("b.mp4")).unwrap();

        let calls = engine.calls();
        assert_eq!(calls[calls.len() - 2], Call::Stop);
        assert_eq!(calls[calls.len() - 1], Call::Load("b.mp4".to_string(), next));
        assert_eq!(session.state(), PlaybackState::Preparing);
    }

    #[test]
    fn pause_and_play_toggle_state() {
        let (mut session, _engine) = session();
        let ticket = session.load(VideoEntry::new("a.mp4")).unwrap();
        session.on_ready(ticket, 1_000).unwrap();

        session.pause().unwrap();
        assert_eq!(session.state(), PlaybackState::Paused);
        session.play().unwrap();
        assert_eq!(session.state(), PlaybackState::Playing);
    }

    #[test]
    fn transport_rejected_in_wrong_state() {
        let (mut session, _engine) = session();

        assert!(matches!(session.play(), Err(PlayerError::InvalidState { .. })));
        assert!(matches!(session.pause(), Err(PlayerError::InvalidState { .. })));
        assert!(matches!(session.seek(10), Err(PlayerError::InvalidState { .. })));

        session.load(VideoEntry::new("a.mp4")).unwrap();
        assert!(matches!(session.play(), Err(PlayerError::InvalidState { .. })));
        assert!(matches!(session.seek(10), Err(PlayerError::InvalidState { .. })));
    }

    #[test]
    fn seek_clamps_to_duration_and_keeps_state() {
        let (mut session, engine) = session();
        let ticket = session.load(VideoEntry::new("a.mp4")).unwrap();
        session.on_ready(ticket, 5_000).unwrap();
        session.pause().unwrap();

        session.seek(9_000).unwrap();

        assert_eq!(engine.calls().last(), Some(&Call::Seek(5_000)));
        assert_eq!(session.position_millis(), 5_000);
        assert_eq!(session.state(), PlaybackState::Paused);
    }

    #[test]
    fn load_failure_returns_to_idle() {
        let (mut session, _engine) = session();
        let ticket = session.load(VideoEntry::new("gone.mp4")).unwrap();

        let err = session.on_load_failed(ticket, "no such file").unwrap_err();

        assert!(matches!(err, PlayerError::EngineLoadFailure { ref identifier, .. } if identifier == "gone.mp4"));
        assert_eq!(session.state(), PlaybackState::Idle);
        assert!(session.resource().is_none());
    }

    #[test]
    fn rejected_load_returns_to_idle() {
        let (mut session, engine) = session();
        *engine.reject_loads.borrow_mut() = true;

        assert!(matches!(
            session.load(VideoEntry::new("a.mp4")),
            Err(PlayerError::EngineLoadFailure { .. })
        ));
        assert_eq!(session.state(), PlaybackState::Idle);
    }

    #[test]
    fn sample_only_queries_while_playing() {
        let (mut session, engine) = session();
        *engine.position.borrow_mut() = 1_500;
        *engine.duration.borrow_mut() = 4_000;

        assert_eq!(session.sample(), None);

        let ticket = session.load(VideoEntry::new("a.mp4")).unwrap();
        session.on_ready(ticket, 4_000).unwrap();
        assert_eq!(session.sample(), Some((1_500, 4_000)));

        session.pause().unwrap();
        assert_eq!(session.sample(), None);
    }

    #[test]
    fn finished_pauses_at_end() {
        let (mut session, _engine) = session();
        let ticket = session.load(VideoEntry::new("a.mp4")).unwrap();
        session.on_ready(ticket, 4_000).unwrap();

        assert!(session.on_finished(ticket));
        assert_eq!(session.state(), PlaybackState::Paused);
        assert_eq!(session.position_millis(), 4_000);
    }

    #[test]
    fn play_after_finish_starts_from_beginning() {
        let (mut session, engine) = session();
        let ticket = session.load(VideoEntry::new("a.mp4")).unwrap();
        session.on_ready(ticket, 4_000).unwrap();
        session.on_finished(ticket);
        let before = engine.calls().len();

        session.play().unwrap();

        assert_eq!(engine.calls()[before..], [Call::Seek(0), Call::Start]);
        assert_eq!(session.state(), PlaybackState::Playing);
        assert_eq!(session.position_millis(), 0);

        session.pause().unwrap();
        session.play().unwrap();
        assert_eq!(engine.calls().last(), Some(&Call::Start));
        assert_eq!(engine.calls().iter().filter(|c| **c == Call::Seek(0)).count(), 1);
    }

    #[test]
    fn seek_after_finish_keeps_the_new_position() {
        let (mut session, engine) = session();
        let ticket = session.load(VideoEntry::new("a.mp4")).unwrap();
        session.on_ready(ticket, 4_000).unwrap();
        session.on_finished(ticket);

        session.seek(1_000).unwrap();
        session.play().unwrap();

        assert!(!engine.calls().contains(&Call::Seek(0)));
        assert_eq!(session.position_millis(), 1_000);
    }
}
