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

//! The media engine boundary.
//!
//! A [`MediaEngine`] decodes and renders a resource; the playback session only
//! issues commands to it and reacts to the [`EngineEvent`]s it sends back.
//! Every load carries a [`LoadTicket`] and every event answering that load
//! carries the same ticket, which is how stale answers are recognised.

use std::fmt;

use crate::error::EngineError;

/// Identifies one load request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LoadTicket(pub(crate) u64);

impl fmt::Display for LoadTicket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "load#{}", self.0)
    }
}

/// Asynchronous notifications from a media engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    /// The resource for `ticket` is prepared and its duration is known.
    Ready {
        ticket: LoadTicket,
        duration_millis: u64,
    },
    /// The resource for `ticket` could not be prepared.
    LoadFailed { ticket: LoadTicket, reason: String },
    /// The resource for `ticket` played to its end.
    Finished { ticket: LoadTicket },
}

impl EngineEvent {
    pub fn ticket(&self) -> LoadTicket {
        match self {
            EngineEvent::Ready { ticket, .. }
            | EngineEvent::LoadFailed { ticket, .. }
            | EngineEvent::Finished { ticket } => *ticket,
        }
    }
}

pub trait MediaEngine {
    /// Starts preparing `identifier` without starting playback.
    ///
    /// Completion is reported later with an [`EngineEvent`] carrying `ticket`.
    fn load(&mut self, identifier: &str, ticket: LoadTicket) -> Result<(), EngineError>;

    fn start(&mut self) -> Result<(), EngineError>;

    fn pause(&mut self) -> Result<(), EngineError>;

    fn seek(&mut self, position_millis: u64) -> Result<(), EngineError>;

    /// Stops playback and releases the loaded resource.
    fn stop(&mut self) -> Result<(), EngineError>;

    fn position_millis(&self) -> u64;

    fn duration_millis(&self) -> u64;
}
