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

//! Matching engine file events to the loads that caused them.
//!
//! An engine that replaces files asynchronously reports each file with a
//! start, a loaded and an end event, but those events do not say which load
//! request they answer. [`LoadTracker`] keeps at most one load in flight
//! between issuing it and the engine starting that file, holding back any
//! newer load or stop until then. Each started file therefore belongs to
//! exactly one [`LoadTicket`], and every [`EngineEvent`] it produces is tagged
//! with that ticket.

use crate::playback::{EngineEvent, LoadTicket};

/// A command for an engine worker thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum EngineCommand {
    Load(String, LoadTicket),
    Start,
    Pause,
    Seek(u64),
    Stop,
}

/// Why the engine stopped playing a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum FileEnd {
    /// Played to the end.
    Eof,
    /// Could not be opened or decoded.
    Error(String),
    /// Stopped, replaced or quit.
    Other,
}

#[derive(Debug, Default)]
pub(crate) struct LoadTracker {
    /// Load issued to the engine whose file has not started yet.
    in_flight: Option<LoadTicket>,
    /// Newest load or stop held back while a load is in flight.
    deferred: Option<EngineCommand>,
    /// Started file that has not finished loading.
    opening: Option<LoadTicket>,
    /// Loaded file, playing or paused.
    current: Option<LoadTicket>,
}

impl LoadTracker {
    /// Returns the command to execute now, or `None` if it was held back.
    pub(crate) fn gate(&mut self, command: EngineCommand) -> Option<EngineCommand> {
        match command {
            EngineCommand::Load(_, ticket) => {
                if self.in_flight.is_some() {
                    self.deferred = Some(command);
                    return None;
                }
                self.in_flight = Some(ticket);
                Some(command)
            }
            EngineCommand::Stop => {
                if self.in_flight.is_some() {
                    self.deferred = Some(command);
                    return None;
                }
                self.opening = None;
                self.current = None;
                Some(command)
            }
            EngineCommand::Start | EngineCommand::Pause | EngineCommand::Seek(_) => Some(command),
        }
    }

    /// The engine refused a load outright; its file will never start.
    ///
    /// Returns the failure to report and any held-back command to run next.
    pub(crate) fn rejected(
        &mut self,
        ticket: LoadTicket,
        reason: String,
    ) -> (EngineEvent, Option<EngineCommand>) {
        if self.in_flight == Some(ticket) {
            self.in_flight = None;
        }

        let next = self.flush();
        (EngineEvent::LoadFailed { ticket, reason }, next)
    }

    /// The engine started a new file, which is the one in flight.
    ///
    /// Returns any held-back command to run next.
    pub(crate) fn started(&mut self) -> Option<EngineCommand> {
        self.opening = self.in_flight.take();
        self.current = None;
        self.flush()
    }

    /// The started file is loaded and its duration known.
    pub(crate) fn loaded(&mut self, duration_millis: u64) -> Option<EngineEvent> {
        let ticket = self.opening.take()?;
        self.current = Some(ticket);
        Some(EngineEvent::Ready {
            ticket,
            duration_millis,
        })
    }

    pub(crate) fn ended(&mut self, end: FileEnd) -> Option<EngineEvent> {
        match end {
            FileEnd::Eof => {
                self.opening = None;
                self.current
                    .take()
                    .map(|ticket| EngineEvent::Finished { ticket })
            }
            FileEnd::Error(reason) => self
                .opening
                .take()
                .or_else(|| self.current.take())
                .map(|ticket| EngineEvent::LoadFailed { ticket, reason }),
            FileEnd::Other => {
                self.opening = None;
                self.current = None;
                None
            }
        }
    }

    /// The loaded file reached its end but stays open.
    pub(crate) fn eof_reached(&self) -> Option<EngineEvent> {
        self.current.map(|ticket| EngineEvent::Finished { ticket })
    }

    fn flush(&mut self) -> Option<EngineCommand> {
        let command = self.deferred.take()?;
        self.gate(command)
    }
}
