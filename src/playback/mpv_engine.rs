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

//! MPV-backed video playback engine and event processing.
//!
//! This module provides a [`MediaEngine`] on top of `libmpv`. It manages a
//! background worker thread that bridges the gap between the session's
//! command-based interface and the low-level MPV event system.
//!
//! # Architecture
//!
//! The engine operates using a dual-channel communication pattern:
//! 1. **Command Channel**: Receives [`EngineCommand`]s from the session to
//!    control playback (load, start, pause, seek, stop).
//! 2. **Event Channel**: Sends [`EngineEvent`]s back to the application event
//!    loop, tagged with the ticket of the load they answer.
//!
//! MPV's start, loaded and end events for each file are matched to loads by a
//! [`LoadTracker`]. Files are kept open at their end, so a finished video can
//! be played again without reloading it.
//!
//! Position and duration are mirrored into a shared [`EngineStatus`] so they
//! can be queried synchronously.

use std::{
    sync::{
        Arc, Mutex,
        mpsc::{self, Receiver, Sender},
    },
    thread,
};

use anyhow::{Context, Result};
use log::{debug, error, info, warn};
use ::mpv::Format;

use crate::{
    error::EngineError,
    events::PlayerEvent,
    playback::{
        EngineEvent, LoadTicket, MediaEngine,
        loads::{EngineCommand, FileEnd, LoadTracker},
    },
};

#[derive(Debug, Default, Clone, Copy)]
struct EngineStatus {
    position_millis: u64,
    duration_millis: u64,
}

/// A handle to the MPV worker thread.
pub struct MpvEngine {
    command_tx: Sender<EngineCommand>,
    status: Arc<Mutex<EngineStatus>>,
}

impl MpvEngine {
    /// Spawns the MPV worker thread and returns a new engine handle.
    ///
    /// # Arguments
    ///
    /// * `event_tx` - A channel to send engine events (ready, failures, end of
    ///   file) back to the main event loop.
    pub fn new<T>(event_tx: Sender<T>) -> Self
    where
        T: From<PlayerEvent> + Send + 'static,
    {
        let (command_tx, command_rx) = mpsc::channel::<EngineCommand>();
        let status = Arc::new(Mutex::new(EngineStatus::default()));

        let worker_status = Arc::clone(&status);
        thread::spawn(move || {
            if let Err(e) = mpv_worker(command_rx, event_tx, worker_status) {
                error!("MPV worker failure: {:?}", e);
            }
        });

        Self { command_tx, status }
    }

    fn send(&self, command: EngineCommand) -> Result<(), EngineError> {
        self.command_tx
            .send(command)
            .map_err(|_| EngineError::Disconnected)
    }

    fn status(&self) -> EngineStatus {
        self.status
            .lock()
            .map(|status| *status)
            .unwrap_or_default()
    }
}

impl MediaEngine for MpvEngine {
    fn load(&mut self, identifier: &str, ticket: LoadTicket) -> Result<(), EngineError> {
        self.send(EngineCommand::Load(identifier.to_string(), ticket))
    }

    fn start(&mut self) -> Result<(), EngineError> {
        self.send(EngineCommand::Start)
    }

    fn pause(&mut self) -> Result<(), EngineError> {
        self.send(EngineCommand::Pause)
    }

    fn seek(&mut self, position_millis: u64) -> Result<(), EngineError> {
        self.send(EngineCommand::Seek(position_millis))
    }

    fn stop(&mut self) -> Result<(), EngineError> {
        self.send(EngineCommand::Stop)
    }

    fn position_millis(&self) -> u64 {
        self.status().position_millis
    }

    fn duration_millis(&self) -> u64 {
        self.status().duration_millis
    }
}

/// What the worker needs from one MPV event, detached from the handler.
enum Observed {
    Duration(u64),
    Position(u64),
    EofReached,
    FileStarted,
    FileLoaded,
    FileEnded(FileEnd),
}

/// The primary execution loop for the MPV backend.
///
/// The loop ends when the engine handle is dropped and the command channel
/// closes.
///
/// # Errors
///
/// Returns an error if the MPV context fails to initialize or an event cannot
/// be sent back.
fn mpv_worker<T>(
    command_rx: Receiver<EngineCommand>,
    event_tx: Sender<T>,
    status: Arc<Mutex<EngineStatus>>,
) -> Result<()>
where
    T: From<PlayerEvent>,
{
    let mut handler = (|| {
        let mut builder = ::mpv::MpvHandlerBuilder::new().context("Failed to create MPV builder")?;
        builder
            .set_option("keep-open", "yes")
            .context("Failed to keep files open at their end")?;
        builder.build().context("Failed to build MPV handler")
    })()?;

    handler
        .observe_property::<f64>("duration", 0)
        .context("Failed to observe duration")?;
    handler
        .observe_property::<f64>("time-pos", 0)
        .context("Failed to observe time-pos")?;
    handler
        .observe_property::<bool>("eof-reached", 0)
        .context("Failed to observe eof-reached")?;

    info!("MPV engine started");

    let mut tracker = LoadTracker::default();

    loop {
        if !process_commands(&mut handler, &command_rx, &mut tracker, &event_tx)? {
            info!("MPV engine stopped");
            return Ok(());
        }
        process_mpv_events(&mut handler, &mut tracker, &status, &event_tx)?;
    }
}

/// Drains all pending commands and runs those the tracker lets through.
///
/// Returns `false` once the command channel has been closed.
fn process_commands<T>(
    handler: &mut ::mpv::MpvHandler,
    command_rx: &Receiver<EngineCommand>,
    tracker: &mut LoadTracker,
    event_tx: &Sender<T>,
) -> Result<bool>
where
    T: From<PlayerEvent>,
{
    loop {
        let command = match command_rx.try_recv() {
            Ok(command) => command,
            Err(mpsc::TryRecvError::Empty) => return Ok(true),
            Err(mpsc::TryRecvError::Disconnected) => return Ok(false),
        };

        match tracker.gate(command) {
            Some(command) => run_command(handler, command, tracker, event_tx)?,
            None => debug!("MPV command held until the loading file starts"),
        }
    }
}

/// Executes a command, and any command the tracker releases because of it.
///
/// A failed command is logged and the worker carries on; a failed load is
/// reported as [`EngineEvent::LoadFailed`].
fn run_command<T>(
    handler: &mut ::mpv::MpvHandler,
    command: EngineCommand,
    tracker: &mut LoadTracker,
    event_tx: &Sender<T>,
) -> Result<()>
where
    T: From<PlayerEvent>,
{
    let mut next = Some(command);

    while let Some(command) = next.take() {
        debug!("MPV command {:?}", command);

        let result = match command {
            EngineCommand::Load(identifier, ticket) => {
                // Stay paused until the session reacts to the ready signal.
                let loaded = handler
                    .set_property("pause", true)
                    .and_then(|_| handler.command(&["loadfile", &identifier, "replace"]));

                if let Err(e) = &loaded {
                    let (event, released) = tracker.rejected(ticket, format!("{:?}", e));
                    send_event(event_tx, event)?;
                    next = released;
                }
                loaded
            }
            EngineCommand::Start => handler.set_property("pause", false),
            EngineCommand::Pause => handler.set_property("pause", true),
            EngineCommand::Seek(position_millis) => {
                let seconds = position_millis as f64 / 1000.0;
                handler.command(&["seek", &seconds.to_string(), "absolute"])
            }
            EngineCommand::Stop => handler.command(&["stop"]),
        };

        if let Err(e) = result {
            warn!("MPV command failed: {:?}", e);
        }
    }

    Ok(())
}

/// Polls for MPV events and forwards those the session reacts to.
///
/// This function waits for up to 50ms for an event from the MPV context.
fn process_mpv_events<T>(
    handler: &mut ::mpv::MpvHandler,
    tracker: &mut LoadTracker,
    status: &Arc<Mutex<EngineStatus>>,
    event_tx: &Sender<T>,
) -> Result<()>
where
    T: From<PlayerEvent>,
{
    let observed = match handler.wait_event(0.05) {
        Some(::mpv::Event::PropertyChange { name, change, .. }) => match (name, change) {
            ("duration", Format::Double(seconds)) if seconds > 0.0 => {
                Some(Observed::Duration(to_millis(seconds)))
            }
            ("time-pos", Format::Double(seconds)) if seconds >= 0.0 => {
                Some(Observed::Position(to_millis(seconds)))
            }
            ("eof-reached", Format::Flag(true)) => Some(Observed::EofReached),
            _ => None,
        },
        Some(::mpv::Event::StartFile) => Some(Observed::FileStarted),
        Some(::mpv::Event::FileLoaded) => Some(Observed::FileLoaded),
        Some(::mpv::Event::EndFile(result)) => Some(Observed::FileEnded(match result {
            Ok(::mpv::EndFileReason::MPV_END_FILE_REASON_EOF) => FileEnd::Eof,
            Ok(::mpv::EndFileReason::MPV_END_FILE_REASON_ERROR) => {
                FileEnd::Error("unable to open resource".to_string())
            }
            Ok(_) => FileEnd::Other,
            Err(e) => FileEnd::Error(format!("{:?}", e)),
        })),
        _ => None,
    };

    let Some(observed) = observed else {
        return Ok(());
    };

    let engine_event = match observed {
        Observed::Duration(duration_millis) => {
            update_status(status, |s| s.duration_millis = duration_millis);
            None
        }
        Observed::Position(position_millis) => {
            update_status(status, |s| s.position_millis = position_millis);
            None
        }
        Observed::EofReached => tracker.eof_reached(),
        Observed::FileStarted => {
            update_status(status, |s| *s = EngineStatus::default());
            if let Some(command) = tracker.started() {
                run_command(handler, command, tracker, event_tx)?;
            }
            None
        }
        Observed::FileLoaded => {
            let duration_millis = handler
                .get_property::<f64>("duration")
                .map(to_millis)
                .unwrap_or(0);
            update_status(status, |s| s.duration_millis = duration_millis);
            tracker.loaded(duration_millis)
        }
        Observed::FileEnded(end) => tracker.ended(end),
    };

    if let Some(event) = engine_event {
        send_event(event_tx, event)?;
    }

    Ok(())
}

fn send_event<T>(event_tx: &Sender<T>, event: EngineEvent) -> Result<()>
where
    T: From<PlayerEvent>,
{
    event_tx
        .send(T::from(PlayerEvent::Engine(event)))
        .context("Failed to send engine event")
}

fn to_millis(seconds: f64) -> u64 {
    (seconds.max(0.0) * 1000.0) as u64
}

fn update_status(status: &Arc<Mutex<EngineStatus>>, update: impl FnOnce(&mut EngineStatus)) {
    if let Ok(mut status) = status.lock() {
        update(&mut status);
    }
}
