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

//! Periodic playback progress sampling.
//!
//! A [`ProgressTicker`] runs a timer thread that sends a
//! [`PlayerEvent::Tick`] after every interval, waiting a full interval again
//! only once the previous tick has been sent. The owner of the playback
//! session answers each tick with [`ProgressTicker::on_tick`], which samples
//! the session while it is playing.
//!
//! Stopping wakes and joins the timer thread and invalidates its [`TickId`],
//! so ticks that were already queued when [`ProgressTicker::stop`] was called
//! are discarded.

use std::{
    sync::mpsc::{self, RecvTimeoutError, Sender},
    thread::{self, JoinHandle},
    time::Duration,
};

use log::{debug, warn};

use crate::{
    events::PlayerEvent,
    playback::{MediaEngine, PlaybackSession},
};

/// Default interval between progress samples.
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(1000);

/// Identifies the ticks of one run of a ticker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TickId(u64);

struct Running {
    id: TickId,
    stop_tx: Sender<()>,
    handle: JoinHandle<()>,
}

#[derive(Default)]
pub struct ProgressTicker {
    running: Option<Running>,
    runs: u64,
}

impl ProgressTicker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts sending ticks every `interval`, stopping any previous run.
    ///
    /// # Arguments
    ///
    /// * `interval` - Delay between one tick being sent and the next.
    /// * `event_tx` - The channel the ticks are sent on.
    pub fn start<T>(&mut self, interval: Duration, event_tx: Sender<T>) -> TickId
    where
        T: From<PlayerEvent> + Send + 'static,
    {
        self.stop();

        self.runs += 1;
        let id = TickId(self.runs);
        let (stop_tx, stop_rx) = mpsc::channel::<()>();

        let handle = thread::spawn(move || {
            loop {
                match stop_rx.recv_timeout(interval) {
                    Err(RecvTimeoutError::Timeout) => {
                        if event_tx.send(T::from(PlayerEvent::Tick(id))).is_err() {
                            break;
                        }
                    }
                    // Stop requested, or the ticker was dropped.
                    Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                }
            }
            debug!("Progress ticker {:?} finished", id);
        });

        debug!("Progress ticker {:?} started, interval {:?}", id, interval);

        self.running = Some(Running {
            id,
            stop_tx,
            handle,
        });

        id
    }

    /// Cancels the ticker. No tick sent before or after this call will sample
    /// the session.
    pub fn stop(&mut self) {
        let Some(running) = self.running.take() else {
            return;
        };

        let _ = running.stop_tx.send(());

        if running.handle.join().is_err() {
            warn!("Progress ticker thread panicked");
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.is_some()
    }

    /// The id carried by the ticks of the current run.
    pub fn current_tick(&self) -> Option<TickId> {
        self.running.as_ref().map(|running| running.id)
    }

    /// Answers a tick by sampling the session.
    ///
    /// `on_tick` receives the position and duration in milliseconds. It is
    /// only invoked when the tick belongs to the current run and the session
    /// is playing. Returns whether it was invoked.
    pub fn on_tick<E, F>(&self, tick: TickId, session: &mut PlaybackSession<E>, on_tick: F) -> bool
    where
        E: MediaEngine,
        F: FnOnce(u64, u64),
    {
        let is_current = self
            .running
            .as_ref()
            .is_some_and(|running| running.id == tick);

        if !is_current {
            debug!("Discarding tick {:?} from a stopped ticker", tick);
            return false;
        }

        match session.sample() {
            Some((position_millis, duration_millis)) => {
                on_tick(position_millis, duration_millis);
                true
            }
            None => false,
        }
    }
}

impl Drop for ProgressTicker {
    fn drop(&mut self) {
        self.stop();
    }
}
