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

//! Error types.
//!
//! Every condition here is recovered where it occurs; the front end turns
//! them into notices on the status line rather than aborting.

use thiserror::Error;

use crate::playback::PlaybackState;

/// Failures of the persistent key-value store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Failures talking to a media engine.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("media engine is no longer running")]
    Disconnected,

    #[error("media engine rejected command: {0}")]
    Command(String),
}

#[derive(Debug, Error)]
pub enum PlayerError {
    #[error("No videos to play")]
    EmptyPlaylist,

    #[error("Permission denied")]
    PermissionDenied,

    #[error("No video selected")]
    NoSelectionMade,

    #[error("Unable to play {identifier}: {reason}")]
    EngineLoadFailure { identifier: String, reason: String },

    #[error("Unable to save playlist: {0}")]
    PersistenceFailure(#[from] StoreError),

    #[error("Cannot {operation} while {state}")]
    InvalidState {
        operation: &'static str,
        state: PlaybackState,
    },

    #[error(transparent)]
    Engine(#[from] EngineError),
}

impl PlayerError {
    /// Whether the condition should be recovered without showing a notice.
    pub fn is_silent(&self) -> bool {
        matches!(self, PlayerError::NoSelectionMade)
    }
}

pub type Result<T, E = PlayerError> = std::result::Result<T, E>;
