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

//! A player for a persistent playlist of local videos.
//!
//! The playlist is an ordered list of video identifiers saved in a key-value
//! store. One entry is current at a time; it can be played, paused and
//! seeked, and the playlist can be stepped through in either direction,
//! wrapping at the ends. New videos are added through an import flow that asks
//! for storage permission and then lets the user pick a file.
//!
//! # Modules
//!
//! * [`player`]: The [`Player`](player::Player) tying everything together.
//! * [`playlist`]: The cursor over the playlist, and adding entries.
//! * [`playback`]: The playback state machine over a media engine.
//! * [`ticker`]: Periodic progress sampling.
//! * [`import`]: Permission and picker flow for adding videos.
//! * [`store`]: Playlist persistence.
//! * [`model`]: Playlist entries and session snapshots.
//! * [`events`]: Events sent from background threads to the player.
//! * [`config`]: Application configuration.
//! * [`error`]: Error types.
//! * [`util`]: Formatting and logging helpers.

pub mod config;
pub mod error;
pub mod events;
pub mod import;
pub mod model;
pub mod playback;
pub mod player;
pub mod playlist;
pub mod store;
pub mod ticker;
pub mod util;
