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

//! Events produced by background threads for the player.
//!
//! The media engine worker and the progress ticker never touch player state
//! themselves. They send a [`PlayerEvent`] over an `mpsc` channel and the
//! thread that owns the [`Player`](crate::player::Player) hands it to
//! [`Player::handle_event`](crate::player::Player::handle_event).
//!
//! Producers are generic over the channel's item type, anything implementing
//! `From<PlayerEvent>` will do, so a front end can carry player events inside
//! its own event enum.

use crate::{playback::EngineEvent, ticker::TickId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayerEvent {
    Engine(EngineEvent),
    Tick(TickId),
}
