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
#![allow(dead_code)]

use std::{cell::RefCell, rc::Rc};

use reelist::{
    error::EngineError,
    events::PlayerEvent,
    playback::{EngineEvent, LoadTicket, MediaEngine},
};

/// A media engine that records loads and reports whatever position the test
/// sets.
#[derive(Clone, Default)]
pub struct RecordingEngine {
    pub loads: Rc<RefCell<Vec<(String, LoadTicket)>>>,
    pub seeks: Rc<RefCell<Vec<u64>>>,
    pub stops: Rc<RefCell<usize>>,
    pub position: Rc<RefCell<u64>>,
    pub duration: Rc<RefCell<u64>>,
}

impl RecordingEngine {
    pub fn last_load(&self) -> Option<(String, LoadTicket)> {
        self.loads.borrow().last().cloned()
    }

    /// The ready signal the engine would send for its latest load.
    pub fn ready(&self, duration_millis: u64) -> PlayerEvent {
        let (_, ticket) = self.last_load().expect("nothing loaded");
        *self.duration.borrow_mut() = duration_millis;
        PlayerEvent::Engine(EngineEvent::Ready {
            ticket,
            duration_millis,
        })
    }
}

impl MediaEngine for RecordingEngine {
    fn load(&mut self, identifier: &str, ticket: LoadTicket) -> Result<(), EngineError> {
        self.loads
            .borrow_mut()
            .push((identifier.to_string(), ticket));
        Ok(())
    }

    fn start(&mut self) -> Result<(), EngineError> {
        Ok(())
    }

    fn pause(&mut self) -> Result<(), EngineError> {
        Ok(())
    }

    fn seek(&mut self, position_millis: u64) -> Result<(), EngineError> {
        self.seeks.borrow_mut().push(position_millis);
        *self.position.borrow_mut() = position_millis;
        Ok(())
    }

    fn stop(&mut self) -> Result<(), EngineError> {
        *self.stops.borrow_mut() += 1;
        Ok(())
    }

    fn position_millis(&self) -> u64 {
        *self.position.borrow()
    }

    fn duration_millis(&self) -> u64 {
        *self.duration.borrow()
    }
}
