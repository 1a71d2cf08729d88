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

use crate::import::{PermissionGate, RequestTicket};

/// A permission gate whose grant is remembered in the application config.
///
/// A request opens a prompt; the front end shows it and reports the user's
/// answer with [`answer`](ConfigPermissionGate::answer).
#[derive(Debug, Default)]
pub struct ConfigPermissionGate {
    granted: bool,
    prompt: Option<RequestTicket>,
}

impl ConfigPermissionGate {
    pub fn new(granted: bool) -> Self {
        Self {
            granted,
            prompt: None,
        }
    }

    /// The request awaiting an answer, if the prompt is open.
    pub fn prompt(&self) -> Option<RequestTicket> {
        self.prompt
    }

    /// Closes the prompt with the user's answer, returning the ticket it
    /// belonged to. A grant is remembered for later imports.
    pub fn answer(&mut self, granted: bool) -> Option<RequestTicket> {
        let ticket = self.prompt.take()?;
        if granted {
            self.granted = true;
        }
        Some(ticket)
    }
}

impl PermissionGate for ConfigPermissionGate {
    fn is_granted(&self) -> bool {
        self.granted
    }

    fn request(&mut self, ticket: RequestTicket) {
        self.prompt = Some(ticket);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grant_is_remembered() {
        let mut gate = ConfigPermissionGate::new(false);
        gate.request(RequestTicket(1));
        assert_eq!(gate.prompt(), Some(RequestTicket(1)));

        assert_eq!(gate.answer(true), Some(RequestTicket(1)));
        assert!(gate.is_granted());
        assert_eq!(gate.prompt(), None);
    }

    #[test]
    fn denial_is_not_remembered_as_grant() {
        let mut gate = ConfigPermissionGate::new(false);
        gate.request(RequestTicket(1));

        assert_eq!(gate.answer(false), Some(RequestTicket(1)));
        assert!(!gate.is_granted());
    }

    #[test]
    fn answer_without_prompt_is_ignored() {
        let mut gate = ConfigPermissionGate::new(false);
        assert_eq!(gate.answer(true), None);
        assert!(!gate.is_granted());
    }
}
