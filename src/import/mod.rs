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

//! Importing videos into the playlist.
//!
//! An import is a short conversation with two external collaborators:
//!
//! 1. **Permission**: a [`PermissionGate`] must grant read access to external
//!    storage. If it has not, it is asked, and the answer arrives later.
//! 2. **Selection**: a [`ResourcePicker`] lets the user choose a video, and
//!    its answer (an identifier, or nothing when cancelled) arrives later.
//!
//! [`ImportFlow`] tracks where an import is in that conversation. Each import
//! has a [`RequestTicket`]; answers carrying any other ticket are stale and are
//! ignored.

mod gate;
mod picker;

pub use gate::ConfigPermissionGate;
pub use picker::{FilePicker, file_uri, scan_media};

use std::fmt;

use log::{debug, info};

use crate::error::{PlayerError, Result};

/// Identifies one import request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestTicket(u64);

impl fmt::Display for RequestTicket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "import#{}", self.0)
    }
}

pub trait PermissionGate {
    fn is_granted(&self) -> bool;

    /// Asks for the grant. The answer is delivered to
    /// [`ImportFlow::on_permission_result`] with the same ticket.
    fn request(&mut self, ticket: RequestTicket);
}

pub trait ResourcePicker {
    /// Lets the user choose a resource. The choice is delivered to
    /// [`ImportFlow::on_selection`] with the same ticket.
    fn pick(&mut self, ticket: RequestTicket);
}

/// Where an import is waiting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportStage {
    AwaitingPermission(RequestTicket),
    AwaitingSelection(RequestTicket),
}

#[derive(Debug, Default)]
pub struct ImportFlow {
    stage: Option<ImportStage>,
    last_ticket: u64,
}

impl ImportFlow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stage(&self) -> Option<ImportStage> {
        self.stage
    }

    /// Starts an import, replacing any import still in progress.
    pub fn request_import(
        &mut self,
        gate: &mut impl PermissionGate,
        picker: &mut impl ResourcePicker,
    ) -> ImportStage {
        self.last_ticket += 1;
        let ticket = RequestTicket(self.last_ticket);

        let stage = if gate.is_granted() {
            picker.pick(ticket);
            ImportStage::AwaitingSelection(ticket)
        } else {
            info!("Requesting storage permission for {}", ticket);
            gate.request(ticket);
            ImportStage::AwaitingPermission(ticket)
        };

        self.stage = Some(stage);
        stage
    }

    /// Continues an import once the permission gate has answered.
    ///
    /// Returns `Ok(None)` for an answer to a request that is no longer
    /// pending.
    ///
    /// # Errors
    ///
    /// Returns [`PlayerError::PermissionDenied`] if the grant was refused; the
    /// import ends.
    pub fn on_permission_result(
        &mut self,
        ticket: RequestTicket,
        granted: bool,
        picker: &mut impl ResourcePicker,
    ) -> Result<Option<ImportStage>> {
        if self.stage != Some(ImportStage::AwaitingPermission(ticket)) {
            debug!("Ignoring stale permission answer for {}", ticket);
            return Ok(None);
        }

        if !granted {
            self.stage = None;
            return Err(PlayerError::PermissionDenied);
        }

        picker.pick(ticket);
        let stage = ImportStage::AwaitingSelection(ticket);
        self.stage = Some(stage);
        Ok(Some(stage))
    }

    /// Completes an import with the picker's answer.
    ///
    /// Returns the chosen identifier, or `Ok(None)` for an answer to a request
    /// that is no longer pending.
    ///
    /// # Errors
    ///
    /// Returns [`PlayerError::NoSelectionMade`] if the picker was cancelled.
    pub fn on_selection(
        &mut self,
        ticket: RequestTicket,
        selection: Option<String>,
    ) -> Result<Option<String>> {
        if self.stage != Some(ImportStage::AwaitingSelection(ticket)) {
            debug!("Ignoring stale selection for {}", ticket);
            return Ok(None);
        }

        self.stage = None;
        selection.map(Some).ok_or(PlayerError::NoSelectionMade)
    }

    /// Abandons any import in progress; late answers to it are ignored.
    pub fn cancel(&mut self) {
        self.stage = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Gate {
        granted: bool,
        requested: Vec<RequestTicket>,
    }

    impl PermissionGate for Gate {
        fn is_granted(&self) -> bool {
            self.granted
        }

        fn request(&mut self, ticket: RequestTicket) {
            self.requested.push(ticket);
        }
    }

    #[derive(Default)]
    struct Picker {
        picked: Vec<RequestTicket>,
    }

    impl ResourcePicker for Picker {
        fn pick(&mut self, ticket: RequestTicket) {
            self.picked.push(ticket);
        }
    }

    #[test]
    fn granted_import_goes_straight_to_picker() {
        let mut flow = ImportFlow::new();
        let mut gate = Gate {
            granted: true,
            ..Default::default()
        };
        let mut picker = Picker::default();

        let stage = flow.request_import(&mut gate, &mut picker);
        let ImportStage::AwaitingSelection(ticket) = stage else {
            panic!("expected selection stage, got {:?}", stage);
        };

        assert!(gate.requested.is_empty());
        assert_eq!(picker.picked, vec![ticket]);
        assert_eq!(
            flow.on_selection(ticket, Some("file:///v/a.mp4".to_string())).unwrap(),
            Some("file:///v/a.mp4".to_string())
        );
        assert_eq!(flow.stage(), None);
    }

    #[test]
    fn permission_requested_before_picking() {
        let mut flow = ImportFlow::new();
        let mut gate = Gate::default();
        let mut picker = Picker::default();

        let ImportStage::AwaitingPermission(ticket) = flow.request_import(&mut gate, &mut picker) else {
            panic!("expected permission stage");
        };
        assert_eq!(gate.requested, vec![ticket]);
        assert!(picker.picked.is_empty());

        let stage = flow.on_permission_result(ticket, true, &mut picker).unwrap();
        assert_eq!(stage, Some(ImportStage::AwaitingSelection(ticket)));
        assert_eq!(picker.picked, vec![ticket]);
    }

    #[test]
    fn denied_permission_ends_import() {
        let mut flow = ImportFlow::new();
        let mut gate = Gate::default();
        let mut picker = Picker::default();

        let ImportStage::AwaitingPermission(ticket) = flow.request_import(&mut gate, &mut picker) else {
            panic!("expected permission stage");
        };

        assert!(matches!(
            flow.on_permission_result(ticket, false, &mut picker),
            Err(PlayerError::PermissionDenied)
        ));
        assert!(picker.picked.is_empty());
        assert_eq!(flow.stage(), None);
    }

    #[test]
    fn cancelled_picker_reports_no_selection() {
        let mut flow = ImportFlow::new();
        let mut gate = Gate {
            granted: true,
            ..Default::default()
        };
        let mut picker = Picker::default();

        let ImportStage::AwaitingSelection(ticket) = flow.request_import(&mut gate, &mut picker) else {
            panic!("expected selection stage");
        };

        assert!(matches!(
            flow.on_selection(ticket, None),
            Err(PlayerError::NoSelectionMade)
        ));
    }

    #[test]
    fn answers_to_superseded_requests_are_ignored() {
        let mut flow = ImportFlow::new();
        let mut gate = Gate {
            granted: true,
            ..Default::default()
        };
        let mut picker = Picker::default();

        let ImportStage::AwaitingSelection(first) = flow.request_import(&mut gate, &mut picker) else {
            panic!("expected selection stage");
        };
        let ImportStage::AwaitingSelection(second) = flow.request_import(&mut gate, &mut picker) else {
            panic!("expected selection stage");
        };

        assert_eq!(flow.on_selection(first, Some("old".to_string())).unwrap(), None);
        assert_eq!(
            flow.on_selection(second, Some("new".to_string())).unwrap(),
            Some("new".to_string())
        );
    }

    #[test]
    fn cancel_discards_late_answers() {
        let mut flow = ImportFlow::new();
        let mut gate = Gate::default();
        let mut picker = Picker::default();

        let ImportStage::AwaitingPermission(ticket) = flow.request_import(&mut gate, &mut picker) else {
            panic!("expected permission stage");
        };
        flow.cancel();

        assert_eq!(flow.on_permission_result(ticket, true, &mut picker).unwrap(), None);
        assert!(picker.picked.is_empty());
    }
}
