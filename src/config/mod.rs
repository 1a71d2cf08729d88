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

//! Application configuration.
//!
//! This module manages the application configuration file, and the session
//! snapshot stored beside it.

use std::{path::PathBuf, time::Duration};

use log::warn;
use serde::{Deserialize, Serialize};

use crate::{model::SessionSnapshot, player::PlayerOptions};

const CONFIG_NAME: &str = "reelist";
const SESSION_NAME: &str = "session";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct AppConfig {
    pub version: u32,
    pub media_dirs: Vec<String>,
    pub database_file: String,
    pub log_file: String,
    pub tick_interval_millis: u64,
    pub seek_step_millis: u64,
    pub storage_access_granted: bool,
    pub resume_session: bool,
    pub auto_advance: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            version: 1,
            media_dirs: vec![],
            database_file: "reelist.db".to_string(),
            log_file: "reelist.log".to_string(),
            tick_interval_millis: 1000,
            seek_step_millis: 10_000,
            storage_access_granted: false,
            resume_session: true,
            auto_advance: false,
        }
    }
}

impl AppConfig {
    pub fn media_dirs(&self) -> Vec<PathBuf> {
        self.media_dirs.iter().map(PathBuf::from).collect()
    }

    pub fn player_options(&self) -> PlayerOptions {
        PlayerOptions {
            tick_interval: Duration::from_millis(self.tick_interval_millis.max(1)),
            auto_advance: self.auto_advance,
        }
    }
}

pub fn load_config() -> AppConfig {
    confy::load(CONFIG_NAME, None).unwrap_or_default()
}

pub fn save_config(cfg: &AppConfig) -> Result<(), confy::ConfyError> {
    confy::store(CONFIG_NAME, None, cfg)
}

/// Resolves a file named in the config. Relative names live beside the
/// config file.
pub fn data_path(file: &str) -> PathBuf {
    let path = PathBuf::from(file);
    if path.is_absolute() {
        return path;
    }

    match confy::get_configuration_file_path(CONFIG_NAME, None) {
        Ok(config_file) => config_file
            .parent()
            .map(|dir| dir.join(&path))
            .unwrap_or(path),
        Err(e) => {
            warn!("Cannot locate config directory, using {}: {}", file, e);
            path
        }
    }
}

/// Loads the snapshot saved when the application last exited, if any.
pub fn load_session() -> Option<SessionSnapshot> {
    match confy::load::<SessionSnapshot>(CONFIG_NAME, SESSION_NAME) {
        Ok(snapshot) if !snapshot.current_identifier.is_empty() => Some(snapshot),
        Ok(_) => None,
        Err(e) => {
            warn!("Ignoring unreadable session snapshot: {}", e);
            None
        }
    }
}

pub fn save_session(snapshot: &SessionSnapshot) -> Result<(), confy::ConfyError> {
    confy::store(CONFIG_NAME, SESSION_NAME, snapshot)
}
