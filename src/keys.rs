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

//! Keyboard input routing.
//!
//! An open permission prompt takes all keys first, then an open file picker,
//! and only then the global transport and navigation keys.

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};
use log::info;
use reelist::model::display_name;

use crate::app::{App, AppEvent};

/// Maps keyboard input to player operations.
///
/// # Errors
///
/// Returns an error if the exit request cannot be sent to the event loop.
/// Player failures are shown on the status line instead.
pub(crate) fn process_key_event(app: &mut App, key: KeyEvent) -> Result<()> {
    if key.kind != KeyEventKind::Press {
        return Ok(());
    }

    if app.gate.prompt().is_some() {
        process_prompt_key_event(app, key);
        return Ok(());
    }

    if app.picker.is_active() {
        process_picker_key_event(app, key);
        return Ok(());
    }

    process_global_key_event(app, key)
}

fn process_prompt_key_event(app: &mut App, key: KeyEvent) {
    let granted = match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') => true,
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => false,
        _ => return,
    };

    if let Some(ticket) = app.gate.answer(granted) {
        info!("Storage permission answered for {}: {}", ticket, granted);
        let result = app
            .player
            .on_permission_result(ticket, granted, &mut app.picker);
        app.report(result);
    }
}

fn process_picker_key_event(app: &mut App, key: KeyEvent) {
    let answer = match key.code {
        KeyCode::Char('j') | KeyCode::Down => {
            app.picker.select_next();
            None
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.picker.select_previous();
            None
        }
        KeyCode::Enter => app.picker.confirm(),
        KeyCode::Esc | KeyCode::Char('q') => app.picker.cancel(),
        _ => None,
    };

    if let Some((ticket, selection)) = answer {
        match app.player.on_selection(ticket, selection) {
            Ok(Some(identifier)) => {
                app.notice = Some(format!("Added {}", display_name(&identifier)));
            }
            result => app.report(result),
        }
        app.follow_current();
    }
}

fn process_global_key_event(app: &mut App, key: KeyEvent) -> Result<()> {
    let seek_step = i64::try_from(app.config.seek_step_millis).unwrap_or(i64::MAX);

    let result = match key.code {
        KeyCode::Char('q') => {
            app.event_tx.send(AppEvent::ExitApplication)?;
            Ok(())
        }

        // Transport
        KeyCode::Char(' ') => app.player.play_pause(),
        KeyCode::Char('n') => app.player.next(),
        KeyCode::Char('p') => app.player.previous(),
        KeyCode::Char(',') | KeyCode::Left => app.player.seek_relative(-seek_step),
        KeyCode::Char('.') | KeyCode::Right => app.player.seek_relative(seek_step),

        // Playlist rows
        KeyCode::Char('j') | KeyCode::Down => {
            let len = app.player.playlist().len();
            if len > 0 {
                app.highlighted = (app.highlighted + 1) % len;
            }
            return Ok(());
        }
        KeyCode::Char('k') | KeyCode::Up => {
            let len = app.player.playlist().len();
            if len > 0 {
                app.highlighted = app.highlighted.checked_sub(1).unwrap_or(len - 1);
            }
            return Ok(());
        }
        KeyCode::Enter => app.player.play_index(app.highlighted),

        KeyCode::Char('a') => {
            app.notice = None;
            app.player.request_import(&mut app.gate, &mut app.picker);
            return Ok(());
        }

        _ => return Ok(()),
    };

    app.notice = None;
    app.report(result);
    app.follow_current();

    Ok(())
}
