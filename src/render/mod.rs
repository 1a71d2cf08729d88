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
//! User interface rendering logic.
//!
//! This module translates the [`App`] state into `ratatui` widgets. The
//! primary entry point is [`draw`], called after every processed event.

mod icons;
mod player;
mod playlist;
mod prompt;

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout},
    style::Style,
    widgets::Paragraph,
};

use crate::{
    app::App,
    render::{player::draw_player, playlist::draw_playlist, prompt::draw_prompt},
};

/// Renders the user interface to the terminal frame.
///
/// The screen is split into the playlist, the player and a one line status
/// bar. An open permission prompt or file picker is drawn over the top.
pub(crate) fn draw(f: &mut Frame, app: &App) {
    let area = f.area();

    let outer = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(5),
            Constraint::Length(1),
        ])
        .split(area);

    draw_playlist(f, outer[0], app);
    draw_player(f, outer[1], app);

    let status = app.notice.as_deref().unwrap_or(
        "space play/pause  n/p next/previous  ,/. seek  enter play  a add  q quit",
    );
    let colour = if app.notice.is_some() {
        app.theme.notice_colour
    } else {
        app.theme.muted_colour
    };
    f.render_widget(
        Paragraph::new(format!(" {}", status)).style(
            Style::default()
                .fg(colour)
                .bg(app.theme.gauge_track_colour),
        ),
        outer[2],
    );

    draw_prompt(f, area, app);
}
