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
//! Render the playlist.

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Padding, Paragraph},
};

use crate::{app::App, render::icons::ICON_PLAY};

pub(crate) fn draw_playlist(f: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2), Constraint::Min(0)])
        .split(area);

    let playlist = app.player.playlist();

    let header_block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(Style::default().fg(app.theme.border_colour))
        .padding(Padding::horizontal(1));

    let header = Paragraph::new(format!("Playlist | {} videos", playlist.len()))
        .style(Style::default().fg(app.theme.text_colour))
        .block(header_block);
    f.render_widget(header, chunks[0]);

    let items: Vec<ListItem> = playlist
        .entries()
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            let is_current = playlist.current_index() == Some(index);
            let marker = if is_current { ICON_PLAY } else { " " };
            let style = if is_current {
                Style::default()
                    .fg(app.theme.accent_colour)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(app.theme.text_colour)
            };

            ListItem::new(Line::from(vec![
                Span::styled(format!(" {} ", marker), style),
                Span::styled(entry.display_name(), style),
            ]))
        })
        .collect();

    let list = List::new(items).highlight_style(Style::default().bg(app.theme.highlight_colour));

    let mut state = ListState::default()
        .with_selected((!playlist.is_empty()).then_some(app.highlighted));
    f.render_stateful_widget(list, chunks[1], &mut state);
}
