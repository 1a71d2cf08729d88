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
//! Render the import dialogs: the storage permission prompt and the file
//! picker, drawn as a popup over the rest of the interface.

use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Padding, Paragraph},
};
use reelist::model::display_name;

use crate::app::App;

pub(crate) fn draw_prompt(f: &mut Frame, area: Rect, app: &App) {
    if app.gate.prompt().is_some() {
        draw_permission(f, area, app);
    } else if app.picker.is_active() {
        draw_picker(f, area, app);
    }
}

fn draw_permission(f: &mut Frame, area: Rect, app: &App) {
    let popup = centered(area, 56, 5);

    let block = Block::default()
        .title(" Storage access ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.accent_colour))
        .style(Style::default().bg(app.theme.background_colour))
        .padding(Padding::horizontal(1));

    let text = Paragraph::new("Allow reading videos from your media folders?\n\n[y] allow   [n] deny")
        .style(Style::default().fg(app.theme.text_colour))
        .alignment(Alignment::Center)
        .block(block);

    f.render_widget(Clear, popup);
    f.render_widget(text, popup);
}

fn draw_picker(f: &mut Frame, area: Rect, app: &App) {
    let popup = centered(area, area.width.saturating_sub(8).min(80), area.height.saturating_sub(4).min(20));

    let block = Block::default()
        .title(" Add a video ")
        .title_bottom(" enter add  esc cancel ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.accent_colour))
        .style(Style::default().bg(app.theme.background_colour));

    f.render_widget(Clear, popup);

    let items = app.picker.items();
    if items.is_empty() {
        let empty = Paragraph::new("No videos found in the media folders")
            .style(Style::default().fg(app.theme.muted_colour))
            .alignment(Alignment::Center)
            .block(block);
        f.render_widget(empty, popup);
        return;
    }

    let list_items: Vec<ListItem> = items
        .iter()
        .map(|identifier| ListItem::new(format!(" {}", display_name(identifier))))
        .collect();

    let list = List::new(list_items)
        .block(block)
        .style(Style::default().fg(app.theme.text_colour))
        .highlight_style(
            Style::default()
                .bg(app.theme.highlight_colour)
                .add_modifier(Modifier::BOLD),
        );

    let mut state = ListState::default().with_selected(Some(app.picker.selected()));
    f.render_stateful_widget(list, popup, &mut state);
}

/// A rectangle of at most `width` by `height` in the middle of `area`.
fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
