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
//! Render the video player interface.
//!
//! This module renders the current video, its playback state, the elapsed and
//! remaining time and a progress bar.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Padding, Paragraph},
};
use reelist::{
    playback::PlaybackState,
    util::format::{format_progress, format_time},
};

use crate::{
    app::App,
    render::icons::{ICON_LOADING, ICON_PAUSE, ICON_PLAY, ICON_STOP},
};

/// Renders the main player widget including video info and progress.
pub(crate) fn draw_player(f: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .borders(Borders::TOP | Borders::BOTTOM)
        .border_style(Style::default().fg(app.theme.border_colour))
        .padding(Padding::horizontal(1));

    let inner_area = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(inner_area);

    let info_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(30)])
        .split(chunks[0]);

    let Some(entry) = app.player.current() else {
        f.render_widget(
            Paragraph::new("No videos, press a to add one").fg(app.theme.muted_colour),
            info_chunks[0],
        );
        return;
    };

    let state = app.player.state();
    let icon = match state {
        PlaybackState::Playing => ICON_PLAY,
        PlaybackState::Paused => ICON_PAUSE,
        PlaybackState::Preparing => ICON_LOADING,
        PlaybackState::Idle | PlaybackState::Stopped => ICON_STOP,
    };

    let bold = Style::default().add_modifier(Modifier::BOLD);

    let video_line = Line::from(vec![
        Span::styled(format!(" {} ", icon), bold).fg(app.theme.text_colour),
        Span::styled(entry.display_name(), bold).fg(app.theme.accent_colour),
        Span::raw(format!("  {}", state)).fg(app.theme.muted_colour),
    ]);
    f.render_widget(Paragraph::new(video_line), info_chunks[0]);

    let progress = app.player.progress();
    let remaining = progress
        .duration_millis
        .saturating_sub(progress.position_millis);

    let time_line = Line::from(vec![
        Span::styled(
            format_progress(progress.position_millis, progress.duration_millis),
            bold,
        )
        .fg(app.theme.accent_colour),
        Span::styled(" (-", bold).fg(app.theme.text_colour),
        Span::styled(format_time(remaining), bold).fg(app.theme.accent_colour),
        Span::styled(")", bold).fg(app.theme.text_colour),
    ]);
    f.render_widget(
        Paragraph::new(time_line).alignment(Alignment::Right),
        info_chunks[1],
    );

    let ratio = if progress.duration_millis > 0 {
        progress.position_millis as f64 / progress.duration_millis as f64
    } else {
        0.0
    };

    let position_gauge = Gauge::default()
        .gauge_style(
            Style::default()
                .fg(app.theme.accent_colour)
                .bg(app.theme.gauge_track_colour),
        )
        .ratio(ratio.clamp(0.0, 1.0))
        .label("")
        .use_unicode(true);

    f.render_widget(position_gauge, chunks[2]);
}
