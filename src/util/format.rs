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

/// Formats a duration in milliseconds into a human-readable string.
///
/// Durations under an hour are shown as `MM:SS`, longer ones as `H:MM:SS`.
/// Partial seconds are truncated.
///
/// # Arguments
///
/// * `millis` - The duration to format.
///
/// # Examples
///
/// ```
/// use reelist::util::format::format_time;
///
/// assert_eq!(format_time(65_000), "01:05");
/// assert_eq!(format_time(3_600_000), "1:00:00");
/// ```
pub fn format_time(millis: u64) -> String {
    let total_seconds = millis / 1000;
    let hours = total_seconds / 3600;
    let mins = (total_seconds / 60) % 60;
    let secs = total_seconds % 60;

    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, mins, secs)
    } else {
        format!("{:02}:{:02}", mins, secs)
    }
}

/// Formats a progress readout such as `01:05 / 03:20`.
pub fn format_progress(position_millis: u64, duration_millis: u64) -> String {
    format!(
        "{} / {}",
        format_time(position_millis),
        format_time(duration_millis)
    )
}
