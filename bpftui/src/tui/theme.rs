//! TUI color theme
//!
//! Green-on-dark palette shared by every panel, plus the row styles
//! lists and cross-reference sections use for the cursor

use ratatui::style::{Color, Modifier, Style};

// HUD color scheme (F-35 inspired)
pub const HUD_GREEN: Color = Color::Rgb(0, 255, 0);
pub const CRITICAL_RED: Color = Color::Rgb(255, 0, 0);
pub const CAUTION_AMBER: Color = Color::Rgb(255, 191, 0);
pub const INFO_DIM: Color = Color::Rgb(0, 180, 0);
pub const BACKGROUND: Color = Color::Rgb(0, 20, 0);

/// Cursor marker in lists and cross-reference sections
pub const CURSOR_MARKER: &str = "▶ ";
pub const NO_MARKER: &str = "  ";

pub const STYLE_HEADING: Style = Style::new().fg(HUD_GREEN).add_modifier(Modifier::BOLD);
pub const STYLE_LABEL: Style = Style::new().fg(CAUTION_AMBER).add_modifier(Modifier::BOLD);
pub const STYLE_DIM: Style = Style::new().fg(INFO_DIM);
pub const STYLE_KEY: Style = Style::new().fg(CAUTION_AMBER);
pub const STYLE_TEXT: Style = Style::new().fg(Color::White);
pub const STYLE_ERROR: Style = Style::new().fg(CRITICAL_RED).add_modifier(Modifier::BOLD);
pub const STYLE_SELECTED: Style =
    Style::new().fg(CAUTION_AMBER).add_modifier(Modifier::BOLD.union(Modifier::REVERSED));

/// Marker and style for a row, depending on whether the cursor is on it
#[must_use]
pub fn cursor_style(selected: bool) -> (&'static str, Style) {
    if selected {
        (CURSOR_MARKER, STYLE_SELECTED)
    } else {
        (NO_MARKER, Style::new().fg(HUD_GREEN))
    }
}
