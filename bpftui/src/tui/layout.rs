//! Responsive layout engine for the TUI.
//!
//! Every screen is a title bar, a bordered body and a help bar. The chrome
//! shrinks on short terminals so the body keeps as many rows as possible,
//! from minimal (under 12 rows) to full-screen.

use ratatui::layout::{Constraint, Direction, Layout, Rect};

// Width breakpoint: below this the help overlay takes nearly the full width
const WIDTH_NARROW: u16 = 60;

// Height breakpoints
const HEIGHT_MINIMAL: u16 = 12; // Below this: body only
const HEIGHT_COMPACT: u16 = 20; // Below this: unbordered one-line chrome

/// Rows taken by the body's own border
const BODY_BORDER_ROWS: u16 = 2;

/// Terminal size classification for layout decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminalSize {
    /// Height < 12: body only
    Minimal,
    /// Height 12-20: one-line title and help bar
    Compact,
    /// Height > 20: bordered title and help bar
    Normal,
}

/// Computed layout configuration based on terminal dimensions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutConfig {
    pub size: TerminalSize,
    /// Rows for the title bar (0 hides it)
    pub header_height: u16,
    /// Rows for the help bar (0 hides it)
    pub help_bar_height: u16,
    /// Draw borders around title and help bar
    pub bordered_chrome: bool,
    /// Help overlay width as a percentage of the screen
    pub popup_width_pct: u16,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            size: TerminalSize::Normal,
            header_height: 3,
            help_bar_height: 3,
            bordered_chrome: true,
            popup_width_pct: 70,
        }
    }
}

impl LayoutConfig {
    /// Rows available inside the body block
    #[must_use]
    pub fn body_rows(&self, height: u16) -> usize {
        usize::from(
            height
                .saturating_sub(self.header_height)
                .saturating_sub(self.help_bar_height)
                .saturating_sub(BODY_BORDER_ROWS),
        )
    }

    /// Split the screen into title, body and help bar areas
    #[must_use]
    pub fn split(&self, area: Rect) -> [Rect; 3] {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(self.header_height),
                Constraint::Min(0),
                Constraint::Length(self.help_bar_height),
            ])
            .split(area);
        [chunks[0], chunks[1], chunks[2]]
    }
}

/// Compute layout configuration based on terminal dimensions.
///
/// # Breakpoints
///
/// | Terminal Size | Behavior |
/// |---------------|----------|
/// | Width < 60    | Help overlay at 95% width |
/// | Height < 12   | Minimal: body only |
/// | Height 12-20  | Compact: one-line title and help bar |
/// | Height > 20   | Full layout |
#[must_use]
pub fn compute_layout(width: u16, height: u16) -> LayoutConfig {
    let mut config = LayoutConfig::default();

    if width < WIDTH_NARROW {
        config.popup_width_pct = 95;
    }

    if height < HEIGHT_MINIMAL {
        config.size = TerminalSize::Minimal;
        config.header_height = 0;
        config.help_bar_height = 0;
        config.bordered_chrome = false;
    } else if height <= HEIGHT_COMPACT {
        config.size = TerminalSize::Compact;
        config.header_height = 1;
        config.help_bar_height = 1;
        config.bordered_chrome = false;
    }

    config
}
