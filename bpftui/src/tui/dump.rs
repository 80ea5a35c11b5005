//! Map dump panel
//!
//! Shows every key/value pair of one map as hex, or a placeholder.
//! Rendering priority is error, then loading, then "no entries", then the
//! entries themselves. Lines are built once per state change; a frame only
//! copies the rows that fit on screen.

use crossterm::event::KeyEvent;
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::keys::action_for;
use super::scroll::ScrollRegion;
use super::theme::{HUD_GREEN, STYLE_DIM, STYLE_ERROR, STYLE_HEADING, STYLE_LABEL};
use crate::domain::{format_hex, MapEntry, MapId};

pub const LOADING_MESSAGE: &str = "Loading map contents...";
pub const EMPTY_MESSAGE: &str = "Map contains no entries";
pub const SEPARATOR: &str = "---";

#[derive(Debug, Clone, Default)]
pub struct DumpView {
    target: Option<MapId>,
    label: Option<String>,
    entries: Vec<MapEntry>,
    loading: bool,
    error: Option<String>,
    lines: Vec<Line<'static>>,
    scroll: ScrollRegion,
}

impl DumpView {
    /// Start a fetch for `id`; previous entries and error are dropped
    pub fn begin_load(&mut self, id: MapId, label: Option<String>) {
        self.target = Some(id);
        self.label = label.filter(|l| !l.is_empty());
        self.entries.clear();
        self.error = None;
        self.loading = true;
        self.scroll.reset();
        self.refresh_scroll();
    }

    pub fn set_entries(&mut self, entries: Vec<MapEntry>) {
        self.entries = entries;
        self.loading = false;
        self.error = None;
        self.refresh_scroll();
    }

    pub fn set_error(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
        self.loading = false;
        self.refresh_scroll();
    }

    pub fn clear_error(&mut self) {
        self.error = None;
        self.refresh_scroll();
    }

    pub fn set_height(&mut self, height: usize) {
        self.scroll.set_height(height);
    }

    fn refresh_scroll(&mut self) {
        self.lines = self.build_lines();
        self.scroll.set_content_len(self.lines.len());
    }

    #[must_use]
    pub fn entries(&self) -> &[MapEntry] {
        &self.entries
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    #[must_use]
    pub fn scroll_offset(&self) -> usize {
        self.scroll.offset()
    }

    /// Every bound key scrolls; nothing here navigates
    pub fn handle_input(&mut self, key: &KeyEvent) {
        if let Some(action) = action_for(key) {
            self.scroll.handle(action);
        }
    }

    #[must_use]
    pub fn title(&self) -> String {
        match (&self.label, self.target) {
            (Some(name), Some(id)) => format!("Map Dump: {name} (ID: {id})"),
            (None, Some(id)) => format!("Map Dump: ID {id}"),
            _ => "Map Dump".to_string(),
        }
    }

    fn build_lines(&self) -> Vec<Line<'static>> {
        if let Some(err) = &self.error {
            return vec![Line::from(Span::styled(format!("Error: {err}"), STYLE_ERROR))];
        }
        if self.loading {
            return vec![Line::from(Span::styled(LOADING_MESSAGE, STYLE_DIM))];
        }
        if self.entries.is_empty() {
            return vec![Line::from(Span::styled(EMPTY_MESSAGE, STYLE_DIM))];
        }

        let value_style = Style::new().fg(HUD_GREEN);
        let mut lines = Vec::with_capacity(self.entries.len() * 3);
        for (i, entry) in self.entries.iter().enumerate() {
            if i > 0 {
                lines.push(Line::from(Span::styled(SEPARATOR, STYLE_DIM)));
            }
            lines.push(Line::from(vec![
                Span::styled("Key:   ", STYLE_LABEL),
                Span::styled(format_hex(&entry.key), value_style),
            ]));
            lines.push(Line::from(vec![
                Span::styled("Value: ", STYLE_LABEL),
                Span::styled(format_hex(&entry.value), value_style),
            ]));
        }
        lines
    }

    #[must_use]
    pub fn content_lines(&self) -> &[Line<'static>] {
        &self.lines
    }

    /// At most `rows` lines starting at the scroll offset
    #[must_use]
    pub fn visible_lines(&self, rows: usize) -> &[Line<'static>] {
        let start = self.scroll.offset().min(self.lines.len());
        let end = start.saturating_add(rows).min(self.lines.len());
        &self.lines[start..end]
    }

    pub fn render(&self, f: &mut Frame, area: Rect) {
        let rows = usize::from(area.height.saturating_sub(2));
        let paragraph = Paragraph::new(self.visible_lines(rows).to_vec()).block(
            Block::default()
                .borders(Borders::ALL)
                .title(Span::styled(format!(" {} ", self.title()), STYLE_HEADING))
                .border_style(Style::new().fg(HUD_GREEN)),
        );
        f.render_widget(paragraph, area);
    }
}
