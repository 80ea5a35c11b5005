//! Filterable list panel
//!
//! One component backs the menu, the program list and the map list. Items
//! render on two lines, like the hotspot rows they replaced:
//!
//! ```text
//! ▶ [12] xdp_firewall
//!     Type: xdp | Tag: a04f5eef06a7f555
//! ```
//!
//! # Filter states
//!
//! ```text
//!  Unfiltered ──/──▶ Filtering ──Enter──▶ Applied
//!      ▲               │  ▲                  │
//!      └──Esc/empty────┘  └────────/─────────┘
//! ```
//!
//! While `Filtering`, printable keys edit the query and the visible set
//! narrows live (case-insensitive substring match on each item's filter
//! key). Selections are only reported outside `Filtering`.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::keys::{action_for, Action};
use super::theme::{cursor_style, HUD_GREEN, STYLE_DIM, STYLE_ERROR, STYLE_HEADING, STYLE_KEY};
use crate::domain::{MapInfo, ProgramInfo};

/// Rows each item occupies on screen
const LINES_PER_ITEM: usize = 2;

/// Shown when a non-empty list has no item matching the filter
pub const NO_MATCH_MESSAGE: &str = "No items match the filter";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListItem {
    pub id: u32,
    pub primary: String,
    pub secondary: String,
    pub filter_key: String,
}

impl ListItem {
    #[must_use]
    pub fn new(id: u32, primary: impl Into<String>, secondary: impl Into<String>) -> Self {
        let primary = primary.into();
        Self { id, filter_key: primary.clone(), primary, secondary: secondary.into() }
    }
}

impl From<&ProgramInfo> for ListItem {
    fn from(p: &ProgramInfo) -> Self {
        Self {
            id: p.id.0,
            primary: format!("[{}] {}", p.id, p.name),
            secondary: format!("Type: {} | Tag: {}", p.prog_type, p.tag),
            filter_key: p.name.clone(),
        }
    }
}

impl From<&MapInfo> for ListItem {
    fn from(m: &MapInfo) -> Self {
        Self {
            id: m.id.0,
            primary: format!("[{}] {}", m.id, m.name),
            secondary: format!(
                "Type: {} | Key: {} | Value: {} | Max: {}",
                m.map_type, m.key_size, m.value_size, m.max_entries
            ),
            filter_key: m.name.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FilterState {
    #[default]
    Unfiltered,
    Filtering,
    Applied,
}

/// What a key press did to the list
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListOutcome {
    Nothing,
    Selected(ListItem),
    FilterChanged,
}

#[derive(Debug, Clone)]
pub struct FilterableList {
    title: &'static str,
    empty_message: &'static str,
    filterable: bool,
    items: Vec<ListItem>,
    /// Indices into `items` that pass the filter, in item order
    visible: Vec<usize>,
    /// Index into `visible`
    cursor: usize,
    filter: FilterState,
    query: String,
    error: Option<String>,
    height: usize,
    offset: usize,
}

impl FilterableList {
    #[must_use]
    pub fn new(title: &'static str, empty_message: &'static str, filterable: bool) -> Self {
        Self {
            title,
            empty_message,
            filterable,
            items: Vec::new(),
            visible: Vec::new(),
            cursor: 0,
            filter: FilterState::Unfiltered,
            query: String::new(),
            error: None,
            height: 0,
            offset: 0,
        }
    }

    /// Replace the collection; filter and cursor start over
    pub fn set_items(&mut self, items: Vec<ListItem>) {
        self.items = items;
        self.error = None;
        self.reset_filter();
    }

    /// Show a fetch failure in place of the items
    pub fn set_error(&mut self, message: impl Into<String>) {
        self.items.clear();
        self.error = Some(message.into());
        self.reset_filter();
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    pub fn reset_filter(&mut self) {
        self.filter = FilterState::Unfiltered;
        self.query.clear();
        self.visible = (0..self.items.len()).collect();
        self.cursor = 0;
        self.offset = 0;
    }

    pub fn set_height(&mut self, height: usize) {
        self.height = height;
        self.follow_cursor();
    }

    #[must_use]
    pub fn title(&self) -> &'static str {
        self.title
    }

    #[must_use]
    pub fn items(&self) -> &[ListItem] {
        &self.items
    }

    /// Items passing the current filter, in display order
    pub fn visible_items(&self) -> impl Iterator<Item = &ListItem> {
        self.visible.iter().map(|&i| &self.items[i])
    }

    #[must_use]
    pub fn visible_len(&self) -> usize {
        self.visible.len()
    }

    #[must_use]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    #[must_use]
    pub fn selected(&self) -> Option<&ListItem> {
        self.visible.get(self.cursor).map(|&i| &self.items[i])
    }

    #[must_use]
    pub fn filter_state(&self) -> FilterState {
        self.filter
    }

    #[must_use]
    pub fn is_filtering(&self) -> bool {
        self.filter == FilterState::Filtering
    }

    #[must_use]
    pub fn query(&self) -> &str {
        &self.query
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn handle_input(&mut self, key: &KeyEvent) -> ListOutcome {
        if self.is_filtering() {
            return self.handle_filter_key(key);
        }

        match action_for(key) {
            Some(Action::Up) => self.move_up(1),
            Some(Action::Down) => self.move_down(1),
            Some(Action::PageUp) => self.move_up(self.rows_per_page()),
            Some(Action::PageDown) => self.move_down(self.rows_per_page()),
            Some(Action::Top) => self.move_up(usize::MAX),
            Some(Action::Bottom) => self.move_down(usize::MAX),
            Some(Action::Filter) if self.filterable && !self.items.is_empty() => {
                // An applied query stays editable; otherwise start from nothing
                self.filter = FilterState::Filtering;
                // The prompt takes rows from the page
                self.follow_cursor();
                return ListOutcome::FilterChanged;
            }
            Some(Action::Confirm) => {
                if let Some(item) = self.selected() {
                    return ListOutcome::Selected(item.clone());
                }
            }
            _ => {}
        }
        ListOutcome::Nothing
    }

    fn handle_filter_key(&mut self, key: &KeyEvent) -> ListOutcome {
        match key.code {
            KeyCode::Esc => self.reset_filter(),
            KeyCode::Enter => {
                if self.query.is_empty() {
                    self.reset_filter();
                } else {
                    self.filter = FilterState::Applied;
                }
            }
            KeyCode::Backspace => {
                if self.query.pop().is_some() {
                    self.refilter();
                } else {
                    self.reset_filter();
                }
            }
            KeyCode::Up => {
                self.move_up(1);
                return ListOutcome::Nothing;
            }
            KeyCode::Down => {
                self.move_down(1);
                return ListOutcome::Nothing;
            }
            KeyCode::Char(c)
                if !key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
            {
                self.query.push(c);
                self.refilter();
            }
            _ => return ListOutcome::Nothing,
        }
        ListOutcome::FilterChanged
    }

    fn refilter(&mut self) {
        let needle = self.query.to_lowercase();
        self.visible = self
            .items
            .iter()
            .enumerate()
            .filter(|(_, item)| item.filter_key.to_lowercase().contains(&needle))
            .map(|(i, _)| i)
            .collect();
        self.cursor = 0;
        self.offset = 0;
    }

    fn move_up(&mut self, by: usize) {
        self.cursor = self.cursor.saturating_sub(by);
        self.follow_cursor();
    }

    fn move_down(&mut self, by: usize) {
        let last = self.visible.len().saturating_sub(1);
        self.cursor = self.cursor.saturating_add(by).min(last);
        self.follow_cursor();
    }

    /// Rows above the items: filter prompt or applied-filter summary plus a gap
    fn header_rows(&self) -> usize {
        match self.filter {
            FilterState::Unfiltered => 0,
            FilterState::Filtering | FilterState::Applied => 2,
        }
    }

    fn rows_per_page(&self) -> usize {
        (self.height.saturating_sub(self.header_rows()) / LINES_PER_ITEM).max(1)
    }

    fn follow_cursor(&mut self) {
        self.offset = self.offset.min(self.cursor);
        self.offset = visible_scroll_offset(self.cursor, self.offset, self.rows_per_page());
    }

    /// Body lines for the current state, without the surrounding block
    #[must_use]
    pub fn content_lines(&self) -> Vec<Line<'static>> {
        if let Some(err) = &self.error {
            return vec![Line::from(Span::styled(format!("Error: {err}"), STYLE_ERROR))];
        }
        if self.items.is_empty() {
            return vec![Line::from(Span::styled(self.empty_message, STYLE_DIM))];
        }

        let mut lines = Vec::new();
        match self.filter {
            FilterState::Unfiltered => {}
            FilterState::Filtering => {
                lines.push(Line::from(vec![
                    Span::styled("/ ", STYLE_KEY),
                    Span::styled(format!("{}_", self.query), Style::new().fg(HUD_GREEN)),
                ]));
                lines.push(Line::from(""));
            }
            FilterState::Applied => {
                lines.push(Line::from(vec![
                    Span::styled("Filter: ", STYLE_KEY),
                    Span::styled(self.query.clone(), Style::new().fg(HUD_GREEN)),
                    Span::styled(
                        format!("  ({}/{})", self.visible.len(), self.items.len()),
                        STYLE_DIM,
                    ),
                ]));
                lines.push(Line::from(""));
            }
        }

        if self.visible.is_empty() {
            lines.push(Line::from(Span::styled(NO_MATCH_MESSAGE, STYLE_DIM)));
            return lines;
        }

        let rows = self.rows_per_page();
        for (pos, item) in self.visible_items().enumerate().skip(self.offset).take(rows) {
            let (marker, style) = cursor_style(pos == self.cursor);
            lines.push(Line::from(vec![
                Span::styled(marker, style),
                Span::styled(item.primary.clone(), style),
            ]));
            lines.push(Line::from(Span::styled(format!("    {}", item.secondary), STYLE_DIM)));
        }
        lines
    }

    pub fn render(&self, f: &mut Frame, area: Rect) {
        let paragraph = Paragraph::new(self.content_lines()).block(
            Block::default()
                .borders(Borders::ALL)
                .title(Span::styled(format!(" {} ", self.title), STYLE_HEADING))
                .border_style(Style::new().fg(HUD_GREEN)),
        );
        f.render_widget(paragraph, area);
    }
}

/// Calculate scroll offset to keep selected item visible
fn visible_scroll_offset(selected: usize, current_offset: usize, visible_count: usize) -> usize {
    // Scroll down if selected is beyond visible window
    if selected >= current_offset + visible_count {
        selected.saturating_sub(visible_count - 1)
    } else {
        current_offset
    }
}
