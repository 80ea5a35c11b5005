//! Detail panel: one record's fields plus navigable cross-references
//!
//! A program's cross-references are its associated maps; a map has a single
//! "Dump Contents" action that targets the map itself. Either way, confirming
//! reports the referenced [`MapId`] and the navigation controller decides
//! which view opens.

use crossterm::event::KeyEvent;
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::keys::{action_for, Action};
use super::scroll::ScrollRegion;
use super::theme::{cursor_style, HUD_GREEN, STYLE_DIM, STYLE_ERROR, STYLE_HEADING, STYLE_LABEL};
use crate::domain::{MapId, MapInfo, ProgramInfo};

/// Width labels are padded to so values line up
const LABEL_WIDTH: usize = 13;

/// Shown for fields the kernel did not report
pub const UNKNOWN: &str = "-";

/// Blank line and section heading between the fields and the first reference
const REFS_HEADER_ROWS: usize = 2;

fn or_unknown(value: &str) -> String {
    if value.is_empty() {
        UNKNOWN.to_string()
    } else {
        value.to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrossRef {
    pub target: MapId,
    pub label: String,
}

/// Renderable form of a program or map
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailRecord {
    pub id: u32,
    pub name: String,
    pub title: String,
    pub fields: Vec<(&'static str, String)>,
    pub refs_heading: &'static str,
    pub refs: Vec<CrossRef>,
    pub empty_refs: &'static str,
    pub refs_hint: &'static str,
}

impl From<&ProgramInfo> for DetailRecord {
    fn from(p: &ProgramInfo) -> Self {
        Self {
            id: p.id.0,
            name: p.name.clone(),
            title: format!("Program: {}", p.name),
            fields: vec![
                ("ID", p.id.to_string()),
                ("Name", p.name.clone()),
                ("Type", p.prog_type.clone()),
                ("Tag", p.tag.clone()),
                ("GPL", if p.gpl { "Yes" } else { "No" }.to_string()),
                ("Loaded At", or_unknown(&p.loaded_at)),
                ("UID", p.uid.map_or_else(|| UNKNOWN.to_string(), |u| u.to_string())),
                ("Bytes Xlated", p.bytes_xlated.to_string()),
                ("Bytes JIT", p.bytes_jited.to_string()),
                ("MemLock", p.memlock.to_string()),
            ],
            refs_heading: "Associated Maps",
            refs: p
                .map_ids
                .iter()
                .map(|&id| CrossRef { target: id, label: format!("Map ID: {id}") })
                .collect(),
            empty_refs: "No associated maps",
            refs_hint: "Press Enter to view map details",
        }
    }
}

impl From<&MapInfo> for DetailRecord {
    fn from(m: &MapInfo) -> Self {
        Self {
            id: m.id.0,
            name: m.name.clone(),
            title: format!("Map: {}", m.name),
            fields: vec![
                ("ID", m.id.to_string()),
                ("Name", m.name.clone()),
                ("Type", m.map_type.clone()),
                ("Key Size", m.key_size.to_string()),
                ("Value Size", m.value_size.to_string()),
                ("Max Entries", m.max_entries.to_string()),
                ("Flags", m.flags.to_string()),
                ("MemLock", m.memlock.to_string()),
                ("Loaded At", or_unknown(&m.loaded_at)),
                ("UID", m.uid.map_or_else(|| UNKNOWN.to_string(), |u| u.to_string())),
            ],
            refs_heading: "Actions",
            refs: vec![CrossRef { target: m.id, label: "Dump Contents".to_string() }],
            empty_refs: "",
            refs_hint: "Press Enter to dump map contents",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetailOutcome {
    Nothing,
    Follow(MapId),
}

#[derive(Debug, Clone)]
pub struct DetailView {
    /// Heading shown before any record is loaded
    placeholder: &'static str,
    record: Option<DetailRecord>,
    cursor: Option<usize>,
    error: Option<String>,
    scroll: ScrollRegion,
}

impl DetailView {
    #[must_use]
    pub fn new(placeholder: &'static str) -> Self {
        Self { placeholder, record: None, cursor: None, error: None, scroll: ScrollRegion::default() }
    }

    pub fn set_record(&mut self, record: DetailRecord) {
        self.cursor = if record.refs.is_empty() { None } else { Some(0) };
        self.record = Some(record);
        self.error = None;
        self.scroll.reset();
        self.refresh_scroll();
    }

    /// Show a fetch failure instead of a record
    pub fn set_error(&mut self, message: impl Into<String>) {
        self.record = None;
        self.cursor = None;
        self.error = Some(message.into());
        self.scroll.reset();
        self.refresh_scroll();
    }

    pub fn clear_error(&mut self) {
        self.error = None;
        self.refresh_scroll();
    }

    pub fn set_height(&mut self, height: usize) {
        self.scroll.set_height(height);
        self.reveal_cursor();
    }

    /// Keep the cursor row on screen
    fn reveal_cursor(&mut self) {
        if let (Some(record), Some(cursor)) = (&self.record, self.cursor) {
            self.scroll.reveal(record.fields.len() + REFS_HEADER_ROWS + cursor);
        }
    }

    fn refresh_scroll(&mut self) {
        let len = self.content_lines().len();
        self.scroll.set_content_len(len);
    }

    #[must_use]
    pub fn record(&self) -> Option<&DetailRecord> {
        self.record.as_ref()
    }

    #[must_use]
    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    #[must_use]
    pub fn scroll_offset(&self) -> usize {
        self.scroll.offset()
    }

    pub fn handle_input(&mut self, key: &KeyEvent) -> DetailOutcome {
        let Some(action) = action_for(key) else {
            return DetailOutcome::Nothing;
        };
        let ref_count = self.record.as_ref().map_or(0, |r| r.refs.len());

        match (action, self.cursor) {
            (Action::Up, Some(cursor)) => {
                self.cursor = Some(cursor.saturating_sub(1));
                self.reveal_cursor();
            }
            (Action::Down, Some(cursor)) => {
                self.cursor = Some((cursor + 1).min(ref_count - 1));
                self.reveal_cursor();
            }
            (Action::Confirm, Some(cursor)) => {
                if let Some(r) = self.record.as_ref().and_then(|r| r.refs.get(cursor)) {
                    return DetailOutcome::Follow(r.target);
                }
            }
            (Action::Confirm, None) => {}
            // Without cross-references up/down scroll the body instead
            (other, _) => {
                self.scroll.handle(other);
            }
        }
        DetailOutcome::Nothing
    }

    #[must_use]
    pub fn title(&self) -> String {
        self.record.as_ref().map_or_else(|| self.placeholder.to_string(), |r| r.title.clone())
    }

    #[must_use]
    pub fn content_lines(&self) -> Vec<Line<'static>> {
        if let Some(err) = &self.error {
            return vec![Line::from(Span::styled(format!("Error: {err}"), STYLE_ERROR))];
        }
        let Some(record) = &self.record else {
            return vec![Line::from(Span::styled("Nothing selected", STYLE_DIM))];
        };

        let mut lines: Vec<Line<'static>> = record
            .fields
            .iter()
            .map(|(label, value)| {
                Line::from(vec![
                    Span::styled(format!("{:<LABEL_WIDTH$}", format!("{label}:")), STYLE_LABEL),
                    Span::styled(value.clone(), Style::new().fg(HUD_GREEN)),
                ])
            })
            .collect();

        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(record.refs_heading, STYLE_HEADING)));

        if record.refs.is_empty() {
            lines.push(Line::from(Span::styled(record.empty_refs, STYLE_DIM)));
            return lines;
        }

        for (i, r) in record.refs.iter().enumerate() {
            let (marker, style) = cursor_style(self.cursor == Some(i));
            lines.push(Line::from(Span::styled(format!("{marker}{}", r.label), style)));
        }
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(record.refs_hint, STYLE_DIM)));
        lines
    }

    pub fn render(&self, f: &mut Frame, area: Rect) {
        let offset = u16::try_from(self.scroll.offset()).unwrap_or(u16::MAX);
        let paragraph = Paragraph::new(self.content_lines()).scroll((offset, 0)).block(
            Block::default()
                .borders(Borders::ALL)
                .title(Span::styled(format!(" {} ", self.title()), STYLE_HEADING))
                .border_style(Style::new().fg(HUD_GREEN)),
        );
        f.render_widget(paragraph, area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::keys::key;
    use crossterm::event::KeyCode;

    fn program(map_ids: &[u32]) -> ProgramInfo {
        ProgramInfo {
            id: crate::domain::ProgId(7),
            name: "xdp_prog".into(),
            map_ids: map_ids.iter().copied().map(MapId).collect(),
            ..ProgramInfo::default()
        }
    }

    #[test]
    fn test_cursor_walks_cross_references() {
        let mut view = DetailView::new("Program Details");
        view.set_record(DetailRecord::from(&program(&[10, 20])));
        assert_eq!(view.cursor(), Some(0));

        view.handle_input(&key(KeyCode::Down));
        assert_eq!(view.cursor(), Some(1));
        view.handle_input(&key(KeyCode::Down));
        assert_eq!(view.cursor(), Some(1));

        assert_eq!(view.handle_input(&key(KeyCode::Enter)), DetailOutcome::Follow(MapId(20)));

        view.handle_input(&key(KeyCode::Char('k')));
        view.handle_input(&key(KeyCode::Char('k')));
        assert_eq!(view.cursor(), Some(0));
    }

    #[test]
    fn test_no_cross_references() {
        let mut view = DetailView::new("Program Details");
        view.set_record(DetailRecord::from(&program(&[])));
        assert_eq!(view.cursor(), None);
        assert_eq!(view.handle_input(&key(KeyCode::Enter)), DetailOutcome::Nothing);

        let text: Vec<String> = view.content_lines().iter().map(ToString::to_string).collect();
        assert!(text.contains(&"No associated maps".to_string()));
    }

    #[test]
    fn test_new_record_resets_cursor() {
        let mut view = DetailView::new("Program Details");
        view.set_record(DetailRecord::from(&program(&[1, 2, 3])));
        view.handle_input(&key(KeyCode::Down));
        view.set_record(DetailRecord::from(&program(&[4, 5])));
        assert_eq!(view.cursor(), Some(0));
    }

    #[test]
    fn test_map_record_dump_action_targets_itself() {
        let map = MapInfo { id: MapId(21), name: "blocklist".into(), ..MapInfo::default() };
        let mut view = DetailView::new("Map Details");
        view.set_record(DetailRecord::from(&map));
        assert_eq!(view.title(), "Map: blocklist");
        assert_eq!(view.handle_input(&key(KeyCode::Enter)), DetailOutcome::Follow(MapId(21)));

        let text: Vec<String> = view.content_lines().iter().map(ToString::to_string).collect();
        assert!(text.contains(&"▶ Dump Contents".to_string()));
    }

    #[test]
    fn test_fields_render_with_cursor_marker() {
        let mut view = DetailView::new("Program Details");
        let mut p = program(&[10, 20]);
        p.gpl = true;
        view.set_record(DetailRecord::from(&p));

        let text: Vec<String> = view.content_lines().iter().map(ToString::to_string).collect();
        assert!(text.iter().any(|l| l.starts_with("GPL:") && l.ends_with("Yes")));
        assert!(text.contains(&"▶ Map ID: 10".to_string()));
        assert!(text.contains(&"  Map ID: 20".to_string()));
    }

    #[test]
    fn test_scroll_follows_cursor_through_long_reference_list() {
        let ids: Vec<u32> = (100..130).collect();
        let mut view = DetailView::new("Program Details");
        view.set_height(16);
        view.set_record(DetailRecord::from(&program(&ids)));

        for _ in 0..20 {
            view.handle_input(&key(KeyCode::Down));
        }
        // 10 fields, blank, heading, then the references
        let cursor_row = 10 + 2 + 20;
        let offset = view.scroll_offset();
        assert!(offset <= cursor_row && cursor_row < offset + 16, "row {cursor_row} at offset {offset}");
        assert_eq!(view.content_lines()[cursor_row].to_string(), "▶ Map ID: 120");

        for _ in 0..30 {
            view.handle_input(&key(KeyCode::Up));
        }
        assert_eq!(view.cursor(), Some(0));
        assert!(view.scroll_offset() <= 12);
    }

    #[test]
    fn test_unreported_fields_render_as_unknown() {
        fn field(record: &DetailRecord, name: &str) -> Option<String> {
            record.fields.iter().find(|(label, _)| *label == name).map(|(_, value)| value.clone())
        }

        let map = MapInfo { id: MapId(4), name: "ev".into(), uid: None, ..MapInfo::default() };
        let record = DetailRecord::from(&map);
        assert_eq!(field(&record, "UID").as_deref(), Some(UNKNOWN));
        assert_eq!(field(&record, "Loaded At").as_deref(), Some(UNKNOWN));

        let root = MapInfo { uid: Some(0), ..map };
        assert_eq!(field(&DetailRecord::from(&root), "UID").as_deref(), Some("0"));
    }

    #[test]
    fn test_error_shown_instead_of_record() {
        let mut view = DetailView::new("Map Details");
        view.set_error("map 9 not found");
        assert_eq!(view.title(), "Map Details");
        assert_eq!(view.content_lines()[0].to_string(), "Error: map 9 not found");
        assert_eq!(view.handle_input(&key(KeyCode::Enter)), DetailOutcome::Nothing);
    }
}
