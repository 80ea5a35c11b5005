use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::navigation::ViewId;
use super::theme::{CAUTION_AMBER, HUD_GREEN, STYLE_DIM, STYLE_HEADING, STYLE_KEY};

const SHORTCUT_SEPARATOR: &str = " • ";

/// Shortcuts for the bottom bar, as `key: description` pairs joined by bullets
#[must_use]
pub fn help_bar_text(view: ViewId, filtering: bool) -> &'static str {
    match view {
        ViewId::Menu => "↑/↓: navigate • enter: select • q: quit • ?: help",
        ViewId::ProgramList | ViewId::MapList if filtering => {
            "↑/↓: navigate • enter: select • esc: cancel search"
        }
        ViewId::ProgramList | ViewId::MapList => {
            "↑/↓: navigate • enter: select • /: search • esc: back • q: quit • ?: help"
        }
        ViewId::ProgramDetail => "↑/↓: select map • enter: view map • esc: back • q: quit • ?: help",
        ViewId::MapDetail => "enter: dump contents • esc: back • q: quit • ?: help",
        ViewId::MapDump => "↑/↓: scroll • esc: back • q: quit • ?: help",
    }
}

/// Styled help bar: keys in amber, descriptions dimmed
#[must_use]
pub fn help_bar(view: ViewId, filtering: bool) -> Line<'static> {
    let mut spans = Vec::new();
    for (i, shortcut) in help_bar_text(view, filtering).split(SHORTCUT_SEPARATOR).enumerate() {
        if i > 0 {
            spans.push(Span::styled(SHORTCUT_SEPARATOR, STYLE_DIM));
        }
        match shortcut.split_once(": ") {
            Some((keys, desc)) => {
                spans.push(Span::styled(keys, STYLE_KEY));
                spans.push(Span::styled(format!(": {desc}"), STYLE_DIM));
            }
            None => spans.push(Span::styled(shortcut, STYLE_DIM)),
        }
    }
    if filtering {
        spans.push(Span::styled(" [Search]", Style::new().fg(CAUTION_AMBER)));
    }
    Line::from(spans)
}

/// Title bar: app name, then the path of views that leads to the current one
#[must_use]
pub fn header_line(path: &[ViewId], current: ViewId, source: &str) -> Line<'static> {
    let mut spans = vec![
        Span::styled("BPF TUI", STYLE_HEADING),
        Span::styled(" | ", STYLE_DIM),
        Span::styled(format!("[{source}]"), Style::new().fg(CAUTION_AMBER).add_modifier(Modifier::BOLD)),
        Span::styled(" | ", STYLE_DIM),
    ];
    for view in path {
        spans.push(Span::styled(view.to_string(), STYLE_DIM));
        spans.push(Span::styled(" › ", STYLE_DIM));
    }
    spans.push(Span::styled(current.to_string(), Style::new().fg(HUD_GREEN)));
    Line::from(spans)
}

/// Render one line of chrome, boxed when there is room for it
pub fn render_bar(f: &mut Frame, area: Rect, line: Line<'static>, bordered: bool) {
    if area.height == 0 {
        return;
    }
    let mut paragraph = Paragraph::new(vec![line]);
    if bordered {
        paragraph = paragraph
            .block(Block::default().borders(Borders::ALL).border_style(Style::new().fg(HUD_GREEN)));
    }
    f.render_widget(paragraph, area);
}
