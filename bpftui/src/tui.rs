//! # Terminal User Interface (TUI)
//!
//! Interactive terminal browser using `ratatui`.
//!
//! ## Views
//!
//! - **Menu** - choose programs or maps
//! - **Programs** / **Maps** - filterable lists (`/` to search)
//! - **Program Detail** - fields plus associated maps (Enter opens one)
//! - **Map Detail** - fields plus the dump action
//! - **Map Dump** - every key/value pair as hex
//!
//! ## Sub-Modules
//!
//! - `navigation` - [`Session`], the state machine behind every key press
//! - `list`, `detail`, `dump` - per-view panels
//! - `keys` - key map shared by all panels and the help overlay
//! - `layout` - responsive chrome sizing
//! - `status` - title and help bars
//! - `theme` - Color scheme
//!
//! Rendering is a pure function of the [`Session`]: [`render`] can be
//! driven by a `TestBackend` exactly like the real terminal.

use std::io;
use std::time::Duration;

use crossterm::{
    cursor,
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame, Terminal,
};

pub mod detail;
pub mod dump;
pub mod keys;
pub mod layout;
pub mod list;
pub mod navigation;
mod scroll;
mod status;
mod theme;

use keys::{binding, Action};
use layout::compute_layout;
use navigation::{Control, InputEvent, Screen, ViewId};
use theme::{BACKGROUND, CRITICAL_RED, HUD_GREEN, STYLE_DIM, STYLE_ERROR, STYLE_HEADING, STYLE_KEY, STYLE_TEXT};

pub use navigation::Session;
use crate::domain::TuiError;

/// Draw the whole screen for the current session state
pub fn render(f: &mut Frame, session: &Session) {
    let area = f.area();
    let screen = session.screen();

    let view = match screen {
        Screen::Fatal => {
            render_fatal(f, area, session);
            return;
        }
        Screen::Help(view) | Screen::View(view) => view,
    };

    let config = compute_layout(area.width, area.height);
    let [header, body, help_bar] = config.split(area);

    status::render_bar(
        f,
        header,
        status::header_line(session.history(), view, session.source()),
        config.bordered_chrome,
    );

    match view {
        ViewId::Menu => session.menu().render(f, body),
        ViewId::ProgramList => session.program_list().render(f, body),
        ViewId::ProgramDetail => session.program_detail().render(f, body),
        ViewId::MapList => session.map_list().render(f, body),
        ViewId::MapDetail => session.map_detail().render(f, body),
        ViewId::MapDump => session.map_dump().render(f, body),
    }

    status::render_bar(
        f,
        help_bar,
        status::help_bar(view, session.active_list_filtering()),
        config.bordered_chrome,
    );

    if matches!(screen, Screen::Help(_)) {
        render_help_overlay(f, area, view, config.popup_width_pct);
    }
}

/// Full-screen startup failure; only quit works from here
fn render_fatal(f: &mut Frame, area: Rect, session: &Session) {
    let message = session.fatal().map(ToString::to_string).unwrap_or_default();

    let mut lines: Vec<Line> = Vec::new();
    for (i, text) in message.lines().enumerate() {
        let text = if i == 0 { format!("Error: {text}") } else { text.to_string() };
        lines.push(Line::from(Span::styled(text, STYLE_ERROR)));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled("Press 'q' to quit.", STYLE_DIM)));

    let paragraph = Paragraph::new(lines).wrap(Wrap { trim: false }).block(
        Block::default()
            .borders(Borders::ALL)
            .title(Span::styled(" BPF TUI ", STYLE_HEADING))
            .border_style(Style::new().fg(CRITICAL_RED)),
    );
    f.render_widget(paragraph, area);
}

fn shortcut_row(keys: &str, help: &str) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("  {keys:<14}"), STYLE_KEY),
        Span::styled(help.to_string(), STYLE_TEXT),
    ])
}

fn binding_rows(actions: &[Action]) -> impl Iterator<Item = Line<'static>> + '_ {
    actions.iter().filter_map(|&a| binding(a)).map(|b| shortcut_row(b.keys, b.help))
}

/// Keys that matter in `view`, under a heading named after it
fn context_rows(view: ViewId) -> Vec<Line<'static>> {
    let mut lines = vec![Line::from(Span::styled(format!("  {view}"), STYLE_HEADING))];
    match view {
        ViewId::Menu => lines.push(shortcut_row("Enter", "Open selected option")),
        ViewId::ProgramList | ViewId::MapList => {
            lines.push(shortcut_row("/", "Start search"));
            lines.push(shortcut_row("Esc", "Exit search / Go back"));
            lines.push(shortcut_row("Enter", "View details"));
        }
        ViewId::ProgramDetail => {
            lines.push(shortcut_row("↑/↓", "Navigate associated maps"));
            lines.push(shortcut_row("Enter", "View selected map"));
            lines.push(shortcut_row("Esc", "Go back"));
        }
        ViewId::MapDetail => {
            lines.push(shortcut_row("Enter", "Dump map contents"));
            lines.push(shortcut_row("Esc", "Go back"));
        }
        ViewId::MapDump => {
            lines.push(shortcut_row("↑/↓", "Scroll through entries"));
            lines.extend(binding_rows(&[Action::PageUp, Action::PageDown, Action::Top, Action::Bottom]));
            lines.push(shortcut_row("Esc", "Go back to map detail"));
        }
    }
    lines
}

/// Render the help overlay for the view underneath it
fn render_help_overlay(f: &mut Frame, area: Rect, view: ViewId, width_percent: u16) {
    let mut lines = vec![Line::from(""), Line::from(Span::styled("  Navigation", STYLE_HEADING))];
    lines.extend(binding_rows(&[Action::Up, Action::Down, Action::Confirm, Action::Back]));
    lines.push(Line::from(""));
    lines.extend(context_rows(view));
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled("  Global", STYLE_HEADING)));
    lines.extend(binding_rows(&[Action::Help, Action::Quit]));
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled("  Press any key to close", STYLE_DIM)));

    let height = u16::try_from(lines.len() + 2).unwrap_or(u16::MAX).min(area.height);
    let popup_area = centered_popup(area, width_percent, height);

    let help_widget = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Keyboard Shortcuts ")
            .style(Style::new().bg(BACKGROUND).fg(HUD_GREEN)),
    );

    f.render_widget(Clear, popup_area);
    f.render_widget(help_widget, popup_area);
}

/// Create a centered popup area with given width percentage and height in lines
fn centered_popup(area: Rect, width_percent: u16, height_lines: u16) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Fill(1), Constraint::Length(height_lines), Constraint::Fill(1)])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - width_percent) / 2),
            Constraint::Percentage(width_percent),
            Constraint::Percentage((100 - width_percent) / 2),
        ])
        .split(vertical[1])[1]
}

/// Run the interactive browser until the user quits
///
/// 1. Sets up the terminal in raw mode on the alternate screen
/// 2. Feeds the real terminal size to the session
/// 3. Redraws, then waits up to `tick` for a key press or resize
/// 4. Restores the terminal, also when the loop fails
///
/// Returns the session so the caller can inspect how it ended.
///
/// # Errors
/// Returns an error if terminal setup or rendering fails
pub fn run(mut session: Session, tick: Duration) -> Result<Session, TuiError> {
    enable_raw_mode()?;
    let result = drive(&mut session, tick);
    let restored = restore_terminal();
    result?;
    restored?;
    Ok(session)
}

fn drive(session: &mut Session, tick: Duration) -> Result<(), TuiError> {
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;

    let size = terminal.size()?;
    session.handle_input(InputEvent::Resize { width: size.width, height: size.height });

    loop {
        terminal.draw(|f| render(f, session))?;

        if !event::poll(tick)? {
            continue;
        }
        let control = match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                session.handle_input(InputEvent::Key(key))
            }
            Event::Resize(width, height) => {
                session.handle_input(InputEvent::Resize { width, height })
            }
            _ => Control::Continue,
        };
        if control == Control::Quit {
            return Ok(());
        }
    }
}

fn restore_terminal() -> Result<(), TuiError> {
    disable_raw_mode()?;
    execute!(io::stdout(), LeaveAlternateScreen, cursor::Show)?;
    Ok(())
}
