use bpftui::domain::{MapId, ProgId, ProgramInfo, StartupError};
use bpftui::services::{FixtureData, FixtureService};
use bpftui::tui::keys::key;
use bpftui::tui::navigation::{InputEvent, Session};
use bpftui::tui::render;
use crossterm::event::KeyCode;
use ratatui::backend::TestBackend;
use ratatui::Terminal;

fn demo_session(width: u16, height: u16) -> Session {
    let service = FixtureService::demo();
    let mut session =
        Session::new(Box::new(service.clone()), Box::new(service)).with_source("demo");
    session.handle_input(InputEvent::Resize { width, height });
    session
}

fn press(session: &mut Session, code: KeyCode) {
    session.handle_input(InputEvent::Key(key(code)));
}

/// Draw the session and return the screen as one string per row
fn draw(session: &Session) -> Vec<String> {
    let (width, height) = session.size();
    let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
    terminal.draw(|f| render(f, session)).unwrap();

    let buffer = terminal.backend().buffer();
    (0..height)
        .map(|y| (0..width).map(|x| buffer[(x, y)].symbol()).collect::<String>())
        .collect()
}

fn contains(screen: &[String], needle: &str) -> bool {
    screen.iter().any(|row| row.contains(needle))
}

#[test]
fn test_menu_screen() {
    let session = demo_session(100, 30);
    let screen = draw(&session);

    assert!(contains(&screen, "BPF TUI | [demo] | Menu"));
    assert!(contains(&screen, "▶ Programs"));
    assert!(contains(&screen, "Browse loaded BPF maps"));
    assert!(contains(&screen, "enter: select"));
}

#[test]
fn test_program_detail_marks_cursor() {
    let mut session = demo_session(100, 40);
    press(&mut session, KeyCode::Enter);
    press(&mut session, KeyCode::Enter);
    press(&mut session, KeyCode::Down);
    let screen = draw(&session);

    assert!(contains(&screen, "Menu › Programs › Program Detail"));
    assert!(contains(&screen, "Program: xdp_firewall"));
    assert!(contains(&screen, "a04f5eef06a7f555"));
    assert!(contains(&screen, "Associated Maps"));
    assert!(contains(&screen, "  Map ID: 21"));
    assert!(contains(&screen, "▶ Map ID: 22"));
}

#[test]
fn test_dump_screen() {
    let mut session = demo_session(100, 30);
    press(&mut session, KeyCode::Down);
    press(&mut session, KeyCode::Enter);
    press(&mut session, KeyCode::Enter);
    press(&mut session, KeyCode::Enter);
    let screen = draw(&session);

    assert!(contains(&screen, "Map Dump: blocklist (ID: 21)"));
    assert!(contains(&screen, "Key:   0a 00 00 01"));
    assert!(contains(&screen, "Value: 01"));
    assert!(contains(&screen, "---"));
}

#[test]
fn test_filter_prompt_and_help_bar() {
    let mut session = demo_session(100, 30);
    press(&mut session, KeyCode::Down);
    press(&mut session, KeyCode::Enter);
    press(&mut session, KeyCode::Char('/'));
    press(&mut session, KeyCode::Char('e'));
    let screen = draw(&session);

    assert!(contains(&screen, "/ e_"));
    assert!(contains(&screen, "esc: cancel search"));
    assert!(contains(&screen, "[Search]"));
}

#[test]
fn test_help_overlay() {
    let mut session = demo_session(100, 40);
    press(&mut session, KeyCode::Char('?'));
    let screen = draw(&session);

    assert!(contains(&screen, "Keyboard Shortcuts"));
    assert!(contains(&screen, "Navigation"));
    assert!(contains(&screen, "Global"));
    assert!(contains(&screen, "Press any key to close"));
}

#[test]
fn test_fatal_screen() {
    let mut session = demo_session(90, 20);
    session.startup(Err(StartupError::PermissionDenied("listing programs refused".into())));
    let screen = draw(&session);

    assert!(contains(&screen, "Error: insufficient permissions: listing programs refused"));
    assert!(contains(&screen, "Press 'q' to quit."));
    assert!(!contains(&screen, "Programs"));
}

#[test]
fn test_small_terminal_drops_chrome() {
    let session = demo_session(50, 10);
    let screen = draw(&session);

    assert!(!contains(&screen, "BPF TUI |"));
    assert!(contains(&screen, "Programs"));
}

#[test]
fn test_long_map_list_keeps_cursor_on_screen() {
    let data = FixtureData {
        programs: vec![ProgramInfo {
            id: ProgId(1),
            name: "fanout".to_string(),
            map_ids: (100..130).map(MapId).collect(),
            ..ProgramInfo::default()
        }],
        ..FixtureData::default()
    };
    let service = FixtureService::new(data);
    let mut session = Session::new(Box::new(service.clone()), Box::new(service));
    session.handle_input(InputEvent::Resize { width: 80, height: 24 });
    press(&mut session, KeyCode::Enter);
    press(&mut session, KeyCode::Enter);

    for _ in 0..20 {
        press(&mut session, KeyCode::Down);
    }
    assert_eq!(session.program_detail().cursor(), Some(20));
    assert!(contains(&draw(&session), "▶ Map ID: 120"));

    press(&mut session, KeyCode::End);
    for _ in 0..20 {
        press(&mut session, KeyCode::Up);
    }
    assert!(contains(&draw(&session), "▶ Map ID: 100"));
}
