use bpftui::domain::{MapEntry, MapId, MapInfo, ProgId, ProgramInfo, ServiceError, StartupError};
use bpftui::services::fixture::MapDump;
use bpftui::services::{FixtureData, FixtureOp, FixtureService};
use bpftui::tui::keys::key;
use bpftui::tui::list::{FilterState, NO_MATCH_MESSAGE};
use bpftui::tui::navigation::{Control, InputEvent, Screen, Session, ViewId};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

fn session_with(service: FixtureService) -> Session {
    Session::new(Box::new(service.clone()), Box::new(service))
}

fn demo_session() -> Session {
    session_with(FixtureService::demo())
}

fn press(session: &mut Session, code: KeyCode) -> Control {
    session.handle_input(InputEvent::Key(key(code)))
}

fn type_text(session: &mut Session, text: &str) {
    for c in text.chars() {
        press(session, KeyCode::Char(c));
    }
}

fn open_maps(session: &mut Session) {
    press(session, KeyCode::Down);
    press(session, KeyCode::Enter);
    assert_eq!(session.current(), ViewId::MapList);
}

fn map(id: u32, name: &str, map_type: &str) -> MapInfo {
    MapInfo {
        id: MapId(id),
        name: name.to_string(),
        map_type: map_type.to_string(),
        key_size: 4,
        value_size: 4,
        max_entries: 16,
        ..MapInfo::default()
    }
}

#[test]
fn test_back_retraces_cross_reference_path() {
    let mut session = demo_session();
    press(&mut session, KeyCode::Enter); // Programs
    press(&mut session, KeyCode::Enter); // xdp_firewall
    press(&mut session, KeyCode::Enter); // Map ID: 21
    assert_eq!(session.current(), ViewId::MapDetail);
    assert_eq!(session.map_detail().record().map(|r| r.id), Some(21));

    let mut visited = Vec::new();
    while session.current() != ViewId::Menu {
        press(&mut session, KeyCode::Esc);
        visited.push(session.current());
    }
    assert_eq!(visited, vec![ViewId::ProgramDetail, ViewId::ProgramList, ViewId::Menu]);
    assert!(session.history().is_empty());
}

#[test]
fn test_cross_reference_scenario() {
    let data = FixtureData {
        programs: vec![ProgramInfo {
            id: ProgId(5),
            name: "classifier".to_string(),
            prog_type: "sched_cls".to_string(),
            map_ids: vec![MapId(10), MapId(20)],
            ..ProgramInfo::default()
        }],
        maps: vec![map(10, "ingress", "hash"), map(20, "egress", "hash")],
        dumps: Vec::new(),
    };
    let mut session = session_with(FixtureService::new(data));
    press(&mut session, KeyCode::Enter);
    press(&mut session, KeyCode::Enter);
    assert_eq!(session.current(), ViewId::ProgramDetail);
    assert_eq!(session.program_detail().cursor(), Some(0));

    press(&mut session, KeyCode::Down);
    assert_eq!(session.program_detail().cursor(), Some(1));

    press(&mut session, KeyCode::Enter);
    assert_eq!(session.current(), ViewId::MapDetail);
    assert_eq!(session.map_detail().record().map(|r| r.id), Some(20));
    assert_eq!(session.history().last(), Some(&ViewId::ProgramDetail));
}

#[test]
fn test_filter_cancel_restores_collection() {
    let mut session = demo_session();
    open_maps(&mut session);
    let full = session.map_list().visible_len();

    press(&mut session, KeyCode::Char('/'));
    type_text(&mut session, "pkt");
    assert_eq!(session.map_list().visible_len(), 1);

    press(&mut session, KeyCode::Esc);
    assert_eq!(session.current(), ViewId::MapList, "esc while filtering stays in the list");
    press(&mut session, KeyCode::Char('/'));

    let list = session.map_list();
    assert_eq!(list.filter_state(), FilterState::Filtering);
    assert_eq!(list.query(), "");
    assert_eq!(list.visible_len(), full);
    assert_eq!(list.cursor(), 0);
}

#[test]
fn test_no_match_reports_no_selection() {
    let mut session = demo_session();
    open_maps(&mut session);

    press(&mut session, KeyCode::Char('/'));
    type_text(&mut session, "zzz");
    let rendered: Vec<String> =
        session.map_list().content_lines().iter().map(ToString::to_string).collect();
    assert!(rendered.iter().any(|l| l.contains(NO_MATCH_MESSAGE)));

    press(&mut session, KeyCode::Enter); // commit filter
    press(&mut session, KeyCode::Enter); // nothing to select
    assert_eq!(session.current(), ViewId::MapList);
    assert!(session.map_list().selected().is_none());
}

#[test]
fn test_filter_narrows_then_selects() {
    let data = FixtureData {
        maps: vec![map(1, "hash_map", "hash"), map(2, "array_map", "array")],
        ..FixtureData::default()
    };
    let mut session = session_with(FixtureService::new(data));
    open_maps(&mut session);

    press(&mut session, KeyCode::Char('/'));
    type_text(&mut session, "hash");
    assert_eq!(session.map_list().visible_len(), 1);

    press(&mut session, KeyCode::Enter);
    assert_eq!(session.map_list().filter_state(), FilterState::Applied);
    assert_eq!(session.current(), ViewId::MapList);

    press(&mut session, KeyCode::Enter);
    assert_eq!(session.current(), ViewId::MapDetail);
    assert_eq!(session.map_detail().record().map(|r| r.id), Some(1));
}

#[test]
fn test_cursor_clamped_at_both_ends() {
    let mut session = demo_session();
    open_maps(&mut session);
    let last = session.map_list().visible_len() - 1;

    for _ in 0..10 {
        press(&mut session, KeyCode::Char('j'));
    }
    assert_eq!(session.map_list().cursor(), last);
    for _ in 0..10 {
        press(&mut session, KeyCode::Up);
    }
    assert_eq!(session.map_list().cursor(), 0);

    press(&mut session, KeyCode::Esc);
    press(&mut session, KeyCode::Up);
    press(&mut session, KeyCode::Enter); // Programs
    press(&mut session, KeyCode::Enter); // xdp_firewall, maps [21, 22]
    for _ in 0..5 {
        press(&mut session, KeyCode::Down);
    }
    assert_eq!(session.program_detail().cursor(), Some(1));
    for _ in 0..5 {
        press(&mut session, KeyCode::Char('k'));
    }
    assert_eq!(session.program_detail().cursor(), Some(0));
}

#[test]
fn test_dump_failure_stays_in_dump_view() {
    let service = FixtureService::demo()
        .with_failure(FixtureOp::Dump, ServiceError::Backend("map iteration refused".into()));
    let mut session = session_with(service);
    open_maps(&mut session);
    press(&mut session, KeyCode::Enter); // blocklist
    let detail_before = session.map_detail().record().cloned();

    press(&mut session, KeyCode::Enter); // Dump Contents
    assert_eq!(session.current(), ViewId::MapDump);
    assert_eq!(session.map_dump().error(), Some("map iteration refused"));
    assert_eq!(session.map_detail().record().cloned(), detail_before);
    assert!(session.map_detail().error().is_none());

    press(&mut session, KeyCode::Esc);
    assert_eq!(session.current(), ViewId::MapDetail);
    assert!(session.map_dump().error().is_none());
    assert!(session.map_detail().error().is_none());
}

#[test]
fn test_dump_of_unreadable_map_reports_inline() {
    let mut session = demo_session();
    open_maps(&mut session);
    press(&mut session, KeyCode::Down);
    press(&mut session, KeyCode::Down); // events (ringbuf)
    press(&mut session, KeyCode::Enter);
    press(&mut session, KeyCode::Enter);

    assert_eq!(session.current(), ViewId::MapDump);
    assert!(session.map_dump().error().is_some_and(|e| e.contains("not supported")));
}

#[test]
fn test_missing_cross_reference_is_view_local() {
    let data = FixtureData {
        programs: vec![ProgramInfo {
            id: ProgId(1),
            name: "orphan".to_string(),
            map_ids: vec![MapId(99)],
            ..ProgramInfo::default()
        }],
        ..FixtureData::default()
    };
    let mut session = session_with(FixtureService::new(data));
    press(&mut session, KeyCode::Enter);
    press(&mut session, KeyCode::Enter);
    press(&mut session, KeyCode::Enter);

    assert_eq!(session.current(), ViewId::MapDetail);
    assert_eq!(session.map_detail().error(), Some("map 99 not found"));
    assert!(session.fatal().is_none());

    press(&mut session, KeyCode::Esc);
    assert_eq!(session.current(), ViewId::ProgramDetail);
    assert!(session.map_detail().error().is_none());
}

#[test]
fn test_list_failure_shown_inline_and_cleared_on_back() {
    let service = FixtureService::demo()
        .with_failure(FixtureOp::ListMaps, ServiceError::Backend("listing refused".into()));
    let mut session = session_with(service);
    open_maps(&mut session);
    assert_eq!(session.map_list().error(), Some("listing refused"));

    press(&mut session, KeyCode::Esc);
    assert_eq!(session.current(), ViewId::Menu);
    assert!(session.map_list().error().is_none());
}

#[test]
fn test_filter_reset_on_reentering_list() {
    let mut session = demo_session();
    open_maps(&mut session);
    press(&mut session, KeyCode::Char('/'));
    type_text(&mut session, "block");
    press(&mut session, KeyCode::Enter);
    press(&mut session, KeyCode::Enter); // blocklist detail

    press(&mut session, KeyCode::Esc);
    assert_eq!(session.map_list().filter_state(), FilterState::Applied);

    press(&mut session, KeyCode::Esc);
    press(&mut session, KeyCode::Enter); // cursor still on Maps
    assert_eq!(session.current(), ViewId::MapList);
    assert_eq!(session.map_list().filter_state(), FilterState::Unfiltered);
    assert_eq!(session.map_list().visible_len(), 4);
}

#[test]
fn test_quit_and_help_are_text_while_filtering() {
    let mut session = demo_session();
    open_maps(&mut session);
    press(&mut session, KeyCode::Char('/'));

    assert_eq!(press(&mut session, KeyCode::Char('q')), Control::Continue);
    press(&mut session, KeyCode::Char('?'));
    assert_eq!(session.map_list().query(), "q?");
    assert!(!session.help_visible());

    let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
    assert_eq!(session.handle_input(InputEvent::Key(ctrl_c)), Control::Quit);
}

#[test]
fn test_help_swallows_next_key() {
    let mut session = demo_session();
    press(&mut session, KeyCode::Char('?'));
    assert_eq!(session.screen(), Screen::Help(ViewId::Menu));

    press(&mut session, KeyCode::Down);
    assert!(!session.help_visible());
    assert_eq!(session.menu().cursor(), 0, "dismissing key has no other effect");

    press(&mut session, KeyCode::Char('?'));
    assert_eq!(press(&mut session, KeyCode::Char('q')), Control::Quit);
}

#[test]
fn test_fatal_startup_only_allows_quit() {
    let mut session = demo_session();
    session.startup(Err(StartupError::PermissionDenied("EPERM listing programs".into())));
    assert_eq!(session.screen(), Screen::Fatal);

    for code in [KeyCode::Enter, KeyCode::Down, KeyCode::Esc, KeyCode::Char('?')] {
        assert_eq!(press(&mut session, code), Control::Continue);
    }
    assert_eq!(session.current(), ViewId::Menu);
    assert!(!session.help_visible());
    assert_eq!(press(&mut session, KeyCode::Char('q')), Control::Quit);
}

#[test]
fn test_resize_keeps_view_and_history() {
    let mut session = demo_session();
    press(&mut session, KeyCode::Enter);
    session.handle_input(InputEvent::Resize { width: 40, height: 10 });
    session.handle_input(InputEvent::Resize { width: 40, height: 10 });
    assert_eq!(session.current(), ViewId::ProgramList);
    assert_eq!(session.history(), &[ViewId::Menu]);
    assert_eq!(session.size(), (40, 10));
}

#[test]
fn test_dump_entries_from_fixture() {
    let data = FixtureData {
        maps: vec![map(7, "counters", "array")],
        dumps: vec![MapDump {
            map: MapId(7),
            entries: vec![MapEntry::new([0u8, 0, 0, 0], Vec::new())],
            error: None,
        }],
        ..FixtureData::default()
    };
    let mut session = session_with(FixtureService::new(data));
    open_maps(&mut session);
    press(&mut session, KeyCode::Enter);
    press(&mut session, KeyCode::Enter);

    let lines: Vec<String> =
        session.map_dump().content_lines().iter().map(ToString::to_string).collect();
    assert_eq!(lines, vec!["Key:   00 00 00 00", "Value: (empty)"]);
}
