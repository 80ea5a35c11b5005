//! Navigation controller
//!
//! [`Session`] owns every piece of UI state and is the single entry point
//! for input. Each event runs to completion, including any service call it
//! triggers, before the next one is read.
//!
//! # Key resolution order
//!
//! 1. Resize: store the size, propagate to every panel
//! 2. Quit: unless a list is taking filter text (Ctrl+C always quits)
//! 3. Fatal startup error: swallow everything else
//! 4. Help toggle: unless a list is taking filter text
//! 5. Help visible: any key closes it and is otherwise dropped
//! 6. Back: unless a list is taking filter text; pops the history
//! 7. Everything else goes to the active panel
//!
//! # History
//!
//! Every forward transition pushes the view being left, so back retraces
//! the exact path taken. A map opened from a program's associated maps
//! returns to that program, not to the map list.

use std::fmt;

use crossterm::event::KeyEvent;
use log::{debug, info, warn};

use super::detail::{DetailOutcome, DetailRecord, DetailView};
use super::dump::DumpView;
use super::keys::{action_for, is_force_quit, Action};
use super::layout::compute_layout;
use super::list::{FilterableList, ListItem, ListOutcome};
use crate::domain::{MapId, ProgId, StartupError};
use crate::services::{MapService, ProgramService};

/// Size assumed until the terminal reports its own
const DEFAULT_SIZE: (u16, u16) = (80, 24);

const MENU_PROGRAMS: u32 = 0;
const MENU_MAPS: u32 = 1;

/// Which screen is active
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewId {
    Menu,
    ProgramList,
    ProgramDetail,
    MapList,
    MapDetail,
    MapDump,
}

impl ViewId {
    pub const ROOT: ViewId = ViewId::Menu;
}

impl fmt::Display for ViewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ViewId::Menu => "Menu",
            ViewId::ProgramList => "Programs",
            ViewId::ProgramDetail => "Program Detail",
            ViewId::MapList => "Maps",
            ViewId::MapDetail => "Map Detail",
            ViewId::MapDump => "Map Dump",
        };
        f.write_str(name)
    }
}

/// Views to return to; the top is the previous view, never the current one
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct NavigationStack(Vec<ViewId>);

impl NavigationStack {
    pub(crate) fn push(&mut self, view: ViewId) {
        self.0.push(view);
    }

    pub(crate) fn pop(&mut self) -> Option<ViewId> {
        self.0.pop()
    }

    pub(crate) fn len(&self) -> usize {
        self.0.len()
    }

    pub(crate) fn as_slice(&self) -> &[ViewId] {
        &self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    Key(KeyEvent),
    Resize { width: u16, height: u16 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Continue,
    Quit,
}

/// What takes the whole screen right now
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Fatal,
    Help(ViewId),
    View(ViewId),
}

/// Forward transition together with what the target view needs to load
#[derive(Debug, Clone, Copy)]
enum Destination {
    ProgramList,
    MapList,
    Program(ProgId),
    Map(MapId),
    MapDump(MapId),
}

impl Destination {
    fn view(self) -> ViewId {
        match self {
            Destination::ProgramList => ViewId::ProgramList,
            Destination::MapList => ViewId::MapList,
            Destination::Program(_) => ViewId::ProgramDetail,
            Destination::Map(_) => ViewId::MapDetail,
            Destination::MapDump(_) => ViewId::MapDump,
        }
    }
}

pub struct Session {
    current: ViewId,
    history: NavigationStack,
    fatal: Option<StartupError>,
    show_help: bool,
    width: u16,
    height: u16,
    source: String,

    programs: Box<dyn ProgramService>,
    maps: Box<dyn MapService>,

    menu: FilterableList,
    program_list: FilterableList,
    program_detail: DetailView,
    map_list: FilterableList,
    map_detail: DetailView,
    map_dump: DumpView,
}

impl Session {
    #[must_use]
    pub fn new(programs: Box<dyn ProgramService>, maps: Box<dyn MapService>) -> Self {
        let mut menu = FilterableList::new("BPF TUI Explorer", "", false);
        menu.set_items(vec![
            ListItem::new(MENU_PROGRAMS, "Programs", "Browse loaded BPF programs"),
            ListItem::new(MENU_MAPS, "Maps", "Browse loaded BPF maps"),
        ]);

        let mut session = Self {
            current: ViewId::ROOT,
            history: NavigationStack::default(),
            fatal: None,
            show_help: false,
            width: 0,
            height: 0,
            source: "kernel".to_string(),
            programs,
            maps,
            menu,
            program_list: FilterableList::new("BPF Programs", "No BPF programs loaded", true),
            program_detail: DetailView::new("Program Details"),
            map_list: FilterableList::new("BPF Maps", "No BPF maps loaded", true),
            map_detail: DetailView::new("Map Details"),
            map_dump: DumpView::default(),
        };
        session.resize(DEFAULT_SIZE.0, DEFAULT_SIZE.1);
        session
    }

    /// Label for where the data comes from, shown in the title bar
    #[must_use]
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = source.into();
        self
    }

    /// Record the startup probe result; a failure takes over the screen
    pub fn startup(&mut self, probe: Result<(), StartupError>) {
        match probe {
            Ok(()) => info!("startup checks passed"),
            Err(e) => {
                warn!("startup failed: {e}");
                self.fatal = Some(e);
            }
        }
    }

    pub fn handle_input(&mut self, event: InputEvent) -> Control {
        match event {
            InputEvent::Resize { width, height } => {
                self.resize(width, height);
                Control::Continue
            }
            InputEvent::Key(key) => self.handle_key(&key),
        }
    }

    fn handle_key(&mut self, key: &KeyEvent) -> Control {
        let action = action_for(key);
        let filtering = self.active_list_filtering();

        if action == Some(Action::Quit) && (!filtering || is_force_quit(key)) {
            info!("quit from {}", self.current);
            return Control::Quit;
        }

        if self.fatal.is_some() {
            return Control::Continue;
        }

        if action == Some(Action::Help) && !filtering {
            self.show_help = !self.show_help;
            return Control::Continue;
        }

        if self.show_help {
            self.show_help = false;
            return Control::Continue;
        }

        if action == Some(Action::Back) && !filtering {
            self.go_back();
            return Control::Continue;
        }

        self.route_to_active(key);
        Control::Continue
    }

    fn resize(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;

        let rows = compute_layout(width, height).body_rows(height);
        self.menu.set_height(rows);
        self.program_list.set_height(rows);
        self.map_list.set_height(rows);
        self.program_detail.set_height(rows);
        self.map_detail.set_height(rows);
        self.map_dump.set_height(rows);
    }

    fn go_back(&mut self) {
        if self.current == ViewId::ROOT {
            return;
        }
        let leaving = self.current;
        self.current = self.history.pop().unwrap_or(ViewId::ROOT);
        self.clear_error(leaving);
        debug!("back {leaving} -> {} (depth {})", self.current, self.history.len());
    }

    fn clear_error(&mut self, view: ViewId) {
        match view {
            ViewId::Menu => {}
            ViewId::ProgramList => self.program_list.clear_error(),
            ViewId::ProgramDetail => self.program_detail.clear_error(),
            ViewId::MapList => self.map_list.clear_error(),
            ViewId::MapDetail => self.map_detail.clear_error(),
            ViewId::MapDump => self.map_dump.clear_error(),
        }
    }

    fn route_to_active(&mut self, key: &KeyEvent) {
        let destination = match self.current {
            ViewId::Menu => match self.menu.handle_input(key) {
                ListOutcome::Selected(item) if item.id == MENU_PROGRAMS => {
                    Some(Destination::ProgramList)
                }
                ListOutcome::Selected(item) if item.id == MENU_MAPS => Some(Destination::MapList),
                _ => None,
            },
            ViewId::ProgramList => match self.program_list.handle_input(key) {
                ListOutcome::Selected(item) => Some(Destination::Program(ProgId(item.id))),
                _ => None,
            },
            ViewId::ProgramDetail => match self.program_detail.handle_input(key) {
                DetailOutcome::Follow(map) => Some(Destination::Map(map)),
                DetailOutcome::Nothing => None,
            },
            ViewId::MapList => match self.map_list.handle_input(key) {
                ListOutcome::Selected(item) => Some(Destination::Map(MapId(item.id))),
                _ => None,
            },
            ViewId::MapDetail => match self.map_detail.handle_input(key) {
                DetailOutcome::Follow(map) => Some(Destination::MapDump(map)),
                DetailOutcome::Nothing => None,
            },
            ViewId::MapDump => {
                self.map_dump.handle_input(key);
                None
            }
        };

        if let Some(destination) = destination {
            self.enter_view(destination);
        }
    }

    fn enter_view(&mut self, destination: Destination) {
        let target = destination.view();
        debug!("navigate {} -> {target} (depth {})", self.current, self.history.len() + 1);
        self.history.push(self.current);
        self.current = target;
        self.load(destination);
    }

    fn load(&mut self, destination: Destination) {
        match destination {
            Destination::ProgramList => {
                self.program_list.reset_filter();
                match self.programs.list() {
                    Ok(programs) => {
                        self.program_list.set_items(programs.iter().map(ListItem::from).collect());
                    }
                    Err(e) => {
                        warn!("listing programs failed: {e}");
                        self.program_list.set_error(e.to_string());
                    }
                }
            }
            Destination::MapList => {
                self.map_list.reset_filter();
                match self.maps.list() {
                    Ok(maps) => self.map_list.set_items(maps.iter().map(ListItem::from).collect()),
                    Err(e) => {
                        warn!("listing maps failed: {e}");
                        self.map_list.set_error(e.to_string());
                    }
                }
            }
            Destination::Program(id) => match self.programs.get(id) {
                Ok(program) => self.program_detail.set_record(DetailRecord::from(&program)),
                Err(e) => {
                    warn!("loading program {id} failed: {e}");
                    self.program_detail.set_error(e.to_string());
                }
            },
            Destination::Map(id) => match self.maps.get(id) {
                Ok(map) => self.map_detail.set_record(DetailRecord::from(&map)),
                Err(e) => {
                    warn!("loading map {id} failed: {e}");
                    self.map_detail.set_error(e.to_string());
                }
            },
            Destination::MapDump(id) => {
                let label = self
                    .map_detail
                    .record()
                    .filter(|r| r.id == id.0)
                    .map(|r| r.name.clone());
                self.map_dump.begin_load(id, label);
                match self.maps.dump(id) {
                    Ok(entries) => self.map_dump.set_entries(entries),
                    Err(e) => {
                        warn!("dumping map {id} failed: {e}");
                        self.map_dump.set_error(e.to_string());
                    }
                }
            }
        }
    }

    /// What the renderer should draw for the current state
    #[must_use]
    pub fn screen(&self) -> Screen {
        if self.fatal.is_some() {
            Screen::Fatal
        } else if self.show_help {
            Screen::Help(self.current)
        } else {
            Screen::View(self.current)
        }
    }

    /// Whether the active view is a list taking filter text
    #[must_use]
    pub fn active_list_filtering(&self) -> bool {
        match self.current {
            ViewId::ProgramList => self.program_list.is_filtering(),
            ViewId::MapList => self.map_list.is_filtering(),
            _ => false,
        }
    }

    #[must_use]
    pub fn current(&self) -> ViewId {
        self.current
    }

    #[must_use]
    pub fn history(&self) -> &[ViewId] {
        self.history.as_slice()
    }

    #[must_use]
    pub fn fatal(&self) -> Option<&StartupError> {
        self.fatal.as_ref()
    }

    #[must_use]
    pub fn help_visible(&self) -> bool {
        self.show_help
    }

    #[must_use]
    pub fn size(&self) -> (u16, u16) {
        (self.width, self.height)
    }

    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    #[must_use]
    pub fn menu(&self) -> &FilterableList {
        &self.menu
    }

    #[must_use]
    pub fn program_list(&self) -> &FilterableList {
        &self.program_list
    }

    #[must_use]
    pub fn program_detail(&self) -> &DetailView {
        &self.program_detail
    }

    #[must_use]
    pub fn map_list(&self) -> &FilterableList {
        &self.map_list
    }

    #[must_use]
    pub fn map_detail(&self) -> &DetailView {
        &self.map_detail
    }

    #[must_use]
    pub fn map_dump(&self) -> &DumpView {
        &self.map_dump
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::KeyCode;

    use super::*;
    use crate::services::FixtureService;
    use crate::tui::keys::key;

    fn demo_session() -> Session {
        let service = FixtureService::demo();
        Session::new(Box::new(service.clone()), Box::new(service))
    }

    fn press(session: &mut Session, code: KeyCode) -> Control {
        session.handle_input(InputEvent::Key(key(code)))
    }

    #[test]
    fn test_back_at_root_is_noop() {
        let mut session = demo_session();
        press(&mut session, KeyCode::Esc);
        assert_eq!(session.current(), ViewId::Menu);
        assert!(session.history().is_empty());
    }

    #[test]
    fn test_stack_never_holds_current_view() {
        let mut session = demo_session();
        press(&mut session, KeyCode::Enter); // Programs
        press(&mut session, KeyCode::Enter); // first program
        assert_eq!(session.current(), ViewId::ProgramDetail);
        assert_eq!(session.history(), &[ViewId::Menu, ViewId::ProgramList]);
        assert_ne!(session.history().last(), Some(&session.current()));
    }

    #[test]
    fn test_resize_reaches_every_panel() {
        let mut session = demo_session();
        session.handle_input(InputEvent::Resize { width: 120, height: 50 });
        assert_eq!(session.size(), (120, 50));
        assert_eq!(session.current(), ViewId::Menu);
    }

    #[test]
    fn test_dump_label_comes_from_map_detail() {
        let mut session = demo_session();
        press(&mut session, KeyCode::Down);
        press(&mut session, KeyCode::Enter); // Maps
        press(&mut session, KeyCode::Enter); // blocklist
        press(&mut session, KeyCode::Enter); // Dump Contents
        assert_eq!(session.current(), ViewId::MapDump);
        assert_eq!(session.map_dump().title(), "Map Dump: blocklist (ID: 21)");
        assert_eq!(session.map_dump().entries().len(), 2);
    }

    #[test]
    fn test_view_names() {
        assert_eq!(ViewId::ProgramDetail.to_string(), "Program Detail");
        assert_eq!(ViewId::ROOT, ViewId::Menu);
    }
}
