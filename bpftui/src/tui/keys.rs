//! Key map
//!
//! Raw crossterm key events are translated into [`Action`]s once, here.
//! Controllers match on actions, except a list in filter mode, which also
//! needs the raw character to build its query.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// What a key press asks for, independent of the active view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Up,
    Down,
    Confirm,
    Back,
    Quit,
    Filter,
    Help,
    PageUp,
    PageDown,
    Top,
    Bottom,
}

/// One row of the key map, as shown in the help overlay
#[derive(Debug, Clone, Copy)]
pub struct Binding {
    pub action: Action,
    pub keys: &'static str,
    pub help: &'static str,
}

pub const BINDINGS: &[Binding] = &[
    Binding { action: Action::Up, keys: "↑/k", help: "Move up" },
    Binding { action: Action::Down, keys: "↓/j", help: "Move down" },
    Binding { action: Action::Confirm, keys: "Enter", help: "Select" },
    Binding { action: Action::Back, keys: "Esc/Backspace", help: "Go back" },
    Binding { action: Action::Filter, keys: "/", help: "Filter list" },
    Binding { action: Action::PageUp, keys: "PgUp", help: "Scroll up a page" },
    Binding { action: Action::PageDown, keys: "PgDn", help: "Scroll down a page" },
    Binding { action: Action::Top, keys: "Home", help: "Scroll to top" },
    Binding { action: Action::Bottom, keys: "End", help: "Scroll to bottom" },
    Binding { action: Action::Help, keys: "?", help: "Toggle help" },
    Binding { action: Action::Quit, keys: "q/Ctrl+C", help: "Quit" },
];

/// Look up the binding row for an action
#[must_use]
pub fn binding(action: Action) -> Option<&'static Binding> {
    BINDINGS.iter().find(|b| b.action == action)
}

/// Translate a key press into an action, if it is bound
#[must_use]
pub fn action_for(key: &KeyEvent) -> Option<Action> {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') => Some(Action::Quit),
            _ => None,
        };
    }

    match key.code {
        KeyCode::Up | KeyCode::Char('k') => Some(Action::Up),
        KeyCode::Down | KeyCode::Char('j') => Some(Action::Down),
        KeyCode::Enter => Some(Action::Confirm),
        KeyCode::Esc | KeyCode::Backspace => Some(Action::Back),
        KeyCode::Char('q') => Some(Action::Quit),
        KeyCode::Char('/') => Some(Action::Filter),
        KeyCode::Char('?') => Some(Action::Help),
        KeyCode::PageUp => Some(Action::PageUp),
        KeyCode::PageDown => Some(Action::PageDown),
        KeyCode::Home => Some(Action::Top),
        KeyCode::End => Some(Action::Bottom),
        _ => None,
    }
}

/// Ctrl+C quits even while a list is taking filter text
#[must_use]
pub fn is_force_quit(key: &KeyEvent) -> bool {
    key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c')
}

/// Key press without modifiers
#[must_use]
pub fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}
