use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::action::Action;
use crate::app::Focus;

/// Keys that are not captured by the search field or a key listener.
pub fn map_key_to_action(key: KeyEvent, focus: Focus, overlay_open: bool) -> Option<Action> {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') => Some(Action::Quit),
            _ => None,
        };
    }

    if overlay_open {
        return map_overlay_key(key);
    }

    match focus {
        Focus::Search => match key.code {
            KeyCode::Tab | KeyCode::Down | KeyCode::Esc => Some(Action::FocusGallery),
            _ => None,
        },
        Focus::Gallery => map_gallery_key(key),
    }
}

fn map_overlay_key(key: KeyEvent) -> Option<Action> {
    match key.code {
        KeyCode::Enter => Some(Action::OpenSelected),
        KeyCode::Left | KeyCode::Char('h') => Some(Action::Step { delta: -1 }),
        KeyCode::Right | KeyCode::Char('l') => Some(Action::Step { delta: 1 }),
        KeyCode::Char('q') => Some(Action::CloseOverlay),
        _ => None,
    }
}

fn map_gallery_key(key: KeyEvent) -> Option<Action> {
    match key.code {
        KeyCode::Char('/') | KeyCode::Tab => Some(Action::FocusSearch),
        KeyCode::Left | KeyCode::Char('h') => Some(Action::MoveSelection { dx: -1, dy: 0 }),
        KeyCode::Right | KeyCode::Char('l') => Some(Action::MoveSelection { dx: 1, dy: 0 }),
        KeyCode::Up | KeyCode::Char('k') => Some(Action::MoveSelection { dx: 0, dy: -1 }),
        KeyCode::Down | KeyCode::Char('j') => Some(Action::MoveSelection { dx: 0, dy: 1 }),
        KeyCode::Enter => Some(Action::OpenSelected),
        KeyCode::Char('m') | KeyCode::Char(' ') => Some(Action::LoadMore),
        KeyCode::Char('q') => Some(Action::Quit),
        _ => None,
    }
}
