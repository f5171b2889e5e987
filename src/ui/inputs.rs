use super::AppAction;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Convert a raw `KeyEvent` from crossterm into a high-level [`AppAction`].
/// Returns `None` for keys that are not handled by the picker.
pub fn key_event_to_action(ev: &KeyEvent) -> Option<AppAction> {
    use KeyCode::*;
    // Windows reports key releases too; only presses drive the cursor.
    if ev.kind == KeyEventKind::Release {
        return None;
    }
    match ev.code {
        Char('c') if ev.modifiers.contains(KeyModifiers::CONTROL) => Some(AppAction::Quit),
        Char('q') | Esc => Some(AppAction::Quit),
        Up | Char('k') => Some(AppAction::Up),
        Down | Char('j') => Some(AppAction::Down),
        Enter | Char('\r') => Some(AppAction::Confirm),
        _ => None,
    }
}
