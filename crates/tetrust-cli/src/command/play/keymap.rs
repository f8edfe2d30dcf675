use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tetrust_engine::{Intent, SessionState};

use crate::ui::widgets::KeyBinding;

/// Maps a key press to the intent it stands for.
///
/// Key releases are ignored so that terminals reporting them do not trigger
/// every action twice.
pub(crate) fn intent_from_key_event(event: &KeyEvent) -> Option<Intent> {
    if event.kind == KeyEventKind::Release {
        return None;
    }
    if event.modifiers.contains(KeyModifiers::CONTROL) {
        return matches!(event.code, KeyCode::Char('c')).then_some(Intent::Quit);
    }
    let intent = match event.code {
        KeyCode::Left | KeyCode::Char('a' | 'h') => Intent::MoveLeft,
        KeyCode::Right | KeyCode::Char('d' | 'l') => Intent::MoveRight,
        KeyCode::Down | KeyCode::Char('s' | 'j') => Intent::SoftDrop,
        KeyCode::Char(' ') => Intent::HardDrop,
        KeyCode::Up | KeyCode::Char('x' | 'w' | 'k') => Intent::RotateCw,
        KeyCode::Char('z') => Intent::RotateCcw,
        KeyCode::Char('c') => Intent::Hold,
        KeyCode::Char('p') => Intent::Pause,
        KeyCode::Char('r') => Intent::Restart,
        KeyCode::Char('q') | KeyCode::Esc => Intent::Quit,
        _ => return None,
    };
    Some(intent)
}

pub(crate) fn bindings(state: SessionState) -> &'static [KeyBinding<'static>] {
    match state {
        SessionState::Playing => &[
            (&["←", "→"], "Move"),
            (&["↓"], "Soft Drop"),
            (&["Space"], "Hard Drop"),
            (&["↑", "x"], "Rotate"),
            (&["z"], "Rotate Back"),
            (&["c"], "Hold"),
            (&["p"], "Pause"),
            (&["q"], "Quit"),
        ],
        SessionState::Paused => &[(&["p"], "Resume"), (&["r"], "Restart"), (&["q"], "Quit")],
        SessionState::GameOver => &[(&["r"], "Restart"), (&["q"], "Quit")],
    }
}
