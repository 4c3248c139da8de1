use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppAction {
    Quit,
    Cancel,
    Submit,
    Backspace,
    Up,
    Down,
    Input(char),
    None,
}

/// Maps a key event to an action. `editing` routes printable characters
/// into the input field instead of treating them as commands, so typing
/// "quit" into the add form does not quit.
pub fn map_key(key: KeyEvent, editing: bool) -> AppAction {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        if let KeyCode::Char('c') = key.code {
            return AppAction::Quit;
        }
        return AppAction::None;
    }

    match key.code {
        KeyCode::Esc => AppAction::Cancel,
        KeyCode::Enter => AppAction::Submit,
        KeyCode::Backspace => AppAction::Backspace,
        KeyCode::Up => AppAction::Up,
        KeyCode::Down => AppAction::Down,
        KeyCode::Char('q') if !editing => AppAction::Quit,
        KeyCode::Char(ch) => AppAction::Input(ch),
        _ => AppAction::None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEventKind, KeyEventState};

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    #[test]
    fn q_quits_only_outside_editing() {
        let quit = key(KeyCode::Char('q'), KeyModifiers::NONE);
        assert_eq!(map_key(quit, false), AppAction::Quit);
        let typed = key(KeyCode::Char('q'), KeyModifiers::NONE);
        assert_eq!(map_key(typed, true), AppAction::Input('q'));
    }

    #[test]
    fn ctrl_c_always_quits() {
        assert_eq!(
            map_key(key(KeyCode::Char('c'), KeyModifiers::CONTROL), true),
            AppAction::Quit
        );
        assert_eq!(
            map_key(key(KeyCode::Char('c'), KeyModifiers::CONTROL), false),
            AppAction::Quit
        );
    }

    #[test]
    fn plain_characters_are_input() {
        let event = key(KeyCode::Char('w'), KeyModifiers::NONE);
        assert_eq!(map_key(event, false), AppAction::Input('w'));
    }
}
