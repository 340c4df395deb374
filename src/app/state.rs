//! Keyboard input mapping
//!
//! Converts crossterm key events into screen-independent key actions.
//! Each screen decides what an action means for it.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Actions that can be triggered by keyboard input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    /// Move selection up (arrow up, k)
    Up,
    /// Move selection down (arrow down, j)
    Down,
    /// Previous question / decrease value (arrow left, h)
    Left,
    /// Next question / increase value (arrow right, l)
    Right,
    /// Confirm selection (Enter, Space)
    Select,
    /// Go back/cancel (Esc, Backspace)
    Back,
    /// Next item (Tab)
    Next,
    /// Previous item (Shift+Tab)
    Previous,
    /// Pick an answer option (1-3)
    Option(usize),
    /// Finish the exam (f)
    Finish,
    /// Open the review (r)
    Review,
    /// Export results (x)
    Export,
    /// Start over (n)
    Restart,
    /// Cycle the area filter (a)
    Area,
    /// Confirm a prompt (y)
    Confirm,
    /// Quit application (q, Ctrl+C)
    Quit,
    /// No action
    None,
}

/// Convert a keyboard event to a key action
pub fn key_to_action(key: KeyEvent) -> KeyAction {
    if key.kind == KeyEventKind::Release {
        return KeyAction::None;
    }

    match key.code {
        KeyCode::Char('q') | KeyCode::Char('Q') => KeyAction::Quit,
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => KeyAction::Quit,

        KeyCode::Up | KeyCode::Char('k') => KeyAction::Up,
        KeyCode::Down | KeyCode::Char('j') => KeyAction::Down,
        KeyCode::Left | KeyCode::Char('h') => KeyAction::Left,
        KeyCode::Right | KeyCode::Char('l') => KeyAction::Right,

        KeyCode::Enter | KeyCode::Char(' ') => KeyAction::Select,
        KeyCode::Esc | KeyCode::Backspace => KeyAction::Back,

        KeyCode::Tab => {
            if key.modifiers.contains(KeyModifiers::SHIFT) {
                KeyAction::Previous
            } else {
                KeyAction::Next
            }
        }
        KeyCode::BackTab => KeyAction::Previous,

        KeyCode::Char(c @ '1'..='3') => KeyAction::Option(c as usize - '1' as usize),

        KeyCode::Char('f') | KeyCode::Char('F') => KeyAction::Finish,
        KeyCode::Char('r') | KeyCode::Char('R') => KeyAction::Review,
        KeyCode::Char('x') | KeyCode::Char('X') => KeyAction::Export,
        KeyCode::Char('n') | KeyCode::Char('N') => KeyAction::Restart,
        KeyCode::Char('a') | KeyCode::Char('A') => KeyAction::Area,
        KeyCode::Char('y') | KeyCode::Char('Y') => KeyAction::Confirm,

        _ => KeyAction::None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_quit_keys() {
        assert_eq!(key_to_action(key(KeyCode::Char('q'))), KeyAction::Quit);
        assert_eq!(key_to_action(key(KeyCode::Char('Q'))), KeyAction::Quit);
        assert_eq!(
            key_to_action(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            KeyAction::Quit
        );
    }

    #[test]
    fn test_navigation_keys() {
        assert_eq!(key_to_action(key(KeyCode::Up)), KeyAction::Up);
        assert_eq!(key_to_action(key(KeyCode::Char('j'))), KeyAction::Down);
        assert_eq!(key_to_action(key(KeyCode::Left)), KeyAction::Left);
        assert_eq!(key_to_action(key(KeyCode::Char('l'))), KeyAction::Right);
        assert_eq!(key_to_action(key(KeyCode::Enter)), KeyAction::Select);
        assert_eq!(key_to_action(key(KeyCode::Esc)), KeyAction::Back);
    }

    #[test]
    fn test_option_keys() {
        assert_eq!(key_to_action(key(KeyCode::Char('1'))), KeyAction::Option(0));
        assert_eq!(key_to_action(key(KeyCode::Char('3'))), KeyAction::Option(2));
        assert_eq!(key_to_action(key(KeyCode::Char('4'))), KeyAction::None);
    }

    #[test]
    fn test_tab_navigation() {
        assert_eq!(key_to_action(key(KeyCode::Tab)), KeyAction::Next);
        assert_eq!(
            key_to_action(KeyEvent::new(KeyCode::Tab, KeyModifiers::SHIFT)),
            KeyAction::Previous
        );
        assert_eq!(key_to_action(key(KeyCode::BackTab)), KeyAction::Previous);
    }

    #[test]
    fn test_command_keys() {
        assert_eq!(key_to_action(key(KeyCode::Char('f'))), KeyAction::Finish);
        assert_eq!(key_to_action(key(KeyCode::Char('r'))), KeyAction::Review);
        assert_eq!(key_to_action(key(KeyCode::Char('x'))), KeyAction::Export);
        assert_eq!(key_to_action(key(KeyCode::Char('n'))), KeyAction::Restart);
        assert_eq!(key_to_action(key(KeyCode::Char('y'))), KeyAction::Confirm);
    }

    #[test]
    fn test_release_events_ignored() {
        let mut event = key(KeyCode::Char('q'));
        event.kind = KeyEventKind::Release;
        assert_eq!(key_to_action(event), KeyAction::None);
    }
}
