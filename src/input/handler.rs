use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::collections::HashMap;

use crate::game::{Control, Difficulty, Direction};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Move(Direction),
    Control(Control),
    /// Pick a difficulty straight from the menu
    Select(Difficulty),
    /// Accept the highlighted menu entry
    Confirm,
    None,
}

/// Translates terminal key events into game commands.
///
/// The key table is built once; letters are matched case-insensitively.
pub struct InputHandler {
    bindings: HashMap<KeyCode, KeyAction>,
}

impl InputHandler {
    pub fn new() -> Self {
        let mut bindings = HashMap::new();

        for (keys, direction) in [
            ([KeyCode::Up, KeyCode::Char('w')], Direction::Up),
            ([KeyCode::Down, KeyCode::Char('s')], Direction::Down),
            ([KeyCode::Left, KeyCode::Char('a')], Direction::Left),
            ([KeyCode::Right, KeyCode::Char('d')], Direction::Right),
        ] {
            for key in keys {
                bindings.insert(key, KeyAction::Move(direction));
            }
        }

        bindings.insert(KeyCode::Esc, KeyAction::Control(Control::TogglePause));
        bindings.insert(KeyCode::Char('p'), KeyAction::Control(Control::TogglePause));
        bindings.insert(KeyCode::Char('r'), KeyAction::Control(Control::Reset));
        bindings.insert(KeyCode::Char('q'), KeyAction::Control(Control::Quit));

        for (key, difficulty) in ['1', '2', '3'].into_iter().zip(Difficulty::ALL) {
            bindings.insert(KeyCode::Char(key), KeyAction::Select(difficulty));
        }

        bindings.insert(KeyCode::Enter, KeyAction::Confirm);
        bindings.insert(KeyCode::Char(' '), KeyAction::Confirm);

        Self { bindings }
    }

    pub fn handle_key_event(&self, key: KeyEvent) -> KeyAction {
        // Handle Ctrl+C
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return KeyAction::Control(Control::Quit);
        }

        let code = match key.code {
            KeyCode::Char(c) => KeyCode::Char(c.to_ascii_lowercase()),
            other => other,
        };

        self.bindings.get(&code).copied().unwrap_or(KeyAction::None)
    }
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new()
    }
}
