//! Key binding and event translation
//!
//! Held-key repetition comes from terminal auto-repeat, so a plain
//! press-to-action mapping is all that is needed here.

use crate::game::Action;
use crate::settings::Settings;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Key bindings - supports multiple keys per action
#[derive(Debug, Clone)]
pub struct KeyBindings {
    pub move_left: Vec<KeyCode>,
    pub move_right: Vec<KeyCode>,
    pub rotate_cw: Vec<KeyCode>,
    pub rotate_ccw: Vec<KeyCode>,
    pub drop: Vec<KeyCode>,
    pub quit: Vec<KeyCode>,
}

impl KeyBindings {
    /// Parse a key string into KeyCode
    fn parse_key(s: &str) -> KeyCode {
        match s.to_lowercase().as_str() {
            "left" => KeyCode::Left,
            "right" => KeyCode::Right,
            "up" => KeyCode::Up,
            "down" => KeyCode::Down,
            "space" => KeyCode::Char(' '),
            "enter" => KeyCode::Enter,
            "tab" => KeyCode::Tab,
            "esc" | "escape" => KeyCode::Esc,
            s if s.len() == 1 => KeyCode::Char(s.chars().next().unwrap()),
            _ => KeyCode::Char(' '), // fallback
        }
    }

    /// Parse a list of key strings into KeyCodes
    fn parse_keys(keys: &[String]) -> Vec<KeyCode> {
        keys.iter().map(|s| Self::parse_key(s)).collect()
    }

    /// Create keybindings from settings
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            move_left: Self::parse_keys(&settings.keys.move_left),
            move_right: Self::parse_keys(&settings.keys.move_right),
            rotate_cw: Self::parse_keys(&settings.keys.rotate_cw),
            rotate_ccw: Self::parse_keys(&settings.keys.rotate_ccw),
            drop: Self::parse_keys(&settings.keys.drop),
            quit: Self::parse_keys(&settings.keys.quit),
        }
    }

    /// Translate a key press into an action; None for unbound keys.
    /// Ctrl+C always quits.
    pub fn map(&self, key: KeyEvent) -> Option<Action> {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Some(Action::Quit);
        }

        let code = normalize_key(key.code);
        if self.move_left.contains(&code) {
            Some(Action::MoveLeft)
        } else if self.move_right.contains(&code) {
            Some(Action::MoveRight)
        } else if self.rotate_cw.contains(&code) {
            Some(Action::RotateCw)
        } else if self.rotate_ccw.contains(&code) {
            Some(Action::RotateCcw)
        } else if self.drop.contains(&code) {
            Some(Action::Drop)
        } else if self.quit.contains(&code) {
            Some(Action::Quit)
        } else {
            None
        }
    }
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            move_left: vec![KeyCode::Left],
            move_right: vec![KeyCode::Right],
            rotate_cw: vec![KeyCode::Up, KeyCode::Char('x')],
            rotate_ccw: vec![KeyCode::Char('z')],
            drop: vec![KeyCode::Down],
            quit: vec![KeyCode::Char('q'), KeyCode::Esc],
        }
    }
}

/// Normalize key codes for consistent handling
fn normalize_key(code: KeyCode) -> KeyCode {
    match code {
        KeyCode::Char(c) => KeyCode::Char(c.to_ascii_lowercase()),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_default_bindings() {
        let bindings = KeyBindings::default();
        assert_eq!(bindings.map(press(KeyCode::Left)), Some(Action::MoveLeft));
        assert_eq!(bindings.map(press(KeyCode::Right)), Some(Action::MoveRight));
        assert_eq!(bindings.map(press(KeyCode::Up)), Some(Action::RotateCw));
        assert_eq!(bindings.map(press(KeyCode::Down)), Some(Action::Drop));
        assert_eq!(bindings.map(press(KeyCode::Char('q'))), Some(Action::Quit));
        assert_eq!(bindings.map(press(KeyCode::Char('w'))), None);
    }

    #[test]
    fn test_alternate_keys_and_case() {
        let bindings = KeyBindings::default();
        assert_eq!(bindings.map(press(KeyCode::Char('x'))), Some(Action::RotateCw));
        assert_eq!(bindings.map(press(KeyCode::Char('X'))), Some(Action::RotateCw));
        assert_eq!(bindings.map(press(KeyCode::Char('z'))), Some(Action::RotateCcw));
    }

    #[test]
    fn test_ctrl_c_quits() {
        let bindings = KeyBindings::default();
        let key = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(bindings.map(key), Some(Action::Quit));
    }

    #[test]
    fn test_parse_key_names() {
        assert_eq!(KeyBindings::parse_key("Left"), KeyCode::Left);
        assert_eq!(KeyBindings::parse_key("SPACE"), KeyCode::Char(' '));
        assert_eq!(KeyBindings::parse_key("escape"), KeyCode::Esc);
        assert_eq!(KeyBindings::parse_key("x"), KeyCode::Char('x'));
    }
}
