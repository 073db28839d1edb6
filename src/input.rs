//! Keyboard input mapping
//!
//! Terminals on Linux rarely report key releases, so bindings fire on press
//! unless the settings ask for release events.

use crate::animation::Action;
use crate::settings::{KeyTrigger, Settings};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Key bindings configuration - supports multiple keys per action
#[derive(Debug, Clone)]
pub struct KeyBindings {
    pub next_shape: Vec<KeyCode>,
    pub rotate_left: Vec<KeyCode>,
    pub rotate_right: Vec<KeyCode>,
    pub quit: Vec<KeyCode>,
}

impl KeyBindings {
    /// Parse a key string into KeyCode
    fn parse_key(s: &str) -> Option<KeyCode> {
        let key = match s.to_lowercase().as_str() {
            "left" => KeyCode::Left,
            "right" => KeyCode::Right,
            "up" => KeyCode::Up,
            "down" => KeyCode::Down,
            "space" => KeyCode::Char(' '),
            "enter" => KeyCode::Enter,
            "tab" => KeyCode::Tab,
            "backspace" => KeyCode::Backspace,
            "esc" | "escape" => KeyCode::Esc,
            s => {
                let mut chars = s.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => KeyCode::Char(c),
                    _ => return None,
                }
            }
        };
        Some(key)
    }

    /// Parse a list of key strings into KeyCodes, skipping unknown names
    fn parse_keys(keys: &[String]) -> Vec<KeyCode> {
        keys.iter()
            .filter_map(|s| {
                let key = Self::parse_key(s);
                if key.is_none() {
                    tracing::warn!("Unknown key name in settings: {:?}", s);
                }
                key
            })
            .collect()
    }

    /// Create keybindings from settings
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            next_shape: Self::parse_keys(&settings.keys.next_shape),
            rotate_left: Self::parse_keys(&settings.keys.rotate_left),
            rotate_right: Self::parse_keys(&settings.keys.rotate_right),
            quit: Self::parse_keys(&settings.keys.quit),
        }
    }

    /// Action bound to a key code, if any
    pub fn action_for(&self, code: KeyCode) -> Option<Action> {
        let code = normalize_key(code);
        if self.next_shape.contains(&code) {
            Some(Action::NextShape)
        } else if self.rotate_left.contains(&code) {
            Some(Action::RotateLeft)
        } else if self.rotate_right.contains(&code) {
            Some(Action::RotateRight)
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
            next_shape: vec![KeyCode::Char(' ')],
            rotate_left: vec![KeyCode::Left],
            rotate_right: vec![KeyCode::Right],
            quit: vec![KeyCode::Char('q'), KeyCode::Esc],
        }
    }
}

/// Turns key events into demo actions
#[derive(Debug, Clone, Default)]
pub struct InputHandler {
    bindings: KeyBindings,
    trigger: KeyTrigger,
}

impl InputHandler {
    /// Create input handler from settings
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            bindings: KeyBindings::from_settings(settings),
            trigger: settings.keys.trigger,
        }
    }

    /// Map a key event to an action
    pub fn handle_key(&self, key: KeyEvent) -> Option<Action> {
        // Ctrl+C always quits, whatever the trigger
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Some(Action::Quit);
        }

        let wanted = match self.trigger {
            KeyTrigger::Press => key.kind == KeyEventKind::Press,
            KeyTrigger::Release => key.kind == KeyEventKind::Release,
        };
        if !wanted {
            return None;
        }

        self.bindings.action_for(key.code)
    }
}

/// Trigger the terminal can actually deliver
///
/// Release events only arrive when the terminal supports keyboard
/// enhancement, so a release trigger falls back to press without it.
pub fn resolve_trigger(requested: KeyTrigger, release_events: bool) -> KeyTrigger {
    match requested {
        KeyTrigger::Release if !release_events => {
            tracing::warn!("Terminal does not report key releases, triggering on press instead");
            KeyTrigger::Press
        }
        trigger => trigger,
    }
}

/// Normalize key codes for consistent handling
fn normalize_key(code: KeyCode) -> KeyCode {
    match code {
        KeyCode::Char(c) => KeyCode::Char(c.to_ascii_lowercase()),
        other => other,
    }
}
