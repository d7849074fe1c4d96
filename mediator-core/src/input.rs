//! Mouse and keyboard vocabulary plus the input device seam.
//!
//! The browser names buttons and keys with short lowercase strings
//! (`"left"`, `"enter"`, `"ctrl"`). Those are parsed into the enums here
//! once, at the API boundary, so platform backends only ever see typed
//! values.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::MediatorError;

// ── MouseButton ──────────────────────────────────────────────────

/// Mouse button identifier.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(try_from = "String", into = "String")]
pub enum MouseButton {
    #[default]
    Left,
    Right,
    Middle,
}

impl MouseButton {
    pub fn as_str(self) -> &'static str {
        match self {
            MouseButton::Left => "left",
            MouseButton::Right => "right",
            MouseButton::Middle => "middle",
        }
    }
}

impl FromStr for MouseButton {
    type Err = MediatorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "" | "left" => Ok(MouseButton::Left),
            "right" => Ok(MouseButton::Right),
            "middle" | "center" => Ok(MouseButton::Middle),
            other => Err(MediatorError::InvalidInput(format!(
                "unknown mouse button: {other}"
            ))),
        }
    }
}

impl TryFrom<String> for MouseButton {
    type Error = MediatorError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<MouseButton> for String {
    fn from(b: MouseButton) -> Self {
        b.as_str().to_string()
    }
}

// ── Modifier ─────────────────────────────────────────────────────

/// Modifier keys held down around a key tap.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "String", into = "String")]
pub enum Modifier {
    Shift,
    Control,
    Alt,
    /// Windows key / Command / Super.
    Meta,
}

impl Modifier {
    pub fn as_str(self) -> &'static str {
        match self {
            Modifier::Shift => "shift",
            Modifier::Control => "ctrl",
            Modifier::Alt => "alt",
            Modifier::Meta => "cmd",
        }
    }
}

impl FromStr for Modifier {
    type Err = MediatorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "shift" => Ok(Modifier::Shift),
            "ctrl" | "control" => Ok(Modifier::Control),
            "alt" | "option" => Ok(Modifier::Alt),
            "cmd" | "command" | "super" | "meta" | "win" => Ok(Modifier::Meta),
            other => Err(MediatorError::InvalidInput(format!(
                "unknown modifier: {other}"
            ))),
        }
    }
}

impl TryFrom<String> for Modifier {
    type Error = MediatorError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Modifier> for String {
    fn from(m: Modifier) -> Self {
        m.as_str().to_string()
    }
}

// ── Key ──────────────────────────────────────────────────────────

/// A key that can be tapped.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "String", into = "String")]
pub enum Key {
    Enter,
    Backspace,
    Tab,
    Escape,
    Space,
    Delete,
    Insert,
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    PageUp,
    PageDown,
    /// Function key `F1..=F12`.
    F(u8),
    /// Any single printable character.
    Char(char),
}

impl FromStr for Key {
    type Err = MediatorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            return Ok(Key::Char(c));
        }

        let lower = s.to_ascii_lowercase();
        let key = match lower.as_str() {
            "enter" | "return" => Key::Enter,
            "backspace" => Key::Backspace,
            "tab" => Key::Tab,
            "escape" | "esc" => Key::Escape,
            "space" => Key::Space,
            "delete" | "del" => Key::Delete,
            "insert" => Key::Insert,
            "up" | "arrowup" => Key::Up,
            "down" | "arrowdown" => Key::Down,
            "left" | "arrowleft" => Key::Left,
            "right" | "arrowright" => Key::Right,
            "home" => Key::Home,
            "end" => Key::End,
            "pageup" => Key::PageUp,
            "pagedown" => Key::PageDown,
            _ => match lower.strip_prefix('f').and_then(|n| n.parse::<u8>().ok()) {
                Some(n @ 1..=12) => Key::F(n),
                _ => {
                    return Err(MediatorError::InvalidInput(format!("unknown key: {s}")));
                }
            },
        };
        Ok(key)
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Key::Enter => "enter",
            Key::Backspace => "backspace",
            Key::Tab => "tab",
            Key::Escape => "escape",
            Key::Space => "space",
            Key::Delete => "delete",
            Key::Insert => "insert",
            Key::Up => "up",
            Key::Down => "down",
            Key::Left => "left",
            Key::Right => "right",
            Key::Home => "home",
            Key::End => "end",
            Key::PageUp => "pageup",
            Key::PageDown => "pagedown",
            Key::F(n) => return write!(f, "f{n}"),
            Key::Char(c) => return write!(f, "{c}"),
        };
        f.write_str(name)
    }
}

impl TryFrom<String> for Key {
    type Error = MediatorError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Key> for String {
    fn from(k: Key) -> Self {
        k.to_string()
    }
}

// ── InputDevice ──────────────────────────────────────────────────

/// Injects input into, and queries geometry of, the controlled desktop.
///
/// Calls are short and synchronous; HTTP handlers call them directly.
pub trait InputDevice: Send + Sync + 'static {
    /// Size of the captured display in pixels.
    fn screen_size(&self) -> Result<(u32, u32), MediatorError>;

    /// Current pointer position in screen coordinates.
    fn mouse_pos(&self) -> Result<(i32, i32), MediatorError>;

    /// Move the pointer to `(x, y)`.
    fn move_mouse(&self, x: i32, y: i32) -> Result<(), MediatorError>;

    /// Click `button` at the current position.
    fn click(&self, button: MouseButton, double: bool) -> Result<(), MediatorError>;

    /// Scroll by `dx` columns and `dy` rows; positive `dy` scrolls down.
    fn scroll(&self, dx: i32, dy: i32) -> Result<(), MediatorError>;

    /// Type `text` as if entered on the keyboard.
    fn type_text(&self, text: &str) -> Result<(), MediatorError>;

    /// Press and release `key` with `modifiers` held.
    fn key_tap(&self, key: Key, modifiers: &[Modifier]) -> Result<(), MediatorError>;
}

// ── Tests ────────────────────────────────────────────────────────
