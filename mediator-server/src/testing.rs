//! Test doubles shared by the handler tests.

use std::sync::Mutex;

use mediator_core::{InputDevice, Key, MediatorError, Modifier, MouseButton};

/// Input device that records every call as a short string.
#[derive(Debug, Default)]
pub struct RecordingInput {
    calls: Mutex<Vec<String>>,
    fail: bool,
}

impl RecordingInput {
    /// A device whose every call fails with `Unsupported`.
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) -> Result<(), MediatorError> {
        if self.fail {
            return Err(MediatorError::Unsupported("test device"));
        }
        self.calls.lock().unwrap().push(call);
        Ok(())
    }
}

impl InputDevice for RecordingInput {
    fn screen_size(&self) -> Result<(u32, u32), MediatorError> {
        self.record("screen-size".into())?;
        Ok((1920, 1080))
    }

    fn mouse_pos(&self) -> Result<(i32, i32), MediatorError> {
        self.record("mouse-pos".into())?;
        Ok((5, 7))
    }

    fn move_mouse(&self, x: i32, y: i32) -> Result<(), MediatorError> {
        self.record(format!("move {x},{y}"))
    }

    fn click(&self, button: MouseButton, double: bool) -> Result<(), MediatorError> {
        let suffix = if double { " double" } else { "" };
        self.record(format!("click {}{suffix}", button.as_str()))
    }

    fn scroll(&self, dx: i32, dy: i32) -> Result<(), MediatorError> {
        self.record(format!("scroll {dx},{dy}"))
    }

    fn type_text(&self, text: &str) -> Result<(), MediatorError> {
        self.record(format!("type {text}"))
    }

    fn key_tap(&self, key: Key, modifiers: &[Modifier]) -> Result<(), MediatorError> {
        self.record(format!("key {key} {modifiers:?}"))
    }
}
