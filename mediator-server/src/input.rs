//! Platform mouse and keyboard injection.
//!
//! # Platform
//!
//! Injection uses Win32 `SendInput` and is Windows-only. On other
//! platforms [`DesktopInput`] still reports the screen size (from the
//! capture backend) but every injection call returns
//! [`MediatorError::Unsupported`].

use mediator_core::{InputDevice, Key, MediatorError, Modifier, MouseButton};

use crate::capture::XcapScreen;

// ── DesktopInput ─────────────────────────────────────────────────

/// Injects mouse and keyboard events into the local desktop session.
///
/// On Windows this requires the process to run in the interactive
/// session it controls.
#[derive(Debug, Default)]
pub struct DesktopInput {
    screen: XcapScreen,
}

impl DesktopInput {
    pub fn new() -> Self {
        Self::default()
    }
}

// ── Windows implementation ───────────────────────────────────────

#[cfg(target_os = "windows")]
mod platform {
    use super::*;
    use windows::Win32::Foundation::POINT;
    use windows::Win32::UI::Input::KeyboardAndMouse::*;
    use windows::Win32::UI::WindowsAndMessaging::{GetCursorPos, SetCursorPos};

    /// One notch of a mouse wheel.
    const WHEEL_DELTA: i32 = 120;

    fn send(inputs: &[INPUT]) -> Result<(), MediatorError> {
        let sent = unsafe { SendInput(inputs, std::mem::size_of::<INPUT>() as i32) };
        if sent as usize != inputs.len() {
            return Err(MediatorError::Other(format!(
                "SendInput injected {sent} of {} events",
                inputs.len()
            )));
        }
        Ok(())
    }

    fn mouse_input(flags: MOUSE_EVENT_FLAGS, data: i32) -> INPUT {
        INPUT {
            r#type: INPUT_MOUSE,
            Anonymous: INPUT_0 {
                mi: MOUSEINPUT {
                    dx: 0,
                    dy: 0,
                    mouseData: data as u32,
                    dwFlags: flags,
                    time: 0,
                    dwExtraInfo: 0,
                },
            },
        }
    }

    fn key_input(vk: VIRTUAL_KEY, scan: u16, flags: KEYBD_EVENT_FLAGS) -> INPUT {
        INPUT {
            r#type: INPUT_KEYBOARD,
            Anonymous: INPUT_0 {
                ki: KEYBDINPUT {
                    wVk: vk,
                    wScan: scan,
                    dwFlags: flags,
                    time: 0,
                    dwExtraInfo: 0,
                },
            },
        }
    }

    fn modifier_vk(m: Modifier) -> VIRTUAL_KEY {
        match m {
            Modifier::Shift => VK_SHIFT,
            Modifier::Control => VK_CONTROL,
            Modifier::Alt => VK_MENU,
            Modifier::Meta => VK_LWIN,
        }
    }

    /// Virtual key for `key`, plus whether Shift must be held to produce it.
    fn key_vk(key: Key) -> Result<(VIRTUAL_KEY, bool), MediatorError> {
        let vk = match key {
            Key::Enter => VK_RETURN,
            Key::Backspace => VK_BACK,
            Key::Tab => VK_TAB,
            Key::Escape => VK_ESCAPE,
            Key::Space => VK_SPACE,
            Key::Delete => VK_DELETE,
            Key::Insert => VK_INSERT,
            Key::Up => VK_UP,
            Key::Down => VK_DOWN,
            Key::Left => VK_LEFT,
            Key::Right => VK_RIGHT,
            Key::Home => VK_HOME,
            Key::End => VK_END,
            Key::PageUp => VK_PRIOR,
            Key::PageDown => VK_NEXT,
            Key::F(n) => VIRTUAL_KEY(VK_F1.0 + u16::from(n) - 1),
            Key::Char(c) => {
                let mut units = [0u16; 2];
                let encoded = c.encode_utf16(&mut units);
                if encoded.len() != 1 {
                    return Err(MediatorError::InvalidInput(format!("unmappable key: {c}")));
                }
                // Low byte: virtual key, high byte: shift state.
                let scan = unsafe { VkKeyScanW(units[0]) };
                if scan == -1 {
                    return Err(MediatorError::InvalidInput(format!("unmappable key: {c}")));
                }
                let shift = (scan >> 8) & 1 != 0;
                return Ok((VIRTUAL_KEY((scan & 0xFF) as u16), shift));
            }
        };
        Ok((vk, false))
    }

    impl InputDevice for DesktopInput {
        fn screen_size(&self) -> Result<(u32, u32), MediatorError> {
            self.screen.size()
        }

        fn mouse_pos(&self) -> Result<(i32, i32), MediatorError> {
            let mut point = POINT::default();
            unsafe { GetCursorPos(&mut point) }
                .map_err(|e| MediatorError::Other(format!("GetCursorPos failed: {e}")))?;
            Ok((point.x, point.y))
        }

        fn move_mouse(&self, x: i32, y: i32) -> Result<(), MediatorError> {
            unsafe { SetCursorPos(x, y) }
                .map_err(|e| MediatorError::Other(format!("SetCursorPos failed: {e}")))
        }

        fn click(&self, button: MouseButton, double: bool) -> Result<(), MediatorError> {
            let (down, up) = match button {
                MouseButton::Left => (MOUSEEVENTF_LEFTDOWN, MOUSEEVENTF_LEFTUP),
                MouseButton::Right => (MOUSEEVENTF_RIGHTDOWN, MOUSEEVENTF_RIGHTUP),
                MouseButton::Middle => (MOUSEEVENTF_MIDDLEDOWN, MOUSEEVENTF_MIDDLEUP),
            };
            let click = [mouse_input(down, 0), mouse_input(up, 0)];
            send(&click)?;
            if double {
                send(&click)?;
            }
            Ok(())
        }

        fn scroll(&self, dx: i32, dy: i32) -> Result<(), MediatorError> {
            let mut inputs = Vec::with_capacity(2);
            if dy != 0 {
                // Wheel-up is positive on Windows; our positive dy scrolls down.
                inputs.push(mouse_input(MOUSEEVENTF_WHEEL, -dy * WHEEL_DELTA));
            }
            if dx != 0 {
                inputs.push(mouse_input(MOUSEEVENTF_HWHEEL, dx * WHEEL_DELTA));
            }
            if inputs.is_empty() {
                return Ok(());
            }
            send(&inputs)
        }

        fn type_text(&self, text: &str) -> Result<(), MediatorError> {
            let mut inputs = Vec::with_capacity(text.len() * 2);
            for unit in text.encode_utf16() {
                inputs.push(key_input(VIRTUAL_KEY(0), unit, KEYEVENTF_UNICODE));
                inputs.push(key_input(
                    VIRTUAL_KEY(0),
                    unit,
                    KEYEVENTF_UNICODE | KEYEVENTF_KEYUP,
                ));
            }
            if inputs.is_empty() {
                return Ok(());
            }
            send(&inputs)
        }

        fn key_tap(&self, key: Key, modifiers: &[Modifier]) -> Result<(), MediatorError> {
            let (vk, needs_shift) = key_vk(key)?;

            let mut held: Vec<VIRTUAL_KEY> = modifiers.iter().map(|&m| modifier_vk(m)).collect();
            if needs_shift && !held.contains(&VK_SHIFT) {
                held.push(VK_SHIFT);
            }

            let mut inputs = Vec::with_capacity(held.len() * 2 + 2);
            for &m in &held {
                inputs.push(key_input(m, 0, KEYBD_EVENT_FLAGS(0)));
            }
            inputs.push(key_input(vk, 0, KEYBD_EVENT_FLAGS(0)));
            inputs.push(key_input(vk, 0, KEYEVENTF_KEYUP));
            for &m in held.iter().rev() {
                inputs.push(key_input(m, 0, KEYEVENTF_KEYUP));
            }
            send(&inputs)
        }
    }
}

// ── Non-Windows stub ─────────────────────────────────────────────

#[cfg(not(target_os = "windows"))]
mod platform {
    use super::*;

    const UNSUPPORTED: MediatorError = MediatorError::Unsupported(
        "input injection is only available on Windows",
    );

    impl InputDevice for DesktopInput {
        fn screen_size(&self) -> Result<(u32, u32), MediatorError> {
            self.screen.size()
        }

        fn mouse_pos(&self) -> Result<(i32, i32), MediatorError> {
            Err(UNSUPPORTED)
        }

        fn move_mouse(&self, _x: i32, _y: i32) -> Result<(), MediatorError> {
            Err(UNSUPPORTED)
        }

        fn click(&self, _button: MouseButton, _double: bool) -> Result<(), MediatorError> {
            Err(UNSUPPORTED)
        }

        fn scroll(&self, _dx: i32, _dy: i32) -> Result<(), MediatorError> {
            Err(UNSUPPORTED)
        }

        fn type_text(&self, _text: &str) -> Result<(), MediatorError> {
            Err(UNSUPPORTED)
        }

        fn key_tap(&self, _key: Key, _modifiers: &[Modifier]) -> Result<(), MediatorError> {
            Err(UNSUPPORTED)
        }
    }
}

// ── Tests ────────────────────────────────────────────────────────
