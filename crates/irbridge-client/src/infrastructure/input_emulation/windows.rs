//! Windows key injection via the SendInput API.
//!
//! Key codes in the keymap already are Windows virtual-key codes, so no
//! translation is needed: each event is one `KEYBDINPUT` with `wVk` set.

#![cfg(target_os = "windows")]

use irbridge_core::KeyCode;
use windows::Win32::UI::Input::KeyboardAndMouse::{
    SendInput, INPUT, INPUT_0, INPUT_KEYBOARD, KEYBDINPUT, KEYBD_EVENT_FLAGS,
    KEYEVENTF_EXTENDEDKEY, KEYEVENTF_KEYUP, VIRTUAL_KEY,
};

use super::INTER_EVENT_DELAY;
use crate::application::emulate_input::{EmulationError, InputInjector, KeyDirection};

/// Virtual keys that live on the extended part of the keyboard.  Without
/// `KEYEVENTF_EXTENDEDKEY` Windows maps them onto the numpad.
const EXTENDED_VKS: &[u16] = &[
    0x21, 0x22, 0x23, 0x24, 0x25, 0x26, 0x27, 0x28, // nav
    0x2D, 0x2E, // Insert, Delete
    0x5B, 0x5C, // Win keys
    0x6F, // Numpad divide
    0xA3, 0xA5, // Right Ctrl, Right Alt
];

/// [`InputInjector`] backed by `SendInput`.
pub struct SendInputInjector;

impl SendInputInjector {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SendInputInjector {
    fn default() -> Self {
        Self::new()
    }
}

impl InputInjector for SendInputInjector {
    fn send_key(&self, key: KeyCode, direction: KeyDirection) -> Result<(), EmulationError> {
        if !self.supports(key) {
            return Err(EmulationError::UnsupportedKey(key));
        }

        let input = INPUT {
            r#type: INPUT_KEYBOARD,
            Anonymous: INPUT_0 {
                ki: KEYBDINPUT {
                    wVk: VIRTUAL_KEY(key.0),
                    wScan: 0,
                    dwFlags: key_flags(key, direction),
                    time: 0,
                    dwExtraInfo: 0,
                },
            },
        };
        // SAFETY: input is a valid KEYBDINPUT structure on the stack
        let sent = unsafe { SendInput(&[input], std::mem::size_of::<INPUT>() as i32) };
        std::thread::sleep(INTER_EVENT_DELAY);

        if sent != 1 {
            return Err(EmulationError::Platform(format!(
                "SendInput rejected {key} {direction:?}: {}",
                std::io::Error::last_os_error()
            )));
        }
        Ok(())
    }

    fn supports(&self, key: KeyCode) -> bool {
        (0x01..=0xFE).contains(&key.0)
    }
}

fn key_flags(key: KeyCode, direction: KeyDirection) -> KEYBD_EVENT_FLAGS {
    let mut flags = KEYBD_EVENT_FLAGS(0);
    if direction == KeyDirection::Up {
        flags |= KEYEVENTF_KEYUP;
    }
    if EXTENDED_VKS.contains(&key.0) {
        flags |= KEYEVENTF_EXTENDEDKEY;
    }
    flags
}
