//! Linux X11 key injection via the XTest extension.
//!
//! # What is XTest?
//!
//! XTest is an X11 protocol extension that lets a process synthesize keyboard
//! events as if the user had pressed physical keys.  The events reach the
//! focused window exactly like real input.
//!
//! # Key code translation
//!
//! Keymap entries hold Windows virtual-key codes.  `XTestFakeKeyEvent` wants an
//! X11 *keycode*, so each event goes through two lookups:
//! ```text
//! VK code → X11 KeySym (irbridge_core::keymap::vk) → XKeysymToKeycode → X11 keycode
//! ```
//!
//! # Permissions
//!
//! The process needs access to the X display named by `DISPLAY`.  If it is
//! unset or the server refuses the connection, [`XTestInjector::new`] fails
//! with a `Platform` error.

use std::ptr;
use std::sync::Mutex;

use irbridge_core::keymap::vk;
use irbridge_core::KeyCode;
use tracing::debug;
use x11::xlib::{self, Display};
use x11::xtest;

use super::INTER_EVENT_DELAY;
use crate::application::emulate_input::{EmulationError, InputInjector, KeyDirection};

/// `CurrentTime`: deliver the synthesized event without delay.
const CURRENT_TIME: u64 = 0;

struct DisplayHandle(*mut Display);

// SAFETY: the pointer is only dereferenced by Xlib while the owning Mutex is
// held, so at most one thread uses the connection at a time.
unsafe impl Send for DisplayHandle {}

/// [`InputInjector`] backed by XTest.
pub struct XTestInjector {
    display: Mutex<DisplayHandle>,
}

impl XTestInjector {
    /// Opens the display named by `DISPLAY` and checks for XTest.
    ///
    /// # Errors
    ///
    /// Returns `EmulationError::Platform` if the display cannot be opened or
    /// the server lacks the XTest extension.
    pub fn new() -> Result<Self, EmulationError> {
        // SAFETY: a null name selects $DISPLAY; a null return is handled below.
        let display = unsafe { xlib::XOpenDisplay(ptr::null()) };
        if display.is_null() {
            return Err(EmulationError::Platform(
                "cannot open X display (is DISPLAY set?)".to_string(),
            ));
        }

        let (mut event_base, mut error_base, mut major, mut minor) = (0, 0, 0, 0);
        // SAFETY: display is a live connection; the out-params are valid locals.
        let has_xtest = unsafe {
            xtest::XTestQueryExtension(
                display,
                &mut event_base,
                &mut error_base,
                &mut major,
                &mut minor,
            )
        };
        if has_xtest == 0 {
            // SAFETY: display was opened above and is not used afterwards.
            unsafe { xlib::XCloseDisplay(display) };
            return Err(EmulationError::Platform(
                "X server does not support the XTest extension".to_string(),
            ));
        }
        debug!("XTest {major}.{minor} available");

        Ok(Self {
            display: Mutex::new(DisplayHandle(display)),
        })
    }
}

impl InputInjector for XTestInjector {
    fn send_key(&self, key: KeyCode, direction: KeyDirection) -> Result<(), EmulationError> {
        let keysym = vk::to_x11_keysym(key).ok_or(EmulationError::UnsupportedKey(key))?;

        let guard = self
            .display
            .lock()
            .map_err(|_| EmulationError::Platform("X display lock poisoned".to_string()))?;
        let display = guard.0;

        // SAFETY: display is a live connection guarded by the mutex.
        let keycode = unsafe { xlib::XKeysymToKeycode(display, keysym as xlib::KeySym) };
        if keycode == 0 {
            return Err(EmulationError::UnsupportedKey(key));
        }

        let is_press = match direction {
            KeyDirection::Down => xlib::True,
            KeyDirection::Up => xlib::False,
        };
        // SAFETY: as above.
        let ok = unsafe {
            let ok = xtest::XTestFakeKeyEvent(display, keycode as u32, is_press, CURRENT_TIME);
            xlib::XFlush(display);
            ok
        };
        drop(guard);
        std::thread::sleep(INTER_EVENT_DELAY);

        if ok == 0 {
            return Err(EmulationError::Platform(format!(
                "XTestFakeKeyEvent rejected {key} {direction:?}"
            )));
        }
        Ok(())
    }

    fn supports(&self, key: KeyCode) -> bool {
        vk::to_x11_keysym(key).is_some()
    }
}

impl Drop for XTestInjector {
    fn drop(&mut self) {
        if let Ok(mut guard) = self.display.lock() {
            if !guard.0.is_null() {
                // SAFETY: the connection was opened in `new` and is closed once.
                unsafe { xlib::XCloseDisplay(guard.0) };
                guard.0 = ptr::null_mut();
            }
        }
    }
}
