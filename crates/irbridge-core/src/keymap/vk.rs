//! Windows Virtual Key (VK) names and their X11 KeySym equivalents.
//!
//! Reference: Windows Virtual-Key Codes (winuser.h) and X11/keysymdef.h,
//! X11/XF86keysym.h for the media keys.
//!
//! # Why VK codes? (for beginners)
//!
//! Keymap files are written with Windows virtual-key codes (`VK_RETURN = 0x0D`,
//! `VK_VOLUME_UP = 0xAF`) because WinLIRC users have always written them that
//! way.  Windows injects them directly.  Linux injects through XTest, which
//! wants a KeySym, so [`to_x11_keysym`] translates at the emulation boundary.
//!
//! Letters (`VK_A`…`VK_Z`), digits (`VK_0`…`VK_9`), function keys (`VK_F1`…`VK_F24`)
//! and numpad digits (`VK_NUMPAD0`…`VK_NUMPAD9`) are contiguous ranges and are
//! computed; everything else lives in [`NAMED_KEYS`].

use super::binding::KeyCode;

/// One named virtual key.
#[derive(Debug, Clone, Copy)]
pub struct VkEntry {
    pub name: &'static str,
    pub code: u16,
    /// X11 KeySym, `None` when X11 has no equivalent.
    pub keysym: Option<u32>,
}

const fn entry(name: &'static str, code: u16, keysym: u32) -> VkEntry {
    VkEntry {
        name,
        code,
        keysym: Some(keysym),
    }
}

/// Named keys outside the computed ranges.
pub const NAMED_KEYS: &[VkEntry] = &[
    // ── Control keys ─────────────────────────────────────────────────────────
    entry("VK_BACK", 0x08, 0xFF08),
    entry("VK_TAB", 0x09, 0xFF09),
    entry("VK_RETURN", 0x0D, 0xFF0D),
    entry("VK_SHIFT", 0x10, 0xFFE1),
    entry("VK_CONTROL", 0x11, 0xFFE3),
    entry("VK_MENU", 0x12, 0xFFE9),
    entry("VK_PAUSE", 0x13, 0xFF13),
    entry("VK_CAPITAL", 0x14, 0xFFE5),
    entry("VK_ESCAPE", 0x1B, 0xFF1B),
    entry("VK_SPACE", 0x20, 0x0020),
    // ── Navigation ────────────────────────────────────────────────────────────
    entry("VK_PRIOR", 0x21, 0xFF55),
    entry("VK_NEXT", 0x22, 0xFF56),
    entry("VK_END", 0x23, 0xFF57),
    entry("VK_HOME", 0x24, 0xFF50),
    entry("VK_LEFT", 0x25, 0xFF51),
    entry("VK_UP", 0x26, 0xFF52),
    entry("VK_RIGHT", 0x27, 0xFF53),
    entry("VK_DOWN", 0x28, 0xFF54),
    entry("VK_SNAPSHOT", 0x2C, 0xFF61),
    entry("VK_INSERT", 0x2D, 0xFF63),
    entry("VK_DELETE", 0x2E, 0xFFFF),
    entry("VK_LWIN", 0x5B, 0xFFEB),
    entry("VK_RWIN", 0x5C, 0xFFEC),
    entry("VK_APPS", 0x5D, 0xFF67),
    // ── Numpad operators ──────────────────────────────────────────────────────
    entry("VK_MULTIPLY", 0x6A, 0xFFAA),
    entry("VK_ADD", 0x6B, 0xFFAB),
    entry("VK_SUBTRACT", 0x6D, 0xFFAD),
    entry("VK_DECIMAL", 0x6E, 0xFFAE),
    entry("VK_DIVIDE", 0x6F, 0xFFAF),
    entry("VK_NUMLOCK", 0x90, 0xFF7F),
    entry("VK_SCROLL", 0x91, 0xFF14),
    // ── Sided modifiers ───────────────────────────────────────────────────────
    entry("VK_LSHIFT", 0xA0, 0xFFE1),
    entry("VK_RSHIFT", 0xA1, 0xFFE2),
    entry("VK_LCONTROL", 0xA2, 0xFFE3),
    entry("VK_RCONTROL", 0xA3, 0xFFE4),
    entry("VK_LMENU", 0xA4, 0xFFE9),
    entry("VK_RMENU", 0xA5, 0xFFEA),
    // ── Browser / media keys (what remotes are mostly used for) ───────────────
    entry("VK_BROWSER_BACK", 0xA6, 0x1008_FF26),
    entry("VK_BROWSER_FORWARD", 0xA7, 0x1008_FF27),
    entry("VK_BROWSER_REFRESH", 0xA8, 0x1008_FF29),
    entry("VK_BROWSER_HOME", 0xAC, 0x1008_FF18),
    entry("VK_VOLUME_MUTE", 0xAD, 0x1008_FF12),
    entry("VK_VOLUME_DOWN", 0xAE, 0x1008_FF11),
    entry("VK_VOLUME_UP", 0xAF, 0x1008_FF13),
    entry("VK_MEDIA_NEXT_TRACK", 0xB0, 0x1008_FF17),
    entry("VK_MEDIA_PREV_TRACK", 0xB1, 0x1008_FF16),
    entry("VK_MEDIA_STOP", 0xB2, 0x1008_FF15),
    entry("VK_MEDIA_PLAY_PAUSE", 0xB3, 0x1008_FF14),
    // ── Punctuation (US layout) ───────────────────────────────────────────────
    entry("VK_OEM_1", 0xBA, 0x003B),
    entry("VK_OEM_PLUS", 0xBB, 0x003D),
    entry("VK_OEM_COMMA", 0xBC, 0x002C),
    entry("VK_OEM_MINUS", 0xBD, 0x002D),
    entry("VK_OEM_PERIOD", 0xBE, 0x002E),
    entry("VK_OEM_2", 0xBF, 0x002F),
    entry("VK_OEM_3", 0xC0, 0x0060),
    entry("VK_OEM_4", 0xDB, 0x005B),
    entry("VK_OEM_5", 0xDC, 0x005C),
    entry("VK_OEM_6", 0xDD, 0x005D),
    entry("VK_OEM_7", 0xDE, 0x0027),
];

const LETTER_NAMES: [&str; 26] = [
    "VK_A", "VK_B", "VK_C", "VK_D", "VK_E", "VK_F", "VK_G", "VK_H", "VK_I", "VK_J", "VK_K",
    "VK_L", "VK_M", "VK_N", "VK_O", "VK_P", "VK_Q", "VK_R", "VK_S", "VK_T", "VK_U", "VK_V",
    "VK_W", "VK_X", "VK_Y", "VK_Z",
];
const DIGIT_NAMES: [&str; 10] = [
    "VK_0", "VK_1", "VK_2", "VK_3", "VK_4", "VK_5", "VK_6", "VK_7", "VK_8", "VK_9",
];
const NUMPAD_NAMES: [&str; 10] = [
    "VK_NUMPAD0", "VK_NUMPAD1", "VK_NUMPAD2", "VK_NUMPAD3", "VK_NUMPAD4", "VK_NUMPAD5",
    "VK_NUMPAD6", "VK_NUMPAD7", "VK_NUMPAD8", "VK_NUMPAD9",
];
const FUNCTION_NAMES: [&str; 24] = [
    "VK_F1", "VK_F2", "VK_F3", "VK_F4", "VK_F5", "VK_F6", "VK_F7", "VK_F8", "VK_F9", "VK_F10",
    "VK_F11", "VK_F12", "VK_F13", "VK_F14", "VK_F15", "VK_F16", "VK_F17", "VK_F18", "VK_F19",
    "VK_F20", "VK_F21", "VK_F22", "VK_F23", "VK_F24",
];

/// Resolves a `VK_*` name (case-insensitive, `VK_` prefix optional) to a code.
pub fn from_name(name: &str) -> Option<KeyCode> {
    let upper = name.trim().to_ascii_uppercase();
    let full = if upper.starts_with("VK_") {
        upper
    } else {
        format!("VK_{upper}")
    };

    if let Some(e) = NAMED_KEYS.iter().find(|e| e.name == full) {
        return Some(KeyCode(e.code));
    }
    let ranges: [(&[&str], u16); 4] = [
        (&LETTER_NAMES, 0x41),
        (&DIGIT_NAMES, 0x30),
        (&NUMPAD_NAMES, 0x60),
        (&FUNCTION_NAMES, 0x70),
    ];
    ranges.iter().find_map(|(names, base)| {
        names
            .iter()
            .position(|n| *n == full)
            .map(|i| KeyCode(base + i as u16))
    })
}

/// Returns the `VK_*` name of `code`, if it has one.
pub fn name_of(code: KeyCode) -> Option<&'static str> {
    let c = code.0;
    match c {
        0x41..=0x5A => Some(LETTER_NAMES[(c - 0x41) as usize]),
        0x30..=0x39 => Some(DIGIT_NAMES[(c - 0x30) as usize]),
        0x60..=0x69 => Some(NUMPAD_NAMES[(c - 0x60) as usize]),
        0x70..=0x87 => Some(FUNCTION_NAMES[(c - 0x70) as usize]),
        _ => NAMED_KEYS.iter().find(|e| e.code == c).map(|e| e.name),
    }
}

/// Translates a VK code to an X11 KeySym for XTest injection.
pub fn to_x11_keysym(code: KeyCode) -> Option<u32> {
    let c = code.0 as u32;
    match c {
        // Letters use the lowercase KeySym; XTest applies shift itself.
        0x41..=0x5A => Some(c + 0x20),
        0x30..=0x39 => Some(c),
        0x60..=0x69 => Some(0xFFB0 + (c - 0x60)),
        0x70..=0x87 => Some(0xFFBE + (c - 0x70)),
        _ => NAMED_KEYS
            .iter()
            .find(|e| e.code as u32 == c)
            .and_then(|e| e.keysym),
    }
}
