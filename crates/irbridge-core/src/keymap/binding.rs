//! Key binding types.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A platform virtual-key identifier (Windows VK numbering).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeyCode(pub u16);

impl KeyCode {
    /// `VK_SHIFT`
    pub const SHIFT: KeyCode = KeyCode(0x10);
    /// `VK_CONTROL`
    pub const CONTROL: KeyCode = KeyCode(0x11);
    /// `VK_MENU` (Alt)
    pub const ALT: KeyCode = KeyCode(0x12);
}

impl fmt::Display for KeyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match super::vk::name_of(*self) {
            Some(name) => write!(f, "{name}"),
            None => write!(f, "0x{:02X}", self.0),
        }
    }
}

/// One synthesized key combination: a base key plus optional modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyBinding {
    pub key: KeyCode,
    #[serde(default)]
    pub with_shift: bool,
    #[serde(default)]
    pub with_ctrl: bool,
    #[serde(default)]
    pub with_alt: bool,
}

impl KeyBinding {
    /// A binding for `key` with no modifiers.
    pub const fn plain(key: KeyCode) -> Self {
        Self {
            key,
            with_shift: false,
            with_ctrl: false,
            with_alt: false,
        }
    }

    /// Enabled modifiers in press order: shift, ctrl, alt.
    ///
    /// Releases walk the same sequence after the base key.
    pub fn modifiers(&self) -> impl Iterator<Item = KeyCode> {
        [
            (self.with_shift, KeyCode::SHIFT),
            (self.with_ctrl, KeyCode::CONTROL),
            (self.with_alt, KeyCode::ALT),
        ]
        .into_iter()
        .filter_map(|(enabled, code)| enabled.then_some(code))
    }
}

impl fmt::Display for KeyBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.with_shift {
            f.write_str("Shift+")?;
        }
        if self.with_ctrl {
            f.write_str("Ctrl+")?;
        }
        if self.with_alt {
            f.write_str("Alt+")?;
        }
        write!(f, "{}", self.key)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_binding_has_no_modifiers() {
        let binding = KeyBinding::plain(KeyCode(0x41));
        assert_eq!(binding.modifiers().count(), 0);
    }

    #[test]
    fn test_modifiers_are_yielded_in_shift_ctrl_alt_order() {
        // Arrange
        let binding = KeyBinding {
            key: KeyCode(0x41),
            with_shift: true,
            with_ctrl: true,
            with_alt: true,
        };

        // Act
        let mods: Vec<KeyCode> = binding.modifiers().collect();

        // Assert
        assert_eq!(mods, vec![KeyCode::SHIFT, KeyCode::CONTROL, KeyCode::ALT]);
    }

    #[test]
    fn test_modifiers_skip_disabled_flags() {
        let binding = KeyBinding {
            key: KeyCode(0x41),
            with_shift: false,
            with_ctrl: true,
            with_alt: true,
        };
        let mods: Vec<KeyCode> = binding.modifiers().collect();
        assert_eq!(mods, vec![KeyCode::CONTROL, KeyCode::ALT]);
    }

    #[test]
    fn test_display_uses_vk_name_when_known() {
        let binding = KeyBinding {
            key: KeyCode(0x74),
            with_shift: false,
            with_ctrl: true,
            with_alt: false,
        };
        assert_eq!(binding.to_string(), "Ctrl+VK_F5");
    }

    #[test]
    fn test_display_falls_back_to_hex_for_unknown_code() {
        assert_eq!(KeyCode(0xE8).to_string(), "0xE8");
    }
}
