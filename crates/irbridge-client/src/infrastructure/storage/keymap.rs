//! `keymap.json`: button name → key binding.
//!
//! ```json
//! {
//!   "PLAY":   { "vkCode": "B3" },
//!   "VOL_UP": { "vkCode": 175 },
//!   "INFO":   { "vkCode": "VK_F5", "withCtrl": true },
//!   "POWER":  { "withAlt": true }
//! }
//! ```
//!
//! `vkCode` (alias `baseKeyCode`) may be a JSON number, a hex string with or
//! without `0x`, or a virtual-key name.  A string that is a valid in-range hex
//! code is taken as hex, so `"F5"` means `0xF5`; write `"VK_F5"` for the
//! function key.  Entries without
//! a key code, like `POWER` above, are skipped.

use std::collections::HashMap;
use std::path::Path;

use irbridge_core::keymap::vk;
use irbridge_core::{KeyBinding, KeyCode, KeyMappingTable};
use serde::Deserialize;
use tracing::{debug, info};

use super::config::ConfigError;

/// Highest valid virtual-key code.
const MAX_VK: i64 = 0xFE;

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawKeyCode {
    Number(i64),
    Text(String),
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct KeymapEntry {
    #[serde(default, alias = "baseKeyCode")]
    vk_code: Option<RawKeyCode>,
    #[serde(default)]
    with_shift: bool,
    #[serde(default)]
    with_ctrl: bool,
    #[serde(default)]
    with_alt: bool,
}

fn resolve_key_code(button: &str, raw: &RawKeyCode) -> Result<KeyCode, ConfigError> {
    let invalid = |value: String| ConfigError::InvalidKeyCode {
        button: button.to_string(),
        value,
    };

    let code = match raw {
        RawKeyCode::Number(n) => *n,
        RawKeyCode::Text(text) => {
            let trimmed = text.trim();
            let digits = trimmed
                .strip_prefix("0x")
                .or_else(|| trimmed.strip_prefix("0X"))
                .unwrap_or(trimmed);
            match (i64::from_str_radix(digits, 16), vk::from_name(trimmed)) {
                (Ok(n), _) if (1..=MAX_VK).contains(&n) => n,
                (_, Some(code)) => i64::from(code.0),
                (Ok(n), None) => n,
                (Err(_), None) => return Err(invalid(format!("{text:?}"))),
            }
        }
    };

    if !(1..=MAX_VK).contains(&code) {
        return Err(invalid(code.to_string()));
    }
    // Range-checked above.
    Ok(KeyCode(code as u16))
}

/// Parses `keymap.json` content.  `origin` is only used in error messages.
///
/// # Errors
///
/// - [`ConfigError::Parse`] if the JSON is malformed.
/// - [`ConfigError::InvalidKeyCode`] if a key code is not a number, hex string
///   or known key name, or is outside `1..=0xFE`.
pub fn parse_keymap(content: &str, origin: &Path) -> Result<KeyMappingTable, ConfigError> {
    let entries: HashMap<String, KeymapEntry> =
        serde_json::from_str(content).map_err(|source| ConfigError::Parse {
            path: origin.to_path_buf(),
            source,
        })?;

    let mut bindings = HashMap::with_capacity(entries.len());
    for (button, entry) in entries {
        let Some(raw) = &entry.vk_code else {
            debug!("keymap entry {button:?} has no key code; skipped");
            continue;
        };
        let binding = KeyBinding {
            key: resolve_key_code(&button, raw)?,
            with_shift: entry.with_shift,
            with_ctrl: entry.with_ctrl,
            with_alt: entry.with_alt,
        };
        debug!("{button} → {binding}");
        bindings.insert(button, binding);
    }
    Ok(KeyMappingTable::new(bindings))
}

/// Loads `keymap.json` from `path`.
///
/// # Errors
///
/// [`ConfigError::Io`] if the file cannot be read, otherwise as
/// [`parse_keymap`].
pub fn load_keymap(path: &Path) -> Result<KeyMappingTable, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let table = parse_keymap(&content, path)?;
    info!("loaded {} key bindings from {}", table.len(), path.display());
    Ok(table)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
