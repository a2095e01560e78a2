//! Parser for a single WinLIRC broadcast line.
//!
//! Wire format (ASCII, space separated, newline terminated):
//! ```text
//! <code> <repeat-hex> <button> <remote>
//! 000000037ff07bee 00 KEY_OK   tv-remote
//! ```
//! Only the button name and the repeat counter drive the bridge; the raw code
//! and the remote name are accepted and dropped.

use thiserror::Error;

/// Errors produced when a line is not a valid broadcast message.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    /// The line ended before the named field.
    #[error("missing {field} field")]
    MissingField { field: &'static str },

    /// The repeat counter is not a hexadecimal `u32`.
    #[error("invalid repeat counter {0:?}: expected hexadecimal")]
    InvalidRepeat(String),
}

/// One decoded button event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteEvent {
    /// Button name as configured in the daemon (`KEY_OK`, `VOL_UP`, …).
    pub button: String,
    /// Number of re-signals since the last fresh press; `0` is a fresh press.
    pub repeat: u32,
}

impl RemoteEvent {
    /// `true` for a fresh keystroke.
    pub fn is_fresh_press(&self) -> bool {
        self.repeat == 0
    }
}

const FIELDS: [&str; 4] = ["code", "repeat", "button", "remote"];

/// Parses one protocol line into a [`RemoteEvent`].
///
/// Leading/trailing whitespace (including the line terminator) is ignored.
/// Fields after the fourth are ignored.
///
/// # Errors
///
/// [`ParseError::MissingField`] if fewer than four fields are present,
/// [`ParseError::InvalidRepeat`] if the second field is not hexadecimal.
///
/// # Examples
///
/// ```rust
/// use irbridge_core::protocol::parse_line;
///
/// let ev = parse_line("000000037ff07bee 1a VOL_UP tv\n").unwrap();
/// assert_eq!(ev.button, "VOL_UP");
/// assert_eq!(ev.repeat, 0x1a);
/// ```
pub fn parse_line(line: &str) -> Result<RemoteEvent, ParseError> {
    let mut fields = line.split_ascii_whitespace();
    let mut next = |idx: usize| {
        fields.next().ok_or(ParseError::MissingField {
            field: FIELDS[idx],
        })
    };

    let _code = next(0)?;
    let repeat_str = next(1)?;
    let button = next(2)?;
    let _remote = next(3)?;

    // `from_str_radix` alone would also take a leading sign.
    let invalid = || ParseError::InvalidRepeat(repeat_str.to_string());
    if !repeat_str.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(invalid());
    }
    let repeat = u32::from_str_radix(repeat_str, 16).map_err(|_| invalid())?;

    Ok(RemoteEvent {
        button: button.to_string(),
        repeat,
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────
