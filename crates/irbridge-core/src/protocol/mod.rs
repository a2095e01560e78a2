//! WinLIRC line protocol: stream framing and line parsing.

pub mod framing;
pub mod line;

pub use framing::{FramingError, LineBuffer, MAX_LINE_LEN};
pub use line::{parse_line, ParseError, RemoteEvent};
