//! Line matchers for the two textual inputs the runtime consumes.
//!
//! - [`ListingEntry`] one row of an `adb devices` listing;
//! - [`LogRecord`] one line of `logcat -v time` output.
//!
//! Both matchers are pure: a line either yields a structured value or a
//! recoverable [`ParseError`](crate::ParseError). Nothing here panics on
//! malformed input and no partial value is ever produced.

mod listing;
mod record;

pub use listing::ListingEntry;
pub use record::{Level, LogRecord};

use regex::Captures;

use crate::error::ParseError;

/// Strips one trailing `\n` or `\r\n`.
pub(crate) fn strip_line_ending(line: &str) -> &str {
    let line = line.strip_suffix('\n').unwrap_or(line);
    line.strip_suffix('\r').unwrap_or(line)
}

/// Returns capture `idx`, rejecting a missing or empty span.
pub(crate) fn required<'h>(
    caps: &Captures<'h>,
    idx: usize,
    field: &'static str,
) -> Result<&'h str, ParseError> {
    caps.get(idx)
        .map(|m| m.as_str())
        .filter(|s| !s.is_empty())
        .ok_or(ParseError::EmptyField { field })
}
