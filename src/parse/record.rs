//! # `logcat -v time` lines.
//!
//! ```text
//! 08-14 10:22:01.123 I/ActivityManager(1234): Starting activity
//! └──── timestamp ─┘ │ └─── tag ─────┘ └owner┘  └── message ──┘
//!                  level
//! ```
//!
//! Captures are kept verbatim, so [`LogRecord`]'s `Display` reproduces the
//! matched line exactly.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::ParseError;
use crate::parse::{required, strip_line_ending};

static RECORD_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"^([0-9]{2}-[0-9]{2} [0-9]{2}:[0-9]{2}:[0-9]{2}\.[0-9]{3}) ",
        r"([A-Z])/([^(]+)\(([^)]+)\): (.*)$",
    ))
    .expect("record pattern compiles")
});

/// Log priority carried by the level letter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Verbose,
    Debug,
    Info,
    Warn,
    Error,
    Fatal,
    /// Any other letter (`S`, `A`, ...). Rendered with a blank badge.
    Other(char),
}

impl Level {
    pub fn from_char(c: char) -> Self {
        match c {
            'V' => Level::Verbose,
            'D' => Level::Debug,
            'I' => Level::Info,
            'W' => Level::Warn,
            'E' => Level::Error,
            'F' => Level::Fatal,
            other => Level::Other(other),
        }
    }
}

/// Structured view of one log line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRecord {
    /// `MM-DD HH:MM:SS.mmm`.
    pub timestamp: String,
    /// Single upper-case level letter.
    pub level: char,
    /// Component tag, everything up to the opening `(`.
    pub tag: String,
    /// Text between the parentheses (usually the pid).
    pub owner: String,
    /// Remainder of the line; may be empty.
    pub message: String,
}

impl LogRecord {
    /// Matches a single log line.
    pub fn parse(line: &str) -> Result<Self, ParseError> {
        let line = strip_line_ending(line);
        let caps = RECORD_RE
            .captures(line)
            .ok_or(ParseError::NoMatch { pattern: "record" })?;

        let level = required(&caps, 2, "level")?
            .chars()
            .next()
            .ok_or(ParseError::EmptyField { field: "level" })?;

        Ok(Self {
            timestamp: required(&caps, 1, "timestamp")?.to_string(),
            level,
            tag: required(&caps, 3, "tag")?.to_string(),
            owner: required(&caps, 4, "owner")?.to_string(),
            message: caps
                .get(5)
                .map(|m| m.as_str().to_string())
                .unwrap_or_default(),
        })
    }

    #[inline]
    pub fn level(&self) -> Level {
        Level::from_char(self.level)
    }
}

impl fmt::Display for LogRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}/{}({}): {}",
            self.timestamp, self.level, self.tag, self.owner, self.message
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LINE: &str = "08-14 10:22:01.123 I/ActivityManager(1234): Starting activity";

    #[test]
    fn parses_all_fields() {
        let rec = LogRecord::parse(LINE).unwrap();
        assert_eq!(rec.timestamp, "08-14 10:22:01.123");
        assert_eq!(rec.level, 'I');
        assert_eq!(rec.level(), Level::Info);
        assert_eq!(rec.tag, "ActivityManager");
        assert_eq!(rec.owner, "1234");
        assert_eq!(rec.message, "Starting activity");
    }

    #[test]
    fn display_reassembles_the_line() {
        for line in [
            LINE,
            "01-02 03:04:05.678 W/dalvikvm(  583): GC_CONCURRENT freed 12K",
            "12-31 23:59:59.999 E/AndroidRuntime(99): ",
            "12-31 23:59:59.999 V/Some Tag ( 42): with: colons (and parens)",
        ] {
            let rec = LogRecord::parse(line).unwrap();
            assert_eq!(rec.to_string(), line);
        }
    }

    #[test]
    fn strips_trailing_newline_before_matching() {
        let rec = LogRecord::parse(&format!("{LINE}\r\n")).unwrap();
        assert_eq!(rec.message, "Starting activity");
    }

    #[test]
    fn missing_owner_delimiter_is_rejected() {
        let err = LogRecord::parse("08-14 10:22:01.123 I/ActivityManager(1234: Starting").unwrap_err();
        assert_eq!(err, ParseError::NoMatch { pattern: "record" });
    }

    #[test]
    fn malformed_layouts_are_rejected() {
        for line in [
            "",
            "--------- beginning of main",
            "8-14 10:22:01.123 I/Tag(1): msg",
            "08-14 10:22:01.123 i/Tag(1): msg",
            "08-14 10:22:01.123 I/(1): msg",
            "08-14 10:22:01.123 I/Tag(): msg",
            "08-14 10:22:01.123 I/Tag(1):msg",
            "٠٨-١٤ ١٠:٢٢:٠١.١٢٣ I/Tag(1): msg",
        ] {
            assert!(LogRecord::parse(line).is_err(), "accepted {line:?}");
        }
    }

    #[test]
    fn unknown_levels_pass_through() {
        let rec = LogRecord::parse("08-14 10:22:01.123 S/Tag(1): silent").unwrap();
        assert_eq!(rec.level(), Level::Other('S'));
    }
}
