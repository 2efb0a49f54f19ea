//! # `adb devices` listing rows.
//!
//! A usable row starts with a hexadecimal serial, then whitespace, then the
//! literal `device` status. Headers, blank lines, and devices in any other
//! state (`offline`, `unauthorized`, ...) do not match.
//!
//! ```text
//! List of devices attached        ← NoMatch
//! 0123456789ABCDEF	device        ← serial = "0123456789ABCDEF"
//! 4df1a2b3	unauthorized          ← NoMatch
//! ```

use std::sync::LazyLock;

use regex::Regex;

use crate::error::ParseError;
use crate::parse::{required, strip_line_ending};

static LISTING_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([0-9A-Fa-f]+)[ \t]+device.*$").expect("listing pattern compiles")
});

/// One connected device as reported by the device source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingEntry {
    /// Device serial, exactly as captured.
    pub serial: String,
}

impl ListingEntry {
    /// Matches a single listing row.
    pub fn parse(line: &str) -> Result<Self, ParseError> {
        let line = strip_line_ending(line);
        let caps = LISTING_RE
            .captures(line)
            .ok_or(ParseError::NoMatch { pattern: "listing" })?;
        let serial = required(&caps, 1, "serial")?;
        Ok(Self {
            serial: serial.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_serial_without_whitespace() {
        let entry = ListingEntry::parse("0123456789ABCDEF\tdevice\n").unwrap();
        assert_eq!(entry.serial, "0123456789ABCDEF");

        let entry = ListingEntry::parse("abc123   device product:x model:y").unwrap();
        assert_eq!(entry.serial, "abc123");
    }

    #[test]
    fn rejects_header_and_blank_rows() {
        assert_eq!(
            ListingEntry::parse("List of devices attached"),
            Err(ParseError::NoMatch { pattern: "listing" })
        );
        assert!(ListingEntry::parse("").is_err());
        assert!(ListingEntry::parse("\n").is_err());
    }

    #[test]
    fn rejects_devices_in_other_states() {
        assert!(ListingEntry::parse("4df1a2b3\tunauthorized").is_err());
        assert!(ListingEntry::parse("4df1a2b3\toffline").is_err());
    }

    #[test]
    fn rejects_non_hex_serials_and_leading_space() {
        assert!(ListingEntry::parse("emulator-5554\tdevice").is_err());
        assert!(ListingEntry::parse(" abc123\tdevice").is_err());
        assert!(ListingEntry::parse("abc123device").is_err());
    }
}
