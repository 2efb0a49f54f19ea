//! Record formatting.
//!
//! A colored record is laid out as:
//!
//! ```text
//! <device> <timestamp> <owner> <tag> <badge> <message>
//! ```
//!
//! Device and tag columns are padded/truncated to fixed widths. The badge is
//! the level letter surrounded by spaces, on a level-specific background.
//! With color disabled the same fields are written without escapes.

use std::fmt::Write as _;

use owo_colors::{OwoColorize, Style};

use crate::color::Color;
use crate::config::Config;
use crate::parse::{Level, LogRecord};

/// Styles for the fixed-color fields.
struct Styles {
    timestamp: Style,
    owner: Style,
    message: Style,
}

impl Styles {
    fn new() -> Self {
        Self {
            timestamp: Style::new().blue(),
            owner: Style::new().black().on_bright_black(),
            message: Style::new().bold().black(),
        }
    }
}

/// Badge style per level. `None` means a blank, unstyled badge.
fn badge_style(level: Level) -> Option<Style> {
    match level {
        Level::Debug => Some(Style::new().black().on_blue()),
        Level::Error => Some(Style::new().black().on_red()),
        Level::Fatal => Some(Style::new().blink().black().on_red()),
        Level::Info => Some(Style::new().black().on_green()),
        Level::Verbose => Some(Style::new().white()),
        Level::Warn => Some(Style::new().black().on_yellow()),
        Level::Other(_) => None,
    }
}

/// Pads or truncates `text` to exactly `width` characters; `0` leaves it alone.
fn fit(text: &str, width: usize) -> String {
    if width == 0 {
        text.to_string()
    } else {
        format!("{text:<width$.width$}")
    }
}

/// Turns a [`LogRecord`] into one output line (without the trailing newline).
pub struct RecordFormatter {
    color: bool,
    device_width: usize,
    tag_width: usize,
    styles: Styles,
}

impl RecordFormatter {
    pub fn new(color: bool, device_width: usize, tag_width: usize) -> Self {
        Self {
            color,
            device_width,
            tag_width,
            styles: Styles::new(),
        }
    }

    pub fn from_config(cfg: &Config) -> Self {
        Self::new(cfg.color, cfg.device_width, cfg.tag_width)
    }

    /// Formats `record` streamed from `serial`.
    pub fn format(
        &self,
        serial: &str,
        device_color: Color,
        record: &LogRecord,
        tag_color: Color,
    ) -> String {
        let device = fit(serial, self.device_width);
        let tag = fit(&record.tag, self.tag_width);
        let mut line = String::with_capacity(
            device.len() + tag.len() + record.owner.len() + record.message.len() + 96,
        );

        self.paint(&mut line, &device, Style::new().color(device_color.ansi()));
        line.push(' ');
        self.paint(&mut line, &record.timestamp, self.styles.timestamp);
        line.push(' ');
        self.paint(&mut line, &record.owner, self.styles.owner);
        line.push(' ');
        self.paint(&mut line, &tag, Style::new().color(tag_color.ansi()));
        line.push(' ');
        match badge_style(record.level()) {
            Some(style) => self.paint(&mut line, &format!(" {} ", record.level), style),
            None => line.push_str("   "),
        }
        line.push(' ');
        self.paint(&mut line, &record.message, self.styles.message);
        line
    }

    fn paint(&self, out: &mut String, text: &str, style: Style) {
        if !self.color {
            out.push_str(text);
            return;
        }
        // Writing into a String cannot fail.
        let _ = write!(out, "{}", text.style(style));
    }
}
