//! # Display colors and the fixed palette they are drawn from.

use owo_colors::AnsiColors;

/// Foreground color assignable to a device or a tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    BrightRed,
    BrightGreen,
    BrightYellow,
    BrightBlue,
    BrightMagenta,
    BrightCyan,
}

impl Color {
    /// Terminal color used when painting.
    pub fn ansi(self) -> AnsiColors {
        match self {
            Color::Red => AnsiColors::Red,
            Color::Green => AnsiColors::Green,
            Color::Yellow => AnsiColors::Yellow,
            Color::Blue => AnsiColors::Blue,
            Color::Magenta => AnsiColors::Magenta,
            Color::Cyan => AnsiColors::Cyan,
            Color::BrightRed => AnsiColors::BrightRed,
            Color::BrightGreen => AnsiColors::BrightGreen,
            Color::BrightYellow => AnsiColors::BrightYellow,
            Color::BrightBlue => AnsiColors::BrightBlue,
            Color::BrightMagenta => AnsiColors::BrightMagenta,
            Color::BrightCyan => AnsiColors::BrightCyan,
        }
    }
}

/// Ordered, non-empty set of colors handed out round-robin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette(&'static [Color]);

impl Palette {
    /// The twelve basic and bright ANSI foreground colors, red first.
    pub const ANSI: Palette = Palette(&[
        Color::Red,
        Color::Green,
        Color::Yellow,
        Color::Blue,
        Color::Magenta,
        Color::Cyan,
        Color::BrightRed,
        Color::BrightGreen,
        Color::BrightYellow,
        Color::BrightBlue,
        Color::BrightMagenta,
        Color::BrightCyan,
    ]);

    /// Builds a custom palette; `None` when `colors` is empty.
    pub const fn new(colors: &'static [Color]) -> Option<Self> {
        if colors.is_empty() {
            None
        } else {
            Some(Palette(colors))
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Color at `index`, wrapping past the end.
    #[inline]
    pub fn get(&self, index: usize) -> Color {
        self.0[index % self.0.len()]
    }

    /// Position of `color` in the palette.
    pub fn index_of(&self, color: Color) -> Option<usize> {
        self.0.iter().position(|c| *c == color)
    }
}

impl Default for Palette {
    fn default() -> Self {
        Palette::ANSI
    }
}
