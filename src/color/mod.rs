//! Colors for devices and tags.
//!
//! - [`Palette`] the fixed ordered set of display colors;
//! - [`ColorAllocator`] lock-free round-robin cursor over a palette.

mod allocator;
mod palette;

pub use allocator::ColorAllocator;
pub use palette::{Color, Palette};
