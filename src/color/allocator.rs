//! # Round-robin color allocation.
//!
//! One [`ColorAllocator`] per key space: the runtime keeps one for devices
//! and one for tags so the two sequences never influence each other.
//!
//! ```text
//! next() → palette[0], palette[1], ..., palette[N-1], palette[0], ...
//! ```
//!
//! The cursor is a single atomic, so concurrent callers each receive a
//! distinct step of the sequence without taking a lock.

use std::sync::atomic::{AtomicUsize, Ordering};

use super::palette::{Color, Palette};

/// Cyclic cursor over a [`Palette`].
#[derive(Debug)]
pub struct ColorAllocator {
    palette: Palette,
    cursor: AtomicUsize,
}

impl ColorAllocator {
    /// Creates an allocator whose first color is `palette.get(0)`.
    pub fn new(palette: Palette) -> Self {
        Self {
            palette,
            cursor: AtomicUsize::new(0),
        }
    }

    /// Returns the next color and advances the cursor, wrapping after the last entry.
    pub fn next(&self) -> Color {
        let len = self.palette.len();
        let idx = self
            .cursor
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |i| Some((i + 1) % len))
            .unwrap_or_else(|i| i);
        self.palette.get(idx)
    }

    /// Palette this allocator draws from.
    #[inline]
    pub fn palette(&self) -> Palette {
        self.palette
    }
}

impl Default for ColorAllocator {
    fn default() -> Self {
        Self::new(Palette::ANSI)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Arc;

    use super::*;

    #[test]
    fn kth_allocation_gets_index_k_minus_one_mod_n() {
        let alloc = ColorAllocator::default();
        let n = alloc.palette().len();
        for k in 1..=3 * n {
            let c = alloc.next();
            assert_eq!(alloc.palette().index_of(c), Some((k - 1) % n));
        }
    }

    #[test]
    fn allocators_are_independent() {
        let devices = ColorAllocator::default();
        let tags = ColorAllocator::default();
        devices.next();
        devices.next();
        assert_eq!(tags.next(), Color::Red);
        assert_eq!(devices.next(), Color::Yellow);
    }

    #[test]
    fn concurrent_callers_share_one_sequence() {
        let alloc = Arc::new(ColorAllocator::default());
        let n = alloc.palette().len();
        let per_thread = 3 * n;

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let a = Arc::clone(&alloc);
                std::thread::spawn(move || (0..per_thread).map(|_| a.next()).collect::<Vec<_>>())
            })
            .collect();

        let mut counts: HashMap<Color, usize> = HashMap::new();
        for h in handles {
            for c in h.join().unwrap() {
                *counts.entry(c).or_default() += 1;
            }
        }
        // 4 * 3N draws over N colors: every color exactly 12 times.
        assert_eq!(counts.len(), n);
        assert!(counts.values().all(|&v| v == 12));
    }
}
