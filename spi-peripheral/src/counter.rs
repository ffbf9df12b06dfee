//! Counter modules.

use crate::utils::clog2;

/// Saturating up-counter in `0..=MAX`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BitCounter<const MAX: u8> {
    count: u8,
}

impl<const MAX: u8> BitCounter<MAX> {
    /// Number of register bits needed to hold `MAX`.
    pub const WIDTH: usize = clog2(MAX as usize + 1);

    /// Creates a counter at zero.
    pub const fn new() -> Self { Self { count: 0 } }

    /// Current count.
    pub const fn count(&self) -> u8 { self.count }

    /// Returns whether the counter reached `MAX`.
    pub const fn is_full(&self) -> bool { self.count >= MAX }

    /// Increments by one unless full. Returns whether the counter moved.
    pub fn increment(&mut self) -> bool {
        if self.is_full() {
            return false;
        }
        self.count += 1;
        true
    }

    /// Resets to zero.
    pub fn clear(&mut self) { self.count = 0; }
}
