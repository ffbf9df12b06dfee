//! Input synchronizers.
//!
//! Every raw line is re-sampled through a chain of flip-flops on each tick. The chain is a window over the last
//! `N` raw samples, most recent last.

use crate::decoder::LineInputs;
use crate::Fsm;

/// Shift chain of `N` flip-flops for one line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Synchronizer<const N: usize> {
    stages: [bool; N],
}

impl<const N: usize> Synchronizer<N> {
    /// Creates a chain with all stages low.
    pub const fn new() -> Self { Self::filled(false) }

    /// Creates a chain with every stage at `level`.
    pub const fn filled(level: bool) -> Self { Self { stages: [level; N] } }

    /// Returns the sample of the given age; age 0 is the newest.
    ///
    /// # Panics
    ///
    /// Panics if `age >= N`.
    pub fn tap(&self, age: usize) -> bool {
        assert!(age < N, "Synchronizer has {} stages, but age {} was requested", N, age);
        self.stages[N - 1 - age]
    }

    /// Returns the history, oldest first.
    pub fn history(&self) -> [bool; N] { self.stages }
}

impl<const N: usize> Default for Synchronizer<N> {
    fn default() -> Self { Self::new() }
}

impl<const N: usize> Fsm for Synchronizer<N> {
    type Input = bool;
    type Output = ();

    fn fsm(&self, raw: bool) -> ((), Self) {
        let mut stages = self.stages;
        stages.rotate_left(1);
        if let Some(newest) = stages.last_mut() {
            *newest = raw;
        }
        ((), Self { stages })
    }
}

/// Synchronizers of the three SPI lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncBank {
    /// Chip-select (active low).
    pub cs_n: Synchronizer<3>,
    /// Serial clock.
    pub sclk: Synchronizer<3>,
    /// Controller-out, peripheral-in data.
    pub copi: Synchronizer<2>,
}

impl SyncBank {
    /// Creates synchronizers holding an idle bus: chip-select deasserted, clock and data low.
    pub const fn new() -> Self {
        Self { cs_n: Synchronizer::filled(true), sclk: Synchronizer::new(), copi: Synchronizer::new() }
    }
}

impl Default for SyncBank {
    fn default() -> Self { Self::new() }
}

impl Fsm for SyncBank {
    type Input = LineInputs;
    type Output = ();

    fn fsm(&self, input: LineInputs) -> ((), Self) {
        let ((), cs_n) = self.cs_n.fsm(input.cs_n);
        let ((), sclk) = self.sclk.fsm(input.sclk);
        let ((), copi) = self.copi.fsm(input.copi);
        ((), Self { cs_n, sclk, copi })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shifts_most_recent_last() {
        let mut sync = Synchronizer::<3>::new();
        sync.step(true);
        assert_eq!(sync.history(), [false, false, true]);
        sync.step(false);
        sync.step(true);
        assert_eq!(sync.history(), [true, false, true]);
        assert!(sync.tap(0));
        assert!(!sync.tap(1));
        assert!(sync.tap(2));
        sync.step(false);
        assert_eq!(sync.history(), [false, true, false]);
    }

    #[test]
    fn bank_starts_deselected() {
        let bank = SyncBank::new();
        assert_eq!(bank.cs_n.history(), [true; 3]);
        assert_eq!(bank.sclk.history(), [false; 3]);
        assert_eq!(bank.copi.history(), [false; 2]);
        assert_eq!(Synchronizer::<2>::filled(true).history(), [true, true]);
    }

    #[test]
    #[should_panic]
    fn tap_out_of_range() { Synchronizer::<2>::new().tap(2); }

    #[test]
    fn bank_updates_every_line() {
        let mut bank = SyncBank::default();
        bank.step(LineInputs { cs_n: true, sclk: false, copi: true });
        bank.step(LineInputs { cs_n: false, sclk: true, copi: true });
        assert_eq!(bank.cs_n.history(), [true, true, false]);
        assert_eq!(bank.sclk.history(), [false, false, true]);
        assert_eq!(bank.copi.history(), [true, true]);
    }
}
