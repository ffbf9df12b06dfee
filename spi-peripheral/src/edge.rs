//! Edge and level detection over the synchronizer histories.

use crate::config::{SampleEdge, SyncDepth};
use crate::synchronizer::SyncBank;

/// Edges and levels seen in one tick.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Edges {
    /// Chip-select went low: a transaction starts.
    pub cs_falling: bool,
    /// Chip-select went high: a transaction ends.
    pub cs_rising: bool,
    /// Chip-select is asserted.
    pub cs_low: bool,
    /// Clock went high.
    pub sclk_rising: bool,
    /// Clock went low.
    pub sclk_falling: bool,
    /// Data bit aligned with the clock sample the edges are computed from.
    pub copi: bool,
}

impl Edges {
    /// Detects edges from the current synchronizer histories.
    ///
    /// The data tap has the same age as the current control sample, so a bit is read from the same tick as the
    /// clock edge that qualifies it.
    pub fn detect(sync: &SyncBank, depth: SyncDepth) -> Self {
        let (cur, prev) = (depth.current_age(), depth.previous_age());

        let cs = sync.cs_n.tap(cur);
        let cs_prev = sync.cs_n.tap(prev);
        let sclk = sync.sclk.tap(cur);
        let sclk_prev = sync.sclk.tap(prev);

        Self {
            cs_falling: cs_prev && !cs,
            cs_rising: !cs_prev && cs,
            cs_low: !cs,
            sclk_rising: !sclk_prev && sclk,
            sclk_falling: sclk_prev && !sclk,
            copi: sync.copi.tap(cur),
        }
    }

    /// Returns whether the clock edge that shifts in a bit happened.
    pub fn sample(&self, edge: SampleEdge) -> bool {
        match edge {
            SampleEdge::Rising => self.sclk_rising,
            SampleEdge::Falling => self.sclk_falling,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decoder::LineInputs;
    use crate::Fsm;

    fn bank(samples: &[(bool, bool, bool)]) -> SyncBank {
        let mut bank = SyncBank::default();
        for &(cs_n, sclk, copi) in samples {
            bank.step(LineInputs { cs_n, sclk, copi });
        }
        bank
    }

    #[test]
    fn triple_depth_lags_one_tick() {
        // cs_n: 1 1 0, the falling edge is still between the two newest stages.
        let sync = bank(&[(true, false, false), (true, false, false), (false, false, false)]);
        assert!(!Edges::detect(&sync, SyncDepth::Triple).cs_falling);
        assert!(Edges::detect(&sync, SyncDepth::Double).cs_falling);

        let sync = bank(&[(true, false, false), (true, false, false), (false, false, false), (false, false, false)]);
        let edges = Edges::detect(&sync, SyncDepth::Triple);
        assert!(edges.cs_falling);
        assert!(edges.cs_low);
        assert!(!edges.cs_rising);
    }

    #[test]
    fn clock_edges_and_aligned_data() {
        let sync = bank(&[(false, false, false), (false, true, true), (false, false, false)]);
        let edges = Edges::detect(&sync, SyncDepth::Triple);
        assert!(edges.sclk_rising);
        assert!(edges.copi);
        assert!(edges.sample(SampleEdge::Rising));
        assert!(!edges.sample(SampleEdge::Falling));

        let edges = Edges::detect(&sync, SyncDepth::Double);
        assert!(edges.sclk_falling);
        assert!(!edges.copi);
    }

    #[test]
    fn release_edge() {
        let sync = bank(&[(false, false, false), (false, false, false), (true, false, false), (true, false, false)]);
        let edges = Edges::detect(&sync, SyncDepth::Triple);
        assert!(edges.cs_rising);
        assert!(!edges.cs_low);
    }
}
