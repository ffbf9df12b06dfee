//! SPI decoder: synchronizers, edge detection, transaction controller and register bank in one clock domain.

use crate::config::TimingProfile;
use crate::controller::{Commit, Phase, TransactionController};
use crate::edge::Edges;
use crate::frame::Frame;
use crate::registers::RegisterBank;
use crate::synchronizer::SyncBank;
use crate::Fsm;

/// Raw SPI lines in one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineInputs {
    /// Chip-select, active low.
    pub cs_n: bool,
    /// Serial clock.
    pub sclk: bool,
    /// Controller-out, peripheral-in data.
    pub copi: bool,
}

impl LineInputs {
    /// Lines of an idle bus: deselected, clock low.
    pub const IDLE: Self = Self { cs_n: true, sclk: false, copi: false };
}

impl Default for LineInputs {
    fn default() -> Self { Self::IDLE }
}

/// The SPI decoder.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SpiDecoder {
    timing: TimingProfile,
    sync: SyncBank,
    controller: TransactionController,
    registers: RegisterBank,
}

impl SpiDecoder {
    /// Creates a decoder in its reset state.
    pub const fn new(timing: TimingProfile) -> Self {
        Self {
            timing,
            sync: SyncBank::new(),
            controller: TransactionController::new(),
            registers: RegisterBank::new(),
        }
    }

    /// Returns every piece of state to its initial value. The timing profile is kept.
    pub fn reset(&mut self) { *self = Self::new(self.timing); }

    /// Advances one tick. While `rst_n` is low the decoder stays in its reset state and ignores the lines.
    pub fn tick(&mut self, rst_n: bool, lines: LineInputs) -> Option<Commit> { self.step((rst_n, lines)) }

    /// Timing profile.
    pub const fn timing(&self) -> TimingProfile { self.timing }

    /// Output registers.
    pub const fn registers(&self) -> &RegisterBank { &self.registers }

    /// Synchronizer histories.
    pub const fn sync(&self) -> &SyncBank { &self.sync }

    /// Transaction phase.
    pub const fn phase(&self) -> Phase { self.controller.phase() }

    /// Frame buffer contents.
    pub const fn frame(&self) -> Frame { self.controller.assembler().frame() }

    /// Bits received in the current (or last) transaction.
    pub const fn bit_count(&self) -> u8 { self.controller.assembler().bit_count() }
}

impl Fsm for SpiDecoder {
    type Input = (bool, LineInputs);
    type Output = Option<Commit>;

    fn fsm(&self, (rst_n, lines): (bool, LineInputs)) -> (Option<Commit>, Self) {
        if !rst_n {
            return (None, Self::new(self.timing));
        }

        // Everything below reads the state of the previous tick only.
        let edges = Edges::detect(&self.sync, self.timing.sync_depth);
        let (commit, controller) = self.controller.fsm((edges, self.timing));
        let ((), sync) = self.sync.fsm(lines);

        let mut registers = self.registers;
        if let Some(Commit { register, value }) = commit {
            registers.write(register, value);
        }

        (commit, Self { timing: self.timing, sync, controller, registers })
    }
}
