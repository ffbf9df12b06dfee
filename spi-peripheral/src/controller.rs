//! Transaction controller.
//!
//! Frames a transaction by chip-select, feeds qualifying clock edges to the [`FrameAssembler`], and decides when
//! and whether the received frame is committed to the register bank.

use std::fmt;

use tracing::{debug, trace};

use crate::config::{CommitTrigger, TimingProfile};
use crate::edge::Edges;
use crate::frame::{Frame, FrameAssembler};
use crate::registers::RegisterId;
use crate::Fsm;

/// Phase of the current transaction.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// No transaction in progress.
    #[default]
    Idle,

    /// Chip-select asserted, fewer than 16 bits received.
    Accumulating,

    /// 16 bits received, not committed yet.
    Ready,
}

/// A validated register write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Commit {
    /// Target register.
    pub register: RegisterId,
    /// New value.
    pub value: u8,
}

/// Why a finished transaction did not produce a [`Commit`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// Chip-select released before the frame was complete.
    Incomplete {
        /// Bits received.
        bits: u8,
    },

    /// The write flag is clear.
    ReadFlag,

    /// No register at this address.
    InvalidAddress(u8),
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Incomplete { bits } => write!(f, "short frame ({} bits)", bits),
            Self::ReadFlag => write!(f, "write flag clear"),
            Self::InvalidAddress(address) => write!(f, "invalid address {:#04x}", address),
        }
    }
}

/// Validation predicate shared by every commit trigger.
pub fn validate(frame: Frame, bits: u8, complete: bool) -> Result<Commit, Rejection> {
    if !complete {
        return Err(Rejection::Incomplete { bits });
    }
    if !frame.is_write() {
        return Err(Rejection::ReadFlag);
    }
    let register = RegisterId::from_address(frame.address()).ok_or(Rejection::InvalidAddress(frame.address()))?;
    Ok(Commit { register, value: frame.data() })
}

/// Transaction state machine with its frame assembler.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TransactionController {
    phase: Phase,
    assembler: FrameAssembler,
}

impl TransactionController {
    /// Creates an idle controller.
    pub const fn new() -> Self { Self { phase: Phase::Idle, assembler: FrameAssembler::new() } }

    /// Current phase.
    pub const fn phase(&self) -> Phase { self.phase }

    /// Assembler of the current (or last) frame.
    pub const fn assembler(&self) -> &FrameAssembler { &self.assembler }

    fn finish(&self) -> Option<Commit> {
        let frame = self.assembler.frame();
        match validate(frame, self.assembler.bit_count(), self.assembler.is_ready()) {
            Ok(commit) => {
                debug!(register = ?commit.register, value = commit.value, "register write");
                Some(commit)
            }
            Err(rejection) => {
                trace!(frame = frame.raw(), reason = %rejection, "frame dropped");
                None
            }
        }
    }
}

impl Fsm for TransactionController {
    type Input = (Edges, TimingProfile);
    type Output = Option<Commit>;

    fn fsm(&self, (edges, timing): (Edges, TimingProfile)) -> (Option<Commit>, Self) {
        let mut next = *self;

        // A new transaction discards whatever the previous one left behind.
        if edges.cs_falling {
            trace!("transaction start");
            next.assembler.clear();
            next.phase = Phase::Accumulating;
            return (None, next);
        }
        if edges.cs_rising && self.phase != Phase::Idle {
            trace!(bits = self.assembler.bit_count(), "transaction end");
        }

        let commit = match self.phase {
            Phase::Idle => None,
            Phase::Accumulating if edges.cs_rising => {
                next.phase = Phase::Idle;
                self.finish()
            }
            Phase::Accumulating => {
                if edges.cs_low && edges.sample(timing.sample_edge) {
                    next.assembler.shift_in(edges.copi);
                    if next.assembler.is_ready() {
                        next.phase = Phase::Ready;
                    }
                }
                None
            }
            Phase::Ready => {
                let release = match timing.commit_trigger {
                    CommitTrigger::ChipSelectRelease => edges.cs_rising,
                    CommitTrigger::ClockFalling => !edges.cs_low && edges.sclk_falling,
                };
                if release {
                    next.phase = Phase::Idle;
                    self.finish()
                } else {
                    None
                }
            }
        };

        (commit, next)
    }
}
