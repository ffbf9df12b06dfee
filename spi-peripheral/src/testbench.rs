//! Host-side SPI driver for simulation.
//!
//! [`SpiHost`] turns transactions into per-tick line levels ([`Waveform`]) the same way a bit-banging controller
//! would: chip-select is asserted one tick before the first clock phase, every bit is held for a full clock
//! period, and the bus idles for a while after release so that the peripheral can settle.

use std::fmt;
use std::slice;

use itertools::Itertools;

use crate::config::{CommitTrigger, ConfigError, SampleEdge, TimingProfile};
use crate::controller::Commit;
use crate::decoder::{LineInputs, SpiDecoder};
use crate::frame::{Frame, FrameError};

/// Line levels, one entry per tick.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Waveform {
    ticks: Vec<LineInputs>,
}

impl Waveform {
    /// Creates an empty waveform.
    pub fn new() -> Self { Self::default() }

    /// Appends `ticks` ticks of `inputs`.
    pub fn hold(&mut self, inputs: LineInputs, ticks: u32) -> &mut Self {
        self.ticks.extend((0..ticks).map(|_| inputs));
        self
    }

    /// Appends another waveform.
    pub fn append(&mut self, other: &Waveform) -> &mut Self {
        self.ticks.extend_from_slice(&other.ticks);
        self
    }

    /// Number of ticks.
    pub fn len(&self) -> usize { self.ticks.len() }

    /// Returns whether the waveform has no ticks.
    pub fn is_empty(&self) -> bool { self.ticks.is_empty() }

    /// Iterates over the ticks.
    pub fn iter(&self) -> slice::Iter<'_, LineInputs> { self.ticks.iter() }
}

impl<'a> IntoIterator for &'a Waveform {
    type IntoIter = slice::Iter<'a, LineInputs>;
    type Item = &'a LineInputs;

    fn into_iter(self) -> Self::IntoIter { self.iter() }
}

impl fmt::Display for Waveform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let line = |level: fn(&LineInputs) -> bool| self.iter().map(|t| if level(t) { '1' } else { '0' }).join("");
        writeln!(f, "cs_n {}", line(|t| t.cs_n))?;
        writeln!(f, "sclk {}", line(|t| t.sclk))?;
        write!(f, "copi {}", line(|t| t.copi))
    }
}

/// Bit-banging SPI controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpiHost {
    half_period: u32,
    settle: u32,
    sample_edge: SampleEdge,
    trailing_pulse: bool,
}

impl SpiHost {
    /// Idle ticks after release by default.
    pub const DEFAULT_SETTLE: u32 = 600;

    /// Creates a mode 0 host holding each clock phase for `half_period` ticks.
    pub fn new(half_period: u32) -> Result<Self, ConfigError> {
        if half_period == 0 {
            return Err(ConfigError::ZeroHalfPeriod);
        }
        Ok(Self { half_period, settle: Self::DEFAULT_SETTLE, sample_edge: SampleEdge::Rising, trailing_pulse: false })
    }

    /// Creates a host matching the clock convention of `profile`.
    ///
    /// With [`CommitTrigger::ClockFalling`], one more clock pulse is issued after release so that the frame is
    /// committed.
    pub fn for_profile(profile: TimingProfile, half_period: u32) -> Result<Self, ConfigError> {
        let host = Self::new(half_period)?;
        Ok(Self {
            sample_edge: profile.sample_edge,
            trailing_pulse: profile.commit_trigger == CommitTrigger::ClockFalling,
            ..host
        })
    }

    /// Sets the number of idle ticks after release.
    #[must_use]
    pub fn with_settle(self, settle: u32) -> Self { Self { settle, ..self } }

    /// Ticks per clock phase.
    pub fn half_period(&self) -> u32 { self.half_period }

    /// Waveform of a write transaction.
    pub fn write(&self, address: u8, data: u8) -> Result<Waveform, FrameError> {
        Ok(self.send(Frame::write(address, data)?))
    }

    /// Waveform of a transaction carrying `frame`.
    pub fn send(&self, frame: Frame) -> Waveform { self.clock_bits(&frame.bits()) }

    /// Waveform of a transaction clocking exactly `bits.len()` bits, MSB first.
    pub fn clock_bits(&self, bits: &[bool]) -> Waveform {
        // Level of the clock while the bit is set up, and while it is sampled.
        let (setup, sample) = match self.sample_edge {
            SampleEdge::Rising => (false, true),
            SampleEdge::Falling => (true, false),
        };

        let mut waveform = Waveform::new();
        waveform.hold(LineInputs { cs_n: false, sclk: false, copi: false }, 1);
        for &copi in bits {
            waveform.hold(LineInputs { cs_n: false, sclk: setup, copi }, self.half_period);
            waveform.hold(LineInputs { cs_n: false, sclk: sample, copi }, self.half_period);
        }
        waveform.hold(LineInputs::IDLE, 1);
        if self.trailing_pulse {
            waveform.hold(LineInputs { sclk: true, ..LineInputs::IDLE }, self.half_period);
            waveform.hold(LineInputs::IDLE, self.half_period);
        }
        waveform.hold(LineInputs::IDLE, self.settle);
        waveform
    }

    /// Waveform of an idle bus.
    pub fn idle(&self, ticks: u32) -> Waveform {
        let mut waveform = Waveform::new();
        waveform.hold(LineInputs::IDLE, ticks);
        waveform
    }
}

/// Applies `waveform` to `decoder` with reset de-asserted. Returns the commits in order.
pub fn drive(decoder: &mut SpiDecoder, waveform: &Waveform) -> Vec<Commit> {
    waveform.iter().filter_map(|lines| decoder.tick(true, *lines)).collect()
}
