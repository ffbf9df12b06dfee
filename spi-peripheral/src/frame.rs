//! Command frames and the serial-in, parallel-out frame assembler.
//!
//! A frame is 16 bits, most significant bit first on the wire:
//!
//! ```text
//!  15  14        8 7          0
//! +---+-----------+------------+
//! | W |  address  |    data    |
//! +---+-----------+------------+
//! ```

use std::fmt;

use arrayvec::ArrayVec;
use static_assertions::*;
use thiserror::Error;

use crate::counter::BitCounter;
use crate::registers::REGISTER_COUNT;
use crate::utils::*;

/// Frame width.
pub const FRAME_WIDTH: usize = 16;
/// Address field width.
pub const ADDRESS_WIDTH: usize = 7;
/// Data field width.
pub const DATA_WIDTH: usize = 8;

/// Bit position of the write flag.
pub const WRITE_FLAG_BIT: usize = FRAME_WIDTH - 1;
/// Largest address the address field can carry.
pub const MAX_ADDRESS: u8 = (1 << ADDRESS_WIDTH) - 1;

const_assert_eq!(FRAME_WIDTH, 1 + ADDRESS_WIDTH + DATA_WIDTH);
const_assert!(FRAME_WIDTH <= MAX_BITS);
const_assert!(clog2(REGISTER_COUNT) <= ADDRESS_WIDTH);

#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FrameError {
    #[error("address {0:#04x} does not fit in the 7-bit address field")]
    AddressOutOfRange(u8),
}

/// A 16-bit command word.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Frame(u16);

impl Frame {
    /// Builds a frame from its fields.
    pub fn new(write: bool, address: u8, data: u8) -> Result<Self, FrameError> {
        if address > MAX_ADDRESS {
            return Err(FrameError::AddressOutOfRange(address));
        }
        Ok(Self((u16::from(write) << WRITE_FLAG_BIT) | (u16::from(address) << DATA_WIDTH) | u16::from(data)))
    }

    /// Builds a write frame.
    pub fn write(address: u8, data: u8) -> Result<Self, FrameError> { Self::new(true, address, data) }

    /// Wraps a raw command word.
    pub const fn from_raw(raw: u16) -> Self { Self(raw) }

    /// Raw command word.
    pub const fn raw(&self) -> u16 { self.0 }

    /// Returns whether the write flag is set.
    pub const fn is_write(&self) -> bool { bit(self.0, WRITE_FLAG_BIT) }

    /// Address field.
    pub const fn address(&self) -> u8 { ((self.0 >> DATA_WIDTH) as u8) & MAX_ADDRESS }

    /// Payload byte.
    pub const fn data(&self) -> u8 { (self.0 & 0xff) as u8 }

    /// Bits in wire order.
    pub fn bits(&self) -> ArrayVec<bool, MAX_BITS> { msb_first_bits(self.0, FRAME_WIDTH) }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {:#04x} <- {:#04x}", if self.is_write() { "W" } else { "R" }, self.address(), self.data())
    }
}

/// Shift register and bit counter of the frame being received.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FrameAssembler {
    buffer: u16,
    bits: BitCounter<{ FRAME_WIDTH as u8 }>,
}

impl FrameAssembler {
    /// Creates an empty assembler.
    pub const fn new() -> Self { Self { buffer: 0, bits: BitCounter::new() } }

    /// Clears the buffer and the bit counter.
    pub fn clear(&mut self) { *self = Self::new(); }

    /// Shifts `bit` in at position 0. Does nothing once the frame is full; returns whether the bit was taken.
    pub fn shift_in(&mut self, bit: bool) -> bool {
        if !self.bits.increment() {
            return false;
        }
        self.buffer = (self.buffer << 1) | u16::from(bit);
        true
    }

    /// Returns whether all 16 bits arrived.
    pub const fn is_ready(&self) -> bool { self.bits.is_full() }

    /// Number of bits received.
    pub const fn bit_count(&self) -> u8 { self.bits.count() }

    /// Frame buffer contents. Only the low [`FrameAssembler::bit_count`] bits are meaningful.
    pub const fn frame(&self) -> Frame { Frame(self.buffer) }
}
