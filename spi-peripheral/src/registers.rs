//! Output register bank.

use std::fmt;

use itertools::Itertools;
use paste::paste;

macro_rules! register_map {
    ($($(#[$attr:meta])* $variant:ident = $address:literal,)*) => {
        /// Register selected by the address field of a frame.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum RegisterId {
            $($(#[$attr])* $variant = $address,)*
        }

        /// Number of registers.
        pub const REGISTER_COUNT: usize = [$(RegisterId::$variant,)*].len();

        impl RegisterId {
            /// All registers in address order.
            pub const ALL: [Self; REGISTER_COUNT] = [$(Self::$variant,)*];

            /// Decodes an address; `None` for addresses with no register.
            pub const fn from_address(address: u8) -> Option<Self> {
                match address {
                    $($address => Some(Self::$variant),)*
                    _ => None,
                }
            }

            /// Address of the register.
            pub const fn address(self) -> u8 { self as u8 }
        }

        impl RegisterBank {
            paste! {
                $(
                    #[doc = "Value of [`RegisterId::" $variant "`]."]
                    pub fn [<$variant:snake>](&self) -> u8 { self.read(RegisterId::$variant) }
                )*
            }
        }
    };
}

register_map! {
    /// Output enable, channels 0 to 7.
    OutLow = 0x00,
    /// Output enable, channels 8 to 15.
    OutHigh = 0x01,
    /// PWM enable, channels 0 to 7.
    PwmEnableLow = 0x02,
    /// PWM enable, channels 8 to 15.
    PwmEnableHigh = 0x03,
    /// PWM duty cycle, `0x00` is always low and `0xff` always high.
    PwmDutyCycle = 0x04,
}

/// Largest valid register address.
pub const MAX_REGISTER_ADDRESS: u8 = (REGISTER_COUNT - 1) as u8;

/// Five byte-wide registers, all zero after reset.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RegisterBank {
    values: [u8; REGISTER_COUNT],
}

impl RegisterBank {
    /// Creates a bank with every register at zero.
    pub const fn new() -> Self { Self { values: [0; REGISTER_COUNT] } }

    /// Reads a register.
    pub fn read(&self, id: RegisterId) -> u8 { self.values[usize::from(id.address())] }

    /// Overwrites a register in full.
    pub(crate) fn write(&mut self, id: RegisterId, value: u8) { self.values[usize::from(id.address())] = value; }

    /// 16-bit output enable vector.
    pub fn output_enable(&self) -> u16 { u16::from_le_bytes([self.out_low(), self.out_high()]) }

    /// 16-bit PWM enable vector.
    pub fn pwm_enable(&self) -> u16 { u16::from_le_bytes([self.pwm_enable_low(), self.pwm_enable_high()]) }

    /// All registers in address order.
    pub fn snapshot(&self) -> [u8; REGISTER_COUNT] { self.values }
}

impl fmt::Display for RegisterBank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", RegisterId::ALL.iter().map(|id| format!("{:?}={:#04x}", id, self.read(*id))).join(" "))
    }
}
