//! Pin-level top: SPI decoder, PWM generator and the output stage.
//!
//! # Pins
//!
//! - `ui_in[0]`: SCLK
//! - `ui_in[1]`: COPI
//! - `ui_in[2]`: nCS
//! - `uo_out[7:0]`: channels 0 to 7
//! - `uio_out[7:0]`: channels 8 to 15
//!
//! Channel `i` is driven high when output `i` is enabled, and follows the PWM signal instead when PWM `i` is
//! enabled as well.

use crate::config::Config;
use crate::decoder::{LineInputs, SpiDecoder};
use crate::pwm::PwmGenerator;
use crate::testbench::Waveform;
use crate::utils::bit;
use crate::Fsm;

/// Bit of `ui_in` carrying SCLK.
pub const UI_SCLK: usize = 0;
/// Bit of `ui_in` carrying COPI.
pub const UI_COPI: usize = 1;
/// Bit of `ui_in` carrying nCS.
pub const UI_CS_N: usize = 2;

/// Levels of the output pins.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PinOutputs {
    /// Channels 0 to 7.
    pub uo_out: u8,
    /// Channels 8 to 15.
    pub uio_out: u8,
}

impl PinOutputs {
    /// All 16 channels.
    pub fn channels(&self) -> u16 { u16::from_le_bytes([self.uo_out, self.uio_out]) }

    /// Level of channel `index`.
    pub fn channel(&self, index: usize) -> bool { bit(self.channels(), index) }
}

/// Packs SPI lines into `ui_in`.
pub fn ui_in(lines: LineInputs) -> u8 {
    (u8::from(lines.sclk) << UI_SCLK) | (u8::from(lines.copi) << UI_COPI) | (u8::from(lines.cs_n) << UI_CS_N)
}

/// Unpacks SPI lines from `ui_in`. Unused bits are ignored.
pub fn lines(ui_in: u8) -> LineInputs {
    let ui_in = u16::from(ui_in);
    LineInputs { cs_n: bit(ui_in, UI_CS_N), sclk: bit(ui_in, UI_SCLK), copi: bit(ui_in, UI_COPI) }
}

/// The whole peripheral.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Peripheral {
    config: Config,
    decoder: SpiDecoder,
    pwm: PwmGenerator,
}

impl Peripheral {
    /// Creates a peripheral in its reset state.
    pub const fn new(config: Config) -> Self {
        Self { config, decoder: SpiDecoder::new(config.timing), pwm: PwmGenerator::new(config.pwm) }
    }

    /// Returns to the reset state.
    pub fn reset(&mut self) { *self = Self::new(self.config); }

    /// Advances one tick and returns the pin levels during the tick.
    pub fn tick(&mut self, rst_n: bool, ui_in: u8) -> PinOutputs { self.step((rst_n, ui_in)) }

    /// Applies `waveform` with reset de-asserted and returns the pin levels of every tick.
    pub fn drive(&mut self, waveform: &Waveform) -> Vec<PinOutputs> {
        waveform.iter().map(|lines| self.tick(true, ui_in(*lines))).collect()
    }

    /// Pin levels for the current state.
    pub fn outputs(&self) -> PinOutputs {
        let registers = self.decoder.registers();
        let pwm = if self.pwm.level(registers.pwm_duty_cycle()) { u16::MAX } else { 0 };
        let channels = registers.output_enable() & (!registers.pwm_enable() | pwm);
        let [uo_out, uio_out] = channels.to_le_bytes();
        PinOutputs { uo_out, uio_out }
    }

    /// Configuration.
    pub const fn config(&self) -> Config { self.config }

    /// SPI decoder.
    pub const fn decoder(&self) -> &SpiDecoder { &self.decoder }

    /// PWM generator.
    pub const fn pwm(&self) -> &PwmGenerator { &self.pwm }
}

impl Default for Peripheral {
    fn default() -> Self { Self::new(Config::default()) }
}

impl Fsm for Peripheral {
    type Input = (bool, u8);
    type Output = PinOutputs;

    fn fsm(&self, (rst_n, ui_in): (bool, u8)) -> (PinOutputs, Self) {
        if !rst_n {
            let reset = Self::new(self.config);
            return (reset.outputs(), reset);
        }

        let outputs = self.outputs();
        let (_, decoder) = self.decoder.fsm((rst_n, lines(ui_in)));
        let (_, pwm) = self.pwm.fsm(self.decoder.registers().pwm_duty_cycle());
        (outputs, Self { config: self.config, decoder, pwm })
    }
}
