//! Drives the SPI peripheral with a list of transactions and reports the resulting register and pin state.
//!
//! Usage:
//!   cargo run -p spi-peripheral-sim -- \
//!       --profile canonical --half-period 50 \
//!       --write 0x00:0x01 --write 0x02:0x01 --write 0x04:0x80 \
//!       --raw 0x30be --pwm-ticks 10000

use std::num::ParseIntError;

use clap::Parser;
use spi_peripheral::*;
use thiserror::Error;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// Ticks with reset asserted before the first transaction.
const RESET_TICKS: u32 = 5;

#[derive(Debug, Error)]
enum SimError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("frame error: {0}")]
    Frame(#[from] FrameError),
}

#[derive(Debug, Error)]
enum ArgError {
    #[error("expected ADDR:DATA, got `{0}`")]
    MissingSeparator(String),
    #[error("invalid number: {0}")]
    Number(#[from] ParseIntError),
}

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Timing profile: canonical, double-sync or falling-commit
    #[arg(long, default_value = "canonical")]
    profile: TimingProfile,

    /// Ticks per SPI clock phase
    #[arg(long, default_value_t = 50)]
    half_period: u32,

    /// Idle ticks after each transaction
    #[arg(long, default_value_t = SpiHost::DEFAULT_SETTLE)]
    settle: u32,

    /// Ticks per PWM period
    #[arg(long, default_value_t = PwmConfig::DEFAULT_PERIOD_TICKS)]
    pwm_period: u32,

    /// Register write as ADDR:DATA (hex with 0x prefix, or decimal)
    #[arg(short, long = "write", value_parser = parse_write)]
    writes: Vec<(u8, u8)>,

    /// Raw 16-bit frame, sent after all writes
    #[arg(long = "raw", value_parser = parse_u16)]
    raws: Vec<u16>,

    /// Ticks to run after the transactions while measuring channel 0
    #[arg(long, default_value_t = 0)]
    pwm_ticks: u32,
}

fn parse_u16(s: &str) -> Result<u16, ParseIntError> {
    match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u16::from_str_radix(hex, 16),
        None => s.parse(),
    }
}

fn parse_u8(s: &str) -> Result<u8, ParseIntError> {
    match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u8::from_str_radix(hex, 16),
        None => s.parse(),
    }
}

fn parse_write(s: &str) -> Result<(u8, u8), ArgError> {
    let (address, data) = s.split_once(':').ok_or_else(|| ArgError::MissingSeparator(s.to_string()))?;
    Ok((parse_u8(address.trim())?, parse_u8(data.trim())?))
}

fn main() -> Result<(), SimError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();

    let config = Config { timing: args.profile, pwm: PwmConfig::new(args.pwm_period)? };
    let host = SpiHost::for_profile(args.profile, args.half_period)?.with_settle(args.settle);
    info!(profile = %args.profile, half_period = host.half_period(), pwm_period = args.pwm_period, "configured");

    let frames = args
        .writes
        .iter()
        .map(|&(address, data)| Frame::write(address, data))
        .chain(args.raws.iter().map(|&raw| Ok(Frame::from_raw(raw))))
        .collect::<Result<Vec<_>, _>>()?;

    let mut dut = Peripheral::new(config);
    let idle = peripheral::ui_in(LineInputs::IDLE);
    for _ in 0..RESET_TICKS {
        dut.tick(false, idle);
    }

    for frame in frames {
        let waveform = host.send(frame);
        let before = *dut.decoder().registers();
        dut.drive(&waveform);
        let after = *dut.decoder().registers();
        debug!(ticks = waveform.len(), "transaction sent");
        info!(%frame, changed = before != after, "transaction");
    }

    info!("registers: {}", dut.decoder().registers());

    if args.pwm_ticks > 0 {
        let trace = dut.drive(&host.idle(args.pwm_ticks));
        let high = trace.iter().filter(|pins| pins.channel(0)).count();
        info!(high, ticks = args.pwm_ticks, "channel 0 duty: {:.2}%", high as f64 * 100.0 / f64::from(args.pwm_ticks));
    }

    let pins = dut.outputs();
    info!("uo_out={:#010b} uio_out={:#010b}", pins.uo_out, pins.uio_out);

    Ok(())
}
