//! Timing profiles and peripheral configuration.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

#[allow(missing_docs)]
#[allow(variant_size_differences)]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("unknown timing profile `{0}` (expected `canonical`, `double-sync` or `falling-commit`)")]
    UnknownProfile(String),
    #[error("PWM period must be at least one tick")]
    ZeroPwmPeriod,
    #[error("SPI half-period must be at least one tick")]
    ZeroHalfPeriod,
}

/// Depth of the chip-select and clock synchronizers.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum SyncDepth {
    /// Two stages. Edges are detected between the two newest samples.
    Double,

    /// Three stages. Edges are detected between the two oldest samples, one tick later than `Double`.
    #[default]
    Triple,
}

impl SyncDepth {
    /// Age (0 is the newest sample) of the sample regarded as the current value.
    pub const fn current_age(self) -> usize {
        match self {
            Self::Double => 0,
            Self::Triple => 1,
        }
    }

    /// Age of the sample regarded as the previous value.
    pub const fn previous_age(self) -> usize { self.current_age() + 1 }
}

/// Clock edge on which a data bit is shifted in.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum SampleEdge {
    /// SPI mode 0.
    #[default]
    Rising,

    /// SPI mode 1.
    Falling,
}

/// Event that commits a complete frame to the register bank.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum CommitTrigger {
    /// Commit on the chip-select rising edge.
    #[default]
    ChipSelectRelease,

    /// Commit on a clock falling edge observed while chip-select is released.
    ClockFalling,
}

/// Timing policy of the decoder.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TimingProfile {
    /// Synchronizer depth of chip-select and clock.
    pub sync_depth: SyncDepth,
    /// Sampling edge.
    pub sample_edge: SampleEdge,
    /// Commit trigger.
    pub commit_trigger: CommitTrigger,
}

impl TimingProfile {
    /// Triple-sampled control lines, mode 0, commit on release.
    pub const CANONICAL: Self = Self {
        sync_depth: SyncDepth::Triple,
        sample_edge: SampleEdge::Rising,
        commit_trigger: CommitTrigger::ChipSelectRelease,
    };

    /// Double-sampled control lines, mode 0, commit on release.
    pub const DOUBLE_SYNC: Self = Self {
        sync_depth: SyncDepth::Double,
        sample_edge: SampleEdge::Rising,
        commit_trigger: CommitTrigger::ChipSelectRelease,
    };

    /// Double-sampled control lines, mode 0, commit on the falling clock edge after release.
    pub const FALLING_COMMIT: Self = Self {
        sync_depth: SyncDepth::Double,
        sample_edge: SampleEdge::Rising,
        commit_trigger: CommitTrigger::ClockFalling,
    };

    /// Named presets.
    pub const PRESETS: [(&'static str, Self); 3] =
        [("canonical", Self::CANONICAL), ("double-sync", Self::DOUBLE_SYNC), ("falling-commit", Self::FALLING_COMMIT)];
}

impl FromStr for TimingProfile {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::PRESETS
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(s.trim()))
            .map(|(_, profile)| *profile)
            .ok_or_else(|| ConfigError::UnknownProfile(s.to_string()))
    }
}

impl fmt::Display for TimingProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match Self::PRESETS.iter().find(|(_, profile)| profile == self) {
            Some((name, _)) => write!(f, "{}", name),
            None => write!(f, "{:?}/{:?}/{:?}", self.sync_depth, self.sample_edge, self.commit_trigger),
        }
    }
}

/// PWM generator configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PwmConfig {
    period_ticks: u32,
}

impl PwmConfig {
    /// 3 kHz at a 10 MHz tick clock.
    pub const DEFAULT_PERIOD_TICKS: u32 = 3333;

    /// Creates a new configuration.
    pub fn new(period_ticks: u32) -> Result<Self, ConfigError> {
        if period_ticks == 0 {
            return Err(ConfigError::ZeroPwmPeriod);
        }
        Ok(Self { period_ticks })
    }

    /// Number of ticks in one PWM period.
    pub const fn period_ticks(&self) -> u32 { self.period_ticks }
}

impl Default for PwmConfig {
    fn default() -> Self { Self { period_ticks: Self::DEFAULT_PERIOD_TICKS } }
}

/// Configuration of the pin-level peripheral.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// Decoder timing.
    pub timing: TimingProfile,
    /// PWM generator.
    pub pwm: PwmConfig,
}
