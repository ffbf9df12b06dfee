//! PWM generator driven by the duty-cycle register.

use crate::config::PwmConfig;
use crate::Fsm;

/// Free-running PWM counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PwmGenerator {
    counter: u32,
    period: u32,
}

impl PwmGenerator {
    /// Creates a generator at the start of a period.
    pub const fn new(config: PwmConfig) -> Self { Self { counter: 0, period: config.period_ticks() } }

    /// Position within the current period.
    pub const fn counter(&self) -> u32 { self.counter }

    /// Number of high ticks per period for `duty`.
    pub const fn threshold(&self, duty: u8) -> u32 {
        // Widened so that `0xff * period` cannot overflow.
        ((duty as u64 * self.period as u64) / u8::MAX as u64) as u32
    }

    /// Level of the PWM output in the current tick.
    pub const fn level(&self, duty: u8) -> bool { self.counter < self.threshold(duty) }
}

impl Fsm for PwmGenerator {
    type Input = u8;
    type Output = bool;

    fn fsm(&self, duty: u8) -> (bool, Self) {
        let counter = if self.counter + 1 >= self.period { 0 } else { self.counter + 1 };
        (self.level(duty), Self { counter, period: self.period })
    }
}
