//! Dormant/active bookkeeping shared by every landscape element.

use rand::Rng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;

/// Phase reported by a lifecycle tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Still waiting out the activation delay; nothing may change.
    Dormant,
    /// Delay exhausted; the element applies its effect.
    Active,
}

/// How an element picks its activation delay.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Activation {
    /// Random delay in `[0, max]` years.
    Delayed,
    /// No delay at all.
    Immediate,
}

impl Activation {
    pub fn from_immediate(immediate: bool) -> Self {
        if immediate {
            Activation::Immediate
        } else {
            Activation::Delayed
        }
    }

    /// Draw a delay of at most `max_years`.
    pub fn delay(&self, max_years: u64, rng: &mut ChaCha8Rng) -> u64 {
        match self {
            Activation::Delayed => rng.gen_range(0..=max_years),
            Activation::Immediate => 0,
        }
    }
}

/// Base state of a landscape element.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Lifecycle {
    /// Simulated years since creation.
    pub gen_years: u64,
    /// Years left before the element becomes active.
    pub delay_years: u64,
    /// Effect already applied, in voxels. Never decreases.
    pub shift_already: u64,
}

impl Lifecycle {
    pub fn new(delay_years: u64) -> Self {
        Self {
            gen_years: 0,
            delay_years,
            shift_already: 0,
        }
    }

    pub fn is_active(&self) -> bool {
        self.delay_years == 0
    }

    /// Advance the clock by `years_delta`.
    ///
    /// Years accumulate whatever the phase. The element stays dormant while the
    /// remaining delay is longer than the step; the step that exhausts the
    /// delay is already active, and it stays active for good.
    pub fn tick(&mut self, years_delta: u64) -> Phase {
        self.gen_years += years_delta;
        if self.delay_years > years_delta {
            self.delay_years -= years_delta;
            return Phase::Dormant;
        }
        self.delay_years = 0;
        Phase::Active
    }

    /// Extra shift needed to reach `target`, recorded as applied.
    ///
    /// Returns zero when `target` has already been reached.
    pub fn take_shift(&mut self, target: u64) -> u64 {
        if target <= self.shift_already {
            return 0;
        }
        let delta = target - self.shift_already;
        self.shift_already = target;
        delta
    }
}
