//! Simulation time model.
//!
//! # Design
//!
//! Two quantities advance together every tick:
//!
//! - a monotonically increasing integer `Tick` counter, used for ordering
//!   and output rows, and
//! - `sim_secs`, the scaled simulation time in seconds:
//!
//!   sim_dt = real_dt × time_scale
//!
//! Scheduler gates (order arrival interval, preparation timers) read
//! `sim_secs`; robots move exactly one cell per tick regardless of `sim_dt`.

use std::fmt;
use std::time::Duration;

// ── Tick ─────────────────────────────────────────────────────────────────────

/// An absolute simulation tick counter.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tick(pub u64);

impl Tick {
    pub const ZERO: Tick = Tick(0);
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ── SimClock ──────────────────────────────────────────────────────────────────

/// Monotonic accumulator of scaled simulation time.
///
/// The caller measures the real-time delta (the background loop uses the wall
/// clock, batch runs and tests the nominal tick interval) and passes it to
/// [`advance`](Self::advance).
#[derive(Clone, Debug)]
pub struct SimClock {
    /// Simulation seconds per real second.
    pub time_scale: f64,
    /// Accumulated simulation time in seconds.
    pub sim_secs: f64,
    /// Number of completed ticks.
    pub current_tick: Tick,
}

impl SimClock {
    pub fn new(time_scale: f64) -> Self {
        Self {
            time_scale,
            sim_secs: 0.0,
            current_tick: Tick::ZERO,
        }
    }

    /// Advance by an explicit real-time delta.  Returns the scaled
    /// simulation delta in seconds.
    pub fn advance(&mut self, real_dt: Duration) -> f64 {
        let sim_dt = real_dt.as_secs_f64() * self.time_scale;
        self.sim_secs += sim_dt;
        self.current_tick = Tick(self.current_tick.0 + 1);
        sim_dt
    }

    /// Accumulated simulation time in seconds.
    #[inline]
    pub fn now(&self) -> f64 {
        self.sim_secs
    }
}
