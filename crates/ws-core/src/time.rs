//! Simulation time model.
//!
//! # Design
//!
//! The host drives the simulation one frame at a time, supplying the frame's
//! `dt` in seconds.  Two quantities are tracked side by side:
//!
//! - `Tick`: an integer frame counter, used for ordering and for observer
//!   callbacks.
//! - `SimClock::time`: accumulated simulated seconds, used by every timer
//!   (task processing, throw cooldowns, snow pile melting, launch pads).
//!
//! Timers are always "elapsed ≥ threshold" checks against `time`, evaluated
//! once per tick, so a state change becomes visible on the first tick
//! boundary where the condition holds and never earlier.

use std::fmt;

use crate::{Extents, WsError, WsResult};

// ── Tick ─────────────────────────────────────────────────────────────────────

/// An absolute frame counter.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tick(pub u64);

impl Tick {
    pub const ZERO: Tick = Tick(0);

    /// Ticks elapsed from `earlier` to `self`.
    ///
    /// # Panics
    /// Panics in debug mode if `earlier > self`.
    #[inline]
    pub fn since(self, earlier: Tick) -> u64 {
        self.0 - earlier.0
    }
}

impl std::ops::Add<u64> for Tick {
    type Output = Tick;
    #[inline]
    fn add(self, rhs: u64) -> Tick {
        Tick(self.0 + rhs)
    }
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}", self.0)
    }
}

// ── SimClock ──────────────────────────────────────────────────────────────────

/// Frame counter plus accumulated simulated seconds.
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimClock {
    /// Number of completed frames.
    pub current_tick: Tick,
    /// Simulated seconds since the start of the run.
    pub time: f32,
    /// Length of the most recent frame in seconds.
    pub delta: f32,
}

impl SimClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance by one frame of `dt` seconds.  Negative or non-finite `dt`
    /// is treated as zero so time never runs backwards.
    #[inline]
    pub fn advance(&mut self, dt: f32) {
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        self.delta = dt;
        self.time += dt;
        self.current_tick = self.current_tick + 1;
    }

    /// Seconds elapsed since `since` (a previous `time` reading).
    #[inline]
    pub fn elapsed_since(&self, since: f32) -> f32 {
        self.time - since
    }
}

impl fmt::Display for SimClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:.2}s)", self.current_tick, self.time)
    }
}

// ── SimConfig ─────────────────────────────────────────────────────────────────

/// Top-level simulation configuration.
///
/// Typically constructed by the host (or deserialized with the `serde`
/// feature) and handed to the simulation builder.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimConfig {
    /// Master RNG seed.  The same seed and the same `dt` sequence always
    /// produce identical results.
    pub seed: u64,

    /// Frame length used by `run` / `run_ticks` when the host does not
    /// supply its own `dt`.
    pub fixed_delta_secs: f32,

    /// Frames simulated by `run`.
    pub total_ticks: u64,

    /// Upper bound on the `dt` used to turn acceleration into velocity, so a
    /// single long frame cannot inject an unrealistic velocity spike.
    pub max_integration_step: f32,

    /// Region elves may walk in; snowmen are kept out of it.
    pub elf_extents: Extents,

    /// Region snowmen may walk in (encloses `elf_extents`).
    pub snowman_extents: Extents,
}

impl SimConfig {
    /// The tick at which `run` stops (exclusive upper bound).
    #[inline]
    pub fn end_tick(&self) -> Tick {
        Tick(self.total_ticks)
    }

    /// Reject frame lengths and extents the tick loop cannot run with.
    pub fn validate(&self) -> WsResult<()> {
        if !(self.fixed_delta_secs > 0.0) || !self.fixed_delta_secs.is_finite() {
            return Err(WsError::Config(format!(
                "fixed_delta_secs must be > 0, got {}",
                self.fixed_delta_secs
            )));
        }
        if !(self.max_integration_step > 0.0) {
            return Err(WsError::Config(format!(
                "max_integration_step must be > 0, got {}",
                self.max_integration_step
            )));
        }
        for (name, e) in [("elf_extents", self.elf_extents), ("snowman_extents", self.snowman_extents)] {
            if !(e.half.x > 0.0 && e.half.z > 0.0) || !e.half.is_finite() {
                return Err(WsError::Config(format!("{name} must have positive x/z half-sizes, got {}", e.half)));
            }
        }
        Ok(())
    }
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed:                 0,
            fixed_delta_secs:     1.0 / 60.0,
            total_ticks:          60 * 60,
            max_integration_step: 0.125,
            elf_extents:          Extents::new(20.0, 5.0, 15.0),
            snowman_extents:      Extents::new(30.0, 5.0, 25.0),
        }
    }
}
