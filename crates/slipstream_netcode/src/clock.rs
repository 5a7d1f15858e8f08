//! Tick timing.
//!
//! Every engine entry point takes an explicit [`TickContext`] rather than
//! consulting ambient time. [`TickClock`] is the one place wall time enters
//! the system: it converts elapsed time since session start into the
//! current tick number at the fixed shared rate.

use std::time::{Duration, Instant};

/// The timing inputs for one simulation pass.
#[derive(Clone, Copy, Debug)]
pub struct TickContext {
    /// Current network tick.
    pub tick: u32,
    /// Fixed tick duration in seconds.
    pub dt: f32,
}

impl TickContext {
    /// Creates a context from its parts.
    #[inline]
    #[must_use]
    pub const fn new(tick: u32, dt: f32) -> Self {
        Self { tick, dt }
    }
}

/// Fixed-rate tick counter anchored to session start.
///
/// All participants run the same rate; the clock only answers "which tick
/// is it now", it never drives a loop by itself.
pub struct TickClock {
    /// Target tick duration.
    tick_duration: Duration,
    /// Tick duration in seconds, precomputed for contexts.
    dt: f32,
    /// Session start.
    started: Instant,
}

impl TickClock {
    /// Creates a clock at the given rate, starting now at tick 0.
    #[must_use]
    pub fn new(tick_rate: u32) -> Self {
        let tick_rate = tick_rate.max(1);
        Self {
            tick_duration: Duration::from_micros(1_000_000 / u64::from(tick_rate)),
            dt: 1.0 / tick_rate as f32,
            started: Instant::now(),
        }
    }

    /// Current tick derived from elapsed time.
    #[must_use]
    pub fn current_tick(&self) -> u32 {
        let elapsed = self.started.elapsed().as_secs_f64();
        (elapsed / self.tick_duration.as_secs_f64()) as u32
    }

    /// Builds the context for a simulation pass happening now.
    #[must_use]
    pub fn context(&self) -> TickContext {
        TickContext::new(self.current_tick(), self.dt)
    }

    /// Fixed tick duration in seconds.
    #[inline]
    #[must_use]
    pub const fn dt(&self) -> f32 {
        self.dt
    }

    /// Fixed tick duration.
    #[inline]
    #[must_use]
    pub const fn tick_duration(&self) -> Duration {
        self.tick_duration
    }
}
