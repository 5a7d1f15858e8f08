//! # Server Reconciliation
//!
//! Compares authoritative snapshots against what the owner predicted for
//! the same tick and corrects the predicted trajectory when they disagree.
//!
//! ```text
//! Snapshot S(T) arrives:
//!   no prediction logged for T  -> ignore (already resolved or evicted)
//!   |S(T) - P(T)| within tolerance -> confirm, touch nothing
//!   otherwise                      -> adopt S(T), replay T+1..=now
//! ```
//!
//! The predicted result of tick T is the pre-step state logged for T+1;
//! for the newest simulated tick it is the live predicted state. A replay
//! tick whose command was evicted or never recorded is skipped and the
//! trajectory continues from whatever preceded it.

use crate::clock::TickContext;
use crate::prediction::PredictionEngine;
use slipstream_shared::config::NetcodeConfig;
use slipstream_shared::math::yaw_delta;
use slipstream_shared::protocol::StateSnapshot;
use slipstream_sim::{motor, CollisionResolver, MotionState};

/// What a snapshot did to the predicted trajectory.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ReconcileOutcome {
    /// No prediction was logged for the snapshot's tick; nothing to
    /// compare against.
    Unknown,
    /// Prediction agreed within tolerance; predicted state untouched.
    Confirmed {
        /// Measured positional error in meters.
        position_error: f32,
        /// Measured yaw error in degrees.
        yaw_error: f32,
    },
    /// Prediction diverged; the snapshot was adopted and buffered commands
    /// replayed.
    Corrected {
        /// Measured positional error in meters.
        position_error: f32,
        /// Measured yaw error in degrees.
        yaw_error: f32,
        /// Commands re-applied on top of the snapshot.
        replayed: u32,
    },
}

/// Running counters for one reconciler.
#[derive(Clone, Copy, Debug, Default)]
pub struct ReconcileStats {
    /// Snapshots examined.
    pub snapshots: u64,
    /// Snapshots with no matching prediction.
    pub unknown: u64,
    /// Snapshots confirming the prediction.
    pub confirmed: u64,
    /// Snapshots forcing a rewind.
    pub corrections: u64,
    /// Commands replayed across all corrections.
    pub replayed_commands: u64,
    /// Replay ticks skipped for want of a buffered command.
    pub replay_gaps: u64,
    /// Largest positional error observed.
    pub max_position_error: f32,
    /// Sum of positional errors, for the average.
    pub total_position_error: f32,
}

impl ReconcileStats {
    /// Average positional error across compared snapshots.
    #[must_use]
    pub fn average_position_error(&self) -> f32 {
        let samples = self.confirmed + self.corrections;
        if samples == 0 {
            0.0
        } else {
            self.total_position_error / samples as f32
        }
    }
}

/// Owner-side reconciliation against authoritative snapshots.
pub struct Reconciler {
    /// Positional tolerance in meters.
    position_tolerance: f32,
    /// Yaw tolerance in degrees.
    yaw_tolerance: f32,
    /// Counters.
    stats: ReconcileStats,
}

impl Reconciler {
    /// Creates a reconciler with explicit tolerances.
    #[must_use]
    pub fn new(position_tolerance: f32, yaw_tolerance: f32) -> Self {
        Self {
            position_tolerance,
            yaw_tolerance,
            stats: ReconcileStats::default(),
        }
    }

    /// Creates a reconciler tuned from a config.
    #[must_use]
    pub fn from_config(config: &NetcodeConfig) -> Self {
        Self::new(config.position_tolerance, config.yaw_tolerance)
    }

    /// Applies one authoritative snapshot to the owner's engine.
    ///
    /// `ctx` supplies the fixed tick duration for replay; the current tick
    /// itself is irrelevant here, replay runs to the engine's last
    /// simulated tick.
    pub fn apply(
        &mut self,
        engine: &mut PredictionEngine,
        snapshot: &StateSnapshot,
        ctx: TickContext,
        resolver: &impl CollisionResolver,
    ) -> ReconcileOutcome {
        self.stats.snapshots += 1;

        // Gate on the log: a pruned or never-predicted tick is already
        // resolved and the snapshot carries no new information.
        if engine.logged_state_at(snapshot.tick).is_none() {
            self.stats.unknown += 1;
            return ReconcileOutcome::Unknown;
        }

        // The predicted result of tick T is the pre-step state of T+1;
        // for the newest tick it is the live state.
        let predicted = engine
            .logged_state_at(snapshot.tick + 1)
            .unwrap_or_else(|| *engine.state());

        let position_error = predicted.position.distance(snapshot.position);
        let yaw_error = yaw_delta(predicted.yaw, snapshot.yaw).abs();

        self.stats.total_position_error += position_error;
        self.stats.max_position_error = self.stats.max_position_error.max(position_error);

        let outcome = if position_error > self.position_tolerance
            || yaw_error > self.yaw_tolerance
        {
            let replayed = self.rewind_and_replay(engine, snapshot, ctx.dt, resolver);
            self.stats.corrections += 1;
            tracing::debug!(
                "corrected entity {}: tick {} error {:.3}m / {:.2}deg, replayed {}",
                engine.entity(),
                snapshot.tick,
                position_error,
                yaw_error,
                replayed
            );
            ReconcileOutcome::Corrected {
                position_error,
                yaw_error,
                replayed,
            }
        } else {
            // Implicit confirmation; the predicted state stays untouched
            self.stats.confirmed += 1;
            ReconcileOutcome::Confirmed {
                position_error,
                yaw_error,
            }
        };

        // Either way this tick is resolved; drop it and everything older
        engine.evict_through(snapshot.tick);

        outcome
    }

    /// Adopts the snapshot as ground truth and re-applies buffered
    /// commands up to the present. Returns how many were replayed.
    fn rewind_and_replay(
        &mut self,
        engine: &mut PredictionEngine,
        snapshot: &StateSnapshot,
        dt: f32,
        resolver: &impl CollisionResolver,
    ) -> u32 {
        let mut state = MotionState::from_snapshot(snapshot);
        let mut replayed = 0u32;

        if let Some(current) = engine.last_simulated_tick() {
            for tick in snapshot.tick + 1..=current {
                if let Some(command) = engine.command_at(tick) {
                    state = motor::step(&state, &command, dt, resolver);
                    replayed += 1;
                } else {
                    // Evicted or never recorded: accept the gap
                    self.stats.replay_gaps += 1;
                }
            }
        }

        self.stats.replayed_commands += u64::from(replayed);
        engine.set_state(state);
        replayed
    }

    /// Counters.
    #[inline]
    #[must_use]
    pub const fn stats(&self) -> &ReconcileStats {
        &self.stats
    }
}
