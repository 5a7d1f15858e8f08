//! # Owner-Side Prediction
//!
//! The owner simulates its own entity immediately instead of waiting a
//! round trip for the authority's answer.
//!
//! ## How It Works
//!
//! 1. Each frame, the owner catches up to the current network tick,
//!    simulating every elapsed tick exactly once
//! 2. Each simulated tick's command goes to the authority exactly once
//! 3. The command and the pre-step state are recorded in bounded windows
//! 4. When the authority's snapshot for a tick arrives, reconciliation
//!    compares it against what was predicted (see [`crate::reconcile`])
//!
//! ```text
//! Tick:       [97] [98] [99] [100]
//!              |    |    |    |
//! Predict:    [P97][P98][P99][P100]   <- rendered pose, zero latency
//!              |
//! Snapshot:   [S97]----------------   <- arrives later, compared to P97
//! ```

use crate::buffer::{InputBuffer, PredictionLog};
use crate::channel::{AddressedCommand, CommandSender, Delivery};
use crate::clock::TickContext;
use crate::error::NetcodeError;
use slipstream_shared::config::NetcodeConfig;
use slipstream_shared::protocol::{EntityId, InputCommand};
use slipstream_sim::{motor, CollisionResolver, MotionState};

/// Produces the command for a given tick from the current raw input state.
///
/// Implemented by the embedding input layer. Called at most once per tick;
/// the engine records and transmits whatever it returns, so the command
/// must already carry the right tick number.
pub trait CommandSource {
    /// Builds the command for `tick`.
    fn sample(&mut self, tick: u32) -> InputCommand;
}

/// Running counters for one prediction engine.
#[derive(Clone, Copy, Debug, Default)]
pub struct PredictionStats {
    /// Ticks simulated locally.
    pub ticks_simulated: u64,
    /// Commands handed to the command queue.
    pub commands_sent: u64,
    /// Commands lost to a full queue.
    pub commands_lost: u64,
}

/// Owner-side predicted simulation of a single entity.
pub struct PredictionEngine {
    /// Entity this engine predicts.
    entity: EntityId,
    /// Current predicted state; the owner's render pose.
    state: MotionState,
    /// Commands awaiting acknowledgment, for replay.
    inputs: InputBuffer,
    /// Pre-step states keyed by the tick applied to them.
    log: PredictionLog,
    /// Last tick simulated locally.
    last_simulated_tick: Option<u32>,
    /// Last tick whose command was transmitted.
    last_sent_tick: Option<u32>,
    /// Counters.
    stats: PredictionStats,
}

impl PredictionEngine {
    /// Creates an engine for `entity`, starting from its placed pose.
    ///
    /// `window` bounds the input and prediction stores, in ticks.
    #[must_use]
    pub fn new(entity: EntityId, spawn_state: MotionState, window: usize) -> Self {
        Self {
            entity,
            state: spawn_state,
            inputs: InputBuffer::new(window),
            log: PredictionLog::new(window),
            last_simulated_tick: None,
            last_sent_tick: None,
            stats: PredictionStats::default(),
        }
    }

    /// Creates an engine tuned from a config.
    #[must_use]
    pub fn from_config(entity: EntityId, spawn_state: MotionState, config: &NetcodeConfig) -> Self {
        Self::new(entity, spawn_state, config.prediction_window)
    }

    /// Runs one frame of prediction.
    ///
    /// Simulates every tick in `(last simulated, ctx.tick]`, so a render
    /// frame that spans several ticks catches up and a frame within one
    /// tick does nothing. For each simulated tick the command is sampled,
    /// recorded, applied locally and transmitted exactly once. The last
    /// simulated tick advances to `ctx.tick` even when no tick elapsed.
    ///
    /// Only a dead command channel is an error; a full one is packet loss.
    pub fn advance(
        &mut self,
        ctx: TickContext,
        source: &mut impl CommandSource,
        commands: &CommandSender,
        resolver: &impl CollisionResolver,
    ) -> Result<(), NetcodeError> {
        let first = self.last_simulated_tick.map_or(0, |tick| tick + 1);

        for tick in first..=ctx.tick {
            let command = source.sample(tick);

            // Record what we are about to apply and what we applied it to
            self.inputs.insert(tick, command);
            self.log.insert(tick, self.state);

            self.state = motor::step(&self.state, &command, ctx.dt, resolver);
            self.stats.ticks_simulated += 1;

            // Exactly one transmission per tick
            if self.last_sent_tick.map_or(true, |sent| tick > sent) {
                match commands.send(AddressedCommand {
                    entity: self.entity,
                    command,
                })? {
                    Delivery::Delivered => self.stats.commands_sent += 1,
                    Delivery::Dropped => self.stats.commands_lost += 1,
                }
                self.last_sent_tick = Some(tick);
            }
        }

        self.last_simulated_tick =
            Some(self.last_simulated_tick.map_or(ctx.tick, |tick| tick.max(ctx.tick)));

        Ok(())
    }

    /// Current predicted state; always the owner's render pose.
    #[inline]
    #[must_use]
    pub const fn state(&self) -> &MotionState {
        &self.state
    }

    /// Entity this engine predicts.
    #[inline]
    #[must_use]
    pub const fn entity(&self) -> EntityId {
        self.entity
    }

    /// Last tick simulated locally.
    #[inline]
    #[must_use]
    pub const fn last_simulated_tick(&self) -> Option<u32> {
        self.last_simulated_tick
    }

    /// Counters.
    #[inline]
    #[must_use]
    pub const fn stats(&self) -> &PredictionStats {
        &self.stats
    }

    /// Occupancy of the command window.
    #[must_use]
    pub const fn pending_commands(&self) -> usize {
        self.inputs.len()
    }

    /// Occupancy of the prediction window.
    #[must_use]
    pub const fn logged_predictions(&self) -> usize {
        self.log.len()
    }

    /// Tears down all buffered history, e.g. on disconnect.
    pub fn reset_buffers(&mut self) {
        self.inputs.clear();
        self.log.clear();
    }

    // Reconciliation internals; the reconciler rewinds and replays through
    // these without exposing the windows publicly.

    pub(crate) fn logged_state_at(&self, tick: u32) -> Option<MotionState> {
        self.log.get(tick).copied()
    }

    pub(crate) fn command_at(&self, tick: u32) -> Option<InputCommand> {
        self.inputs.get(tick).copied()
    }

    pub(crate) fn set_state(&mut self, state: MotionState) {
        self.state = state;
    }

    pub(crate) fn evict_through(&mut self, tick: u32) {
        self.inputs.evict_through(tick);
        self.log.evict_through(tick);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::command_channel;
    use slipstream_shared::math::Vec3;
    use slipstream_sim::GroundPlane;

    const DT: f32 = 0.05;

    /// Scripted source: full forward every tick.
    struct Forward;

    impl CommandSource for Forward {
        fn sample(&mut self, tick: u32) -> InputCommand {
            let mut cmd = InputCommand::new(tick);
            cmd.vertical = 1.0;
            cmd
        }
    }

    fn engine() -> PredictionEngine {
        PredictionEngine::new(EntityId(1), MotionState::at_pose(Vec3::ZERO, 0.0), 64)
    }

    #[test]
    fn test_catch_up_simulates_each_tick_once() {
        let mut engine = engine();
        let (tx, rx) = command_channel(64);
        let resolver = GroundPlane::default();

        engine
            .advance(TickContext::new(4, DT), &mut Forward, &tx, &resolver)
            .unwrap();

        // Ticks 0..=4 simulated and sent, in order
        assert_eq!(engine.stats().ticks_simulated, 5);
        let sent = rx.drain();
        assert_eq!(sent.len(), 5);
        assert_eq!(sent[0].command.tick, 0);
        assert_eq!(sent[4].command.tick, 4);
        assert_eq!(engine.last_simulated_tick(), Some(4));
    }

    #[test]
    fn test_same_tick_is_not_resimulated_or_resent() {
        let mut engine = engine();
        let (tx, rx) = command_channel(64);
        let resolver = GroundPlane::default();
        let ctx = TickContext::new(2, DT);

        engine.advance(ctx, &mut Forward, &tx, &resolver).unwrap();
        let after_first = *engine.state();

        engine.advance(ctx, &mut Forward, &tx, &resolver).unwrap();

        assert_eq!(*engine.state(), after_first);
        assert_eq!(engine.stats().ticks_simulated, 3);
        assert_eq!(rx.drain().len(), 3);
        assert_eq!(engine.last_simulated_tick(), Some(2));
    }

    #[test]
    fn test_pre_step_state_is_logged() {
        let mut engine = engine();
        let (tx, _rx) = command_channel(64);
        let resolver = GroundPlane::default();

        engine
            .advance(TickContext::new(1, DT), &mut Forward, &tx, &resolver)
            .unwrap();

        // Tick 0 was applied to the spawn state
        let logged = engine.logged_state_at(0).unwrap();
        assert_eq!(logged, MotionState::at_pose(Vec3::ZERO, 0.0));

        // Tick 1's pre-step state is tick 0's result, which has moved
        let logged = engine.logged_state_at(1).unwrap();
        assert!(logged.position.z > 0.0);
    }

    #[test]
    fn test_full_channel_counts_loss() {
        let mut engine = engine();
        let (tx, rx) = command_channel(2);
        let resolver = GroundPlane::default();

        engine
            .advance(TickContext::new(4, DT), &mut Forward, &tx, &resolver)
            .unwrap();

        assert_eq!(engine.stats().commands_sent, 2);
        assert_eq!(engine.stats().commands_lost, 3);
        // Prediction carried on regardless
        assert_eq!(engine.stats().ticks_simulated, 5);
        assert_eq!(rx.drain().len(), 2);
    }

    #[test]
    fn test_dead_channel_is_an_error() {
        let mut engine = engine();
        let (tx, rx) = command_channel(8);
        drop(rx);

        let result = engine.advance(
            TickContext::new(0, DT),
            &mut Forward,
            &tx,
            &GroundPlane::default(),
        );
        assert_eq!(result, Err(NetcodeError::ChannelClosed));
    }

    #[test]
    fn test_windows_stay_bounded_without_acks() {
        let mut engine = PredictionEngine::new(
            EntityId(1),
            MotionState::at_pose(Vec3::ZERO, 0.0),
            32,
        );
        let (tx, rx) = command_channel(4096);
        let resolver = GroundPlane::default();

        for tick in 0..1_000 {
            engine
                .advance(TickContext::new(tick, DT), &mut Forward, &tx, &resolver)
                .unwrap();
            let _ = rx.drain();
        }

        assert!(engine.pending_commands() <= 32);
        assert!(engine.logged_predictions() <= 32);
    }
}
