//! # Server Authority
//!
//! The single source of truth for every entity's simulated state.
//!
//! ## Design
//!
//! Each entity is simulated independently from the commands its owner
//! sends. The transport guarantees nothing, so ordering is enforced here:
//! a command whose tick is at or before the entity's last processed tick
//! is dropped silently. Everything that survives the guard is simulated
//! with the fixed tick duration and answered with a snapshot.
//!
//! ```text
//! receive command -> tick guard -> simulate -> broadcast snapshot
//! ```
//!
//! The owner's client never determines outcomes; it only proposes inputs.

use crate::channel::{AddressedSnapshot, CommandReceiver, SnapshotSender};
use crate::error::NetcodeError;
use slipstream_shared::config::NetcodeConfig;
use slipstream_shared::protocol::{EntityId, InputCommand, StateSnapshot};
use slipstream_sim::{motor, CollisionResolver, MotionState};
use std::collections::HashMap;

/// Authoritative record for one entity.
struct EntityRecord {
    /// Authoritative state.
    state: MotionState,
    /// Highest tick already simulated for this entity.
    last_processed_tick: Option<u32>,
}

/// Running counters for the authority.
#[derive(Clone, Copy, Debug, Default)]
pub struct AuthorityStats {
    /// Commands simulated.
    pub commands_processed: u64,
    /// Stale or duplicate commands dropped by the tick guard.
    pub commands_dropped: u64,
    /// Commands for entities the authority does not know.
    pub commands_unroutable: u64,
    /// Snapshots handed to the snapshot queue.
    pub snapshots_emitted: u64,
}

/// The authoritative simulation of every entity in a session.
pub struct ServerAuthority {
    /// Per-entity records, partitioned by identity.
    entities: HashMap<EntityId, EntityRecord>,
    /// Fixed tick duration in seconds.
    dt: f32,
    /// Counters.
    stats: AuthorityStats,
}

impl ServerAuthority {
    /// Creates an authority running at the given tick rate.
    #[must_use]
    pub fn new(tick_rate: u32) -> Self {
        Self {
            entities: HashMap::new(),
            dt: 1.0 / tick_rate.max(1) as f32,
            stats: AuthorityStats::default(),
        }
    }

    /// Creates an authority tuned from a config.
    #[must_use]
    pub fn from_config(config: &NetcodeConfig) -> Self {
        Self::new(config.tick_rate)
    }

    /// Registers an entity with its placed pose.
    ///
    /// Placement itself is the session glue's job; the authority only
    /// requires the state before the first command. Re-spawning an
    /// existing entity resets its record.
    pub fn spawn(&mut self, entity: EntityId, state: MotionState) {
        if self
            .entities
            .insert(
                entity,
                EntityRecord {
                    state,
                    last_processed_tick: None,
                },
            )
            .is_some()
        {
            tracing::warn!("entity {} re-spawned, history reset", entity);
        } else {
            tracing::info!("entity {} spawned", entity);
        }
    }

    /// Tears down an entity, e.g. when its owner disconnects.
    ///
    /// Returns true if the entity existed.
    pub fn despawn(&mut self, entity: EntityId) -> bool {
        let existed = self.entities.remove(&entity).is_some();
        if existed {
            tracing::info!("entity {} despawned", entity);
        }
        existed
    }

    /// Applies one command from an entity's owner.
    ///
    /// Stale and duplicate commands (tick at or before the last processed
    /// tick) are dropped silently and return `Ok(None)` with no state
    /// change. A fresh command is simulated and answered with the
    /// snapshot to broadcast.
    pub fn apply_command(
        &mut self,
        entity: EntityId,
        command: &InputCommand,
        resolver: &impl CollisionResolver,
    ) -> Result<Option<StateSnapshot>, NetcodeError> {
        let Some(record) = self.entities.get_mut(&entity) else {
            return Err(NetcodeError::UnknownEntity(entity));
        };

        if record
            .last_processed_tick
            .is_some_and(|last| command.tick <= last)
        {
            tracing::trace!("entity {}: dropped stale command for tick {}", entity, command.tick);
            self.stats.commands_dropped += 1;
            return Ok(None);
        }

        record.last_processed_tick = Some(command.tick);
        record.state = motor::step(&record.state, command, self.dt, resolver);
        self.stats.commands_processed += 1;

        Ok(Some(record.state.to_snapshot(command.tick)))
    }

    /// Runs one authority pass: drains the command queue and broadcasts a
    /// snapshot for every command that survived the tick guard.
    ///
    /// Commands for unknown entities are logged and skipped; they are the
    /// transport's race against despawn, not a fault. Only a dead snapshot
    /// queue is an error.
    pub fn process(
        &mut self,
        commands: &CommandReceiver,
        snapshots: &SnapshotSender,
        resolver: &impl CollisionResolver,
    ) -> Result<(), NetcodeError> {
        for message in commands.drain() {
            let snapshot = match self.apply_command(message.entity, &message.command, resolver) {
                Ok(Some(snapshot)) => snapshot,
                Ok(None) => continue,
                Err(NetcodeError::UnknownEntity(entity)) => {
                    tracing::warn!("dropping command for unknown entity {}", entity);
                    self.stats.commands_unroutable += 1;
                    continue;
                }
                Err(err) => return Err(err),
            };

            snapshots.send(AddressedSnapshot {
                entity: message.entity,
                snapshot,
            })?;
            self.stats.snapshots_emitted += 1;
        }
        Ok(())
    }

    /// Authoritative state of an entity, if registered.
    #[must_use]
    pub fn state_of(&self, entity: EntityId) -> Option<&MotionState> {
        self.entities.get(&entity).map(|record| &record.state)
    }

    /// Highest tick processed for an entity, if any.
    #[must_use]
    pub fn last_processed_tick(&self, entity: EntityId) -> Option<u32> {
        self.entities
            .get(&entity)
            .and_then(|record| record.last_processed_tick)
    }

    /// Number of registered entities.
    #[must_use]
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// Counters.
    #[inline]
    #[must_use]
    pub const fn stats(&self) -> &AuthorityStats {
        &self.stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::{command_channel, snapshot_channel, AddressedCommand};
    use slipstream_shared::math::Vec3;
    use slipstream_sim::GroundPlane;

    fn forward(tick: u32) -> InputCommand {
        let mut cmd = InputCommand::new(tick);
        cmd.vertical = 1.0;
        cmd
    }

    fn authority_with_entity() -> ServerAuthority {
        let mut authority = ServerAuthority::new(20);
        authority.spawn(EntityId(1), MotionState::at_pose(Vec3::ZERO, 0.0));
        authority
    }

    #[test]
    fn test_fresh_command_produces_snapshot() {
        let mut authority = authority_with_entity();
        let resolver = GroundPlane::default();

        let snapshot = authority
            .apply_command(EntityId(1), &forward(5), &resolver)
            .unwrap()
            .unwrap();

        assert_eq!(snapshot.tick, 5);
        assert!(snapshot.position.z > 0.0);
        assert_eq!(authority.last_processed_tick(EntityId(1)), Some(5));
    }

    #[test]
    fn test_duplicate_command_is_a_noop() {
        let mut authority = authority_with_entity();
        let resolver = GroundPlane::default();

        authority
            .apply_command(EntityId(1), &forward(5), &resolver)
            .unwrap();
        let state_after_first = *authority.state_of(EntityId(1)).unwrap();

        // Same tick again, and an older one
        assert!(authority
            .apply_command(EntityId(1), &forward(5), &resolver)
            .unwrap()
            .is_none());
        assert!(authority
            .apply_command(EntityId(1), &forward(3), &resolver)
            .unwrap()
            .is_none());

        assert_eq!(*authority.state_of(EntityId(1)).unwrap(), state_after_first);
        assert_eq!(authority.stats().commands_dropped, 2);
    }

    #[test]
    fn test_unknown_entity_is_an_error() {
        let mut authority = ServerAuthority::new(20);
        let result = authority.apply_command(EntityId(9), &forward(1), &GroundPlane::default());
        assert_eq!(result, Err(NetcodeError::UnknownEntity(EntityId(9))));
    }

    #[test]
    fn test_entities_are_independent() {
        let mut authority = authority_with_entity();
        authority.spawn(EntityId(2), MotionState::at_pose(Vec3::new(10.0, 0.0, 0.0), 0.0));
        let resolver = GroundPlane::default();

        // Entity 1 is at tick 50; entity 2 may still submit tick 1
        authority
            .apply_command(EntityId(1), &forward(50), &resolver)
            .unwrap();
        let snapshot = authority
            .apply_command(EntityId(2), &forward(1), &resolver)
            .unwrap();

        assert!(snapshot.is_some());
    }

    #[test]
    fn test_process_drains_and_broadcasts() {
        let mut authority = authority_with_entity();
        let (cmd_tx, cmd_rx) = command_channel(64);
        let (snap_tx, snap_rx) = snapshot_channel(64);
        let resolver = GroundPlane::default();

        for tick in 0..3 {
            cmd_tx
                .send(AddressedCommand {
                    entity: EntityId(1),
                    command: forward(tick),
                })
                .unwrap();
        }
        // A duplicate and an unroutable command ride along
        cmd_tx
            .send(AddressedCommand {
                entity: EntityId(1),
                command: forward(0),
            })
            .unwrap();
        cmd_tx
            .send(AddressedCommand {
                entity: EntityId(77),
                command: forward(9),
            })
            .unwrap();

        authority.process(&cmd_rx, &snap_tx, &resolver).unwrap();

        let snapshots = snap_rx.drain();
        assert_eq!(snapshots.len(), 3);
        assert_eq!(snapshots[2].snapshot.tick, 2);
        assert_eq!(authority.stats().commands_dropped, 1);
        assert_eq!(authority.stats().commands_unroutable, 1);
    }

    #[test]
    fn test_despawn_tears_down() {
        let mut authority = authority_with_entity();
        assert!(authority.despawn(EntityId(1)));
        assert!(!authority.despawn(EntityId(1)));
        assert_eq!(authority.entity_count(), 0);
    }
}
