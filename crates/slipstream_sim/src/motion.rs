//! Per-entity motion state.

use bytemuck::{Pod, Zeroable};
use slipstream_shared::math::Vec3;
use slipstream_shared::protocol::StateSnapshot;

/// Full simulated state of one entity.
///
/// Owned exclusively by the entity it describes and mutated only by
/// [`crate::motor::step`]. `Pod` so buffers of states can be pre-allocated
/// and copied without ceremony.
///
/// Size: 28 bytes
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct MotionState {
    /// World position.
    pub position: Vec3,
    /// Velocity in world units per second; y carries gravity and jumps.
    pub velocity: Vec3,
    /// Facing in degrees, normalized to `[0, 360)`.
    pub yaw: f32,
}

impl MotionState {
    /// Creates a state at rest from a placed pose.
    #[inline]
    #[must_use]
    pub const fn at_pose(position: Vec3, yaw: f32) -> Self {
        Self {
            position,
            velocity: Vec3::ZERO,
            yaw,
        }
    }

    /// Adopts an authoritative snapshot as the new state.
    #[inline]
    #[must_use]
    pub const fn from_snapshot(snapshot: &StateSnapshot) -> Self {
        Self {
            position: snapshot.position,
            velocity: snapshot.velocity,
            yaw: snapshot.yaw,
        }
    }

    /// Captures this state as the snapshot for the given tick.
    #[inline]
    #[must_use]
    pub const fn to_snapshot(&self, tick: u32) -> StateSnapshot {
        StateSnapshot::new(tick, self.position, self.velocity, self.yaw)
    }
}
