//! Wire protocol types shared between owner, authority and observers.
//!
//! These types cross the network once per tick, so they are `Copy`,
//! fixed-size and `Pod` with explicit padding: a pre-allocated buffer can be
//! reinterpreted without a deserialization pass, and both sides can assert
//! the exact byte layout.

use crate::math::Vec3;
use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

/// Identity of a simulated entity within a session.
///
/// Assigned by the session glue when an entity is placed; the core never
/// allocates these itself.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityId(pub u32);

impl EntityId {
    /// Invalid/null entity ID.
    pub const NULL: Self = Self(u32::MAX);

    /// Returns true if this is the null ID.
    #[inline]
    #[must_use]
    pub const fn is_null(self) -> bool {
        self.0 == u32::MAX
    }
}

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One tick of owner input - owner -> authority.
///
/// Produced exactly once per tick by the command source and immutable
/// afterwards. Duplicates and reordering on the wire are tolerated by the
/// authority's tick guard, not by the transport.
///
/// Size: 20 bytes
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable, Serialize, Deserialize)]
pub struct InputCommand {
    /// Simulation tick this command is for.
    pub tick: u32,
    /// Sideways movement axis in `[-1, 1]`.
    pub horizontal: f32,
    /// Forward movement axis in `[-1, 1]`.
    pub vertical: f32,
    /// Yaw change applied this tick, in degrees.
    pub yaw_delta: f32,
    /// Jump held this tick (0 or 1).
    pub jump: u8,
    /// Padding for alignment.
    pub _pad: [u8; 3],
}

impl InputCommand {
    /// Size in bytes.
    pub const SIZE: usize = 20;

    /// Creates a neutral command for the given tick.
    #[inline]
    #[must_use]
    pub const fn new(tick: u32) -> Self {
        Self {
            tick,
            horizontal: 0.0,
            vertical: 0.0,
            yaw_delta: 0.0,
            jump: 0,
            _pad: [0; 3],
        }
    }

    /// Returns true if jump is held.
    #[inline]
    #[must_use]
    pub const fn is_jumping(&self) -> bool {
        self.jump != 0
    }

    /// Sets the jump flag.
    #[inline]
    pub fn set_jump(&mut self, jump: bool) {
        self.jump = u8::from(jump);
    }
}

/// Authoritative state for one entity at one tick - authority -> peers.
///
/// Ground truth for that tick. The owner reconciles against it; observers
/// interpolate toward it.
///
/// Size: 32 bytes
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable, Serialize, Deserialize)]
pub struct StateSnapshot {
    /// Simulation tick this snapshot represents.
    pub tick: u32,
    /// Authoritative position.
    pub position: Vec3,
    /// Authoritative velocity (y carries gravity/jump).
    pub velocity: Vec3,
    /// Authoritative yaw in degrees, normalized to `[0, 360)`.
    pub yaw: f32,
}

impl StateSnapshot {
    /// Size in bytes.
    pub const SIZE: usize = 32;

    /// Creates a snapshot from its parts.
    #[inline]
    #[must_use]
    pub const fn new(tick: u32, position: Vec3, velocity: Vec3, yaw: f32) -> Self {
        Self {
            tick,
            position,
            velocity,
            yaw,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_sizes() {
        // Fixed layouts both sides can assert
        assert_eq!(std::mem::size_of::<InputCommand>(), InputCommand::SIZE);
        assert_eq!(std::mem::size_of::<StateSnapshot>(), StateSnapshot::SIZE);
    }

    #[test]
    fn test_command_jump_flag() {
        let mut cmd = InputCommand::new(7);
        assert!(!cmd.is_jumping());
        cmd.set_jump(true);
        assert!(cmd.is_jumping());
        assert_eq!(cmd.tick, 7);
    }

    #[test]
    fn test_entity_id_null() {
        assert!(EntityId::NULL.is_null());
        assert!(!EntityId(0).is_null());
    }

    #[test]
    fn test_snapshot_bytemuck_roundtrip() {
        let snap = StateSnapshot::new(42, Vec3::new(1.0, 2.0, 3.0), Vec3::ZERO, 90.0);
        let bytes = bytemuck::bytes_of(&snap);
        let back: &StateSnapshot = bytemuck::from_bytes(bytes);
        assert_eq!(*back, snap);
    }
}
