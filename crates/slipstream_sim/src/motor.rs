//! The deterministic per-tick motion step.
//!
//! One call advances one entity by one tick. The same function runs on the
//! owner (prediction and replay) and on the authority, so every constant
//! here is part of the protocol: change one and every machine must change
//! with it.

use crate::collision::CollisionResolver;
use crate::motion::MotionState;
use slipstream_shared::math::{normalize_yaw, yaw_basis, Vec3};
use slipstream_shared::protocol::InputCommand;

/// Maximum planar speed in world units per second.
pub const MOVE_SPEED: f32 = 6.0;

/// Vertical acceleration in world units per second squared.
pub const GRAVITY: f32 = -9.81;

/// Vertical velocity set when a grounded entity jumps.
pub const JUMP_VELOCITY: f32 = 5.8;

/// Exponential damping coefficient applied to velocity each step.
pub const FRICTION: f32 = 10.0;

/// Floor for vertical velocity while grounded; keeps the entity pressed to
/// the ground without accumulating fall speed.
pub const GROUND_STICK: f32 = -2.0;

/// Advances `state` by one tick under `command`.
///
/// Pure: the returned state depends only on the arguments and the
/// resolver's answers. The grounded query uses the pre-step state; the move
/// query is the single delegated side effect.
#[must_use]
pub fn step(
    state: &MotionState,
    command: &InputCommand,
    dt: f32,
    resolver: &impl CollisionResolver,
) -> MotionState {
    let mut next = *state;

    // Rotate yaw only; pitch and roll do not exist in this protocol.
    next.yaw = normalize_yaw(next.yaw + command.yaw_delta);
    let (forward, right) = yaw_basis(next.yaw);

    // Desired planar velocity, clamped to unit wish direction
    let mut wish = right * command.horizontal + forward * command.vertical;
    if wish.length_squared() > 1.0 {
        wish = wish.normalized();
    }
    let planar = wish * MOVE_SPEED;

    // Gravity, then the grounded clamp and jump
    next.velocity.y += GRAVITY * dt;
    if resolver.is_grounded(state) {
        next.velocity.y = next.velocity.y.max(GROUND_STICK);
        if command.is_jumping() {
            next.velocity.y = JUMP_VELOCITY;
        }
    }

    // Compose the step displacement and let the resolver place us
    let delta = Vec3::new(planar.x, next.velocity.y, planar.z) * dt;
    next.position = resolver.resolve_move(next.position, delta);

    // Light damping for stability
    let damping = (1.0 - FRICTION * dt).clamp(0.0, 1.0);
    next.velocity = next.velocity * damping;

    next
}
