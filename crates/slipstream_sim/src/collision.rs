//! Collision resolution seam.
//!
//! The motion core never computes collision response itself. It composes a
//! desired displacement and hands it to a [`CollisionResolver`], which
//! returns the position the entity actually ends up at (sliding, blocking
//! and ground contact are the resolver's business). The embedding engine
//! implements this trait against its real collision world; this crate ships
//! only the two resolvers the core and its tests need.

use crate::motion::MotionState;
use slipstream_shared::math::Vec3;

/// Opaque collision service consulted once per simulation step.
///
/// Implementations must be deterministic for identical inputs; both sides
/// of the protocol step through the same resolver logic, and a resolver
/// that answers differently on owner and authority shows up as permanent
/// reconciliation churn.
pub trait CollisionResolver {
    /// Moves from `from` by `delta`, returning the resulting position.
    fn resolve_move(&self, from: Vec3, delta: Vec3) -> Vec3;

    /// Reports whether the entity is standing on ground.
    fn is_grounded(&self, state: &MotionState) -> bool;
}

/// Resolver that applies every displacement verbatim.
///
/// The grounded report is fixed at construction.
#[derive(Clone, Copy, Debug)]
pub struct Passthrough {
    /// Grounded report returned for every query.
    pub grounded: bool,
}

impl Passthrough {
    /// Creates a passthrough resolver with a fixed grounded report.
    #[must_use]
    pub const fn new(grounded: bool) -> Self {
        Self { grounded }
    }
}

impl CollisionResolver for Passthrough {
    fn resolve_move(&self, from: Vec3, delta: Vec3) -> Vec3 {
        from + delta
    }

    fn is_grounded(&self, _state: &MotionState) -> bool {
        self.grounded
    }
}

/// Distance above the floor within which an entity still counts as grounded.
const GROUND_SKIN: f32 = 1e-3;

/// Infinite flat floor at a fixed height.
#[derive(Clone, Copy, Debug)]
pub struct GroundPlane {
    /// Height of the floor surface.
    pub height: f32,
}

impl GroundPlane {
    /// Creates a floor at the given height.
    #[must_use]
    pub const fn new(height: f32) -> Self {
        Self { height }
    }
}

impl Default for GroundPlane {
    fn default() -> Self {
        Self::new(0.0)
    }
}

impl CollisionResolver for GroundPlane {
    fn resolve_move(&self, from: Vec3, delta: Vec3) -> Vec3 {
        let mut next = from + delta;
        if next.y < self.height {
            next.y = self.height;
        }
        next
    }

    fn is_grounded(&self, state: &MotionState) -> bool {
        state.position.y <= self.height + GROUND_SKIN
    }
}
