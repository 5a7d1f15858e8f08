//! # Remote Entity Interpolation
//!
//! Observers never re-simulate an entity they do not own. Each incoming
//! snapshot becomes the interpolation target, and every render frame the
//! displayed pose glides toward it with exponential smoothing. Corrections
//! arrive as new targets; there is no rollback and no command buffering on
//! this path.

use slipstream_shared::config::NetcodeConfig;
use slipstream_shared::math::{lerp_angle, Vec3};
use slipstream_shared::protocol::StateSnapshot;

/// A renderable pose: where an entity appears, not where physics says it
/// is.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pose {
    /// Displayed position.
    pub position: Vec3,
    /// Displayed yaw in degrees.
    pub yaw: f32,
}

impl Pose {
    /// Creates a pose from its parts.
    #[inline]
    #[must_use]
    pub const fn new(position: Vec3, yaw: f32) -> Self {
        Self { position, yaw }
    }
}

/// Observer-side smoothing toward the latest authoritative snapshot.
pub struct RemoteInterpolator {
    /// Pose currently shown on screen.
    displayed: Pose,
    /// Pose we are gliding toward.
    target: Pose,
    /// Smoothing rate per second; higher is snappier.
    rate: f32,
    /// Tick of the newest snapshot accepted.
    latest_tick: Option<u32>,
}

impl RemoteInterpolator {
    /// Creates an interpolator at the entity's placed pose.
    #[must_use]
    pub const fn new(initial: Pose, rate: f32) -> Self {
        Self {
            displayed: initial,
            target: initial,
            rate,
            latest_tick: None,
        }
    }

    /// Creates an interpolator tuned from a config.
    #[must_use]
    pub fn from_config(initial: Pose, config: &NetcodeConfig) -> Self {
        Self::new(initial, config.interp_rate)
    }

    /// Accepts a snapshot as the new target.
    ///
    /// Reordered stragglers (tick at or before the newest accepted) are
    /// ignored; the transport promises nothing about ordering.
    pub fn push_snapshot(&mut self, snapshot: &StateSnapshot) {
        if self.latest_tick.is_some_and(|latest| snapshot.tick <= latest) {
            return;
        }
        self.latest_tick = Some(snapshot.tick);
        self.target = Pose::new(snapshot.position, snapshot.yaw);
    }

    /// Advances the displayed pose by one render frame and returns it.
    ///
    /// Position moves by `rate * frame_dt` of the remaining distance;
    /// yaw takes the shortest angular path at the same rate.
    pub fn update(&mut self, frame_dt: f32) -> Pose {
        let t = (self.rate * frame_dt).clamp(0.0, 1.0);
        self.displayed.position = self.displayed.position.lerp(self.target.position, t);
        self.displayed.yaw = lerp_angle(self.displayed.yaw, self.target.yaw, t);
        self.displayed
    }

    /// Teleports the displayed pose, e.g. on (re)spawn.
    pub fn snap_to(&mut self, pose: Pose) {
        self.displayed = pose;
        self.target = pose;
    }

    /// Pose currently shown.
    #[inline]
    #[must_use]
    pub const fn displayed(&self) -> &Pose {
        &self.displayed
    }

    /// Pose being approached.
    #[inline]
    #[must_use]
    pub const fn target(&self) -> &Pose {
        &self.target
    }
}
