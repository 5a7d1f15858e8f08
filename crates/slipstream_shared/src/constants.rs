//! # Session Constants
//!
//! Default tuning for a session. Runtime overrides go through
//! [`crate::config::NetcodeConfig`]; these are the values it starts from.
//!
//! **CRITICAL:** the tick rate must be identical on every machine in a
//! session. The dedupe and reconciliation protocol orders itself by tick
//! numbers, and a rate mismatch makes every prediction permanently wrong.

/// Simulation tick rate (ticks per second) shared by all participants.
pub const TICK_RATE: u32 = 20;

/// Fixed tick duration in seconds at [`TICK_RATE`].
pub const TICK_DURATION_SECS: f32 = 1.0 / TICK_RATE as f32;

/// Number of ticks retained in the owner's input and prediction windows.
///
/// Bounds memory under sustained packet loss: the oldest unacknowledged
/// entry is overwritten once the window wraps.
pub const PREDICTION_WINDOW: usize = 64;

/// Positional divergence tolerance in meters before a rewind is forced.
pub const POSITION_TOLERANCE: f32 = 0.15;

/// Yaw divergence tolerance in degrees before a rewind is forced.
pub const YAW_TOLERANCE: f32 = 3.0;

/// Exponential smoothing rate (per second) for observer-side interpolation.
///
/// Higher is snappier.
pub const INTERP_RATE: f32 = 12.0;

/// Bounded capacity of the command and snapshot queues.
pub const CHANNEL_CAPACITY: usize = 256;
