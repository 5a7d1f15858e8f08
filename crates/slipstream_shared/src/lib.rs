//! # SLIPSTREAM Shared
//!
//! Common types used by every participant in a session.
//!
//! ## CRITICAL RULE
//!
//! Owner, authority and observers must agree bit-for-bit on everything in
//! this crate. A mismatched tick rate or a reordered protocol field makes
//! predictions diverge permanently, so this crate must NEVER depend on:
//!
//! - the simulation loop
//! - the transport
//! - any platform service
//!
//! If you need one of those, you are in the wrong crate.

#![deny(missing_docs)]
#![deny(unsafe_code)]

pub mod config;
pub mod constants;
pub mod math;
pub mod protocol;

pub use config::{ConfigError, NetcodeConfig};
pub use constants::{
    CHANNEL_CAPACITY, INTERP_RATE, POSITION_TOLERANCE, PREDICTION_WINDOW, TICK_DURATION_SECS,
    TICK_RATE, YAW_TOLERANCE,
};
pub use math::Vec3;
pub use protocol::{EntityId, InputCommand, StateSnapshot};
