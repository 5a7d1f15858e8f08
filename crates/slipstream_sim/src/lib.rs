//! # SLIPSTREAM Sim
//!
//! The deterministic motion core: a pure per-tick step function over an
//! entity's [`MotionState`], with collision response delegated to an opaque
//! [`CollisionResolver`].
//!
//! ## Determinism Contract
//!
//! [`motor::step`] is a pure function. Given identical state, command, dt
//! and collision outcomes it returns bit-identical results across repeated
//! calls and across machines. It holds no hidden state and knows nothing
//! about networking; the owner predicts with it and the authority simulates
//! with it, and reconciliation only works because both run the same bits.

#![deny(missing_docs)]
#![deny(unsafe_code)]

pub mod collision;
pub mod motion;
pub mod motor;

pub use collision::{CollisionResolver, GroundPlane, Passthrough};
pub use motion::MotionState;
