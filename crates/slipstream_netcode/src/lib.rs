//! # SLIPSTREAM Netcode
//!
//! Client-side prediction with server reconciliation for tick-based
//! movement.
//!
//! ## Architecture
//!
//! ```text
//! OWNER                          AUTHORITY                    OBSERVER
//!   |                                |                           |
//!   |-- InputCommand (per tick) --->|                            |
//!   |   predict locally             | dedupe by tick             |
//!   |   log pre-step state          | simulate                   |
//!   |                               |                            |
//!   |<---- StateSnapshot -----------|------- StateSnapshot ----->|
//!   |   confirm or rewind+replay    |              interpolate   |
//! ```
//!
//! The owner simulates every tick immediately and never waits for the
//! server. The authority is the single source of truth: it drops stale and
//! duplicate commands by tick number, simulates the rest, and broadcasts a
//! snapshot per processed tick. When a snapshot disagrees with what the
//! owner predicted for that tick beyond tolerance, the owner adopts it and
//! replays its buffered commands to get back to the present.
//!
//! ## Reliability Model
//!
//! Transport is unreliable and unordered by assumption. Ordering comes from
//! explicit tick numbers plus the authority's last-processed-tick guard;
//! loss degrades to "skip or resync", never to an error. Nothing in the
//! per-tick path blocks, panics or allocates beyond the fixed windows.

#![deny(missing_docs)]
#![deny(unsafe_code)]

pub mod buffer;
pub mod channel;
pub mod clock;
pub mod error;
pub mod interpolation;
pub mod prediction;
pub mod reconcile;
pub mod server;
pub mod simulation;

// Re-exports for convenience
pub use buffer::{InputBuffer, PredictionLog, TickWindow};
pub use channel::{
    command_channel, snapshot_channel, AddressedCommand, AddressedSnapshot, CommandReceiver,
    CommandSender, Delivery, MessageReceiver, MessageSender, SnapshotReceiver, SnapshotSender,
};
pub use clock::{TickClock, TickContext};
pub use error::NetcodeError;
pub use interpolation::{Pose, RemoteInterpolator};
pub use prediction::{CommandSource, PredictionEngine, PredictionStats};
pub use reconcile::{ReconcileOutcome, ReconcileStats, Reconciler};
pub use server::{AuthorityStats, ServerAuthority};
pub use simulation::{LinkStats, LossyLink, NetworkConditions};
