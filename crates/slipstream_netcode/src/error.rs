//! Error types for the netcode seams.
//!
//! The per-tick simulation path never returns errors: stale commands,
//! unknown snapshot ticks and replay gaps all degrade to a skip or a
//! resync. What remains are the two genuine failure surfaces, entity
//! registration and channel lifetime, and those return [`NetcodeError`].

use slipstream_shared::protocol::EntityId;
use thiserror::Error;

/// Failures at the edges of the netcode.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum NetcodeError {
    /// A command referenced an entity the authority has never spawned or
    /// has already torn down.
    #[error("entity {0} is not registered with the authority")]
    UnknownEntity(EntityId),

    /// The other side of a message channel is gone. Treated as a
    /// disconnect; the caller should tear down the affected entity's
    /// buffers.
    #[error("message channel disconnected")]
    ChannelClosed,
}
