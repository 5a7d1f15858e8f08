//! Typed message queues between roles.
//!
//! Commands and snapshots move between owner, authority and observers
//! through explicit queue pairs: a sender pushes, a receiver drains once
//! per simulation pass. The queues model an unreliable transport on
//! purpose: a full queue drops the message, and only a vanished far side
//! is reported as an error. The protocol tolerates the loss by design;
//! nothing here retries.

use crate::error::NetcodeError;
use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};
use slipstream_shared::protocol::{EntityId, InputCommand, StateSnapshot};

/// A command and the entity whose owner produced it.
#[derive(Clone, Copy, Debug)]
pub struct AddressedCommand {
    /// Entity the command steers.
    pub entity: EntityId,
    /// The command itself.
    pub command: InputCommand,
}

/// A snapshot and the entity it describes.
#[derive(Clone, Copy, Debug)]
pub struct AddressedSnapshot {
    /// Entity the snapshot describes.
    pub entity: EntityId,
    /// The snapshot itself.
    pub snapshot: StateSnapshot,
}

/// What happened to a sent message.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Delivery {
    /// Queued for the receiver.
    Delivered,
    /// Dropped because the queue was full. Not an error; the protocol
    /// treats it as transport loss.
    Dropped,
}

/// Sending half of a typed message queue.
///
/// Clone freely; every owner holds its own handle to the shared queue.
#[derive(Clone)]
pub struct MessageSender<T> {
    sender: Sender<T>,
}

impl<T> MessageSender<T> {
    /// Queues a message without blocking.
    ///
    /// A full queue drops the message and reports [`Delivery::Dropped`];
    /// a disconnected receiver is a dead transport and returns
    /// [`NetcodeError::ChannelClosed`].
    pub fn send(&self, message: T) -> Result<Delivery, NetcodeError> {
        match self.sender.try_send(message) {
            Ok(()) => Ok(Delivery::Delivered),
            Err(TrySendError::Full(_)) => {
                tracing::debug!("message queue full, dropping");
                Ok(Delivery::Dropped)
            }
            Err(TrySendError::Disconnected(_)) => Err(NetcodeError::ChannelClosed),
        }
    }
}

/// Receiving half of a typed message queue.
pub struct MessageReceiver<T> {
    receiver: Receiver<T>,
}

impl<T> MessageReceiver<T> {
    /// Drains everything currently queued, in arrival order.
    ///
    /// Called exactly once per simulation pass; messages arriving during
    /// the drain are picked up next pass.
    #[must_use]
    pub fn drain(&self) -> Vec<T> {
        self.receiver.try_iter().collect()
    }

    /// Number of messages currently queued.
    #[must_use]
    pub fn queued(&self) -> usize {
        self.receiver.len()
    }
}

/// Creates a bounded typed queue pair.
#[must_use]
pub fn message_channel<T>(capacity: usize) -> (MessageSender<T>, MessageReceiver<T>) {
    let (sender, receiver) = bounded(capacity.max(1));
    (MessageSender { sender }, MessageReceiver { receiver })
}

/// Sender for the owner -> authority command path.
pub type CommandSender = MessageSender<AddressedCommand>;
/// Receiver for the owner -> authority command path.
pub type CommandReceiver = MessageReceiver<AddressedCommand>;
/// Sender for the authority -> peers snapshot path.
pub type SnapshotSender = MessageSender<AddressedSnapshot>;
/// Receiver for the authority -> peers snapshot path.
pub type SnapshotReceiver = MessageReceiver<AddressedSnapshot>;

/// Creates the owner -> authority command queue.
#[must_use]
pub fn command_channel(capacity: usize) -> (CommandSender, CommandReceiver) {
    message_channel(capacity)
}

/// Creates the authority -> peers snapshot queue.
#[must_use]
pub fn snapshot_channel(capacity: usize) -> (SnapshotSender, SnapshotReceiver) {
    message_channel(capacity)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_send_and_drain() {
        let (tx, rx) = message_channel::<u32>(8);

        assert_eq!(tx.send(1).unwrap(), Delivery::Delivered);
        assert_eq!(tx.send(2).unwrap(), Delivery::Delivered);

        assert_eq!(rx.drain(), vec![1, 2]);
        assert!(rx.drain().is_empty());
    }

    #[test]
    fn test_full_queue_drops() {
        let (tx, rx) = message_channel::<u32>(1);

        assert_eq!(tx.send(1).unwrap(), Delivery::Delivered);
        assert_eq!(tx.send(2).unwrap(), Delivery::Dropped);

        assert_eq!(rx.drain(), vec![1]);
    }

    #[test]
    fn test_disconnected_receiver_is_an_error() {
        let (tx, rx) = message_channel::<u32>(4);
        drop(rx);

        assert_eq!(tx.send(1), Err(NetcodeError::ChannelClosed));
    }
}
