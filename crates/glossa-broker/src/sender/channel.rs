// crates/glossa-broker/src/sender/channel.rs
// ============================================================================
// Module: Glossa Channel Sender
// Description: Channel-based sender for asynchronous delivery.
// Purpose: Send rendered output through a Tokio mpsc channel.
// Dependencies: glossa-core, tokio
// ============================================================================

//! ## Overview
//! [`ChannelSender`] delivers output by enqueuing a [`Delivery`] into a
//! `tokio::sync::mpsc` channel without blocking.
//! Invariants:
//! - Successful deliveries enqueue exactly one [`Delivery`].
//! - A full or closed channel fails the call; nothing is buffered.

// ============================================================================
// SECTION: Imports
// ============================================================================

use glossa_core::MessageSender;
use glossa_core::SendError;
use tokio::sync::mpsc::Sender;

use crate::sender::Delivery;
use crate::sender::ReceiptSequence;

// ============================================================================
// SECTION: Channel Sender
// ============================================================================

/// Channel-based message sender.
#[derive(Debug)]
pub struct ChannelSender<R, O> {
    /// Channel the deliveries are sent into.
    sender: Sender<Delivery<R, O>>,
    /// Receipt sequence.
    receipts: ReceiptSequence,
}

impl<R, O> ChannelSender<R, O> {
    /// Creates a channel sender named `channel`.
    #[must_use]
    pub fn new(sender: Sender<Delivery<R, O>>) -> Self {
        Self::with_name(sender, "channel")
    }

    /// Creates a channel sender with a custom name.
    #[must_use]
    pub fn with_name(sender: Sender<Delivery<R, O>>, name: impl Into<String>) -> Self {
        Self {
            sender,
            receipts: ReceiptSequence::new(name),
        }
    }

    /// Returns the sender name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.receipts.sender()
    }
}

impl<R, O> MessageSender<R, O> for ChannelSender<R, O>
where
    R: Clone + Send + Sync,
    O: Send + Sync,
{
    fn send(&self, receiver: &R, output: O) -> Result<(), SendError> {
        let permit =
            self.sender.try_reserve().map_err(|err| SendError::DeliveryFailed(err.to_string()))?;
        permit.send(Delivery {
            receiver: receiver.clone(),
            output,
            receipt: self.receipts.next(),
        });
        Ok(())
    }
}
