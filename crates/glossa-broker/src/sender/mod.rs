// crates/glossa-broker/src/sender/mod.rs
// ============================================================================
// Module: Glossa Broker Senders
// Description: Reference message senders and delivery receipts.
// Purpose: Deliver rendered output to receivers.
// Dependencies: glossa-core, serde, std
// ============================================================================

//! ## Overview
//! Senders take rendered output for unit-returning contract methods and hand
//! it to a delivery target: a closure, a Tokio channel, or a JSON-lines log.
//! Invariants:
//! - Receipts are issued only for deliveries that were accepted.
//! - Delivery failures surface as [`glossa_core::SendError`] without retries.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;

use serde::Serialize;

// ============================================================================
// SECTION: Delivery Records
// ============================================================================

/// Receipt identifying one accepted delivery.
///
/// # Invariants
/// - `sequence` is 1-based and strictly increasing per sender.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct DeliveryReceipt {
    /// `<sender>-<sequence>` identifier.
    pub delivery_id: String,
    /// Sender name embedded in the identifier.
    pub sender: String,
    /// Per-sender sequence number.
    pub sequence: u64,
}

/// Delivery emitted by channel-based senders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivery<R, O> {
    /// Receiver of the message.
    pub receiver: R,
    /// Rendered output.
    pub output: O,
    /// Delivery receipt.
    pub receipt: DeliveryReceipt,
}

// ============================================================================
// SECTION: Receipt Helpers
// ============================================================================

/// Issues sequential delivery receipts.
#[derive(Debug)]
pub(crate) struct ReceiptSequence {
    /// Sender name embedded in receipts.
    sender: String,
    /// Last issued sequence number.
    counter: AtomicU64,
}

impl ReceiptSequence {
    /// Creates a sequence for `sender`.
    pub(crate) fn new(sender: impl Into<String>) -> Self {
        Self {
            sender: sender.into(),
            counter: AtomicU64::new(0),
        }
    }

    /// Returns the sender name.
    pub(crate) fn sender(&self) -> &str {
        &self.sender
    }

    /// Issues the next receipt.
    pub(crate) fn next(&self) -> DeliveryReceipt {
        self.receipt(self.counter.fetch_add(1, Ordering::Relaxed) + 1)
    }

    /// Returns the receipt the next delivery would get, without issuing it.
    ///
    /// Callers must serialize `pending`/`commit` pairs themselves.
    pub(crate) fn pending(&self) -> DeliveryReceipt {
        self.receipt(self.counter.load(Ordering::Relaxed) + 1)
    }

    /// Marks `receipt` as issued.
    pub(crate) fn commit(&self, receipt: &DeliveryReceipt) {
        self.counter.store(receipt.sequence, Ordering::Relaxed);
    }

    /// Builds the receipt for `sequence`.
    fn receipt(&self, sequence: u64) -> DeliveryReceipt {
        DeliveryReceipt {
            delivery_id: format!("{}-{sequence}", self.sender),
            sender: self.sender.clone(),
            sequence,
        }
    }
}

// ============================================================================
// SECTION: Implementations
// ============================================================================

pub mod callback;
pub mod channel;
pub mod log;

pub use callback::CallbackSender;
pub use channel::ChannelSender;
pub use log::LogSender;
