// crates/glossa-broker/src/sender/log.rs
// ============================================================================
// Module: Glossa Log Sender
// Description: Log-only sender for audit-grade delivery records.
// Purpose: Persist one JSON line per delivery.
// Dependencies: glossa-core, serde, serde_json, std
// ============================================================================

//! ## Overview
//! `LogSender` writes a JSON record for each delivery and does not deliver
//! output anywhere else. Records carry the receipt, the receiver, and the
//! rendered output.
//! Invariants:
//! - A sequence number is issued only once its record has been written and
//!   flushed.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Write;
use std::sync::Mutex;

use glossa_core::MessageSender;
use glossa_core::SendError;
use serde::Serialize;

use crate::sender::DeliveryReceipt;
use crate::sender::ReceiptSequence;

// ============================================================================
// SECTION: Log Record
// ============================================================================

/// One JSON-lines record.
#[derive(Serialize)]
struct LogRecord<'a, R, O> {
    /// Receipt of the delivery.
    #[serde(flatten)]
    receipt: &'a DeliveryReceipt,
    /// Receiver of the message.
    receiver: &'a R,
    /// Rendered output.
    output: &'a O,
}

// ============================================================================
// SECTION: Log Sender
// ============================================================================

/// Log-only message sender.
pub struct LogSender<W: Write + Send> {
    /// Output writer for log records.
    writer: Mutex<W>,
    /// Receipt sequence.
    receipts: ReceiptSequence,
}

impl<W: Write + Send> LogSender<W> {
    /// Creates a log sender named `log`.
    pub fn new(writer: W) -> Self {
        Self::with_name(writer, "log")
    }

    /// Creates a log sender with a custom name.
    pub fn with_name(writer: W, name: impl Into<String>) -> Self {
        Self {
            writer: Mutex::new(writer),
            receipts: ReceiptSequence::new(name),
        }
    }

    /// Consumes the sender and returns the writer.
    ///
    /// # Errors
    ///
    /// Returns [`SendError::LogWriteFailed`] when the writer mutex is poisoned.
    pub fn into_inner(self) -> Result<W, SendError> {
        self.writer
            .into_inner()
            .map_err(|_| SendError::LogWriteFailed("log writer mutex poisoned".to_string()))
    }
}

impl<R, O, W> MessageSender<R, O> for LogSender<W>
where
    R: Serialize,
    O: Serialize,
    W: Write + Send,
{
    fn send(&self, receiver: &R, output: O) -> Result<(), SendError> {
        let mut guard = self
            .writer
            .lock()
            .map_err(|_| SendError::LogWriteFailed("log writer mutex poisoned".to_string()))?;
        let receipt = self.receipts.pending();
        let record = LogRecord {
            receipt: &receipt,
            receiver,
            output: &output,
        };
        let mut line =
            serde_json::to_vec(&record).map_err(|err| SendError::LogWriteFailed(err.to_string()))?;
        line.push(b'\n');
        guard.write_all(&line).map_err(|err| SendError::LogWriteFailed(err.to_string()))?;
        guard.flush().map_err(|err| SendError::LogWriteFailed(err.to_string()))?;
        self.receipts.commit(&receipt);
        drop(guard);
        Ok(())
    }
}
