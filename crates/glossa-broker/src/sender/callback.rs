// crates/glossa-broker/src/sender/callback.rs
// ============================================================================
// Module: Glossa Callback Sender
// Description: Callback-based sender for synchronous delivery.
// Purpose: Invoke a user-provided function with rendered output.
// Dependencies: glossa-core, std
// ============================================================================

//! ## Overview
//! [`CallbackSender`] delivers output by invoking a user-supplied function.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::sync::Arc;

use glossa_core::MessageSender;
use glossa_core::SendError;

// ============================================================================
// SECTION: Callback Sender
// ============================================================================

/// Callback handler signature used by the sender.
type CallbackHandler<R, O> = dyn Fn(&R, O) -> Result<(), SendError> + Send + Sync;

/// Callback-based message sender.
pub struct CallbackSender<R, O> {
    /// Handler invoked with the receiver and output.
    handler: Arc<CallbackHandler<R, O>>,
}

impl<R, O> CallbackSender<R, O> {
    /// Creates a callback sender from a handler function.
    pub fn new<H>(handler: H) -> Self
    where
        H: Fn(&R, O) -> Result<(), SendError> + Send + Sync + 'static,
    {
        Self {
            handler: Arc::new(handler),
        }
    }
}

impl<R, O> Clone for CallbackSender<R, O> {
    fn clone(&self) -> Self {
        Self {
            handler: Arc::clone(&self.handler),
        }
    }
}

impl<R, O> fmt::Debug for CallbackSender<R, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallbackSender").finish_non_exhaustive()
    }
}

impl<R, O> MessageSender<R, O> for CallbackSender<R, O> {
    fn send(&self, receiver: &R, output: O) -> Result<(), SendError> {
        (self.handler)(receiver, output)
    }
}
