// crates/glossa-broker/src/locator.rs
// ============================================================================
// Module: Glossa Receiver Locators
// Description: Reference receiver locators.
// Purpose: Pick the receiver of a message from call arguments or a constant.
// Dependencies: glossa-core
// ============================================================================

//! ## Overview
//! [`ArgumentLocator`] takes the receiver from a fixed argument position;
//! [`FixedLocator`] always answers with the same receiver.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::any::Any;
use std::any::type_name;
use std::fmt;
use std::marker::PhantomData;

use glossa_core::Arguments;
use glossa_core::LocateError;
use glossa_core::MethodSignature;
use glossa_core::Proxied;
use glossa_core::ReceiverLocator;

// ============================================================================
// SECTION: Argument Locator
// ============================================================================

/// Locates the receiver at a fixed argument index.
///
/// # Invariants
/// - The argument at `index` must hold an `R`; it is cloned out.
pub struct ArgumentLocator<R> {
    /// Zero-based argument index.
    index: usize,
    /// Receiver type marker.
    receiver: PhantomData<fn() -> R>,
}

impl<R> ArgumentLocator<R> {
    /// Creates a locator reading argument `index`.
    #[must_use]
    pub const fn new(index: usize) -> Self {
        Self {
            index,
            receiver: PhantomData,
        }
    }

    /// Creates a locator reading the first argument.
    #[must_use]
    pub const fn first() -> Self {
        Self::new(0)
    }

    /// Returns the argument index.
    #[must_use]
    pub const fn index(&self) -> usize {
        self.index
    }
}

impl<R> Clone for ArgumentLocator<R> {
    fn clone(&self) -> Self {
        Self::new(self.index)
    }
}

impl<R> fmt::Debug for ArgumentLocator<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArgumentLocator")
            .field("index", &self.index)
            .field("receiver", &type_name::<R>())
            .finish()
    }
}

impl<R> ReceiverLocator<R> for ArgumentLocator<R>
where
    R: Any + Clone + Send + Sync,
{
    fn locate(
        &self,
        _method: &MethodSignature,
        _proxy: &dyn Proxied,
        args: &Arguments,
    ) -> Result<R, LocateError> {
        let arg = args.get(self.index).ok_or(LocateError::MissingArgument {
            index: self.index,
            len: args.len(),
        })?;
        arg.downcast_ref::<R>().cloned().ok_or_else(|| LocateError::TypeMismatch {
            index: self.index,
            expected: type_name::<R>(),
            actual: arg.type_name(),
        })
    }
}

// ============================================================================
// SECTION: Fixed Locator
// ============================================================================

/// Always locates the same receiver.
#[derive(Debug, Clone)]
pub struct FixedLocator<R>(pub R);

impl<R> ReceiverLocator<R> for FixedLocator<R>
where
    R: Clone + Send + Sync,
{
    fn locate(
        &self,
        _method: &MethodSignature,
        _proxy: &dyn Proxied,
        _args: &Arguments,
    ) -> Result<R, LocateError> {
        Ok(self.0.clone())
    }
}
