// crates/glossa-broker/src/strategy/mod.rs
// ============================================================================
// Module: Glossa Placeholder Resolution
// Description: Resolver traits and partial-resolution values.
// Purpose: Let typed resolvers turn call arguments into placeholder values.
// Dependencies: glossa-core
// ============================================================================

//! ## Overview
//! A [`PlaceholderResolver`] inspects one argument and either defers
//! (`Ok(None)`) or produces [`Resolutions`]: named entries that are either
//! final ([`Resolution::Conclusion`]) or must be resolved again
//! ([`Resolution::Continuance`]). [`StandardStrategy`] drives resolvers
//! until every entry concludes.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use glossa_core::Argument;
use glossa_core::DispatchContext;
use glossa_core::PlaceholderError;

// ============================================================================
// SECTION: Resolution Values
// ============================================================================

/// One resolved placeholder entry.
pub enum Resolution<F> {
    /// Final placeholder value.
    Conclusion(F),
    /// Intermediate value resolved again with its own type's resolvers.
    Continuance(Argument),
}

impl<F> Resolution<F> {
    /// Wraps `value` as a continuance.
    pub fn continuance<T: std::any::Any + Send + Sync>(value: T) -> Self {
        Self::Continuance(Argument::new(value))
    }
}

impl<F: fmt::Debug> fmt::Debug for Resolution<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Conclusion(value) => f.debug_tuple("Conclusion").field(value).finish(),
            Self::Continuance(arg) => f.debug_tuple("Continuance").field(arg).finish(),
        }
    }
}

/// Named entries produced by one resolver call, in production order.
pub type Resolutions<F> = Vec<(String, Resolution<F>)>;

// ============================================================================
// SECTION: Resolver Trait
// ============================================================================

/// Resolves one argument value into placeholder entries.
pub trait PlaceholderResolver<R, F>: Send + Sync {
    /// Resolves `value`, bound to placeholder `name`, for `receiver`.
    ///
    /// Returns `Ok(None)` to defer to the next resolver registered for the
    /// value's type.
    ///
    /// # Errors
    ///
    /// Returns [`PlaceholderError`] when the value cannot be resolved.
    fn resolve(
        &self,
        ctx: &DispatchContext<'_>,
        receiver: &R,
        name: &str,
        value: &Argument,
    ) -> Result<Option<Resolutions<F>>, PlaceholderError>;
}

// ============================================================================
// SECTION: Implementations
// ============================================================================

pub mod standard;

pub use standard::StandardStrategy;
