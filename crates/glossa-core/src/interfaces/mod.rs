// crates/glossa-core/src/interfaces/mod.rs
// ============================================================================
// Module: Glossa Interfaces
// Description: Collaborator interfaces driven by the dispatch pipeline.
// Purpose: Define the contract surfaces for locating, fetching, resolving,
//          rendering, and sending messages.
// Dependencies: crate::{arguments, binding, contract, dispatch}, thiserror
// ============================================================================

//! ## Overview
//! Interfaces define how Glossa drives pluggable collaborators without
//! embedding storage, formatting, or delivery details. The dispatch pipeline
//! invokes them in a fixed order:
//! [`ReceiverLocator`] → [`MessageSource`] → [`PlaceholderStrategy`] →
//! [`MessageRenderer`] → [`MessageSender`].
//! Invariants:
//! - Implementations must tolerate concurrent invocation.
//! - Failures are returned to the caller unchanged; the pipeline never retries.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::collections::btree_map;

use thiserror::Error;

use crate::arguments::Arguments;
use crate::binding::MessageBinding;
use crate::binding::MessageKey;
use crate::contract::ContractType;
use crate::contract::MethodSignature;
use crate::dispatch::ControllerId;
use crate::dispatch::Proxied;

// ============================================================================
// SECTION: Receiver Locator
// ============================================================================

/// Receiver locator errors.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Error)]
pub enum LocateError {
    /// The call has fewer arguments than the locator expects.
    #[error("receiver argument {index} missing (call has {len} arguments)")]
    MissingArgument {
        /// Expected argument index.
        index: usize,
        /// Number of arguments in the call.
        len: usize,
    },
    /// The argument exists but has the wrong type.
    #[error("receiver argument {index} has type {actual}, expected {expected}")]
    TypeMismatch {
        /// Argument index.
        index: usize,
        /// Expected type name.
        expected: &'static str,
        /// Actual type name.
        actual: &'static str,
    },
    /// No receiver could be derived for the call.
    #[error("no receiver derivable: {0}")]
    Unavailable(String),
}

/// Resolves the receiver a message concerns.
pub trait ReceiverLocator<R>: Send + Sync {
    /// Resolves a receiver from the called method, proxy, and arguments.
    ///
    /// # Errors
    ///
    /// Returns [`LocateError`] when no receiver can be derived.
    fn locate(
        &self,
        method: &MethodSignature,
        proxy: &dyn Proxied,
        args: &Arguments,
    ) -> Result<R, LocateError>;
}

// ============================================================================
// SECTION: Message Source
// ============================================================================

/// Message source errors.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Error)]
pub enum SourceError {
    /// No message exists for the key in the receiver's scope.
    #[error("message {key} not found for {scope}")]
    MissingKey {
        /// Requested message key.
        key: String,
        /// Lookup scope (for example a locale).
        scope: String,
    },
    /// Source storage could not be read.
    #[error("message source io error: {0}")]
    Io(String),
    /// Source content could not be parsed.
    #[error("message source parse error: {0}")]
    Parse(String),
    /// Source content violates a source invariant.
    #[error("invalid message source: {0}")]
    Invalid(String),
}

/// Fetches raw, unrendered messages.
pub trait MessageSource<R, I>: Send + Sync {
    /// Fetches the intermediate message for `key` as seen by `receiver`.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] when the key cannot be resolved.
    fn message_of(&self, receiver: &R, key: &MessageKey) -> Result<I, SourceError>;
}

// ============================================================================
// SECTION: Placeholder Strategy
// ============================================================================

/// Dispatcher context handed to placeholder strategies.
#[derive(Debug, Clone, Copy)]
pub struct DispatchContext<'a> {
    /// Contract being proxied.
    pub contract: &'a ContractType,
    /// Method being dispatched.
    pub method: &'a MethodSignature,
    /// Controller handling the call.
    pub controller: ControllerId,
}

/// Placeholder resolution errors.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Error)]
pub enum PlaceholderError {
    /// The bound parameter is missing from the call.
    #[error("placeholder {placeholder} refers to missing argument {index}")]
    MissingArgument {
        /// Placeholder name.
        placeholder: String,
        /// Parameter index.
        index: usize,
    },
    /// No resolver accepts the value type.
    #[error("no placeholder resolver for {placeholder} of type {type_name}")]
    NoResolver {
        /// Placeholder name.
        placeholder: String,
        /// Value type name.
        type_name: &'static str,
    },
    /// Two resolvers produced the same key under a rejecting policy.
    #[error("placeholder {placeholder} resolved more than once")]
    Collision {
        /// Placeholder name.
        placeholder: String,
    },
    /// A continuance chain exceeded the configured depth.
    #[error("placeholder {placeholder} exceeded resolution depth {max_depth}")]
    DepthExceeded {
        /// Placeholder name.
        placeholder: String,
        /// Maximum depth.
        max_depth: usize,
    },
    /// A resolver reported a failure.
    #[error("placeholder resolver failed: {0}")]
    Resolver(String),
}

/// Finalized placeholder values keyed by placeholder name.
///
/// # Invariants
/// - Keys are unique; iteration is ordered by key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPlaceholders<F>(BTreeMap<String, F>);

impl<F> ResolvedPlaceholders<F> {
    /// Creates an empty mapping.
    #[must_use]
    pub const fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Inserts a value, returning the value previously stored under `name`.
    pub fn insert(&mut self, name: impl Into<String>, value: F) -> Option<F> {
        self.0.insert(name.into(), value)
    }

    /// Returns the value for `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&F> {
        self.0.get(name)
    }

    /// Returns true when `name` is present.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    /// Returns the number of placeholders.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true when no placeholders were resolved.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over placeholders in key order.
    pub fn iter(&self) -> btree_map::Iter<'_, String, F> {
        self.0.iter()
    }

    /// Returns the underlying map.
    #[must_use]
    pub fn into_inner(self) -> BTreeMap<String, F> {
        self.0
    }
}

impl<F> Default for ResolvedPlaceholders<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F> FromIterator<(String, F)> for ResolvedPlaceholders<F> {
    fn from_iter<T: IntoIterator<Item = (String, F)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a, F> IntoIterator for &'a ResolvedPlaceholders<F> {
    type Item = (&'a String, &'a F);
    type IntoIter = btree_map::Iter<'a, String, F>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Aggregates placeholder resolvers into one key-unique mapping.
///
/// Collision handling between contributing resolvers is defined by each
/// implementation, not by the dispatcher.
pub trait PlaceholderStrategy<R, I, F>: Send + Sync {
    /// Resolves the placeholders of one call.
    ///
    /// # Errors
    ///
    /// Returns [`PlaceholderError`] when a placeholder cannot be resolved.
    fn resolve_placeholders(
        &self,
        ctx: &DispatchContext<'_>,
        receiver: &R,
        message: &I,
        binding: &MessageBinding<R>,
        args: &Arguments,
    ) -> Result<ResolvedPlaceholders<F>, PlaceholderError>;
}

// ============================================================================
// SECTION: Message Renderer
// ============================================================================

/// Rendering errors.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The message references a placeholder that was not resolved.
    #[error("message references unknown placeholder {0}")]
    UnknownPlaceholder(String),
    /// The message contains an unbalanced brace.
    #[error("unbalanced brace at byte {0}")]
    UnbalancedBrace(usize),
    /// Renderer reported a failure.
    #[error("render failed: {0}")]
    Failed(String),
}

/// Renders intermediate messages into final output.
///
/// Implementations must be deterministic for identical inputs.
pub trait MessageRenderer<R, I, O, F>: Send + Sync {
    /// Renders `message` for `receiver` with resolved placeholders.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError`] when rendering fails.
    fn render(
        &self,
        receiver: &R,
        message: &I,
        placeholders: &ResolvedPlaceholders<F>,
        method: &MethodSignature,
        contract: &ContractType,
    ) -> Result<O, RenderError>;
}

// ============================================================================
// SECTION: Message Sender
// ============================================================================

/// Sender errors.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Error)]
pub enum SendError {
    /// Delivery failed.
    #[error("message delivery failed: {0}")]
    DeliveryFailed(String),
    /// Log sender failed to write.
    #[error("log write failed: {0}")]
    LogWriteFailed(String),
}

/// Delivers rendered output to a receiver.
pub trait MessageSender<R, O>: Send + Sync {
    /// Delivers `output` to `receiver`, taking ownership of the output.
    ///
    /// # Errors
    ///
    /// Returns [`SendError`] when delivery fails.
    fn send(&self, receiver: &R, output: O) -> Result<(), SendError>;
}
