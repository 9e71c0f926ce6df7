// crates/glossa-core/src/dispatch/mod.rs
// ============================================================================
// Module: Glossa Dispatch Controller
// Description: Localizer construction and dispatch error types.
// Purpose: Own the collaborators and selected strategy behind every proxy.
// Dependencies: crate::{binding, capability, contract, interfaces}, thiserror, tracing
// ============================================================================

//! ## Overview
//! A [`Localizer`] is the dispatch controller: it owns the contract, the
//! mapping table, the collaborators, and the default-body invocation
//! strategy selected at construction. Proxies created by
//! [`Localizer::proxy`] route every call through it.
//! Invariants:
//! - Construction completes capability detection before any dispatch.
//! - The controller holds no mutable state; concurrent calls need no locks.
//! - Each localizer has a process-unique [`ControllerId`].

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::error::Error as StdError;
use std::fmt;
use std::num::NonZeroU64;
use std::sync::Arc;
use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;

use thiserror::Error;

use crate::binding::MappingTable;
use crate::capability;
use crate::capability::InvocationStrategy;
use crate::capability::StrategyKind;
use crate::contract::ContractType;
use crate::interfaces::LocateError;
use crate::interfaces::MessageRenderer;
use crate::interfaces::MessageSender;
use crate::interfaces::MessageSource;
use crate::interfaces::PlaceholderError;
use crate::interfaces::PlaceholderStrategy;
use crate::interfaces::RenderError;
use crate::interfaces::SendError;
use crate::interfaces::SourceError;

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod intrinsic;
mod proxy;

pub use proxy::ContractProxy;
pub use proxy::Outcome;
pub use proxy::Proxied;

// ============================================================================
// SECTION: Controller Identity
// ============================================================================

/// Next controller identifier.
static NEXT_CONTROLLER_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique localizer identifier.
///
/// # Invariants
/// - Always >= 1 (non-zero, 1-based).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ControllerId(NonZeroU64);

impl ControllerId {
    /// Allocates the next identifier.
    fn next() -> Self {
        let raw = NEXT_CONTROLLER_ID.fetch_add(1, Ordering::Relaxed);
        Self(NonZeroU64::new(raw).unwrap_or(NonZeroU64::MIN))
    }

    /// Returns the raw identifier value (always >= 1).
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0.get()
    }
}

impl fmt::Display for ControllerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.get().fmt(f)
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors surfaced by a dispatched call.
///
/// Collaborator and body failures pass through unchanged.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// An ordinary method has no binding; the mapping table is inconsistent.
    #[error("missing message mapping for {method} on contract {contract}")]
    MissingMapping {
        /// Contract name.
        contract: String,
        /// Rendered method signature.
        method: String,
    },
    /// A call named a method the contract does not declare.
    #[error("contract {contract} does not declare method {method}")]
    UnknownMethod {
        /// Contract name.
        contract: String,
        /// Requested method name.
        method: String,
    },
    /// No default body could be found for a default-bodied method.
    #[error("default body unavailable for {method} on contract {contract}")]
    DefaultBodyUnavailable {
        /// Contract name.
        contract: String,
        /// Rendered method signature.
        method: String,
    },
    /// Receiver locator failure.
    #[error(transparent)]
    Locate(#[from] LocateError),
    /// Message source failure.
    #[error(transparent)]
    Source(#[from] SourceError),
    /// Placeholder strategy failure.
    #[error(transparent)]
    Placeholder(#[from] PlaceholderError),
    /// Renderer failure.
    #[error(transparent)]
    Render(#[from] RenderError),
    /// Sender failure.
    #[error(transparent)]
    Send(#[from] SendError),
    /// Failure raised by an author-supplied default body.
    #[error(transparent)]
    Body(Box<dyn StdError + Send + Sync>),
}

impl DispatchError {
    /// Wraps a failure raised inside a default body.
    pub fn body(error: impl Into<Box<dyn StdError + Send + Sync>>) -> Self {
        Self::Body(error.into())
    }
}

/// Errors raised while building a [`Localizer`].
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Error)]
pub enum BuildError {
    /// No mapping table was supplied.
    #[error("localizer mapping table is not configured")]
    MissingMappings,
    /// No message source was supplied.
    #[error("localizer message source is not configured")]
    MissingSource,
    /// No placeholder strategy was supplied.
    #[error("localizer placeholder strategy is not configured")]
    MissingStrategy,
    /// No renderer was supplied.
    #[error("localizer renderer is not configured")]
    MissingRenderer,
    /// No sender was supplied.
    #[error("localizer sender is not configured")]
    MissingSender,
    /// The mapping table was built for another contract.
    #[error("mapping table targets contract {actual}, expected {expected}")]
    ContractMismatch {
        /// Contract of the localizer.
        expected: String,
        /// Contract of the mapping table.
        actual: String,
    },
}

// ============================================================================
// SECTION: Localizer
// ============================================================================

/// Shared localizer state.
struct LocalizerInner<R, I, O, F> {
    /// Controller identifier.
    id: ControllerId,
    /// Contract being proxied.
    contract: Arc<ContractType>,
    /// Method bindings.
    mappings: MappingTable<R>,
    /// Message source.
    source: Arc<dyn MessageSource<R, I>>,
    /// Placeholder strategy.
    strategy: Arc<dyn PlaceholderStrategy<R, I, F>>,
    /// Message renderer.
    renderer: Arc<dyn MessageRenderer<R, I, O, F>>,
    /// Message sender.
    sender: Arc<dyn MessageSender<R, O>>,
    /// Default-body invocation strategy selected at construction.
    invocation: &'static dyn InvocationStrategy,
}

/// Dispatch controller for one contract.
///
/// Cloning is cheap and preserves controller identity.
///
/// # Type Parameters
/// - `R`: receiver type.
/// - `I`: intermediate (unrendered) message type.
/// - `O`: rendered output type.
/// - `F`: finalized placeholder type.
pub struct Localizer<R, I, O, F> {
    /// Shared state.
    inner: Arc<LocalizerInner<R, I, O, F>>,
}

impl<R, I, O, F> Clone for Localizer<R, I, O, F> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<R, I, O, F> Localizer<R, I, O, F> {
    /// Returns a builder for a localizer over `contract`.
    #[must_use]
    pub fn builder(contract: Arc<ContractType>) -> LocalizerBuilder<R, I, O, F> {
        LocalizerBuilder {
            contract,
            mappings: None,
            source: None,
            strategy: None,
            renderer: None,
            sender: None,
        }
    }

    /// Returns the controller identifier.
    #[must_use]
    pub fn id(&self) -> ControllerId {
        self.inner.id
    }

    /// Returns the proxied contract.
    #[must_use]
    pub fn contract(&self) -> &Arc<ContractType> {
        &self.inner.contract
    }

    /// Returns the mapping table.
    #[must_use]
    pub fn mappings(&self) -> &MappingTable<R> {
        &self.inner.mappings
    }

    /// Returns the kind of default-body invocation strategy in use.
    #[must_use]
    pub fn invocation_kind(&self) -> StrategyKind {
        self.inner.invocation.kind()
    }

    /// Returns true when both handles refer to the same controller.
    #[must_use]
    pub fn same_controller(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Returns the controller hash shared by every proxy over it.
    #[must_use]
    pub fn hash_code(&self) -> u64 {
        self.inner.id.get()
    }

    /// Creates a new proxy routed through this controller.
    #[must_use]
    pub fn proxy(&self) -> ContractProxy<R, I, O, F> {
        ContractProxy::new(self.clone())
    }
}

impl<R, I, O, F> fmt::Debug for Localizer<R, I, O, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Localizer")
            .field("id", &self.inner.id)
            .field("contract", &self.inner.contract.name())
            .field("invocation", &self.inner.invocation.kind())
            .finish_non_exhaustive()
    }
}

/// Builder for [`Localizer`].
///
/// # Invariants
/// - `build` succeeds only when every collaborator and the mapping table are set.
pub struct LocalizerBuilder<R, I, O, F> {
    /// Contract being proxied.
    contract: Arc<ContractType>,
    /// Method bindings.
    mappings: Option<MappingTable<R>>,
    /// Message source.
    source: Option<Arc<dyn MessageSource<R, I>>>,
    /// Placeholder strategy.
    strategy: Option<Arc<dyn PlaceholderStrategy<R, I, F>>>,
    /// Message renderer.
    renderer: Option<Arc<dyn MessageRenderer<R, I, O, F>>>,
    /// Message sender.
    sender: Option<Arc<dyn MessageSender<R, O>>>,
}

impl<R, I, O, F> LocalizerBuilder<R, I, O, F> {
    /// Sets the mapping table.
    #[must_use]
    pub fn mappings(mut self, mappings: MappingTable<R>) -> Self {
        self.mappings = Some(mappings);
        self
    }

    /// Sets the message source.
    #[must_use]
    pub fn source(mut self, source: impl MessageSource<R, I> + 'static) -> Self {
        self.source = Some(Arc::new(source));
        self
    }

    /// Sets the placeholder strategy.
    #[must_use]
    pub fn strategy(mut self, strategy: impl PlaceholderStrategy<R, I, F> + 'static) -> Self {
        self.strategy = Some(Arc::new(strategy));
        self
    }

    /// Sets the renderer.
    #[must_use]
    pub fn renderer(mut self, renderer: impl MessageRenderer<R, I, O, F> + 'static) -> Self {
        self.renderer = Some(Arc::new(renderer));
        self
    }

    /// Sets the sender.
    #[must_use]
    pub fn sender(mut self, sender: impl MessageSender<R, O> + 'static) -> Self {
        self.sender = Some(Arc::new(sender));
        self
    }

    /// Sets a shared sender.
    #[must_use]
    pub fn shared_sender(mut self, sender: Arc<dyn MessageSender<R, O>>) -> Self {
        self.sender = Some(sender);
        self
    }

    /// Builds the localizer, selecting the default-body invocation strategy
    /// for the process if it has not been selected yet.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError`] when a collaborator is missing or the mapping
    /// table targets another contract.
    pub fn build(self) -> Result<Localizer<R, I, O, F>, BuildError> {
        let mappings = self.mappings.ok_or(BuildError::MissingMappings)?;
        if !Arc::ptr_eq(mappings.contract(), &self.contract) {
            return Err(BuildError::ContractMismatch {
                expected: self.contract.name().to_string(),
                actual: mappings.contract().name().to_string(),
            });
        }
        let source = self.source.ok_or(BuildError::MissingSource)?;
        let strategy = self.strategy.ok_or(BuildError::MissingStrategy)?;
        let renderer = self.renderer.ok_or(BuildError::MissingRenderer)?;
        let sender = self.sender.ok_or(BuildError::MissingSender)?;
        let inner = LocalizerInner {
            id: ControllerId::next(),
            contract: self.contract,
            mappings,
            source,
            strategy,
            renderer,
            sender,
            invocation: capability::selected_strategy(),
        };
        tracing::debug!(
            contract = inner.contract.name(),
            controller = inner.id.get(),
            bindings = inner.mappings.len(),
            invocation = inner.invocation.kind().as_str(),
            "built localizer"
        );
        Ok(Localizer {
            inner: Arc::new(inner),
        })
    }
}
