// crates/glossa-core/src/capability.rs
// ============================================================================
// Module: Glossa Capability Detection
// Description: One-time selection of the default-body invocation strategy.
// Purpose: Run author-supplied default bodies without per-call branching.
// Dependencies: crate::{arguments, contract, dispatch}, tracing, std
// ============================================================================

//! ## Overview
//! Default-bodied contract methods are executed outside the message pipeline.
//! Two strategies exist: [`UnboundInvocation`] runs the body attached to the
//! called signature directly, and [`LookupInvocation`] rebuilds the lookup
//! from the declaring contract's own declarations. The host is probed once
//! per process for [`UNBOUND_INVOCATION_MARKER`]; the choice is frozen behind
//! [`selected_strategy`].
//! Invariants:
//! - Selection happens at most once per process and never changes afterwards.
//! - A missing marker is a normal negative answer, not an error.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::env;
use std::fmt;
use std::sync::OnceLock;

use crate::arguments::Argument;
use crate::arguments::Arguments;
use crate::contract::ContractType;
use crate::contract::MethodSignature;
use crate::dispatch::DispatchError;
use crate::dispatch::Proxied;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Marker reported by hosts that support direct, unbound body invocation.
pub const UNBOUND_INVOCATION_MARKER: &str = "glossa.invoke.unbound";
/// Environment variable that hides the unbound marker from [`HostSurface`].
pub const LEGACY_INVOCATION_ENV: &str = "GLOSSA_LEGACY_INVOCATION";

// ============================================================================
// SECTION: Runtime Surface
// ============================================================================

/// Runtime surface probed during capability detection.
pub trait RuntimeSurface {
    /// Returns true when the surface exposes `marker`.
    fn has_marker(&self, marker: &str) -> bool;
}

/// The hosting process.
#[derive(Debug, Default, Clone, Copy)]
pub struct HostSurface;

impl RuntimeSurface for HostSurface {
    fn has_marker(&self, marker: &str) -> bool {
        marker == UNBOUND_INVOCATION_MARKER && env::var_os(LEGACY_INVOCATION_ENV).is_none()
    }
}

// ============================================================================
// SECTION: Invocation Strategies
// ============================================================================

/// Identifies an invocation strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StrategyKind {
    /// Runs the body attached to the called signature.
    Unbound,
    /// Looks the body up through the declaring contract.
    Lookup,
}

impl StrategyKind {
    /// Returns a stable label for logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unbound => "unbound",
            Self::Lookup => "lookup",
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One default-body invocation request.
#[derive(Clone, Copy)]
pub struct DefaultCall<'a> {
    /// Contract declaring the method.
    pub contract: &'a ContractType,
    /// Called method.
    pub method: &'a MethodSignature,
    /// Proxy the method was called on.
    pub proxy: &'a dyn Proxied,
    /// Normalized call arguments.
    pub args: &'a Arguments,
}

/// Executes author-supplied default bodies.
pub trait InvocationStrategy: Send + Sync {
    /// Returns the strategy kind.
    fn kind(&self) -> StrategyKind;

    /// Invokes the body of `call.method` on `call.proxy` with `call.args`.
    ///
    /// # Errors
    ///
    /// Returns the body's own error unchanged, or
    /// [`DispatchError::DefaultBodyUnavailable`] when no body can be found.
    fn invoke(&self, call: DefaultCall<'_>) -> Result<Option<Argument>, DispatchError>;
}

/// Runs the body carried by the called signature, provided the contract
/// declares it.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnboundInvocation;

impl InvocationStrategy for UnboundInvocation {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Unbound
    }

    fn invoke(&self, call: DefaultCall<'_>) -> Result<Option<Argument>, DispatchError> {
        if !call.contract.declares(call.method) {
            return Err(unavailable(&call));
        }
        let body = call.method.default_body().ok_or_else(|| unavailable(&call))?;
        body(call.proxy, call.args)
    }
}

/// Rebuilds the body lookup from the declaring contract.
#[derive(Debug, Default, Clone, Copy)]
pub struct LookupInvocation;

impl InvocationStrategy for LookupInvocation {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Lookup
    }

    fn invoke(&self, call: DefaultCall<'_>) -> Result<Option<Argument>, DispatchError> {
        let body = call.contract.default_body_of(call.method).ok_or_else(|| unavailable(&call))?;
        body(call.proxy, call.args)
    }
}

/// Builds the error for a call whose body cannot be found.
fn unavailable(call: &DefaultCall<'_>) -> DispatchError {
    DispatchError::DefaultBodyUnavailable {
        contract: call.contract.name().to_string(),
        method: call.method.to_string(),
    }
}

// ============================================================================
// SECTION: Detection
// ============================================================================

/// Unbound strategy instance.
static UNBOUND: UnboundInvocation = UnboundInvocation;
/// Lookup strategy instance.
static LOOKUP: LookupInvocation = LookupInvocation;
/// Strategy selected for this process.
static SELECTED: OnceLock<&'static dyn InvocationStrategy> = OnceLock::new();

/// Chooses a strategy kind for `surface`.
#[must_use]
pub fn detect(surface: &dyn RuntimeSurface) -> StrategyKind {
    if surface.has_marker(UNBOUND_INVOCATION_MARKER) {
        StrategyKind::Unbound
    } else {
        StrategyKind::Lookup
    }
}

/// Returns the shared strategy instance for `kind`.
#[must_use]
pub fn strategy_for(kind: StrategyKind) -> &'static dyn InvocationStrategy {
    match kind {
        StrategyKind::Unbound => &UNBOUND,
        StrategyKind::Lookup => &LOOKUP,
    }
}

/// Returns the process-wide strategy, probing the host on first use.
pub fn selected_strategy() -> &'static dyn InvocationStrategy {
    *SELECTED.get_or_init(|| {
        let kind = detect(&HostSurface);
        tracing::debug!(strategy = kind.as_str(), "selected default-body invocation strategy");
        strategy_for(kind)
    })
}

/// Returns the kind of the process-wide strategy.
pub fn selected_kind() -> StrategyKind {
    selected_strategy().kind()
}

// ============================================================================
// SECTION: Tests
// ============================================================================
