// crates/glossa-core/src/dispatch/proxy.rs
// ============================================================================
// Module: Glossa Contract Proxy
// Description: Per-call routing point for every contract method.
// Purpose: Intercept identity calls, delegate default bodies, and run the
//          localization pipeline.
// Dependencies: crate::{arguments, capability, contract, interfaces}
// ============================================================================

//! ## Overview
//! [`ContractProxy::invoke`] is the single entry point for calls on a
//! contract. Resolution order, first match wins:
//! 1. intrinsic identity calls (`eq`, `hash`, `to_string`),
//! 2. argument normalization,
//! 3. default-body delegation,
//! 4. the controller escape hatch,
//! 5. binding lookup and the five-stage pipeline.
//!
//! Side effects are limited to the sender call of unit-returning methods.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::any::Any;
use std::fmt;
use std::hash::Hash;
use std::hash::Hasher;

use crate::arguments::Argument;
use crate::arguments::Arguments;
use crate::capability::DefaultCall;
use crate::contract::ContractType;
use crate::contract::MethodSignature;
use crate::contract::ReturnKind;
use crate::dispatch::ControllerId;
use crate::dispatch::DispatchError;
use crate::dispatch::Localizer;
use crate::dispatch::intrinsic;
use crate::dispatch::intrinsic::Intrinsic;
use crate::interfaces::DispatchContext;

// ============================================================================
// SECTION: Outcome
// ============================================================================

/// Result of one dispatched call.
pub enum Outcome<R, I, O, F> {
    /// Unit-returning call; output was handed to the sender.
    Unit,
    /// Rendered output returned to the caller.
    Rendered(O),
    /// Answer to an identity-equality call.
    Bool(bool),
    /// Answer to a hash-code call.
    Hash(u64),
    /// Answer to a string-representation call.
    Text(String),
    /// The controller, returned by the escape-hatch accessor.
    Controller(Localizer<R, I, O, F>),
    /// Verbatim result of a default body.
    Value(Option<Argument>),
}

impl<R, I, O, F> Outcome<R, I, O, F> {
    /// Returns the rendered output, if the call produced one.
    #[must_use]
    pub fn into_rendered(self) -> Option<O> {
        match self {
            Self::Rendered(output) => Some(output),
            _ => None,
        }
    }

    /// Returns the default-body result, if the call was delegated.
    #[must_use]
    pub fn into_value(self) -> Option<Argument> {
        match self {
            Self::Value(value) => value,
            _ => None,
        }
    }

    /// Returns the controller, if the escape hatch was called.
    #[must_use]
    pub fn into_controller(self) -> Option<Localizer<R, I, O, F>> {
        match self {
            Self::Controller(localizer) => Some(localizer),
            _ => None,
        }
    }

    /// Returns true for unit-returning calls.
    #[must_use]
    pub const fn is_unit(&self) -> bool {
        matches!(self, Self::Unit)
    }
}

impl<R, I, O: fmt::Debug, F> fmt::Debug for Outcome<R, I, O, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unit => f.write_str("Unit"),
            Self::Rendered(output) => f.debug_tuple("Rendered").field(output).finish(),
            Self::Bool(value) => f.debug_tuple("Bool").field(value).finish(),
            Self::Hash(value) => f.debug_tuple("Hash").field(value).finish(),
            Self::Text(value) => f.debug_tuple("Text").field(value).finish(),
            Self::Controller(localizer) => f.debug_tuple("Controller").field(localizer).finish(),
            Self::Value(value) => f.debug_tuple("Value").field(value).finish(),
        }
    }
}

// ============================================================================
// SECTION: Proxied View
// ============================================================================

/// Type-erased view of a proxy, handed to locators and default bodies.
pub trait Proxied: Send + Sync {
    /// Returns the proxied contract.
    fn contract(&self) -> &ContractType;

    /// Returns the controller identifier.
    fn controller_id(&self) -> ControllerId;

    /// Dispatches a call and erases the outcome into an optional argument.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError`] exactly as [`ContractProxy::invoke`] does.
    fn invoke_dyn(
        &self,
        method: &MethodSignature,
        args: Option<Arguments>,
    ) -> Result<Option<Argument>, DispatchError>;

    /// Returns the proxy as [`Any`] for downcasting.
    fn as_any(&self) -> &dyn Any;
}

// ============================================================================
// SECTION: Contract Proxy
// ============================================================================

/// Proxy presenting a contract's method surface.
///
/// Equality, hashing, and display follow controller identity: proxies over
/// the same [`Localizer`] are equal and hash identically.
pub struct ContractProxy<R, I, O, F> {
    /// Controller handling every call.
    localizer: Localizer<R, I, O, F>,
}

impl<R, I, O, F> ContractProxy<R, I, O, F> {
    /// Creates a proxy over `localizer`.
    pub(crate) const fn new(localizer: Localizer<R, I, O, F>) -> Self {
        Self {
            localizer,
        }
    }

    /// Returns the controller.
    #[must_use]
    pub const fn localizer(&self) -> &Localizer<R, I, O, F> {
        &self.localizer
    }

    /// Returns the controller hash.
    #[must_use]
    pub fn hash_code(&self) -> u64 {
        self.localizer.hash_code()
    }

    /// Returns `<contract>@<hash>`.
    #[must_use]
    pub fn describe(&self) -> String {
        intrinsic::describe(self.localizer.contract().name(), self.hash_code())
    }
}

impl<R, I, O, F> ContractProxy<R, I, O, F>
where
    R: Send + Sync + 'static,
    I: Send + Sync + 'static,
    O: Send + Sync + 'static,
    F: Send + Sync + 'static,
{
    /// Dispatches a call on `method`.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::MissingMapping`] when an ordinary method has
    /// no binding, [`DispatchError::UnknownMethod`] when a default-bodied
    /// method is not declared by the contract, and passes collaborator and default-body failures through
    /// unchanged.
    pub fn invoke(
        &self,
        method: &MethodSignature,
        args: Option<Arguments>,
    ) -> Result<Outcome<R, I, O, F>, DispatchError> {
        if let Some(call) = Intrinsic::classify(method) {
            return Ok(self.answer_intrinsic(call, args.as_ref()));
        }
        let args = Arguments::normalize(args);
        let inner = &self.localizer.inner;
        if method.is_default() {
            if !inner.contract.declares(method) {
                return Err(DispatchError::UnknownMethod {
                    contract: inner.contract.name().to_string(),
                    method: method.to_string(),
                });
            }
            let value = inner.invocation.invoke(DefaultCall {
                contract: &inner.contract,
                method,
                proxy: self,
                args: &args,
            })?;
            return Ok(Outcome::Value(value));
        }
        if *method.returns() == ReturnKind::Controller {
            return Ok(Outcome::Controller(self.localizer.clone()));
        }
        let Some(binding) = inner.mappings.get(method) else {
            return Err(DispatchError::MissingMapping {
                contract: inner.contract.name().to_string(),
                method: method.to_string(),
            });
        };

        let receiver = binding.locator().locate(method, self, &args)?;
        let message = inner.source.message_of(&receiver, binding.key())?;
        let ctx = DispatchContext {
            contract: &inner.contract,
            method,
            controller: inner.id,
        };
        let placeholders =
            inner.strategy.resolve_placeholders(&ctx, &receiver, &message, binding, &args)?;
        let output =
            inner.renderer.render(&receiver, &message, &placeholders, method, &inner.contract)?;

        if *method.returns() == ReturnKind::Unit {
            inner.sender.send(&receiver, output)?;
            Ok(Outcome::Unit)
        } else {
            Ok(Outcome::Rendered(output))
        }
    }

    /// Dispatches a call on the first contract method named `name`.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::UnknownMethod`] when the contract declares no
    /// such method, otherwise as [`ContractProxy::invoke`].
    pub fn call(
        &self,
        name: &str,
        args: Option<Arguments>,
    ) -> Result<Outcome<R, I, O, F>, DispatchError> {
        let contract = self.localizer.contract();
        let method = contract.method(name).ok_or_else(|| DispatchError::UnknownMethod {
            contract: contract.name().to_string(),
            method: name.to_string(),
        })?;
        self.invoke(method, args)
    }

    /// Answers an intrinsic call from controller identity.
    fn answer_intrinsic(&self, call: Intrinsic, args: Option<&Arguments>) -> Outcome<R, I, O, F> {
        match call {
            Intrinsic::Eq => {
                let other = args.and_then(|args| args.get(0));
                Outcome::Bool(other.is_some_and(|other| self.is_same_controller(other)))
            }
            Intrinsic::Hash => Outcome::Hash(self.hash_code()),
            Intrinsic::ToString => Outcome::Text(self.describe()),
        }
    }

    /// Returns true when `other` is a proxy or localizer over this controller.
    fn is_same_controller(&self, other: &Argument) -> bool {
        if let Some(proxy) = other.downcast_ref::<Self>() {
            return self.localizer.same_controller(&proxy.localizer);
        }
        other
            .downcast_ref::<Localizer<R, I, O, F>>()
            .is_some_and(|localizer| self.localizer.same_controller(localizer))
    }
}

impl<R, I, O, F> Clone for ContractProxy<R, I, O, F> {
    fn clone(&self) -> Self {
        Self {
            localizer: self.localizer.clone(),
        }
    }
}

impl<R, I, O, F> PartialEq for ContractProxy<R, I, O, F> {
    fn eq(&self, other: &Self) -> bool {
        self.localizer.same_controller(&other.localizer)
    }
}

impl<R, I, O, F> Eq for ContractProxy<R, I, O, F> {}

impl<R, I, O, F> Hash for ContractProxy<R, I, O, F> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.hash_code());
    }
}

impl<R, I, O, F> fmt::Display for ContractProxy<R, I, O, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe())
    }
}

impl<R, I, O, F> fmt::Debug for ContractProxy<R, I, O, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContractProxy")
            .field("contract", &self.localizer.contract().name())
            .field("controller", &self.localizer.id())
            .finish()
    }
}

impl<R, I, O, F> Proxied for ContractProxy<R, I, O, F>
where
    R: Send + Sync + 'static,
    I: Send + Sync + 'static,
    O: Send + Sync + 'static,
    F: Send + Sync + 'static,
{
    fn contract(&self) -> &ContractType {
        self.localizer.contract()
    }

    fn controller_id(&self) -> ControllerId {
        self.localizer.id()
    }

    fn invoke_dyn(
        &self,
        method: &MethodSignature,
        args: Option<Arguments>,
    ) -> Result<Option<Argument>, DispatchError> {
        let value = match self.invoke(method, args)? {
            Outcome::Unit => None,
            Outcome::Rendered(output) => Some(Argument::new(output)),
            Outcome::Bool(value) => Some(Argument::new(value)),
            Outcome::Hash(value) => Some(Argument::new(value)),
            Outcome::Text(value) => Some(Argument::new(value)),
            Outcome::Controller(localizer) => Some(Argument::new(localizer)),
            Outcome::Value(value) => value,
        };
        Ok(value)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
