// crates/glossa-core/src/contract.rs
// ============================================================================
// Module: Glossa Contract Model
// Description: Declared method contracts and their method signatures.
// Purpose: Describe the method surface a proxy presents to callers.
// Dependencies: thiserror, std
// ============================================================================

//! ## Overview
//! A [`ContractType`] is the declared method surface being proxied. Each
//! method is described by a [`MethodSignature`]: its name, parameter types,
//! return kind, and optionally a default body written by the contract author.
//! Contracts always expose the intrinsic identity methods (`eq`, `hash`,
//! `to_string`) in addition to the declared methods.
//! Invariants:
//! - A contract never declares two methods with the same name and parameters.
//! - Method identity ignores the default body; two signatures are equal when
//!   contract, name, parameters, and return kind match.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::hash::Hash;
use std::hash::Hasher;
use std::sync::Arc;

use thiserror::Error;

use crate::arguments::Argument;
use crate::arguments::Arguments;
use crate::dispatch::DispatchError;
use crate::dispatch::Proxied;
use crate::dispatch::intrinsic::Intrinsic;

// ============================================================================
// SECTION: Signature Parts
// ============================================================================

/// Body supplied by the contract author for a default method.
///
/// The body receives the proxy it was invoked on, so it may call back into
/// other contract methods through [`Proxied::invoke_dyn`].
pub type DefaultBody =
    dyn Fn(&dyn Proxied, &Arguments) -> Result<Option<Argument>, DispatchError> + Send + Sync;

/// Parameter type label of a contract method.
///
/// # Invariants
/// - Opaque UTF-8 label; compared verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ParamType(String);

impl ParamType {
    /// Creates a parameter type from a label.
    #[must_use]
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    /// Creates a parameter type labelled with the Rust type name of `T`.
    #[must_use]
    pub fn of<T: ?Sized>() -> Self {
        Self(std::any::type_name::<T>().to_string())
    }

    /// Returns the label as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Declared return kind of a contract method.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ReturnKind {
    /// Returns nothing; rendered output is delivered to the sender.
    Unit,
    /// Returns a boolean.
    Bool,
    /// Returns an integer.
    Integer,
    /// Returns text.
    Text,
    /// Returns the localizer controlling the proxy.
    Controller,
    /// Returns the rendered output to the caller.
    Output,
    /// Returns a value of the labelled type (default-bodied methods only).
    Value(String),
}

impl fmt::Display for ReturnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unit => f.write_str("()"),
            Self::Bool => f.write_str("bool"),
            Self::Integer => f.write_str("integer"),
            Self::Text => f.write_str("text"),
            Self::Controller => f.write_str("localizer"),
            Self::Output => f.write_str("output"),
            Self::Value(label) => f.write_str(label),
        }
    }
}

// ============================================================================
// SECTION: Method Signature
// ============================================================================

/// Signature of one contract method.
///
/// # Invariants
/// - `contract` is empty until the signature is added to a [`ContractType`].
/// - Equality and hashing ignore `default_body`.
#[derive(Clone)]
pub struct MethodSignature {
    /// Name of the declaring contract.
    contract: Arc<str>,
    /// Method name.
    name: String,
    /// Parameter types in declaration order.
    params: Vec<ParamType>,
    /// Declared return kind.
    returns: ReturnKind,
    /// Author-supplied body, when the method is default-bodied.
    default_body: Option<Arc<DefaultBody>>,
}

impl MethodSignature {
    /// Creates a signature without parameters.
    #[must_use]
    pub fn new(name: impl Into<String>, returns: ReturnKind) -> Self {
        Self {
            contract: Arc::from(""),
            name: name.into(),
            params: Vec::new(),
            returns,
            default_body: None,
        }
    }

    /// Appends a parameter.
    #[must_use]
    pub fn param(mut self, param: ParamType) -> Self {
        self.params.push(param);
        self
    }

    /// Appends a parameter labelled with the Rust type name of `T`.
    #[must_use]
    pub fn param_of<T: ?Sized>(self) -> Self {
        self.param(ParamType::of::<T>())
    }

    /// Attaches a default body written by the contract author.
    #[must_use]
    pub fn with_default<B>(mut self, body: B) -> Self
    where
        B: Fn(&dyn Proxied, &Arguments) -> Result<Option<Argument>, DispatchError>
            + Send
            + Sync
            + 'static,
    {
        self.default_body = Some(Arc::new(body));
        self
    }

    /// Returns the declaring contract name.
    #[must_use]
    pub fn contract(&self) -> &str {
        &self.contract
    }

    /// Returns the method name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the parameter types.
    #[must_use]
    pub fn params(&self) -> &[ParamType] {
        &self.params
    }

    /// Returns the number of parameters.
    #[must_use]
    pub fn arity(&self) -> usize {
        self.params.len()
    }

    /// Returns the declared return kind.
    #[must_use]
    pub const fn returns(&self) -> &ReturnKind {
        &self.returns
    }

    /// Returns true when the contract author supplied a body.
    #[must_use]
    pub const fn is_default(&self) -> bool {
        self.default_body.is_some()
    }

    /// Returns the author-supplied body attached to this signature.
    #[must_use]
    pub fn default_body(&self) -> Option<&Arc<DefaultBody>> {
        self.default_body.as_ref()
    }

    /// Returns true when the method never routes through a message binding.
    #[must_use]
    pub fn is_unbindable(&self) -> bool {
        Intrinsic::classify(self).is_some()
            || self.is_default()
            || self.returns == ReturnKind::Controller
    }

    /// Returns true when name and parameter types match.
    fn same_shape(&self, other: &Self) -> bool {
        self.name == other.name && self.params == other.params
    }
}

impl PartialEq for MethodSignature {
    fn eq(&self, other: &Self) -> bool {
        self.contract == other.contract
            && self.name == other.name
            && self.params == other.params
            && self.returns == other.returns
    }
}

impl Eq for MethodSignature {}

impl Hash for MethodSignature {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.contract.hash(state);
        self.name.hash(state);
        self.params.hash(state);
        self.returns.hash(state);
    }
}

impl fmt::Debug for MethodSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodSignature")
            .field("contract", &self.contract)
            .field("name", &self.name)
            .field("params", &self.params)
            .field("returns", &self.returns)
            .field("default", &self.is_default())
            .finish()
    }
}

impl fmt::Display for MethodSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.contract.is_empty() {
            write!(f, "{}::", self.contract)?;
        }
        write!(f, "{}(", self.name)?;
        for (index, param) in self.params.iter().enumerate() {
            if index > 0 {
                f.write_str(", ")?;
            }
            param.fmt(f)?;
        }
        write!(f, ") -> {}", self.returns)
    }
}

// ============================================================================
// SECTION: Contract Errors
// ============================================================================

/// Errors raised while declaring a contract.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Error)]
pub enum ContractError {
    /// Contract name was empty.
    #[error("contract name must be non-empty")]
    EmptyName,
    /// Method name was empty.
    #[error("method name must be non-empty on contract {0}")]
    EmptyMethodName(String),
    /// Two methods share a name and parameter list.
    #[error("duplicate method {method} on contract {contract}")]
    DuplicateMethod {
        /// Contract name.
        contract: String,
        /// Rendered method signature.
        method: String,
    },
}

// ============================================================================
// SECTION: Contract Type
// ============================================================================

/// Declared method contract being proxied.
///
/// # Invariants
/// - Immutable after [`ContractTypeBuilder::build`].
/// - Method shapes (name + parameters) are unique.
#[derive(Debug)]
pub struct ContractType {
    /// Contract name.
    name: String,
    /// Declared and intrinsic methods in declaration order.
    methods: Vec<MethodSignature>,
}

impl ContractType {
    /// Returns a builder for a contract named `name`.
    #[must_use]
    pub fn builder(name: impl Into<String>) -> ContractTypeBuilder {
        ContractTypeBuilder {
            name: name.into(),
            methods: Vec::new(),
        }
    }

    /// Returns the contract name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns every method, intrinsic methods included.
    #[must_use]
    pub fn methods(&self) -> &[MethodSignature] {
        &self.methods
    }

    /// Returns the first method named `name`.
    #[must_use]
    pub fn method(&self, name: &str) -> Option<&MethodSignature> {
        self.methods.iter().find(|method| method.name == name)
    }

    /// Returns the method named `name` with exactly the given parameters.
    #[must_use]
    pub fn method_with(&self, name: &str, params: &[ParamType]) -> Option<&MethodSignature> {
        self.methods.iter().find(|method| method.name == name && method.params == params)
    }

    /// Returns true when `method` is declared on this contract.
    #[must_use]
    pub fn declares(&self, method: &MethodSignature) -> bool {
        self.methods.iter().any(|candidate| candidate == method)
    }

    /// Looks up the author-supplied body for `method` from this contract's
    /// own declarations.
    #[must_use]
    pub fn default_body_of(&self, method: &MethodSignature) -> Option<&Arc<DefaultBody>> {
        self.methods
            .iter()
            .find(|candidate| *candidate == method)
            .and_then(MethodSignature::default_body)
    }
}

/// Builder for [`ContractType`].
pub struct ContractTypeBuilder {
    /// Contract name.
    name: String,
    /// Declared methods.
    methods: Vec<MethodSignature>,
}

impl ContractTypeBuilder {
    /// Declares a method.
    #[must_use]
    pub fn method(mut self, method: MethodSignature) -> Self {
        self.methods.push(method);
        self
    }

    /// Builds the contract, adding intrinsic identity methods the author did
    /// not declare.
    ///
    /// # Errors
    ///
    /// Returns [`ContractError`] when names are empty or methods collide.
    pub fn build(self) -> Result<Arc<ContractType>, ContractError> {
        if self.name.trim().is_empty() {
            return Err(ContractError::EmptyName);
        }
        let contract: Arc<str> = Arc::from(self.name.as_str());
        let mut methods: Vec<MethodSignature> = Vec::with_capacity(self.methods.len() + 3);
        for mut method in self.methods {
            if method.name.trim().is_empty() {
                return Err(ContractError::EmptyMethodName(self.name));
            }
            method.contract = Arc::clone(&contract);
            if methods.iter().any(|existing| existing.same_shape(&method)) {
                return Err(ContractError::DuplicateMethod {
                    contract: self.name,
                    method: method.to_string(),
                });
            }
            methods.push(method);
        }
        for mut intrinsic in Intrinsic::signatures() {
            if methods.iter().any(|existing| existing.same_shape(&intrinsic)) {
                continue;
            }
            intrinsic.contract = Arc::clone(&contract);
            methods.push(intrinsic);
        }
        Ok(Arc::new(ContractType {
            name: self.name,
            methods,
        }))
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
