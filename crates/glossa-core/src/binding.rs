// crates/glossa-core/src/binding.rs
// ============================================================================
// Module: Glossa Message Bindings
// Description: Method-to-message bindings and the read-only mapping table.
// Purpose: Associate each ordinary contract method with its message key.
// Dependencies: thiserror, std
// ============================================================================

//! ## Overview
//! A [`MessageBinding`] ties one contract method to a [`MessageKey`], the
//! [`ReceiverLocator`] that finds the receiver, and the placeholder names
//! bound to method parameters. The [`MappingTable`] is built once by
//! [`MappingTableBuilder`] and is read-only afterwards.
//! Invariants:
//! - Every ordinary method of the contract has exactly one binding.
//! - Intrinsic, default-bodied, and controller-returning methods are never bound.
//! - Placeholder names are unique per binding and point at existing parameters.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use thiserror::Error;

use crate::contract::ContractType;
use crate::contract::MethodSignature;
use crate::interfaces::ReceiverLocator;

// ============================================================================
// SECTION: Message Key
// ============================================================================

/// Key identifying a message in a message source.
///
/// # Invariants
/// - Opaque UTF-8 string; no normalization is applied by this type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MessageKey(String);

impl MessageKey {
    /// Creates a new message key.
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Returns the key as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MessageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&str> for MessageKey {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for MessageKey {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

// ============================================================================
// SECTION: Message Binding
// ============================================================================

/// Placeholder name bound to a method parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceholderParam {
    /// Placeholder name used by the message.
    pub name: String,
    /// Zero-based parameter index supplying the value.
    pub index: usize,
}

/// Static association between one contract method and its message.
///
/// # Invariants
/// - Immutable once placed in a [`MappingTable`].
pub struct MessageBinding<R> {
    /// Key of the message to fetch.
    key: MessageKey,
    /// Locator resolving the receiver of each call.
    locator: Arc<dyn ReceiverLocator<R>>,
    /// Placeholders bound to parameters, in declaration order.
    placeholders: Vec<PlaceholderParam>,
}

impl<R> MessageBinding<R> {
    /// Creates a binding for `key` using `locator`.
    pub fn new(key: impl Into<MessageKey>, locator: impl ReceiverLocator<R> + 'static) -> Self {
        Self::with_locator(key, Arc::new(locator))
    }

    /// Creates a binding sharing an existing locator.
    pub fn with_locator(key: impl Into<MessageKey>, locator: Arc<dyn ReceiverLocator<R>>) -> Self {
        Self {
            key: key.into(),
            locator,
            placeholders: Vec::new(),
        }
    }

    /// Binds placeholder `name` to the parameter at `index`.
    #[must_use]
    pub fn placeholder(mut self, name: impl Into<String>, index: usize) -> Self {
        self.placeholders.push(PlaceholderParam {
            name: name.into(),
            index,
        });
        self
    }

    /// Returns the message key.
    #[must_use]
    pub const fn key(&self) -> &MessageKey {
        &self.key
    }

    /// Returns the receiver locator.
    #[must_use]
    pub fn locator(&self) -> &dyn ReceiverLocator<R> {
        self.locator.as_ref()
    }

    /// Returns the placeholder parameters.
    #[must_use]
    pub fn placeholders(&self) -> &[PlaceholderParam] {
        &self.placeholders
    }
}

impl<R> Clone for MessageBinding<R> {
    fn clone(&self) -> Self {
        Self {
            key: self.key.clone(),
            locator: Arc::clone(&self.locator),
            placeholders: self.placeholders.clone(),
        }
    }
}

impl<R> fmt::Debug for MessageBinding<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MessageBinding")
            .field("key", &self.key)
            .field("placeholders", &self.placeholders)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// SECTION: Mapping Errors
// ============================================================================

/// Errors raised while building a [`MappingTable`].
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Error)]
pub enum MappingError {
    /// Binding targets a method the contract does not declare.
    #[error("contract {contract} does not declare method {method}")]
    UnknownMethod {
        /// Contract name.
        contract: String,
        /// Method name or rendered signature.
        method: String,
    },
    /// A method was bound twice.
    #[error("method {method} is bound more than once")]
    DuplicateBinding {
        /// Rendered method signature.
        method: String,
    },
    /// Binding targets an intrinsic, default-bodied, or controller method.
    #[error("method {method} cannot carry a message binding")]
    UnbindableMethod {
        /// Rendered method signature.
        method: String,
    },
    /// Placeholder refers to a parameter the method does not have.
    #[error("placeholder {placeholder} on {method} refers to parameter {index} of {arity}")]
    PlaceholderOutOfRange {
        /// Rendered method signature.
        method: String,
        /// Placeholder name.
        placeholder: String,
        /// Referenced parameter index.
        index: usize,
        /// Method arity.
        arity: usize,
    },
    /// Placeholder name appears twice in one binding.
    #[error("placeholder {placeholder} is declared twice on {method}")]
    DuplicatePlaceholder {
        /// Rendered method signature.
        method: String,
        /// Placeholder name.
        placeholder: String,
    },
    /// An ordinary method has no binding.
    #[error("method {method} on contract {contract} has no message binding")]
    UnmappedMethod {
        /// Contract name.
        contract: String,
        /// Rendered method signature.
        method: String,
    },
}

// ============================================================================
// SECTION: Mapping Table
// ============================================================================

/// Read-only lookup from method signature to message binding.
///
/// # Invariants
/// - Built once; never mutated afterwards.
/// - Keys are methods declared by `contract`.
pub struct MappingTable<R> {
    /// Contract the table was built for.
    contract: Arc<ContractType>,
    /// Bindings keyed by method signature.
    bindings: HashMap<MethodSignature, MessageBinding<R>>,
}

impl<R> MappingTable<R> {
    /// Returns a builder for `contract`.
    #[must_use]
    pub fn builder(contract: Arc<ContractType>) -> MappingTableBuilder<R> {
        MappingTableBuilder {
            contract,
            bindings: Vec::new(),
            pending_error: None,
        }
    }

    /// Returns the binding for `method`, if any.
    #[must_use]
    pub fn get(&self, method: &MethodSignature) -> Option<&MessageBinding<R>> {
        self.bindings.get(method)
    }

    /// Returns the contract the table was built for.
    #[must_use]
    pub fn contract(&self) -> &Arc<ContractType> {
        &self.contract
    }

    /// Returns the number of bindings.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Returns true when the table holds no bindings.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

impl<R> fmt::Debug for MappingTable<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MappingTable")
            .field("contract", &self.contract.name())
            .field("bindings", &self.bindings.len())
            .finish()
    }
}

/// Builder for [`MappingTable`].
///
/// # Invariants
/// - The first registration error is kept and reported by `build`.
pub struct MappingTableBuilder<R> {
    /// Contract being mapped.
    contract: Arc<ContractType>,
    /// Registered bindings in registration order.
    bindings: Vec<(MethodSignature, MessageBinding<R>)>,
    /// First registration error, reported by `build`.
    pending_error: Option<MappingError>,
}

impl<R> MappingTableBuilder<R> {
    /// Binds the first method named `name`.
    #[must_use]
    pub fn bind(mut self, name: &str, binding: MessageBinding<R>) -> Self {
        if let Some(method) = self.contract.method(name).cloned() {
            self.bindings.push((method, binding));
        } else {
            self.record(MappingError::UnknownMethod {
                contract: self.contract.name().to_string(),
                method: name.to_string(),
            });
        }
        self
    }

    /// Binds an exact method signature.
    #[must_use]
    pub fn bind_method(mut self, method: &MethodSignature, binding: MessageBinding<R>) -> Self {
        if self.contract.declares(method) {
            self.bindings.push((method.clone(), binding));
        } else {
            self.record(MappingError::UnknownMethod {
                contract: self.contract.name().to_string(),
                method: method.to_string(),
            });
        }
        self
    }

    /// Keeps the first registration error.
    fn record(&mut self, error: MappingError) {
        if self.pending_error.is_none() {
            self.pending_error = Some(error);
        }
    }

    /// Builds the mapping table.
    ///
    /// # Errors
    ///
    /// Returns [`MappingError`] when a binding is invalid or an ordinary
    /// method is left unbound.
    pub fn build(self) -> Result<MappingTable<R>, MappingError> {
        if let Some(error) = self.pending_error {
            return Err(error);
        }
        let mut bindings = HashMap::with_capacity(self.bindings.len());
        for (method, binding) in self.bindings {
            validate_binding(&method, &binding)?;
            if bindings.contains_key(&method) {
                return Err(MappingError::DuplicateBinding {
                    method: method.to_string(),
                });
            }
            bindings.insert(method, binding);
        }
        for method in self.contract.methods() {
            if !method.is_unbindable() && !bindings.contains_key(method) {
                return Err(MappingError::UnmappedMethod {
                    contract: self.contract.name().to_string(),
                    method: method.to_string(),
                });
            }
        }
        Ok(MappingTable {
            contract: self.contract,
            bindings,
        })
    }
}

/// Validates one binding against its method.
fn validate_binding<R>(
    method: &MethodSignature,
    binding: &MessageBinding<R>,
) -> Result<(), MappingError> {
    if method.is_unbindable() {
        return Err(MappingError::UnbindableMethod {
            method: method.to_string(),
        });
    }
    for (position, placeholder) in binding.placeholders.iter().enumerate() {
        if placeholder.index >= method.arity() {
            return Err(MappingError::PlaceholderOutOfRange {
                method: method.to_string(),
                placeholder: placeholder.name.clone(),
                index: placeholder.index,
                arity: method.arity(),
            });
        }
        if binding.placeholders[.. position].iter().any(|prior| prior.name == placeholder.name) {
            return Err(MappingError::DuplicatePlaceholder {
                method: method.to_string(),
                placeholder: placeholder.name.clone(),
            });
        }
    }
    Ok(())
}
