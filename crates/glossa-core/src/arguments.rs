// crates/glossa-core/src/arguments.rs
// ============================================================================
// Module: Glossa Call Arguments
// Description: Type-erased call arguments and the normalized argument sequence.
// Purpose: Carry per-call values through the dispatch pipeline.
// Dependencies: std
// ============================================================================

//! ## Overview
//! An [`Argument`] is a shareable, type-erased value passed to a contract
//! method. [`Arguments`] is the immutable argument sequence of one call.
//! Invariants:
//! - An absent sequence is normalized to one shared empty sequence at the
//!   dispatch boundary; stages never observe absence.
//! - Arguments are immutable once constructed.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::any::Any;
use std::any::TypeId;
use std::fmt;
use std::sync::Arc;
use std::sync::OnceLock;

// ============================================================================
// SECTION: Argument
// ============================================================================

/// A single type-erased call argument.
///
/// # Invariants
/// - `type_name` always names the concrete type stored in `value`.
#[derive(Clone)]
pub struct Argument {
    /// Shared argument value.
    value: Arc<dyn Any + Send + Sync>,
    /// Concrete type name, kept for diagnostics.
    type_name: &'static str,
}

impl Argument {
    /// Wraps a value as a call argument.
    #[must_use]
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Self {
            value: Arc::new(value),
            type_name: std::any::type_name::<T>(),
        }
    }

    /// Wraps an already shared value without copying it.
    #[must_use]
    pub fn from_arc<T: Any + Send + Sync>(value: Arc<T>) -> Self {
        Self {
            value,
            type_name: std::any::type_name::<T>(),
        }
    }

    /// Returns a reference to the value when it has type `T`.
    #[must_use]
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.value.downcast_ref::<T>()
    }

    /// Returns true when the value has type `T`.
    #[must_use]
    pub fn is<T: Any>(&self) -> bool {
        self.value.is::<T>()
    }

    /// Returns the [`TypeId`] of the stored value.
    #[must_use]
    pub fn value_type_id(&self) -> TypeId {
        Any::type_id(&*self.value)
    }

    /// Returns the concrete type name of the stored value.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        self.type_name
    }
}

impl fmt::Debug for Argument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Argument").field(&self.type_name).finish()
    }
}

// ============================================================================
// SECTION: Arguments
// ============================================================================

/// Shared empty sequence used for every call without arguments.
static EMPTY_ARGUMENTS: OnceLock<Arc<[Argument]>> = OnceLock::new();

/// Returns the process-wide empty argument slice.
fn shared_empty() -> &'static Arc<[Argument]> {
    EMPTY_ARGUMENTS.get_or_init(|| Arc::from(Vec::new()))
}

/// Immutable argument sequence of a single call.
///
/// # Invariants
/// - Every empty sequence shares the same backing allocation.
#[derive(Clone)]
pub struct Arguments(Arc<[Argument]>);

impl Arguments {
    /// Builds an argument sequence, reusing the shared empty sequence when
    /// `values` is empty.
    #[must_use]
    pub fn new(values: Vec<Argument>) -> Self {
        if values.is_empty() {
            return Self::empty();
        }
        Self(Arc::from(values))
    }

    /// Returns the shared empty sequence.
    #[must_use]
    pub fn empty() -> Self {
        Self(Arc::clone(shared_empty()))
    }

    /// Normalizes an optional sequence; `None` becomes [`Arguments::empty`].
    #[must_use]
    pub fn normalize(args: Option<Self>) -> Self {
        args.unwrap_or_else(Self::empty)
    }

    /// Returns the argument at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Argument> {
        self.0.get(index)
    }

    /// Returns the number of arguments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true when the call carries no arguments.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the arguments as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[Argument] {
        &self.0
    }

    /// Iterates over the arguments in call order.
    pub fn iter(&self) -> std::slice::Iter<'_, Argument> {
        self.0.iter()
    }

    /// Returns true when this sequence is the shared empty sequence.
    #[must_use]
    pub fn is_shared_empty(&self) -> bool {
        Arc::ptr_eq(&self.0, shared_empty())
    }
}

impl Default for Arguments {
    fn default() -> Self {
        Self::empty()
    }
}

impl fmt::Debug for Arguments {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.0.iter()).finish()
    }
}

impl From<Vec<Argument>> for Arguments {
    fn from(values: Vec<Argument>) -> Self {
        Self::new(values)
    }
}

impl FromIterator<Argument> for Arguments {
    fn from_iter<T: IntoIterator<Item = Argument>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Arguments {
    type Item = &'a Argument;
    type IntoIter = std::slice::Iter<'a, Argument>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Builds an [`Arguments`] sequence from a list of values.
///
/// ```
/// use glossa_core::arguments;
///
/// let args = arguments!["steve", 3_u32];
/// assert_eq!(args.len(), 2);
/// assert_eq!(args.get(1).and_then(|arg| arg.downcast_ref::<u32>()), Some(&3));
/// ```
#[macro_export]
macro_rules! arguments {
    () => {
        $crate::Arguments::empty()
    };
    ($($value:expr),+ $(,)?) => {
        $crate::Arguments::new(vec![$($crate::Argument::new($value)),+])
    };
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    /// Tests empty sequences share one allocation.
    #[test]
    fn empty_sequences_share_one_allocation() {
        let first = Arguments::empty();
        let second = Arguments::new(Vec::new());
        let third = Arguments::normalize(None);
        assert!(first.is_shared_empty());
        assert!(second.is_shared_empty());
        assert!(third.is_shared_empty());
    }

    /// Tests non empty sequence is not shared empty.
    #[test]
    fn non_empty_sequence_is_not_shared_empty() {
        let args = Arguments::new(vec![Argument::new(1_i32)]);
        assert!(!args.is_shared_empty());
        assert_eq!(args.len(), 1);
    }

    /// Tests argument reports value type.
    #[test]
    fn argument_reports_value_type() {
        let arg = Argument::new(String::from("hello"));
        assert!(arg.is::<String>());
        assert_eq!(arg.value_type_id(), TypeId::of::<String>());
        assert_eq!(arg.type_name(), std::any::type_name::<String>());
        assert_eq!(arg.downcast_ref::<String>().map(String::as_str), Some("hello"));
        assert!(arg.downcast_ref::<u8>().is_none());
    }

    /// Tests from arc keeps shared value.
    #[test]
    fn from_arc_keeps_shared_value() {
        let shared = Arc::new(42_u64);
        let arg = Argument::from_arc(Arc::clone(&shared));
        assert_eq!(Arc::strong_count(&shared), 2);
        assert_eq!(arg.downcast_ref::<u64>(), Some(&42));
    }
}
