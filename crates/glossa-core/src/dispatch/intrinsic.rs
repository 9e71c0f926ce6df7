// crates/glossa-core/src/dispatch/intrinsic.rs
// ============================================================================
// Module: Glossa Intrinsic Calls
// Description: Signature-shape recognition of identity calls.
// Purpose: Answer equality, hash, and text calls from controller identity.
// Dependencies: crate::contract
// ============================================================================

//! ## Overview
//! Intrinsic calls are recognized purely by signature shape (name, arity,
//! return kind) and are answered before any mapping lookup.
//!
//! | Name | Arity | Returns |
//! |---|---|---|
//! | `eq` | 1 | [`ReturnKind::Bool`] |
//! | `hash` | 0 | [`ReturnKind::Integer`] |
//! | `to_string` | 0 | [`ReturnKind::Text`] |

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::contract::MethodSignature;
use crate::contract::ParamType;
use crate::contract::ReturnKind;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Name of the identity-equality method.
pub const EQ_METHOD: &str = "eq";
/// Name of the hash-code method.
pub const HASH_METHOD: &str = "hash";
/// Name of the string-representation method.
pub const TO_STRING_METHOD: &str = "to_string";
/// Parameter label of the identity-equality method.
const EQ_PARAM: &str = "Self";

// ============================================================================
// SECTION: Intrinsic
// ============================================================================

/// Closed set of intrinsic identity calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intrinsic {
    /// Identity equality.
    Eq,
    /// Hash code.
    Hash,
    /// String representation.
    ToString,
}

impl Intrinsic {
    /// Classifies `method` by signature shape.
    #[must_use]
    pub fn classify(method: &MethodSignature) -> Option<Self> {
        match (method.name(), method.arity(), method.returns()) {
            (EQ_METHOD, 1, ReturnKind::Bool) => Some(Self::Eq),
            (HASH_METHOD, 0, ReturnKind::Integer) => Some(Self::Hash),
            (TO_STRING_METHOD, 0, ReturnKind::Text) => Some(Self::ToString),
            _ => None,
        }
    }

    /// Returns the canonical signature of this intrinsic.
    #[must_use]
    pub fn signature(self) -> MethodSignature {
        match self {
            Self::Eq => MethodSignature::new(EQ_METHOD, ReturnKind::Bool)
                .param(ParamType::new(EQ_PARAM)),
            Self::Hash => MethodSignature::new(HASH_METHOD, ReturnKind::Integer),
            Self::ToString => MethodSignature::new(TO_STRING_METHOD, ReturnKind::Text),
        }
    }

    /// Returns the canonical signatures of every intrinsic.
    #[must_use]
    pub fn signatures() -> [MethodSignature; 3] {
        [Self::Eq.signature(), Self::Hash.signature(), Self::ToString.signature()]
    }
}

/// Formats the text representation of a proxy.
pub(crate) fn describe(contract: &str, hash: u64) -> String {
    format!("{contract}@{hash:x}")
}
