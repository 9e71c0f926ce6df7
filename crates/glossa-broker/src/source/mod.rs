// crates/glossa-broker/src/source/mod.rs
// ============================================================================
// Module: Glossa Broker Sources
// Description: Locale-aware message sources.
// Purpose: Fetch unrendered message templates for a receiver.
// Dependencies: glossa-core, glossa-config, toml, tracing
// ============================================================================

//! ## Overview
//! Sources resolve a [`glossa_core::MessageKey`] to an unrendered template in
//! the receiver's locale. Receivers expose their locale via [`LocaleAware`].
//! Invariants:
//! - A miss in every consulted locale is reported as
//!   [`glossa_core::SourceError::MissingKey`], never defaulted.

// ============================================================================
// SECTION: Locale Awareness
// ============================================================================

/// Receivers that carry a locale tag.
pub trait LocaleAware {
    /// Returns the receiver's locale tag; empty means "use the default".
    fn locale(&self) -> &str;
}

impl<T: LocaleAware + ?Sized> LocaleAware for &T {
    fn locale(&self) -> &str {
        (**self).locale()
    }
}

impl<T: LocaleAware + ?Sized> LocaleAware for std::sync::Arc<T> {
    fn locale(&self) -> &str {
        (**self).locale()
    }
}

// ============================================================================
// SECTION: Implementations
// ============================================================================

pub mod catalog;

pub use catalog::CatalogSource;
pub use catalog::CatalogSourceBuilder;
