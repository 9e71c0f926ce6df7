// crates/glossa-config/src/lib.rs
// ============================================================================
// Module: Glossa Config Library
// Description: Configuration model and validation for glossa.toml.
// Purpose: Single source of truth for bundle, placeholder, and rendering settings.
// Dependencies: serde, thiserror, toml
// ============================================================================

//! ## Overview
//! `glossa-config` loads and validates `glossa.toml`. The dispatch core never
//! reads configuration; the reference collaborators in `glossa-broker` are
//! built from it.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config::*;
