// crates/glossa-broker/src/lib.rs
// ============================================================================
// Module: Glossa Broker Library
// Description: Reference collaborators for the Glossa dispatch core.
// Purpose: Locate receivers, fetch templates, resolve placeholders, render,
//          and deliver messages.
// Dependencies: glossa-core, glossa-config, serde_json, tokio, toml, tracing
// ============================================================================

//! ## Overview
//! Glossa Broker provides ready-made implementations of every collaborator
//! interface in `glossa-core`: receiver locators, a locale-aware catalog
//! source, a weighted placeholder strategy, a brace-template renderer, and
//! callback, channel, and log senders.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod locator;
pub mod render;
pub mod sender;
pub mod source;
pub mod strategy;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use locator::ArgumentLocator;
pub use locator::FixedLocator;
pub use render::BraceRenderer;
pub use sender::CallbackSender;
pub use sender::ChannelSender;
pub use sender::Delivery;
pub use sender::DeliveryReceipt;
pub use sender::LogSender;
pub use source::CatalogSource;
pub use source::CatalogSourceBuilder;
pub use source::LocaleAware;
pub use strategy::PlaceholderResolver;
pub use strategy::Resolution;
pub use strategy::Resolutions;
pub use strategy::StandardStrategy;
