// crates/glossa-core/src/lib.rs
// ============================================================================
// Module: Glossa Core Library
// Description: Public API surface for the Glossa dispatch core.
// Purpose: Expose contract models, interfaces, and the dispatch controller.
// Dependencies: crate::{arguments, binding, capability, contract, dispatch, interfaces}
// ============================================================================

//! ## Overview
//! Glossa core turns calls on a declared method contract into localized,
//! rendered messages. Every call on a [`ContractProxy`] enters one dispatch
//! point that answers identity calls, delegates default-bodied methods, and
//! otherwise runs the locate → fetch → resolve → render → deliver pipeline
//! through pluggable collaborators.
//! Invariants:
//! - Every ordinary contract method has exactly one [`MessageBinding`].
//! - The invocation strategy for default bodies is selected once per process.
//! - The dispatch layer never retries, buffers, or logs collaborator failures.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod arguments;
pub mod binding;
pub mod capability;
pub mod contract;
pub mod dispatch;
pub mod interfaces;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use arguments::Argument;
pub use arguments::Arguments;
pub use binding::MappingError;
pub use binding::MappingTable;
pub use binding::MappingTableBuilder;
pub use binding::MessageBinding;
pub use binding::MessageKey;
pub use binding::PlaceholderParam;
pub use capability::DefaultCall;
pub use capability::HostSurface;
pub use capability::InvocationStrategy;
pub use capability::LookupInvocation;
pub use capability::RuntimeSurface;
pub use capability::StrategyKind;
pub use capability::UnboundInvocation;
pub use contract::ContractError;
pub use contract::ContractType;
pub use contract::ContractTypeBuilder;
pub use contract::DefaultBody;
pub use contract::MethodSignature;
pub use contract::ParamType;
pub use contract::ReturnKind;
pub use dispatch::BuildError;
pub use dispatch::ContractProxy;
pub use dispatch::ControllerId;
pub use dispatch::DispatchError;
pub use dispatch::Localizer;
pub use dispatch::LocalizerBuilder;
pub use dispatch::Outcome;
pub use dispatch::Proxied;
pub use interfaces::DispatchContext;
pub use interfaces::LocateError;
pub use interfaces::MessageRenderer;
pub use interfaces::MessageSender;
pub use interfaces::MessageSource;
pub use interfaces::PlaceholderError;
pub use interfaces::PlaceholderStrategy;
pub use interfaces::ReceiverLocator;
pub use interfaces::RenderError;
pub use interfaces::ResolvedPlaceholders;
pub use interfaces::SendError;
pub use interfaces::SourceError;
