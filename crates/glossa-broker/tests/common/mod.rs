// crates/glossa-broker/tests/common/mod.rs
// ============================================================================
// Module: Common Test Utilities
// Description: Shared helpers for glossa-broker tests.
// Purpose: Provide a receiver type, a wired localizer, and writer doubles.
// Dependencies: glossa-broker, glossa-core, serde
// ============================================================================

//! ## Overview
//! Provides the `Quests` contract, a broker-backed localizer, and shared
//! writer helpers for sender tests.

#![allow(
    dead_code,
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Shared test helpers; not every test binary uses every helper."
)]

use std::io::Write;
use std::sync::Arc;
use std::sync::Mutex;

use glossa_broker::ArgumentLocator;
use glossa_broker::BraceRenderer;
use glossa_broker::CallbackSender;
use glossa_broker::CatalogSource;
use glossa_broker::LocaleAware;
use glossa_broker::StandardStrategy;
use glossa_core::ContractType;
use glossa_core::DispatchContext;
use glossa_core::Localizer;
use glossa_core::MappingTable;
use glossa_core::MessageBinding;
use glossa_core::MethodSignature;
use glossa_core::ParamType;
use glossa_core::ReturnKind;
use serde::Serialize;

// ============================================================================
// SECTION: Receiver
// ============================================================================

/// Receiver used by broker tests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Player {
    /// Display name.
    pub name: String,
    /// Locale tag.
    pub locale: String,
}

impl Player {
    /// Creates a player in `locale`.
    pub fn new(name: &str, locale: &str) -> Self {
        Self {
            name: name.to_string(),
            locale: locale.to_string(),
        }
    }
}

impl LocaleAware for Player {
    fn locale(&self) -> &str {
        &self.locale
    }
}

/// Localizer type used by broker tests.
pub type QuestLocalizer = Localizer<Player, String, String, String>;

// ============================================================================
// SECTION: Contract Fixture
// ============================================================================

/// Builds the `Quests` contract.
pub fn quests_contract() -> Arc<ContractType> {
    let player = ParamType::new("Player");
    ContractType::builder("Quests")
        .method(
            MethodSignature::new("started", ReturnKind::Unit)
                .param(player.clone())
                .param(ParamType::new("String")),
        )
        .method(
            MethodSignature::new("progress", ReturnKind::Output)
                .param(player)
                .param(ParamType::new("u32"))
                .param(ParamType::new("u32")),
        )
        .build()
        .expect("quests contract")
}

/// Builds the `Quests` mapping table.
pub fn quests_mappings(contract: &Arc<ContractType>) -> MappingTable<Player> {
    MappingTable::builder(Arc::clone(contract))
        .bind(
            "started",
            MessageBinding::new("quests.started", ArgumentLocator::<Player>::first())
                .placeholder("player", 0)
                .placeholder("quest", 1),
        )
        .bind(
            "progress",
            MessageBinding::new("quests.progress", ArgumentLocator::<Player>::first())
                .placeholder("done", 1)
                .placeholder("total", 2),
        )
        .build()
        .expect("quests mappings")
}

/// Resolves players to their names, everything else by display.
pub fn quests_strategy() -> StandardStrategy<Player, String> {
    StandardStrategy::new()
        .display_fallback()
        .conclude::<Player, _>(0, |player: &Player| player.name.clone())
}

/// Builds a localizer whose sender discards output.
pub fn quiet_localizer(source: CatalogSource) -> QuestLocalizer {
    let contract = quests_contract();
    Localizer::builder(Arc::clone(&contract))
        .mappings(quests_mappings(&contract))
        .source(source)
        .strategy(quests_strategy())
        .renderer(BraceRenderer::new())
        .sender(CallbackSender::new(|_: &Player, _: String| Ok(())))
        .build()
        .expect("quiet localizer")
}

/// Runs `check` with a dispatch context for `method` on `localizer`.
pub fn with_context<T>(
    localizer: &QuestLocalizer,
    method: &str,
    check: impl FnOnce(&DispatchContext<'_>) -> T,
) -> T {
    let method = localizer.contract().method(method).expect("method").clone();
    let ctx = DispatchContext {
        contract: localizer.contract(),
        method: &method,
        controller: localizer.id(),
    };
    check(&ctx)
}

/// Returns a localizer with an empty catalog, for context-only tests.
pub fn context_localizer() -> QuestLocalizer {
    quiet_localizer(CatalogSource::builder("en_US").build())
}

// ============================================================================
// SECTION: Shared Buffer for Write Testing
// ============================================================================

/// A thread-safe buffer for testing Write implementations.
#[derive(Clone, Default)]
pub struct SharedBuffer {
    /// Bytes written so far.
    inner: Arc<Mutex<Vec<u8>>>,
}

impl SharedBuffer {
    /// Creates a new empty shared buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the contents as a string.
    pub fn to_string_lossy(&self) -> String {
        let guard = self.inner.lock().expect("buffer lock");
        String::from_utf8_lossy(&guard).to_string()
    }

    /// Returns the buffer split into lines.
    pub fn lines(&self) -> Vec<String> {
        self.to_string_lossy().lines().map(str::to_string).collect()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.inner.lock().expect("buffer lock").extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

/// A writer that always fails, for testing error paths.
pub struct FailingWriter;

impl Write for FailingWriter {
    fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
        Err(std::io::Error::other("simulated write failure"))
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

/// A writer that fails its first `failures` writes, then appends to a buffer.
pub struct FlakyWriter {
    /// Writes still to fail.
    pub failures: usize,
    /// Successfully written bytes.
    pub buffer: SharedBuffer,
}

impl Write for FlakyWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        if self.failures > 0 {
            self.failures -= 1;
            return Err(std::io::Error::other("transient write failure"));
        }
        self.buffer.write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}
