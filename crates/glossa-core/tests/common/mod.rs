// crates/glossa-core/tests/common/mod.rs
// ============================================================================
// Module: Common Test Utilities
// Description: Shared contract fixture and recording collaborators.
// Purpose: Provide a fully wired localizer whose collaborators count calls.
// Dependencies: glossa-core
// ============================================================================

//! ## Overview
//! Provides the `Greetings` contract, recording collaborators, and helpers for
//! glossa-core integration tests.

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

use std::collections::HashMap;
use std::io;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;

use glossa_core::Argument;
use glossa_core::Arguments;
use glossa_core::ContractProxy;
use glossa_core::ContractType;
use glossa_core::DispatchContext;
use glossa_core::DispatchError;
use glossa_core::Localizer;
use glossa_core::LocateError;
use glossa_core::MappingTable;
use glossa_core::MessageBinding;
use glossa_core::MessageKey;
use glossa_core::MessageRenderer;
use glossa_core::MessageSender;
use glossa_core::MessageSource;
use glossa_core::MethodSignature;
use glossa_core::ParamType;
use glossa_core::PlaceholderError;
use glossa_core::PlaceholderStrategy;
use glossa_core::Proxied;
use glossa_core::ReceiverLocator;
use glossa_core::RenderError;
use glossa_core::ResolvedPlaceholders;
use glossa_core::ReturnKind;
use glossa_core::SendError;
use glossa_core::SourceError;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Receiver used by the fixture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    /// Display name.
    pub name: String,
    /// Locale tag.
    pub locale: String,
}

impl Player {
    /// Creates a player with the `en_US` locale.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            locale: "en_US".to_string(),
        }
    }
}

/// Localizer type used by the fixture.
pub type TestLocalizer = Localizer<Player, String, String, String>;
/// Proxy type used by the fixture.
pub type TestProxy = ContractProxy<Player, String, String, String>;

/// Call counters shared by the recording collaborators.
#[derive(Debug, Default)]
pub struct Probe {
    /// Locator invocations.
    pub locate: AtomicUsize,
    /// Source invocations.
    pub source: AtomicUsize,
    /// Strategy invocations.
    pub strategy: AtomicUsize,
    /// Renderer invocations.
    pub render: AtomicUsize,
    /// Sender invocations.
    pub send: AtomicUsize,
    /// Deliveries received by the sender.
    pub sent: Mutex<Vec<(Player, String)>>,
    /// Argument counts observed by each stage, in call order.
    pub arg_lens: Mutex<Vec<(&'static str, usize)>>,
}

impl Probe {
    /// Returns the total number of collaborator invocations.
    pub fn total(&self) -> usize {
        self.locate.load(Ordering::SeqCst)
            + self.source.load(Ordering::SeqCst)
            + self.strategy.load(Ordering::SeqCst)
            + self.render.load(Ordering::SeqCst)
            + self.send.load(Ordering::SeqCst)
    }

    /// Returns the deliveries received so far.
    pub fn deliveries(&self) -> Vec<(Player, String)> {
        self.sent.lock().unwrap().clone()
    }

    /// Returns the argument counts observed so far.
    pub fn observed_arg_lens(&self) -> Vec<(&'static str, usize)> {
        self.arg_lens.lock().unwrap().clone()
    }

    /// Records the argument count seen by a stage.
    fn observe(&self, stage: &'static str, args: &Arguments) {
        self.arg_lens.lock().unwrap().push((stage, args.len()));
    }
}

// ============================================================================
// SECTION: Recording Collaborators
// ============================================================================

/// Locates the player passed as the first argument, or a guest.
pub struct PlayerLocator(pub Arc<Probe>);

impl ReceiverLocator<Player> for PlayerLocator {
    fn locate(
        &self,
        _method: &MethodSignature,
        _proxy: &dyn Proxied,
        args: &Arguments,
    ) -> Result<Player, LocateError> {
        self.0.locate.fetch_add(1, Ordering::SeqCst);
        self.0.observe("locate", args);
        match args.get(0) {
            None => Ok(Player::new("guest")),
            Some(arg) => arg.downcast_ref::<Player>().cloned().ok_or(LocateError::TypeMismatch {
                index: 0,
                expected: std::any::type_name::<Player>(),
                actual: arg.type_name(),
            }),
        }
    }
}

/// In-memory source keyed by message key.
pub struct MapSource {
    /// Call counters.
    pub probe: Arc<Probe>,
    /// Templates by key.
    pub templates: HashMap<String, String>,
}

impl MessageSource<Player, String> for MapSource {
    fn message_of(&self, receiver: &Player, key: &MessageKey) -> Result<String, SourceError> {
        self.probe.source.fetch_add(1, Ordering::SeqCst);
        self.templates.get(key.as_str()).cloned().ok_or_else(|| SourceError::MissingKey {
            key: key.to_string(),
            scope: receiver.locale.clone(),
        })
    }
}

/// Resolves placeholders from players, strings, and integers.
pub struct ParamStrategy(pub Arc<Probe>);

impl PlaceholderStrategy<Player, String, String> for ParamStrategy {
    fn resolve_placeholders(
        &self,
        _ctx: &DispatchContext<'_>,
        _receiver: &Player,
        _message: &String,
        binding: &MessageBinding<Player>,
        args: &Arguments,
    ) -> Result<ResolvedPlaceholders<String>, PlaceholderError> {
        self.0.strategy.fetch_add(1, Ordering::SeqCst);
        self.0.observe("strategy", args);
        let mut resolved = ResolvedPlaceholders::new();
        for param in binding.placeholders() {
            let arg = args.get(param.index).ok_or_else(|| PlaceholderError::MissingArgument {
                placeholder: param.name.clone(),
                index: param.index,
            })?;
            let value = if let Some(player) = arg.downcast_ref::<Player>() {
                player.name.clone()
            } else if let Some(text) = arg.downcast_ref::<String>() {
                text.clone()
            } else if let Some(number) = arg.downcast_ref::<i64>() {
                number.to_string()
            } else {
                return Err(PlaceholderError::NoResolver {
                    placeholder: param.name.clone(),
                    type_name: arg.type_name(),
                });
            };
            resolved.insert(param.name.clone(), value);
        }
        Ok(resolved)
    }
}

/// Replaces `{name}` with resolved values.
pub struct BraceRender(pub Arc<Probe>);

impl MessageRenderer<Player, String, String, String> for BraceRender {
    fn render(
        &self,
        _receiver: &Player,
        message: &String,
        placeholders: &ResolvedPlaceholders<String>,
        _method: &MethodSignature,
        _contract: &ContractType,
    ) -> Result<String, RenderError> {
        self.0.render.fetch_add(1, Ordering::SeqCst);
        let mut output = message.clone();
        for (name, value) in placeholders {
            output = output.replace(&format!("{{{name}}}"), value);
        }
        Ok(output)
    }
}

/// Records every delivery.
pub struct RecordingSender(pub Arc<Probe>);

impl MessageSender<Player, String> for RecordingSender {
    fn send(&self, receiver: &Player, output: String) -> Result<(), SendError> {
        self.0.send.fetch_add(1, Ordering::SeqCst);
        self.0.sent.lock().unwrap().push((receiver.clone(), output));
        Ok(())
    }
}

/// Sender that always fails.
pub struct FailingSender;

impl MessageSender<Player, String> for FailingSender {
    fn send(&self, _receiver: &Player, _output: String) -> Result<(), SendError> {
        Err(SendError::DeliveryFailed("socket closed".to_string()))
    }
}

// ============================================================================
// SECTION: Fixture
// ============================================================================

/// Builds the `Greetings` contract.
pub fn greetings_contract() -> Arc<ContractType> {
    let player = ParamType::new("Player");
    ContractType::builder("Greetings")
        .method(MethodSignature::new("welcome", ReturnKind::Unit).param(player.clone()))
        .method(MethodSignature::new("welcome_text", ReturnKind::Output).param(player.clone()))
        .method(
            MethodSignature::new("score", ReturnKind::Output)
                .param(player.clone())
                .param(ParamType::new("i64")),
        )
        .method(MethodSignature::new("motd", ReturnKind::Unit))
        .method(MethodSignature::new("lost", ReturnKind::Unit).param(player.clone()))
        .method(
            MethodSignature::new("greet", ReturnKind::Text)
                .with_default(|_, _| Ok(Some(Argument::new(String::from("hi"))))),
        )
        .method(MethodSignature::new("echo_count", ReturnKind::Integer).param_of::<u8>().with_default(
            |_, args| Ok(Some(Argument::new(args.len()))),
        ))
        .method(MethodSignature::new("announce", ReturnKind::Unit).param(player.clone()).with_default(
            |proxy, args| {
                let welcome = proxy.contract().method("welcome").cloned().ok_or_else(|| {
                    DispatchError::UnknownMethod {
                        contract: proxy.contract().name().to_string(),
                        method: "welcome".to_string(),
                    }
                })?;
                proxy.invoke_dyn(&welcome, Some(args.clone()))
            },
        ))
        .method(
            MethodSignature::new("explode", ReturnKind::Unit).with_default(|_, _| {
                Err(DispatchError::body(io::Error::other("body exploded")))
            }),
        )
        .method(MethodSignature::new("localizer", ReturnKind::Controller))
        .build()
        .expect("greetings contract")
}

/// Builds the `Greetings` mapping table.
pub fn greetings_mappings(
    contract: &Arc<ContractType>,
    probe: &Arc<Probe>,
) -> MappingTable<Player> {
    let locator: Arc<dyn ReceiverLocator<Player>> = Arc::new(PlayerLocator(Arc::clone(probe)));
    MappingTable::builder(Arc::clone(contract))
        .bind(
            "welcome",
            MessageBinding::with_locator("greetings.welcome", Arc::clone(&locator))
                .placeholder("player", 0),
        )
        .bind(
            "welcome_text",
            MessageBinding::with_locator("greetings.welcome", Arc::clone(&locator))
                .placeholder("player", 0),
        )
        .bind(
            "score",
            MessageBinding::with_locator("greetings.score", Arc::clone(&locator))
                .placeholder("player", 0)
                .placeholder("points", 1),
        )
        .bind("motd", MessageBinding::with_locator("greetings.motd", Arc::clone(&locator)))
        .bind("lost", MessageBinding::with_locator("greetings.absent", Arc::clone(&locator)))
        .build()
        .expect("greetings mappings")
}

/// Returns the fixture templates.
pub fn greetings_templates() -> HashMap<String, String> {
    HashMap::from([
        ("greetings.welcome".to_string(), "Welcome, {player}!".to_string()),
        ("greetings.score".to_string(), "{player} scored {points}".to_string()),
        ("greetings.motd".to_string(), "Hello {player}, have fun".to_string()),
    ])
}

/// Builds a fully wired localizer and its probe.
pub fn fixture() -> (TestLocalizer, Arc<Probe>) {
    let probe = Arc::new(Probe::default());
    let contract = greetings_contract();
    let localizer = Localizer::builder(Arc::clone(&contract))
        .mappings(greetings_mappings(&contract, &probe))
        .source(MapSource {
            probe: Arc::clone(&probe),
            templates: greetings_templates(),
        })
        .strategy(ParamStrategy(Arc::clone(&probe)))
        .renderer(BraceRender(Arc::clone(&probe)))
        .sender(RecordingSender(Arc::clone(&probe)))
        .build()
        .expect("fixture localizer");
    (localizer, probe)
}

/// Returns the named method of the fixture contract.
pub fn method(localizer: &TestLocalizer, name: &str) -> MethodSignature {
    localizer.contract().method(name).cloned().expect("fixture method")
}
