// crates/glossa-broker/src/source/catalog.rs
// ============================================================================
// Module: Glossa Catalog Source
// Description: In-memory locale catalogs loaded from TOML bundles.
// Purpose: Serve message templates by locale with fallback.
// Dependencies: glossa-config, glossa-core, toml, tracing
// ============================================================================

//! ## Overview
//! [`CatalogSource`] holds `locale → key → template` maps. Lookups consult
//! the receiver's locale (or the default locale when the receiver names
//! none), then the fallback locale, then the default locale.
//!
//! Bundles are TOML files; nested tables flatten into dotted keys:
//!
//! ```toml
//! [greetings]
//! welcome = "Welcome, {player}!"   # key "greetings.welcome"
//! ```

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::path::Path;

use glossa_config::ConfigError;
use glossa_config::GlossaConfig;
use glossa_core::MessageKey;
use glossa_core::MessageSource;
use glossa_core::SourceError;

use crate::source::LocaleAware;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Maximum number of templates accepted from a single bundle.
pub const MAX_BUNDLE_KEYS: usize = 65_536;

// ============================================================================
// SECTION: Catalog Source
// ============================================================================

/// Locale catalog source.
#[derive(Debug, Clone)]
pub struct CatalogSource {
    /// Templates by locale, then key.
    catalogs: BTreeMap<String, BTreeMap<String, String>>,
    /// Locale used when a receiver names none.
    default_locale: String,
    /// Locale consulted after the receiver's locale.
    fallback_locale: Option<String>,
}

impl CatalogSource {
    /// Returns a builder with `default_locale`.
    #[must_use]
    pub fn builder(default_locale: impl Into<String>) -> CatalogSourceBuilder {
        CatalogSourceBuilder {
            source: Self {
                catalogs: BTreeMap::new(),
                default_locale: default_locale.into(),
                fallback_locale: None,
            },
        }
    }

    /// Loads every bundle named in `config.messages`.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] when a bundle cannot be read, parsed, or
    /// contains non-string values.
    pub fn from_config(config: &GlossaConfig) -> Result<Self, SourceError> {
        let messages = &config.messages;
        let mut builder = Self::builder(messages.default_locale.trim());
        if let Some(fallback) = &messages.fallback_locale {
            builder = builder.fallback_locale(fallback.trim());
        }
        for bundle in &messages.bundles {
            let path = config.bundle_path(bundle);
            builder = builder.bundle_file(bundle.locale.trim(), &path)?;
        }
        Ok(builder.build())
    }

    /// Returns the default locale.
    #[must_use]
    pub fn default_locale(&self) -> &str {
        &self.default_locale
    }

    /// Returns the fallback locale, if any.
    #[must_use]
    pub fn fallback_locale(&self) -> Option<&str> {
        self.fallback_locale.as_deref()
    }

    /// Returns the loaded locales in sorted order.
    pub fn locales(&self) -> impl Iterator<Item = &str> {
        self.catalogs.keys().map(String::as_str)
    }

    /// Returns the number of templates loaded for `locale`.
    #[must_use]
    pub fn key_count(&self, locale: &str) -> usize {
        self.catalogs.get(locale).map_or(0, BTreeMap::len)
    }

    /// Returns the template for `key` in exactly `locale`.
    #[must_use]
    pub fn template(&self, locale: &str, key: &str) -> Option<&str> {
        self.catalogs.get(locale)?.get(key).map(String::as_str)
    }

    /// Looks `key` up for `locale`, applying fallback order.
    #[must_use]
    pub fn lookup(&self, locale: &str, key: &str) -> Option<&str> {
        let primary = if locale.is_empty() { self.default_locale.as_str() } else { locale };
        self.template(primary, key)
            .or_else(|| self.fallback_locale.as_deref().and_then(|l| self.template(l, key)))
            .or_else(|| self.template(&self.default_locale, key))
    }
}

impl<R: LocaleAware> MessageSource<R, String> for CatalogSource {
    fn message_of(&self, receiver: &R, key: &MessageKey) -> Result<String, SourceError> {
        self.lookup(receiver.locale(), key.as_str()).map(str::to_string).ok_or_else(|| {
            SourceError::MissingKey {
                key: key.to_string(),
                scope: scope_of(receiver.locale(), &self.default_locale),
            }
        })
    }
}

/// Names the scope reported by a miss.
fn scope_of(locale: &str, default_locale: &str) -> String {
    if locale.is_empty() { default_locale.to_string() } else { locale.to_string() }
}

// ============================================================================
// SECTION: Builder
// ============================================================================

/// Builder for [`CatalogSource`].
#[derive(Debug, Clone)]
pub struct CatalogSourceBuilder {
    /// Source under construction.
    source: CatalogSource,
}

impl CatalogSourceBuilder {
    /// Sets the fallback locale.
    #[must_use]
    pub fn fallback_locale(mut self, locale: impl Into<String>) -> Self {
        self.source.fallback_locale = Some(locale.into());
        self
    }

    /// Adds one template, replacing any earlier template for the same key.
    #[must_use]
    pub fn template(
        mut self,
        locale: impl Into<String>,
        key: impl Into<String>,
        template: impl Into<String>,
    ) -> Self {
        self.source
            .catalogs
            .entry(locale.into())
            .or_default()
            .insert(key.into(), template.into());
        self
    }

    /// Adds every template of a TOML bundle document.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Parse`] for malformed TOML and
    /// [`SourceError::Invalid`] for non-string values or oversized bundles.
    pub fn bundle_str(mut self, locale: &str, content: &str) -> Result<Self, SourceError> {
        let table: toml::Table =
            toml::from_str(content).map_err(|err| SourceError::Parse(err.to_string()))?;
        let mut templates = BTreeMap::new();
        flatten(locale, None, &table, &mut templates)?;
        if templates.len() > MAX_BUNDLE_KEYS {
            return Err(SourceError::Invalid(format!(
                "bundle {locale} exceeds {MAX_BUNDLE_KEYS} keys"
            )));
        }
        tracing::debug!(locale, keys = templates.len(), "loaded message bundle");
        self.source.catalogs.entry(locale.to_string()).or_default().extend(templates);
        Ok(self)
    }

    /// Reads and adds a TOML bundle file, subject to the config size and
    /// path limits.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] when the file cannot be read or parsed.
    pub fn bundle_file(self, locale: &str, path: &Path) -> Result<Self, SourceError> {
        glossa_config::validate_path(path).map_err(source_error)?;
        let content = glossa_config::read_limited_utf8(path).map_err(source_error)?;
        self.bundle_str(locale, &content)
    }

    /// Builds the source.
    #[must_use]
    pub fn build(self) -> CatalogSource {
        self.source
    }
}

/// Maps a config read failure into a source error.
fn source_error(error: ConfigError) -> SourceError {
    match error {
        ConfigError::Io(message) => SourceError::Io(message),
        ConfigError::Parse(message) => SourceError::Parse(message),
        ConfigError::Invalid(message) => SourceError::Invalid(message),
    }
}

/// Flattens nested tables into dotted keys.
fn flatten(
    locale: &str,
    prefix: Option<&str>,
    table: &toml::Table,
    out: &mut BTreeMap<String, String>,
) -> Result<(), SourceError> {
    for (name, value) in table {
        let key = prefix.map_or_else(|| name.clone(), |prefix| format!("{prefix}.{name}"));
        match value {
            toml::Value::String(template) => {
                out.insert(key, template.clone());
            }
            toml::Value::Table(nested) => flatten(locale, Some(&key), nested, out)?,
            other => {
                return Err(SourceError::Invalid(format!(
                    "bundle {locale}: key {key} must be a string, found {}",
                    other.type_str()
                )));
            }
        }
    }
    Ok(())
}

// ============================================================================
// SECTION: Tests
// ============================================================================
