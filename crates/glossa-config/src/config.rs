// crates/glossa-config/src/config.rs
// ============================================================================
// Module: Glossa Configuration
// Description: Configuration loading and validation for Glossa.
// Purpose: Provide strict, fail-closed config parsing with hard limits.
// Dependencies: serde, thiserror, toml
// ============================================================================

//! ## Overview
//! Configuration is loaded from a TOML file with strict size and path limits.
//! Missing or invalid configuration fails closed.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;
use std::env;
use std::fs;
use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default configuration filename when no path is specified.
const DEFAULT_CONFIG_NAME: &str = "glossa.toml";
/// Environment variable used to override the config path.
pub const CONFIG_ENV_VAR: &str = "GLOSSA_CONFIG";
/// Maximum configuration file size in bytes.
pub const MAX_CONFIG_FILE_SIZE: usize = 1024 * 1024;
/// Maximum length of a single path component.
pub const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
pub const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Maximum length of a locale tag.
pub const MAX_LOCALE_LENGTH: usize = 64;
/// Maximum number of configured bundles.
pub const MAX_BUNDLES: usize = 256;
/// Default maximum continuance depth for placeholder resolution.
pub const DEFAULT_MAX_DEPTH: usize = 8;
/// Upper bound on the configurable continuance depth.
pub const MAX_PLACEHOLDER_DEPTH: usize = 64;
/// Default locale when none is configured.
const DEFAULT_LOCALE: &str = "en_US";

// ============================================================================
// SECTION: Configuration Types
// ============================================================================

/// Glossa configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct GlossaConfig {
    /// Message bundle configuration.
    #[serde(default)]
    pub messages: MessagesConfig,
    /// Placeholder resolution configuration.
    #[serde(default)]
    pub placeholders: PlaceholderConfig,
    /// Rendering configuration.
    #[serde(default)]
    pub rendering: RenderingConfig,
    /// Directory containing the loaded config file (not serialized).
    #[serde(skip)]
    pub source_dir: Option<PathBuf>,
}

impl GlossaConfig {
    /// Loads configuration from disk using the default resolution rules:
    /// explicit path, then `GLOSSA_CONFIG`, then `glossa.toml`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when loading or validation fails.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let resolved = resolve_path(path)?;
        validate_path(&resolved)?;
        let content = read_limited_utf8(&resolved)?;
        let mut config: Self =
            toml::from_str(&content).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.source_dir = resolved.parent().map(Path::to_path_buf);
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration for internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.messages.validate()?;
        self.placeholders.validate()?;
        Ok(())
    }

    /// Resolves the on-disk path of `bundle`.
    ///
    /// Relative bundle paths resolve against `messages.bundle_root`, and a
    /// relative root resolves against the directory of the config file.
    #[must_use]
    pub fn bundle_path(&self, bundle: &BundleConfig) -> PathBuf {
        self.messages.bundle_path(bundle, self.source_dir.as_deref())
    }
}

/// Message bundle configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MessagesConfig {
    /// Locale used when a receiver does not name one.
    #[serde(default = "default_locale")]
    pub default_locale: String,
    /// Locale consulted when a key is missing from the receiver's locale.
    #[serde(default)]
    pub fallback_locale: Option<String>,
    /// Directory relative bundle paths resolve against.
    #[serde(default)]
    pub bundle_root: Option<String>,
    /// One bundle file per locale.
    #[serde(default)]
    pub bundles: Vec<BundleConfig>,
}

impl Default for MessagesConfig {
    fn default() -> Self {
        Self {
            default_locale: default_locale(),
            fallback_locale: None,
            bundle_root: None,
            bundles: Vec::new(),
        }
    }
}

impl MessagesConfig {
    /// Validates message configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when locales or bundle paths are invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_locale("messages.default_locale", &self.default_locale)?;
        if let Some(fallback) = &self.fallback_locale {
            validate_locale("messages.fallback_locale", fallback)?;
        }
        if let Some(root) = &self.bundle_root {
            validate_path_string("messages.bundle_root", root)?;
        }
        if self.bundles.len() > MAX_BUNDLES {
            return Err(ConfigError::Invalid(format!(
                "messages.bundles exceeds max of {MAX_BUNDLES}"
            )));
        }
        let mut seen = BTreeSet::new();
        for bundle in &self.bundles {
            bundle.validate()?;
            if !seen.insert(bundle.locale.trim()) {
                return Err(ConfigError::Invalid(format!(
                    "duplicate bundle locale: {}",
                    bundle.locale.trim()
                )));
            }
        }
        Ok(())
    }

    /// Resolves the on-disk path of `bundle` against `bundle_root` and
    /// `base_dir`.
    #[must_use]
    pub fn bundle_path(&self, bundle: &BundleConfig, base_dir: Option<&Path>) -> PathBuf {
        let path = Path::new(bundle.path.trim());
        if path.is_absolute() {
            return path.to_path_buf();
        }
        let joined = match &self.bundle_root {
            Some(root) => Path::new(root.trim()).join(path),
            None => path.to_path_buf(),
        };
        match base_dir {
            Some(base) if joined.is_relative() => base.join(joined),
            _ => joined,
        }
    }
}

/// One message bundle.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct BundleConfig {
    /// Locale served by the bundle.
    pub locale: String,
    /// TOML file holding the bundle's templates.
    pub path: String,
}

impl BundleConfig {
    /// Validates a bundle entry.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the locale or path is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_locale("messages.bundles.locale", &self.locale)?;
        validate_path_string("messages.bundles.path", &self.path)
    }
}

/// Policy applied when two resolutions target the same placeholder name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CollisionPolicy {
    /// The later resolution replaces the earlier one.
    #[default]
    LastWins,
    /// A collision fails the call.
    Reject,
}

/// Placeholder resolution configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct PlaceholderConfig {
    /// Collision policy.
    #[serde(default)]
    pub collision: CollisionPolicy,
    /// Maximum continuance chain depth.
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
}

impl Default for PlaceholderConfig {
    fn default() -> Self {
        Self {
            collision: CollisionPolicy::default(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl PlaceholderConfig {
    /// Validates placeholder configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when `max_depth` is outside `1..=64`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_depth == 0 || self.max_depth > MAX_PLACEHOLDER_DEPTH {
            return Err(ConfigError::Invalid(format!(
                "placeholders.max_depth must be between 1 and {MAX_PLACEHOLDER_DEPTH}"
            )));
        }
        Ok(())
    }
}

/// Rendering configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct RenderingConfig {
    /// Fail on placeholders the message references but the strategy did not
    /// resolve.
    #[serde(default)]
    pub strict: bool,
}

/// Configuration errors.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O failure while reading configuration.
    #[error("config io error: {0}")]
    Io(String),
    /// TOML parsing error.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Invalid configuration data.
    #[error("invalid config: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Default locale value.
fn default_locale() -> String {
    DEFAULT_LOCALE.to_string()
}

/// Default continuance depth.
const fn default_max_depth() -> usize {
    DEFAULT_MAX_DEPTH
}

/// Resolves the config path from the caller or environment defaults.
fn resolve_path(path: Option<&Path>) -> Result<PathBuf, ConfigError> {
    if let Some(path) = path {
        return Ok(path.to_path_buf());
    }
    if let Ok(env_path) = env::var(CONFIG_ENV_VAR) {
        if env_path.len() > MAX_TOTAL_PATH_LENGTH {
            return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
        }
        return Ok(PathBuf::from(env_path));
    }
    Ok(PathBuf::from(DEFAULT_CONFIG_NAME))
}

/// Validates a path against length limits.
///
/// # Errors
///
/// Returns [`ConfigError::Invalid`] when the path or one of its components is
/// too long.
pub fn validate_path(path: &Path) -> Result<(), ConfigError> {
    let text = path.to_string_lossy();
    if text.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
    }
    for component in path.components() {
        let value = component.as_os_str().to_string_lossy();
        if value.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid("config path component too long".to_string()));
        }
    }
    Ok(())
}

/// Reads a UTF-8 file no larger than [`MAX_CONFIG_FILE_SIZE`].
///
/// # Errors
///
/// Returns [`ConfigError::Io`] when the file cannot be read and
/// [`ConfigError::Invalid`] when it is too large or not UTF-8.
pub fn read_limited_utf8(path: &Path) -> Result<String, ConfigError> {
    let bytes = fs::read(path).map_err(|err| ConfigError::Io(err.to_string()))?;
    if bytes.len() > MAX_CONFIG_FILE_SIZE {
        return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
    }
    String::from_utf8(bytes)
        .map_err(|_| ConfigError::Invalid("config file must be utf-8".to_string()))
}

/// Validates a path string against length constraints.
fn validate_path_string(field: &str, value: &str) -> Result<(), ConfigError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::Invalid(format!("{field} must be non-empty")));
    }
    if trimmed.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid(format!("{field} exceeds max length")));
    }
    for component in Path::new(trimmed).components() {
        if component.as_os_str().len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid(format!("{field} path component too long")));
        }
    }
    Ok(())
}

/// Validates a locale tag.
fn validate_locale(field: &str, value: &str) -> Result<(), ConfigError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::Invalid(format!("{field} must be non-empty")));
    }
    if trimmed.len() > MAX_LOCALE_LENGTH {
        return Err(ConfigError::Invalid(format!("{field} exceeds max length")));
    }
    Ok(())
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    #![allow(
        clippy::unwrap_used,
        clippy::expect_used,
        reason = "Test-only assertions on known-valid inputs."
    )]

    use super::*;

    /// Tests validate path string rejects whitespace only.
    #[test]
    fn validate_path_string_rejects_whitespace_only() {
        assert!(validate_path_string("test_path", "   ").is_err());
    }

    /// Tests validate path string rejects long component.
    #[test]
    fn validate_path_string_rejects_long_component() {
        let component = "a".repeat(MAX_PATH_COMPONENT_LENGTH + 1);
        let err = validate_path_string("test_path", &component).unwrap_err();
        assert!(err.to_string().contains("component too long"));
    }

    /// Tests validate locale enforces length.
    #[test]
    fn validate_locale_enforces_length() {
        assert!(validate_locale("locale", &"x".repeat(MAX_LOCALE_LENGTH)).is_ok());
        assert!(validate_locale("locale", &"x".repeat(MAX_LOCALE_LENGTH + 1)).is_err());
    }

    /// Tests bundle path prefers absolute paths.
    #[test]
    fn bundle_path_prefers_absolute_paths() {
        let messages = MessagesConfig {
            bundle_root: Some("i18n".to_string()),
            ..MessagesConfig::default()
        };
        let absolute = BundleConfig {
            locale: "de_DE".to_string(),
            path: "/srv/de_DE.toml".to_string(),
        };
        let relative = BundleConfig {
            locale: "en_US".to_string(),
            path: "en_US.toml".to_string(),
        };
        let base = Path::new("/etc/glossa");

        assert_eq!(messages.bundle_path(&absolute, Some(base)), PathBuf::from("/srv/de_DE.toml"));
        assert_eq!(
            messages.bundle_path(&relative, Some(base)),
            PathBuf::from("/etc/glossa/i18n/en_US.toml")
        );
        assert_eq!(messages.bundle_path(&relative, None), PathBuf::from("i18n/en_US.toml"));
    }
}
