// crates/pix-brcode-config/src/config.rs
// ============================================================================
// Module: PIX BR Code Configuration
// Description: Configuration loading and validation for pix-brcode.
// Purpose: Provide strict, fail-closed config parsing with hard limits.
// Dependencies: pix-brcode-core, serde, toml
// ============================================================================

//! ## Overview
//! Configuration is loaded from a TOML file with strict size and path limits.
//! The path comes from the caller, then `PIX_BRCODE_CONFIG`, then
//! `pix-brcode.toml` in the working directory. Invalid configuration fails
//! closed; a missing default file yields the built-in defaults.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::env;
use std::fs;
use std::path::Path;
use std::path::PathBuf;

use pix_brcode_core::EncodeOptions;
use pix_brcode_core::PhoneCountryCodeRule;
use pix_brcode_core::PixKey;
use pix_brcode_core::PixKeyType;
use pix_brcode_core::ValidationMode;
use serde::Deserialize;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default configuration filename when no path is specified.
pub const DEFAULT_CONFIG_NAME: &str = "pix-brcode.toml";
/// Environment variable used to override the config path.
pub const CONFIG_ENV_VAR: &str = "PIX_BRCODE_CONFIG";
/// Maximum configuration file size in bytes.
pub(crate) const MAX_CONFIG_FILE_SIZE: usize = 64 * 1024;
/// Maximum length of a single path component.
pub(crate) const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
pub(crate) const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Maximum merchant name length accepted by strict encoding.
pub(crate) const MAX_MERCHANT_NAME_LENGTH: usize = 25;
/// Maximum merchant city length accepted by strict encoding.
pub(crate) const MAX_MERCHANT_CITY_LENGTH: usize = 15;

// ============================================================================
// SECTION: Configuration Model
// ============================================================================

/// Root configuration for the pix-brcode tool.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PixBrcodeConfig {
    /// Merchant defaults applied when generating codes.
    #[serde(default)]
    pub merchant: MerchantConfig,
    /// Encoding options.
    #[serde(default)]
    pub encoding: EncodingConfig,
    /// Audit output.
    #[serde(default)]
    pub audit: AuditConfig,
}

impl PixBrcodeConfig {
    /// Loads configuration from disk using the default resolution rules.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when loading or validation fails.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let resolved = resolve_path(path)?;
        Self::load_resolved(&resolved.path)
    }

    /// Loads configuration, falling back to defaults when the default file
    /// (neither passed explicitly nor named by the environment) is absent.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when loading or validation fails.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        let resolved = resolve_path(path)?;
        if !resolved.explicit && !resolved.path.exists() {
            return Ok(Self::default());
        }
        Self::load_resolved(&resolved.path)
    }

    /// Reads, parses, and validates a resolved config path.
    fn load_resolved(path: &Path) -> Result<Self, ConfigError> {
        validate_path(path)?;
        let bytes = fs::read(path).map_err(|err| ConfigError::Io(err.to_string()))?;
        if bytes.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
        }
        let content = std::str::from_utf8(&bytes)
            .map_err(|_| ConfigError::Invalid("config file must be utf-8".to_string()))?;
        let config: Self =
            toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration for internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.merchant.validate(&self.encoding)?;
        self.audit.validate()?;
        Ok(())
    }

    /// Returns the encoding options described by `[encoding]`.
    #[must_use]
    pub const fn encode_options(&self) -> EncodeOptions {
        EncodeOptions {
            validation: self.encoding.validation,
            phone_rule: self.encoding.phone_rule,
        }
    }
}

/// Merchant defaults used when a flag is not given on the command line.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MerchantConfig {
    /// Merchant name.
    #[serde(default)]
    pub name: Option<String>,
    /// Merchant city.
    #[serde(default)]
    pub city: Option<String>,
    /// PIX key.
    #[serde(default)]
    pub pix_key: Option<String>,
    /// Type of `pix_key`.
    #[serde(default)]
    pub pix_key_type: Option<PixKeyType>,
}

impl MerchantConfig {
    /// Validates merchant defaults, checking the key eagerly in strict mode.
    fn validate(&self, encoding: &EncodingConfig) -> Result<(), ConfigError> {
        let strict = encoding.validation == ValidationMode::Strict;
        if let Some(name) = &self.name {
            validate_text("merchant.name", name, strict.then_some(MAX_MERCHANT_NAME_LENGTH))?;
        }
        if let Some(city) = &self.city {
            validate_text("merchant.city", city, strict.then_some(MAX_MERCHANT_CITY_LENGTH))?;
        }
        match (&self.pix_key, self.pix_key_type) {
            (Some(_), None) => Err(ConfigError::Invalid(
                "merchant.pix_key requires merchant.pix_key_type".to_string(),
            )),
            (None, Some(_)) => Err(ConfigError::Invalid(
                "merchant.pix_key_type requires merchant.pix_key".to_string(),
            )),
            (Some(key), Some(key_type)) if strict => {
                PixKey::parse(key, key_type, encoding.phone_rule)
                    .map(|_| ())
                    .map_err(|err| ConfigError::Invalid(format!("merchant.pix_key: {err}")))
            }
            _ => Ok(()),
        }
    }
}

/// Encoding options.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct EncodingConfig {
    /// Lenient or strict field handling.
    #[serde(default)]
    pub validation: ValidationMode,
    /// Phone country-code detection rule.
    #[serde(default)]
    pub phone_rule: PhoneCountryCodeRule,
}

/// Audit event output.
#[derive(Debug, Clone, Deserialize)]
pub struct AuditConfig {
    /// Emit audit events.
    #[serde(default = "default_audit_enabled")]
    pub enabled: bool,
    /// Optional JSON-lines file; stderr when absent.
    #[serde(default)]
    pub path: Option<String>,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            enabled: default_audit_enabled(),
            path: None,
        }
    }
}

impl AuditConfig {
    /// Validates audit configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        if let Some(path) = &self.path {
            validate_path_string("audit.path", path)?;
        }
        Ok(())
    }
}

/// Audit output is on unless disabled.
const fn default_audit_enabled() -> bool {
    true
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration loading or validation errors.
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

/// A config path and whether the user named it.
struct ResolvedPath {
    /// Path to read.
    path: PathBuf,
    /// True when supplied by the caller or the environment.
    explicit: bool,
}

/// Resolves the config path from CLI or environment defaults.
fn resolve_path(path: Option<&Path>) -> Result<ResolvedPath, ConfigError> {
    if let Some(path) = path {
        return Ok(ResolvedPath {
            path: path.to_path_buf(),
            explicit: true,
        });
    }
    if let Ok(env_path) = env::var(CONFIG_ENV_VAR) {
        if env_path.len() > MAX_TOTAL_PATH_LENGTH {
            return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
        }
        return Ok(ResolvedPath {
            path: PathBuf::from(env_path),
            explicit: true,
        });
    }
    Ok(ResolvedPath {
        path: PathBuf::from(DEFAULT_CONFIG_NAME),
        explicit: false,
    })
}

/// Validates the resolved path against security limits.
fn validate_path(path: &Path) -> Result<(), ConfigError> {
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
        let component_value = component.as_os_str().to_string_lossy();
        if component_value.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid(format!("{field} path component too long")));
        }
    }
    Ok(())
}

/// Validates a merchant text default, with a character limit when strict.
fn validate_text(field: &str, value: &str, max: Option<usize>) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::Invalid(format!("{field} must be non-empty")));
    }
    if let Some(max) = max {
        let length = value.to_uppercase().chars().count();
        if length > max {
            return Err(ConfigError::Invalid(format!(
                "{field} is {length} characters (max {max} in strict mode)"
            )));
        }
    }
    Ok(())
}
