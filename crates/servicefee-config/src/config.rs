// crates/servicefee-config/src/config.rs
// ============================================================================
// Module: Service Fee Configuration
// Description: Configuration loading and validation for the service fee tools.
// Purpose: Provide strict, fail-closed config parsing with hard limits.
// Dependencies: servicefee-core, servicefee-store-sqlite, serde, toml
// ============================================================================

//! ## Overview
//! Configuration is loaded from a TOML file with strict size and path limits.
//! Unknown keys are rejected and invalid values fail closed. The `[fees]`
//! table supplies the settings used until an administrator saves a record.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::env;
use std::fs;
use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;
use servicefee_core::DEFAULT_FEE_AMOUNT;
use servicefee_core::DEFAULT_FEE_MULTIPLIER;
use servicefee_core::DEFAULT_MIN_FREE_THRESHOLD;
use servicefee_core::FeeSettings;
use servicefee_store_sqlite::SqliteStoreConfig;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default configuration filename when no path is specified.
pub const DEFAULT_CONFIG_NAME: &str = "servicefee.toml";
/// Environment variable used to override the config path.
pub const CONFIG_ENV_VAR: &str = "SERVICEFEE_CONFIG";
/// Maximum configuration file size in bytes.
pub const MAX_CONFIG_FILE_SIZE: usize = 1024 * 1024;
/// Maximum length of a single path component.
const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Minimum allowed `SQLite` busy timeout in milliseconds.
const MIN_BUSY_TIMEOUT_MS: u64 = 100;
/// Maximum allowed `SQLite` busy timeout in milliseconds.
const MAX_BUSY_TIMEOUT_MS: u64 = 60_000;

// ============================================================================
// SECTION: Configuration Types
// ============================================================================

/// Service fee configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServiceFeeConfig {
    /// Fallback fee settings.
    #[serde(default)]
    pub fees: FeesConfig,
    /// Settings store configuration.
    #[serde(default)]
    pub store: StoreConfig,
    /// Audit output configuration.
    #[serde(default)]
    pub audit: AuditConfig,
}

impl ServiceFeeConfig {
    /// Loads configuration from disk using the default resolution rules.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when loading or validation fails.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let resolved = resolve_path(path)?;
        Self::load_file(&resolved)
    }

    /// Loads configuration, falling back to defaults when nothing was
    /// requested explicitly and the default file does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when an existing or explicitly requested file
    /// fails to load.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        let resolved = resolve_path(path)?;
        let implicit = path.is_none() && env::var_os(CONFIG_ENV_VAR).is_none();
        if implicit && !resolved.exists() {
            return Ok(Self::default());
        }
        Self::load_file(&resolved)
    }

    /// Parses and validates configuration text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed TOML and
    /// [`ConfigError::Invalid`] when validation fails.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
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
        self.fees.validate()?;
        self.store.validate()?;
        self.audit.validate()?;
        Ok(())
    }

    /// Reads, parses, and validates a resolved config path.
    fn load_file(resolved: &Path) -> Result<Self, ConfigError> {
        validate_path(resolved)?;
        let bytes = fs::read(resolved).map_err(|err| ConfigError::Io(err.to_string()))?;
        if bytes.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
        }
        let content = std::str::from_utf8(&bytes)
            .map_err(|_| ConfigError::Invalid("config file must be utf-8".to_string()))?;
        Self::from_toml_str(content)
    }
}

/// Fallback fee settings (`[fees]`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FeesConfig {
    /// Subtotals strictly below this amount are fee-exempt.
    #[serde(default = "default_min_free_threshold")]
    pub min_free_threshold: u64,
    /// Fee charged per multiplier bracket.
    #[serde(default = "default_fee_amount")]
    pub fee_amount: u64,
    /// Bracket size used to tier the fee.
    #[serde(default = "default_fee_multiplier")]
    pub fee_multiplier: u64,
}

impl Default for FeesConfig {
    fn default() -> Self {
        Self::from(FeeSettings::default())
    }
}

impl From<FeeSettings> for FeesConfig {
    fn from(settings: FeeSettings) -> Self {
        Self {
            min_free_threshold: settings.min_free_threshold,
            fee_amount: settings.fee_amount,
            fee_multiplier: settings.fee_multiplier,
        }
    }
}

impl FeesConfig {
    /// Returns the configured settings.
    #[must_use]
    pub const fn settings(&self) -> FeeSettings {
        FeeSettings::new(self.min_free_threshold, self.fee_amount, self.fee_multiplier)
    }

    /// Validates the fee settings.
    fn validate(&self) -> Result<(), ConfigError> {
        self.settings().validate().map_err(|err| ConfigError::Invalid(format!("fees: {err}")))
    }
}

/// Settings store configuration (`[store]`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StoreConfig {
    /// Store backend.
    #[serde(default)]
    pub backend: StoreBackend,
    /// `SQLite` settings when using the sqlite backend.
    #[serde(default)]
    pub sqlite: Option<SqliteStoreConfig>,
}

impl StoreConfig {
    /// Validates store configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        match self.backend {
            StoreBackend::Memory => {
                if self.sqlite.is_some() {
                    return Err(ConfigError::Invalid(
                        "memory store must not set store.sqlite".to_string(),
                    ));
                }
                Ok(())
            }
            StoreBackend::Sqlite => {
                let sqlite = self.sqlite.as_ref().ok_or_else(|| {
                    ConfigError::Invalid("sqlite store requires store.sqlite".to_string())
                })?;
                validate_path_string("store.sqlite.path", &sqlite.path.to_string_lossy())?;
                if !(MIN_BUSY_TIMEOUT_MS ..= MAX_BUSY_TIMEOUT_MS).contains(&sqlite.busy_timeout_ms)
                {
                    return Err(ConfigError::Invalid(format!(
                        "store.sqlite.busy_timeout_ms must be between {MIN_BUSY_TIMEOUT_MS} and \
                         {MAX_BUSY_TIMEOUT_MS}"
                    )));
                }
                if sqlite.max_versions == Some(0) {
                    return Err(ConfigError::Invalid(
                        "store.sqlite.max_versions must be greater than zero".to_string(),
                    ));
                }
                Ok(())
            }
        }
    }
}

/// Settings store backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum StoreBackend {
    /// Process-local store; settings are lost on exit.
    #[default]
    Memory,
    /// `SQLite`-backed durable store.
    Sqlite,
}

/// Audit output configuration (`[audit]`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AuditConfig {
    /// Enable settings audit events.
    #[serde(default)]
    pub enabled: bool,
    /// Optional audit log path (JSON lines); stderr when absent.
    #[serde(default)]
    pub path: Option<String>,
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

/// Resolves the config path from CLI or environment defaults.
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

/// Default free threshold.
const fn default_min_free_threshold() -> u64 {
    DEFAULT_MIN_FREE_THRESHOLD
}

/// Default per-bracket fee.
const fn default_fee_amount() -> u64 {
    DEFAULT_FEE_AMOUNT
}

/// Default bracket size.
const fn default_fee_multiplier() -> u64 {
    DEFAULT_FEE_MULTIPLIER
}

// ============================================================================
// SECTION: Tests
// ============================================================================
