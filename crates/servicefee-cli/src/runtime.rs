// crates/servicefee-cli/src/runtime.rs
// ============================================================================
// Module: CLI Runtime Wiring
// Description: Builds the fee settings service from configuration.
// Purpose: Select the store backend and audit sink named by servicefee.toml.
// Dependencies: servicefee-core, servicefee-config, servicefee-store-sqlite
// ============================================================================

//! ## Overview
//! [`build_service`] is the only place the CLI turns configuration into a
//! running [`FeeSettingsService`]. The store backend is chosen at runtime, so
//! [`ConfiguredStore`] dispatches to whichever backend the config selects.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::Path;
use std::sync::Arc;

use servicefee_config::AuditConfig;
use servicefee_config::ServiceFeeConfig;
use servicefee_config::StoreBackend;
use servicefee_core::FeeAuditSink;
use servicefee_core::FeeSettings;
use servicefee_core::FeeSettingsError;
use servicefee_core::FeeSettingsService;
use servicefee_core::FeeSettingsStore;
use servicefee_core::FileAuditSink;
use servicefee_core::InMemoryFeeSettingsStore;
use servicefee_core::NoopAuditSink;
use servicefee_core::SettingsChange;
use servicefee_core::StderrAuditSink;
use servicefee_core::StoreError;
use servicefee_core::StoredFeeSettings;
use servicefee_store_sqlite::SqliteFeeSettingsStore;
use servicefee_store_sqlite::SqliteStoreError;
use thiserror::Error;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors raised while wiring the settings service.
#[derive(Debug, Error)]
pub enum RuntimeError {
    /// The configured store could not be opened.
    #[error("{0}")]
    Store(String),
    /// The audit log could not be opened.
    #[error("{path}: {error}")]
    Audit {
        /// Audit log path.
        path: String,
        /// Underlying I/O error.
        error: String,
    },
    /// The configured fallback settings were rejected.
    #[error(transparent)]
    Settings(#[from] FeeSettingsError),
}

impl From<SqliteStoreError> for RuntimeError {
    fn from(error: SqliteStoreError) -> Self {
        Self::Store(error.to_string())
    }
}

// ============================================================================
// SECTION: Store Dispatch
// ============================================================================

/// Fee settings store selected by configuration.
#[derive(Clone)]
pub enum ConfiguredStore {
    /// Process-local store.
    Memory(InMemoryFeeSettingsStore),
    /// `SQLite`-backed store.
    Sqlite(SqliteFeeSettingsStore),
}

impl ConfiguredStore {
    /// Opens the backend named by `config`.
    ///
    /// # Errors
    ///
    /// Returns [`RuntimeError::Store`] when the backend cannot be opened.
    pub fn open(config: &ServiceFeeConfig) -> Result<Self, RuntimeError> {
        match (config.store.backend, &config.store.sqlite) {
            (StoreBackend::Memory, _) => Ok(Self::Memory(InMemoryFeeSettingsStore::new())),
            (StoreBackend::Sqlite, Some(sqlite)) => {
                Ok(Self::Sqlite(SqliteFeeSettingsStore::new(sqlite.clone())?))
            }
            (StoreBackend::Sqlite, None) => {
                Err(RuntimeError::Store("sqlite store requires store.sqlite".to_string()))
            }
        }
    }

    /// Returns true when updates do not survive the process.
    #[must_use]
    pub const fn is_ephemeral(&self) -> bool {
        matches!(self, Self::Memory(_))
    }
}

impl FeeSettingsStore for ConfiguredStore {
    fn load(&self) -> Result<Option<StoredFeeSettings>, StoreError> {
        match self {
            Self::Memory(store) => store.load(),
            Self::Sqlite(store) => store.load(),
        }
    }

    fn save(&self, settings: &FeeSettings) -> Result<SettingsChange, StoreError> {
        match self {
            Self::Memory(store) => store.save(settings),
            Self::Sqlite(store) => store.save(settings),
        }
    }
}

// ============================================================================
// SECTION: Service Construction
// ============================================================================

/// Builds the settings service described by `config`.
///
/// # Errors
///
/// Returns [`RuntimeError`] when the store or audit log cannot be opened.
pub fn build_service(
    config: &ServiceFeeConfig,
) -> Result<FeeSettingsService<ConfiguredStore>, RuntimeError> {
    let store = ConfiguredStore::open(config)?;
    let audit = audit_sink(&config.audit)?;
    Ok(FeeSettingsService::new(store, config.fees.settings())?.with_audit(audit))
}

/// Selects the audit sink for `audit`.
fn audit_sink(audit: &AuditConfig) -> Result<Arc<dyn FeeAuditSink>, RuntimeError> {
    if !audit.enabled {
        return Ok(Arc::new(NoopAuditSink));
    }
    let Some(path) = audit.path.as_deref() else {
        return Ok(Arc::new(StderrAuditSink));
    };
    let sink = FileAuditSink::new(Path::new(path)).map_err(|err| RuntimeError::Audit {
        path: path.to_string(),
        error: err.to_string(),
    })?;
    Ok(Arc::new(sink))
}

// ============================================================================
// SECTION: Tests
// ============================================================================
