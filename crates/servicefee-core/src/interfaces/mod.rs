// crates/servicefee-core/src/interfaces/mod.rs
// ============================================================================
// Module: Service Fee Interfaces
// Description: Backend-agnostic interfaces for settings storage and auditing.
// Purpose: Define the contract surfaces used by the settings runtime.
// Dependencies: crate::core, crate::runtime
// ============================================================================

//! ## Overview
//! The fee policy itself never performs I/O. Persisting the singleton settings
//! record and recording administrative changes happen behind these traits so
//! backends can be swapped without touching the calculator. Implementations
//! must fail closed on missing or invalid data.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use crate::core::FeeSettings;
use crate::runtime::FeeAuditEvent;

// ============================================================================
// SECTION: Settings Store
// ============================================================================

/// A persisted settings record with its version metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredFeeSettings {
    /// Active settings.
    pub settings: FeeSettings,
    /// Monotonic version, starting at 1 for the first save.
    pub version: u64,
    /// Save time in milliseconds since the unix epoch.
    pub updated_at_ms: i64,
}

/// Outcome of a save: the record it replaced and the record now active.
///
/// Both sides are read under the same lock or transaction, so `previous` is
/// exactly the record `current` superseded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingsChange {
    /// Active record before the save, if any.
    pub previous: Option<StoredFeeSettings>,
    /// Newly active record.
    pub current: StoredFeeSettings,
}

/// Settings store errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Store I/O error.
    #[error("fee settings store io error: {0}")]
    Io(String),
    /// Store data is corrupted or fails integrity checks.
    #[error("fee settings store corruption: {0}")]
    Corrupt(String),
    /// Store data version is incompatible.
    #[error("fee settings store version mismatch: {0}")]
    VersionMismatch(String),
    /// Store data is invalid.
    #[error("fee settings store invalid data: {0}")]
    Invalid(String),
    /// Store reported an error.
    #[error("fee settings store error: {0}")]
    Store(String),
}

/// Persistence for the singleton fee settings record.
pub trait FeeSettingsStore {
    /// Loads the active settings, or `None` when nothing has been saved yet.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when loading fails.
    fn load(&self) -> Result<Option<StoredFeeSettings>, StoreError>;

    /// Replaces the active settings atomically.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when saving fails, the settings are invalid, or
    /// the record being replaced fails its integrity checks.
    fn save(&self, settings: &FeeSettings) -> Result<SettingsChange, StoreError>;
}

// ============================================================================
// SECTION: Audit Sink
// ============================================================================

/// Sink for settings audit events.
pub trait FeeAuditSink: Send + Sync {
    /// Records an audit event.
    fn record(&self, event: &FeeAuditEvent);
}
