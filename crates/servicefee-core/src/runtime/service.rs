// crates/servicefee-core/src/runtime/service.rs
// ============================================================================
// Module: Fee Settings Service
// Description: Resolves, updates, and applies the active fee settings.
// Purpose: The single place settings are loaded from and written to a store.
// Dependencies: crate::core, crate::interfaces, thiserror
// ============================================================================

//! ## Overview
//! [`FeeSettingsService`] resolves the active settings once per request and
//! hands the snapshot to the pure calculator. Administrative updates are
//! validated before anything is persisted, so a zero multiplier is rejected at
//! write time instead of surfacing during checkout.
//!
//! ## Invariants
//! - When the store holds no record, the configured defaults are active.
//! - A rejected update leaves the store untouched and emits `settings_rejected`.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use thiserror::Error;

use crate::core::FeeError;
use crate::core::FeeSettings;
use crate::core::HashError;
use crate::core::OrderInputs;
use crate::core::OrderQuote;
use crate::core::quote_order;
use crate::core::settings_digest;
use crate::interfaces::FeeAuditSink;
use crate::interfaces::FeeSettingsStore;
use crate::interfaces::StoreError;
use crate::interfaces::StoredFeeSettings;
use crate::runtime::audit::FeeAuditEvent;
use crate::runtime::audit::NoopAuditSink;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Settings service errors.
#[derive(Debug, Error)]
pub enum FeeSettingsError {
    /// Settings or inputs were rejected by the fee policy.
    #[error(transparent)]
    Fee(#[from] FeeError),
    /// The settings store failed.
    #[error(transparent)]
    Store(#[from] StoreError),
    /// Settings could not be fingerprinted.
    #[error(transparent)]
    Hash(#[from] HashError),
}

// ============================================================================
// SECTION: Service
// ============================================================================

/// Active settings together with the record they came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveFeeSettings {
    /// Settings in force.
    pub settings: FeeSettings,
    /// Stored record; `None` when the configured defaults are in force.
    pub record: Option<StoredFeeSettings>,
}

/// Fee settings service over a [`FeeSettingsStore`].
pub struct FeeSettingsService<S> {
    /// Backing settings store.
    store: S,
    /// Settings used when the store is empty.
    defaults: FeeSettings,
    /// Audit sink for administrative updates.
    audit: Arc<dyn FeeAuditSink>,
}

impl<S: FeeSettingsStore> FeeSettingsService<S> {
    /// Creates a service with the given fallback defaults.
    ///
    /// # Errors
    ///
    /// Returns [`FeeSettingsError::Fee`] when `defaults` are invalid.
    pub fn new(store: S, defaults: FeeSettings) -> Result<Self, FeeSettingsError> {
        defaults.validate()?;
        Ok(Self {
            store,
            defaults,
            audit: Arc::new(NoopAuditSink),
        })
    }

    /// Replaces the audit sink.
    #[must_use]
    pub fn with_audit(mut self, audit: Arc<dyn FeeAuditSink>) -> Self {
        self.audit = audit;
        self
    }

    /// Returns the backing store.
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Returns the stored record, if any.
    ///
    /// # Errors
    ///
    /// Returns [`FeeSettingsError::Store`] when the store cannot be read.
    pub fn record(&self) -> Result<Option<StoredFeeSettings>, FeeSettingsError> {
        Ok(self.store.load()?)
    }

    /// Resolves the active settings and their record from one store read.
    ///
    /// # Errors
    ///
    /// Returns [`FeeSettingsError::Store`] when the store fails and
    /// [`FeeSettingsError::Fee`] when the stored record is invalid.
    pub fn resolve(&self) -> Result<ActiveFeeSettings, FeeSettingsError> {
        let record = self.store.load()?;
        let settings = match &record {
            Some(record) => {
                record.settings.validate()?;
                record.settings
            }
            None => self.defaults,
        };
        Ok(ActiveFeeSettings {
            settings,
            record,
        })
    }

    /// Resolves the active settings snapshot.
    ///
    /// # Errors
    ///
    /// Same conditions as [`Self::resolve`].
    pub fn current(&self) -> Result<FeeSettings, FeeSettingsError> {
        Ok(self.resolve()?.settings)
    }

    /// Validates and persists new settings on behalf of `actor`.
    ///
    /// The previous digest in the audit event is taken from the record the
    /// store replaced, not from a separate read.
    ///
    /// # Errors
    ///
    /// Returns [`FeeSettingsError::Fee`] when the settings are invalid (nothing
    /// is persisted), and store or hashing errors otherwise.
    pub fn update(
        &self,
        settings: FeeSettings,
        actor: &str,
    ) -> Result<StoredFeeSettings, FeeSettingsError> {
        if let Err(err) = settings.validate() {
            self.audit.record(&FeeAuditEvent::rejected(actor, settings, err.to_string()));
            return Err(err.into());
        }
        let change = self.store.save(&settings)?;
        let previous_hash =
            change.previous.as_ref().map(|record| settings_digest(&record.settings)).transpose()?;
        let settings_hash = settings_digest(&change.current.settings)?;
        self.audit.record(&FeeAuditEvent::updated(
            actor,
            change.current.settings,
            change.current.version,
            previous_hash,
            Some(settings_hash),
        ));
        Ok(change.current)
    }

    /// Quotes an order against a single snapshot of the active settings.
    ///
    /// # Errors
    ///
    /// Returns any error from [`Self::current`] or [`quote_order`].
    pub fn quote(&self, inputs: &OrderInputs) -> Result<OrderQuote, FeeSettingsError> {
        let settings = self.current()?;
        Ok(quote_order(inputs, &settings)?)
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
