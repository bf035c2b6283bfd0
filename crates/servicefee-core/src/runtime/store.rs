// crates/servicefee-core/src/runtime/store.rs
// ============================================================================
// Module: In-Memory Settings Store
// Description: Process-local fee settings store for tests and single-process use.
// Purpose: Provide a deterministic store implementation without external deps.
// Dependencies: crate::core, crate::interfaces
// ============================================================================

//! ## Overview
//! A mutex-guarded singleton record. Saves validate the settings before they
//! replace the active record and bump the version by one; the replaced record
//! is taken under the same lock.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;
use std::sync::Mutex;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use crate::core::FeeSettings;
use crate::interfaces::FeeSettingsStore;
use crate::interfaces::SettingsChange;
use crate::interfaces::StoreError;
use crate::interfaces::StoredFeeSettings;

// ============================================================================
// SECTION: In-Memory Store
// ============================================================================

/// In-memory fee settings store.
#[derive(Debug, Default, Clone)]
pub struct InMemoryFeeSettingsStore {
    /// Active record protected by a mutex.
    record: Arc<Mutex<Option<StoredFeeSettings>>>,
}

impl InMemoryFeeSettingsStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl FeeSettingsStore for InMemoryFeeSettingsStore {
    fn load(&self) -> Result<Option<StoredFeeSettings>, StoreError> {
        let guard =
            self.record.lock().map_err(|_| StoreError::Store("mutex poisoned".to_string()))?;
        Ok(guard.clone())
    }

    fn save(&self, settings: &FeeSettings) -> Result<SettingsChange, StoreError> {
        settings.validate().map_err(|err| StoreError::Invalid(err.to_string()))?;
        let mut guard =
            self.record.lock().map_err(|_| StoreError::Store("mutex poisoned".to_string()))?;
        let version = match guard.as_ref() {
            None => 1,
            Some(current) => current
                .version
                .checked_add(1)
                .ok_or_else(|| StoreError::Corrupt("settings version overflow".to_string()))?,
        };
        let record = StoredFeeSettings {
            settings: *settings,
            version,
            updated_at_ms: unix_millis(),
        };
        let previous = guard.replace(record.clone());
        drop(guard);
        Ok(SettingsChange {
            previous,
            current: record,
        })
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Returns the current unix epoch in milliseconds.
pub(crate) fn unix_millis() -> i64 {
    let now = SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default();
    i64::try_from(now.as_millis()).unwrap_or(i64::MAX)
}

// ============================================================================
// SECTION: Tests
// ============================================================================
