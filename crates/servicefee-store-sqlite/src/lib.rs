// crates/servicefee-store-sqlite/src/lib.rs
// ============================================================================
// Module: SQLite Fee Settings Store
// Description: Durable FeeSettingsStore backend using SQLite.
// Purpose: Persist the singleton fee settings record across restarts.
// Dependencies: servicefee-core, rusqlite
// ============================================================================

//! ## Overview
//! This crate provides a SQLite-backed [`FeeSettingsStore`] implementation.
//! Every save appends a canonical JSON snapshot to a version table and moves
//! the singleton pointer forward. Loads verify the stored hash and fail closed
//! on corruption.
//!
//! [`FeeSettingsStore`]: servicefee_core::FeeSettingsStore

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod store;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use store::MAX_SETTINGS_BYTES;
pub use store::SqliteFeeSettingsStore;
pub use store::SqliteStoreConfig;
pub use store::SqliteStoreError;
pub use store::SqliteStoreMode;
pub use store::SqliteSyncMode;
