// crates/servicefee-store-sqlite/tests/sqlite_store.rs
// ============================================================================
// Module: SQLite Store Tests
// Description: Validate SQLite FeeSettingsStore behavior.
// Purpose: Ensure durable persistence and integrity checks.
// Dependencies: servicefee-store-sqlite, servicefee-core, rusqlite, tempfile
// ============================================================================

//! ## Overview
//! Conformance tests for the SQLite-backed fee settings store. Storage is
//! treated as untrusted: tampered rows, unknown schema versions, and invalid
//! settings must all fail closed.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only assertions and helpers are permitted."
)]

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::Path;
use std::sync::Arc;

use servicefee_core::FeeSettings;
use servicefee_core::FeeSettingsService;
use servicefee_core::FeeSettingsStore;
use servicefee_core::StoreError;
use servicefee_core::DEFAULT_HASH_ALGORITHM;
use servicefee_core::SettingsDigest;
use servicefee_store_sqlite::MAX_SETTINGS_BYTES;
use servicefee_store_sqlite::SqliteFeeSettingsStore;
use servicefee_store_sqlite::SqliteStoreConfig;
use servicefee_store_sqlite::SqliteStoreError;
use servicefee_store_sqlite::SqliteStoreMode;
use servicefee_store_sqlite::SqliteSyncMode;
use tempfile::TempDir;

// ============================================================================
// SECTION: Helpers
// ============================================================================

fn config_for(path: &Path, max_versions: Option<u64>) -> SqliteStoreConfig {
    SqliteStoreConfig {
        path: path.to_path_buf(),
        busy_timeout_ms: 1_000,
        journal_mode: SqliteStoreMode::Wal,
        sync_mode: SqliteSyncMode::Full,
        max_versions,
    }
}

fn store_for(path: &Path) -> SqliteFeeSettingsStore {
    SqliteFeeSettingsStore::new(config_for(path, None)).expect("store init")
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[test]
fn sqlite_store_is_empty_until_first_save() {
    let temp = TempDir::new().unwrap();
    let store = store_for(&temp.path().join("store.sqlite"));
    assert!(store.load().unwrap().is_none());
}

#[test]
fn sqlite_store_roundtrip() {
    let temp = TempDir::new().unwrap();
    let store = store_for(&temp.path().join("store.sqlite"));
    let settings = FeeSettings::new(25_000, 750, 50_000);
    let saved = store.save(&settings).unwrap();
    assert!(saved.previous.is_none());
    assert_eq!(saved.current.version, 1);
    let loaded = store.load().unwrap().unwrap();
    assert_eq!(loaded, saved.current);
}

#[test]
fn sqlite_store_versions_increase_by_one() {
    let temp = TempDir::new().unwrap();
    let store = store_for(&temp.path().join("store.sqlite"));
    for expected in 1 ..= 5_u64 {
        let saved = store.save(&FeeSettings::new(expected, 1_000, 100_000)).unwrap();
        assert_eq!(saved.current.version, expected);
        let previous_version = (expected > 1).then(|| expected - 1);
        assert_eq!(saved.previous.map(|record| record.version), previous_version);
    }
    let loaded = store.load().unwrap().unwrap();
    assert_eq!(loaded.version, 5);
    assert_eq!(loaded.settings.min_free_threshold, 5);
}

#[test]
fn sqlite_store_persists_across_instances() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("nested").join("store.sqlite");
    let settings = FeeSettings::new(10, 20, 30);
    {
        let store = store_for(&path);
        store.save(&settings).unwrap();
    }
    let reopened = store_for(&path);
    let loaded = reopened.load().unwrap().unwrap();
    assert_eq!(loaded.settings, settings);
    assert_eq!(loaded.version, 1);
}

#[test]
fn sqlite_store_rejects_invalid_settings_on_save() {
    let temp = TempDir::new().unwrap();
    let store = store_for(&temp.path().join("store.sqlite"));
    let result = store.save(&FeeSettings::new(50_000, 1_000, 0));
    assert!(matches!(result, Err(StoreError::Invalid(_))));
    assert!(store.load().unwrap().is_none());
}

#[test]
fn sqlite_store_detects_corrupt_hash() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("store.sqlite");
    let store = store_for(&path);
    store.save(&FeeSettings::default()).unwrap();
    {
        let connection = rusqlite::Connection::open(&path).unwrap();
        connection
            .execute("UPDATE fee_settings_versions SET settings_hash = 'bad'", rusqlite::params![])
            .unwrap();
    }
    assert!(matches!(store.load(), Err(StoreError::Corrupt(_))));
}

#[test]
fn sqlite_store_save_reports_replaced_record() {
    let temp = TempDir::new().unwrap();
    let store = store_for(&temp.path().join("store.sqlite"));
    let first = store.save(&FeeSettings::new(1, 2, 3)).unwrap().current;
    let second = store.save(&FeeSettings::new(4, 5, 6)).unwrap();
    assert_eq!(second.previous, Some(first));
    assert_eq!(second.current.settings, FeeSettings::new(4, 5, 6));
}

#[test]
fn sqlite_store_refuses_to_save_over_tampered_record() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("store.sqlite");
    let store = store_for(&path);
    store.save(&FeeSettings::default()).unwrap();
    {
        let connection = rusqlite::Connection::open(&path).unwrap();
        connection
            .execute("UPDATE fee_settings_versions SET settings_hash = 'bad'", rusqlite::params![])
            .unwrap();
    }
    assert!(matches!(store.save(&FeeSettings::new(1, 2, 3)), Err(StoreError::Corrupt(_))));
    let connection = rusqlite::Connection::open(&path).unwrap();
    let latest: i64 = connection
        .query_row("SELECT latest_version FROM fee_settings", rusqlite::params![], |row| row.get(0))
        .unwrap();
    assert_eq!(latest, 1);
}

#[test]
fn sqlite_store_rejects_rehashed_zero_multiplier() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("store.sqlite");
    let store = store_for(&path);
    store.save(&FeeSettings::default()).unwrap();
    let payload = br#"{"fee_amount":1000,"fee_multiplier":0,"min_free_threshold":50000}"#.to_vec();
    let digest = SettingsDigest::of_bytes(DEFAULT_HASH_ALGORITHM, &payload);
    {
        let connection = rusqlite::Connection::open(&path).unwrap();
        connection
            .execute(
                "UPDATE fee_settings_versions SET settings_json = ?1, settings_hash = ?2",
                rusqlite::params![payload, digest.value],
            )
            .unwrap();
    }
    assert!(matches!(store.load(), Err(StoreError::Invalid(_))));
}

#[test]
fn sqlite_store_rejects_oversized_payload() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("store.sqlite");
    let store = store_for(&path);
    let oversized = vec![b' '; MAX_SETTINGS_BYTES + 1];
    let digest = SettingsDigest::of_bytes(DEFAULT_HASH_ALGORITHM, &oversized);
    {
        let connection = rusqlite::Connection::open(&path).unwrap();
        connection
            .execute(
                "INSERT INTO fee_settings_versions (version, settings_json, settings_hash, \
                 hash_algorithm, saved_at) VALUES (1, ?1, ?2, 'sha256', 0)",
                rusqlite::params![oversized, digest.value],
            )
            .unwrap();
        connection
            .execute("INSERT INTO fee_settings (id, latest_version) VALUES (1, 1)", rusqlite::params![])
            .unwrap();
    }
    let result = store.load();
    assert!(matches!(result, Err(StoreError::Invalid(message)) if message.contains("size limit")));
}

#[test]
fn sqlite_store_rejects_missing_version_row() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("store.sqlite");
    let store = store_for(&path);
    store.save(&FeeSettings::default()).unwrap();
    {
        let connection = rusqlite::Connection::open(&path).unwrap();
        connection.execute("UPDATE fee_settings SET latest_version = 7", rusqlite::params![]).unwrap();
    }
    assert!(matches!(store.load(), Err(StoreError::Corrupt(_))));
}

#[test]
fn sqlite_store_rejects_invalid_hash_algorithm() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("store.sqlite");
    let store = store_for(&path);
    store.save(&FeeSettings::default()).unwrap();
    {
        let connection = rusqlite::Connection::open(&path).unwrap();
        connection
            .execute("UPDATE fee_settings_versions SET hash_algorithm = 'md5'", rusqlite::params![])
            .unwrap();
    }
    assert!(matches!(store.load(), Err(StoreError::Invalid(_))));
}

#[test]
fn sqlite_store_singleton_row_is_enforced() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("store.sqlite");
    let store = store_for(&path);
    store.save(&FeeSettings::default()).unwrap();
    let connection = rusqlite::Connection::open(&path).unwrap();
    let result = connection
        .execute("INSERT INTO fee_settings (id, latest_version) VALUES (2, 1)", rusqlite::params![]);
    assert!(result.is_err());
}

#[test]
fn sqlite_store_enforces_max_versions() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("store.sqlite");
    let store = SqliteFeeSettingsStore::new(config_for(&path, Some(2))).unwrap();
    for threshold in 0 .. 4_u64 {
        store.save(&FeeSettings::new(threshold, 1, 1)).unwrap();
    }
    let connection = rusqlite::Connection::open(&path).unwrap();
    let versions: Vec<i64> = connection
        .prepare("SELECT version FROM fee_settings_versions ORDER BY version")
        .unwrap()
        .query_map(rusqlite::params![], |row| row.get(0))
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap();
    assert_eq!(versions, vec![3, 4]);
    assert_eq!(store.load().unwrap().unwrap().version, 4);
}

#[test]
fn sqlite_store_rejects_version_mismatch() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("store.sqlite");
    drop(store_for(&path));
    {
        let connection = rusqlite::Connection::open(&path).unwrap();
        connection.execute("UPDATE store_meta SET version = 999", rusqlite::params![]).unwrap();
    }
    let result = SqliteFeeSettingsStore::new(config_for(&path, None));
    assert!(matches!(result, Err(SqliteStoreError::VersionMismatch(_))));
}

#[test]
fn sqlite_store_rejects_directory_path() {
    let temp = TempDir::new().unwrap();
    let result = SqliteFeeSettingsStore::new(config_for(temp.path(), None));
    assert!(matches!(result, Err(SqliteStoreError::Invalid(_))));
}

#[test]
fn sqlite_store_rejects_overlong_path_component() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("x".repeat(300));
    let result = SqliteFeeSettingsStore::new(config_for(&path, None));
    assert!(matches!(result, Err(SqliteStoreError::Invalid(_))));
}

#[test]
fn sqlite_store_allows_concurrent_saves() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("store.sqlite");
    let store = Arc::new(store_for(&path));
    let mut handles = Vec::new();
    for index in 0 .. 10_u64 {
        let store = Arc::clone(&store);
        handles.push(std::thread::spawn(move || {
            store.save(&FeeSettings::new(index, 1_000, 100_000)).unwrap()
        }));
    }
    let mut changes: Vec<_> = handles.into_iter().map(|handle| handle.join().unwrap()).collect();
    changes.sort_by_key(|change| change.current.version);
    for pair in changes.windows(2) {
        assert_eq!(pair[1].previous.as_ref(), Some(&pair[0].current));
    }
    assert_eq!(store.load().unwrap().unwrap().version, 10);
}

#[test]
fn sqlite_store_backs_the_settings_service() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("store.sqlite");
    let service = FeeSettingsService::new(store_for(&path), FeeSettings::default()).unwrap();
    assert_eq!(service.current().unwrap(), FeeSettings::default());
    service.update(FeeSettings::new(0, 100, 1_000), "admin").unwrap();
    assert!(service.update(FeeSettings::new(0, 100, 0), "admin").is_err());

    let reopened = FeeSettingsService::new(store_for(&path), FeeSettings::default()).unwrap();
    assert_eq!(reopened.current().unwrap(), FeeSettings::new(0, 100, 1_000));
    assert_eq!(reopened.record().unwrap().unwrap().version, 1);
}
