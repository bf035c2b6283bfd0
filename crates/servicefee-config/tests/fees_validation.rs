//! Fee and store validation tests for servicefee-config.
// crates/servicefee-config/tests/fees_validation.rs
// =============================================================================
// Module: Fee and Store Config Validation Tests
// Description: Validate [fees], [store], and [audit] constraints.
// Purpose: Ensure a misconfigured fee schedule never reaches checkout.
// =============================================================================

use std::path::PathBuf;

use servicefee_config::ServiceFeeConfig;
use servicefee_config::StoreBackend;
use servicefee_store_sqlite::SqliteStoreConfig;

mod common;

use common::TestResult;
use common::assert_invalid;

#[test]
fn fees_reject_zero_multiplier() -> TestResult {
    let mut config = common::minimal_config().map_err(|err| err.to_string())?;
    config.fees.fee_multiplier = 0;
    assert_invalid(config.validate(), "fee_multiplier must be greater than zero")
}

#[test]
fn fees_accept_zero_threshold_and_amount() -> TestResult {
    let mut config = common::minimal_config().map_err(|err| err.to_string())?;
    config.fees.min_free_threshold = 0;
    config.fees.fee_amount = 0;
    config.validate().map_err(|err| err.to_string())
}

#[test]
fn fees_reject_camel_case_keys() -> TestResult {
    assert_invalid(
        ServiceFeeConfig::from_toml_str("[fees]\nfeeMultiplier = 10\n"),
        "feeMultiplier",
    )
}

#[test]
fn memory_store_rejects_sqlite_table() -> TestResult {
    let mut config = common::minimal_config().map_err(|err| err.to_string())?;
    config.store.sqlite = Some(SqliteStoreConfig::for_path("fees.sqlite"));
    assert_invalid(config.validate(), "memory store must not set store.sqlite")
}

#[test]
fn sqlite_store_requires_table() -> TestResult {
    let mut config = common::minimal_config().map_err(|err| err.to_string())?;
    config.store.backend = StoreBackend::Sqlite;
    assert_invalid(config.validate(), "sqlite store requires store.sqlite")
}

#[test]
fn sqlite_store_rejects_blank_path() -> TestResult {
    let mut config = common::minimal_config().map_err(|err| err.to_string())?;
    config.store.backend = StoreBackend::Sqlite;
    config.store.sqlite = Some(SqliteStoreConfig::for_path(PathBuf::from("  ")));
    assert_invalid(config.validate(), "store.sqlite.path must be non-empty")
}

#[test]
fn sqlite_store_rejects_zero_max_versions() -> TestResult {
    let mut config = common::minimal_config().map_err(|err| err.to_string())?;
    config.store.backend = StoreBackend::Sqlite;
    let mut sqlite = SqliteStoreConfig::for_path("fees.sqlite");
    sqlite.max_versions = Some(0);
    config.store.sqlite = Some(sqlite);
    assert_invalid(config.validate(), "store.sqlite.max_versions must be greater than zero")
}

#[test]
fn sqlite_store_rejects_busy_timeout_out_of_range() -> TestResult {
    assert_invalid(
        ServiceFeeConfig::from_toml_str(
            "[store]\nbackend = \"sqlite\"\n[store.sqlite]\npath = \"f.sqlite\"\nbusy_timeout_ms = \
             60001\n",
        ),
        "busy_timeout_ms must be between",
    )
}

#[test]
fn sqlite_store_rejects_unknown_journal_mode() -> TestResult {
    assert_invalid(
        ServiceFeeConfig::from_toml_str(
            "[store]\nbackend = \"sqlite\"\n[store.sqlite]\npath = \"f.sqlite\"\njournal_mode = \
             \"memory\"\n",
        ),
        "memory",
    )
}

#[test]
fn audit_rejects_blank_path() -> TestResult {
    let mut config = common::minimal_config().map_err(|err| err.to_string())?;
    config.audit.enabled = true;
    config.audit.path = Some(String::new());
    assert_invalid(config.validate(), "audit.path must be non-empty")
}
