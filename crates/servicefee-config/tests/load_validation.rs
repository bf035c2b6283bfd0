//! File loading tests for servicefee-config.
// crates/servicefee-config/tests/load_validation.rs
// =============================================================================
// Module: Config Load Validation Tests
// Description: Validate file-level limits and parsing of servicefee.toml.
// Purpose: Ensure config loading fails closed on malformed inputs.
// =============================================================================

#![allow(clippy::use_debug, reason = "Test failure messages include debug output.")]

use std::io::Write;

use servicefee_config::ConfigError;
use servicefee_config::MAX_CONFIG_FILE_SIZE;
use servicefee_config::ServiceFeeConfig;
use servicefee_config::StoreBackend;
use servicefee_core::FeeSettings;
use tempfile::NamedTempFile;

mod common;

use common::TestResult;
use common::assert_invalid;

fn write_config(contents: &[u8]) -> Result<NamedTempFile, String> {
    let mut file = NamedTempFile::new().map_err(|err| err.to_string())?;
    file.write_all(contents).map_err(|err| err.to_string())?;
    Ok(file)
}

#[test]
fn load_reads_full_config() -> TestResult {
    let file = write_config(
        br#"
[fees]
min_free_threshold = 10000
fee_amount = 500
fee_multiplier = 20000

[store]
backend = "sqlite"

[store.sqlite]
path = "fees.sqlite"
busy_timeout_ms = 2000
journal_mode = "delete"
sync_mode = "normal"
max_versions = 10

[audit]
enabled = true
path = "audit.jsonl"
"#,
    )?;
    let config = ServiceFeeConfig::load(Some(file.path())).map_err(|err| err.to_string())?;
    if config.fees.settings() != FeeSettings::new(10_000, 500, 20_000) {
        return Err(format!("unexpected fees: {:?}", config.fees));
    }
    if config.store.backend != StoreBackend::Sqlite {
        return Err("expected sqlite backend".to_string());
    }
    let sqlite = config.store.sqlite.ok_or("missing sqlite config")?;
    if sqlite.max_versions != Some(10) || sqlite.busy_timeout_ms != 2_000 {
        return Err(format!("unexpected sqlite config: {sqlite:?}"));
    }
    if !config.audit.enabled || config.audit.path.as_deref() != Some("audit.jsonl") {
        return Err("unexpected audit config".to_string());
    }
    Ok(())
}

#[test]
fn load_rejects_missing_file() -> TestResult {
    let dir = tempfile::tempdir().map_err(|err| err.to_string())?;
    let result = ServiceFeeConfig::load(Some(&dir.path().join("missing.toml")));
    match result {
        Err(ConfigError::Io(_)) => Ok(()),
        other => Err(format!("expected io error, got {other:?}")),
    }
}

#[test]
fn load_rejects_oversized_file() -> TestResult {
    let file = write_config(&vec![b'#'; MAX_CONFIG_FILE_SIZE + 1])?;
    assert_invalid(ServiceFeeConfig::load(Some(file.path())), "config file exceeds size limit")
}

#[test]
fn load_rejects_non_utf8() -> TestResult {
    let file = write_config(&[0xff, 0xfe, 0xfd])?;
    assert_invalid(ServiceFeeConfig::load(Some(file.path())), "config file must be utf-8")
}

#[test]
fn load_rejects_malformed_toml() -> TestResult {
    let file = write_config(b"[fees\nfee_amount = 1")?;
    match ServiceFeeConfig::load(Some(file.path())) {
        Err(ConfigError::Parse(_)) => Ok(()),
        other => Err(format!("expected parse error, got {other:?}")),
    }
}

#[test]
fn load_rejects_unknown_keys() -> TestResult {
    let file = write_config(b"[fees]\nfee_amount = 1\nsurcharge = 2\n")?;
    assert_invalid(ServiceFeeConfig::load(Some(file.path())), "surcharge")
}

#[test]
fn load_rejects_overlong_path_component() -> TestResult {
    let dir = tempfile::tempdir().map_err(|err| err.to_string())?;
    let path = dir.path().join("c".repeat(300));
    assert_invalid(ServiceFeeConfig::load(Some(&path)), "config path component too long")
}

#[test]
fn load_or_default_still_reads_explicit_paths() -> TestResult {
    let dir = tempfile::tempdir().map_err(|err| err.to_string())?;
    let result = ServiceFeeConfig::load_or_default(Some(&dir.path().join("missing.toml")));
    match result {
        Err(ConfigError::Io(_)) => Ok(()),
        other => Err(format!("expected io error, got {other:?}")),
    }
}
