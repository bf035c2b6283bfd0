// crates/servicefee-store-sqlite/src/store.rs
// ============================================================================
// Module: SQLite Fee Settings Store
// Description: Durable FeeSettingsStore backed by SQLite.
// Purpose: Persist fee settings snapshots with integrity hashes.
// Dependencies: servicefee-core, rusqlite, serde, serde_json, thiserror
// ============================================================================

//! ## Overview
//! This module implements a durable [`FeeSettingsStore`] using `SQLite`. The
//! `fee_settings` table holds exactly one row pointing at the active version;
//! each save appends a canonical JSON snapshot to `fee_settings_versions`.
//! Loads verify the stored hash and re-validate the settings, so a tampered or
//! hand-edited row never reaches the calculator.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::Mutex;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use rusqlite::Connection;
use rusqlite::OpenFlags;
use rusqlite::OptionalExtension;
use rusqlite::Transaction;
use rusqlite::params;
use serde::Deserialize;
use servicefee_core::FeeSettings;
use servicefee_core::FeeSettingsStore;
use servicefee_core::HashAlgorithm;
use servicefee_core::SettingsChange;
use servicefee_core::SettingsDigest;
use servicefee_core::StoreError;
use servicefee_core::StoredFeeSettings;
use servicefee_core::canonical_settings;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// `SQLite` schema version for the store.
const SCHEMA_VERSION: i64 = 1;
/// Default busy timeout (ms).
const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;
/// Maximum length of a single path component.
const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Maximum settings snapshot size accepted by the store.
pub const MAX_SETTINGS_BYTES: usize = 64 * 1024;

// ============================================================================
// SECTION: Config
// ============================================================================

/// `SQLite` journal mode configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SqliteStoreMode {
    /// WAL journal mode (recommended).
    #[default]
    Wal,
    /// Delete journal mode.
    Delete,
}

impl SqliteStoreMode {
    /// Returns the `SQLite` pragma value.
    #[must_use]
    pub const fn pragma_value(self) -> &'static str {
        match self {
            Self::Wal => "wal",
            Self::Delete => "delete",
        }
    }
}

/// `SQLite` sync mode configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SqliteSyncMode {
    /// Full synchronous mode (safest).
    #[default]
    Full,
    /// Normal synchronous mode.
    Normal,
}

impl SqliteSyncMode {
    /// Returns the `SQLite` pragma value.
    #[must_use]
    pub const fn pragma_value(self) -> &'static str {
        match self {
            Self::Full => "full",
            Self::Normal => "normal",
        }
    }
}

/// Configuration for the `SQLite` fee settings store.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SqliteStoreConfig {
    /// Path to the `SQLite` database file.
    pub path: PathBuf,
    /// Busy timeout in milliseconds.
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,
    /// `SQLite` journal mode.
    #[serde(default)]
    pub journal_mode: SqliteStoreMode,
    /// `SQLite` sync mode.
    #[serde(default)]
    pub sync_mode: SqliteSyncMode,
    /// Optional number of settings versions to retain (older ones pruned).
    #[serde(default)]
    pub max_versions: Option<u64>,
}

impl SqliteStoreConfig {
    /// Returns a config for `path` with default tuning.
    #[must_use]
    pub fn for_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            busy_timeout_ms: DEFAULT_BUSY_TIMEOUT_MS,
            journal_mode: SqliteStoreMode::default(),
            sync_mode: SqliteSyncMode::default(),
            max_versions: None,
        }
    }
}

/// Returns the default busy timeout for `SQLite` connections.
const fn default_busy_timeout_ms() -> u64 {
    DEFAULT_BUSY_TIMEOUT_MS
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// `SQLite` store errors.
#[derive(Debug, Error)]
pub enum SqliteStoreError {
    /// Store I/O error.
    #[error("sqlite store io error: {0}")]
    Io(String),
    /// `SQLite` engine error.
    #[error("sqlite store db error: {0}")]
    Db(String),
    /// Store corruption or hash mismatch.
    #[error("sqlite store corruption: {0}")]
    Corrupt(String),
    /// Store schema version mismatch.
    #[error("sqlite store version mismatch: {0}")]
    VersionMismatch(String),
    /// Invalid store data.
    #[error("sqlite store invalid data: {0}")]
    Invalid(String),
    /// Stored payload exceeded the size limit.
    #[error("sqlite store payload too large: {actual_bytes} bytes (max {max_bytes})")]
    TooLarge {
        /// Maximum allowed bytes.
        max_bytes: usize,
        /// Actual payload size in bytes.
        actual_bytes: usize,
    },
}

impl From<SqliteStoreError> for StoreError {
    fn from(error: SqliteStoreError) -> Self {
        match error {
            SqliteStoreError::Io(message) => Self::Io(message),
            SqliteStoreError::Db(message) => Self::Store(message),
            SqliteStoreError::Corrupt(message) => Self::Corrupt(message),
            SqliteStoreError::VersionMismatch(message) => Self::VersionMismatch(message),
            SqliteStoreError::Invalid(message) => Self::Invalid(message),
            SqliteStoreError::TooLarge {
                max_bytes,
                actual_bytes,
            } => Self::Invalid(format!(
                "settings_json exceeds size limit: {actual_bytes} bytes (max {max_bytes})"
            )),
        }
    }
}

/// Maps a `rusqlite` error into a store error.
#[allow(clippy::needless_pass_by_value, reason = "Used as a map_err adapter.")]
fn db_err(err: rusqlite::Error) -> SqliteStoreError {
    SqliteStoreError::Db(err.to_string())
}

// ============================================================================
// SECTION: Store
// ============================================================================

/// `SQLite`-backed fee settings store.
#[derive(Clone)]
pub struct SqliteFeeSettingsStore {
    /// Store configuration.
    config: SqliteStoreConfig,
    /// Shared `SQLite` connection guarded by a mutex.
    connection: Arc<Mutex<Connection>>,
}

impl SqliteFeeSettingsStore {
    /// Opens an `SQLite`-backed fee settings store.
    ///
    /// # Errors
    ///
    /// Returns [`SqliteStoreError`] when the database cannot be opened or
    /// initialized.
    pub fn new(config: SqliteStoreConfig) -> Result<Self, SqliteStoreError> {
        validate_store_path(&config.path)?;
        ensure_parent_dir(&config.path)?;
        let mut connection = open_connection(&config)?;
        initialize_schema(&mut connection)?;
        Ok(Self {
            config,
            connection: Arc::new(Mutex::new(connection)),
        })
    }

    /// Returns the store configuration.
    #[must_use]
    pub const fn config(&self) -> &SqliteStoreConfig {
        &self.config
    }
}

impl FeeSettingsStore for SqliteFeeSettingsStore {
    fn load(&self) -> Result<Option<StoredFeeSettings>, StoreError> {
        self.load_settings().map_err(StoreError::from)
    }

    fn save(&self, settings: &FeeSettings) -> Result<SettingsChange, StoreError> {
        self.save_settings(settings).map_err(StoreError::from)
    }
}

impl SqliteFeeSettingsStore {
    /// Loads the active settings snapshot.
    fn load_settings(&self) -> Result<Option<StoredFeeSettings>, SqliteStoreError> {
        let mut guard = self
            .connection
            .lock()
            .map_err(|_| SqliteStoreError::Db("mutex poisoned".to_string()))?;
        let tx = guard.transaction().map_err(db_err)?;
        let record = read_active(&tx)?;
        tx.commit().map_err(db_err)?;
        drop(guard);
        Ok(record)
    }

    /// Appends a new settings version and makes it active.
    ///
    /// The replaced record is read and verified inside the same transaction,
    /// so a tampered active row blocks the save.
    fn save_settings(&self, settings: &FeeSettings) -> Result<SettingsChange, SqliteStoreError> {
        settings.validate().map_err(|err| SqliteStoreError::Invalid(err.to_string()))?;
        let canonical =
            canonical_settings(settings).map_err(|err| SqliteStoreError::Invalid(err.to_string()))?;
        if canonical.json.len() > MAX_SETTINGS_BYTES {
            return Err(SqliteStoreError::TooLarge {
                max_bytes: MAX_SETTINGS_BYTES,
                actual_bytes: canonical.json.len(),
            });
        }
        let saved_at = unix_millis();
        let mut guard = self
            .connection
            .lock()
            .map_err(|_| SqliteStoreError::Db("mutex poisoned".to_string()))?;
        let tx = guard.transaction().map_err(db_err)?;
        let previous = read_active(&tx)?;
        let version = match &previous {
            None => 1,
            Some(record) => record.version.checked_add(1).ok_or_else(|| {
                SqliteStoreError::Corrupt("settings version overflow".to_string())
            })?,
        };
        let version_key = i64::try_from(version)
            .map_err(|_| SqliteStoreError::Corrupt("settings version overflow".to_string()))?;
        tx.execute(
            "INSERT INTO fee_settings_versions (version, settings_json, settings_hash, \
             hash_algorithm, saved_at) VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                version_key,
                canonical.json,
                canonical.digest.value,
                canonical.digest.algorithm.label(),
                saved_at
            ],
        )
        .map_err(db_err)?;
        tx.execute(
            "INSERT INTO fee_settings (id, latest_version) VALUES (1, ?1) ON CONFLICT(id) DO \
             UPDATE SET latest_version = excluded.latest_version",
            params![version_key],
        )
        .map_err(db_err)?;
        enforce_retention(&tx, version_key, self.config.max_versions)?;
        tx.commit().map_err(db_err)?;
        drop(guard);
        Ok(SettingsChange {
            previous,
            current: StoredFeeSettings {
                settings: *settings,
                version,
                updated_at_ms: saved_at,
            },
        })
    }
}

/// Reads and verifies the active record within `tx`.
fn read_active(tx: &Transaction<'_>) -> Result<Option<StoredFeeSettings>, SqliteStoreError> {
    let latest_version: Option<i64> = tx
        .query_row("SELECT latest_version FROM fee_settings WHERE id = 1", params![], |row| {
            row.get(0)
        })
        .optional()
        .map_err(db_err)?;
    let Some(version) = latest_version else {
        return Ok(None);
    };
    if version < 1 {
        return Err(SqliteStoreError::Corrupt(format!("invalid latest_version {version}")));
    }
    let metadata = tx
        .query_row(
            "SELECT length(settings_json), settings_hash, hash_algorithm, saved_at FROM \
             fee_settings_versions WHERE version = ?1",
            params![version],
            |row| {
                let length: i64 = row.get(0)?;
                let hash: String = row.get(1)?;
                let algorithm: String = row.get(2)?;
                let saved_at: i64 = row.get(3)?;
                Ok((length, hash, algorithm, saved_at))
            },
        )
        .optional()
        .map_err(db_err)?;
    let Some((length, hash_value, hash_algorithm, saved_at)) = metadata else {
        return Err(SqliteStoreError::Corrupt(format!("missing settings version {version}")));
    };
    let length = usize::try_from(length)
        .map_err(|_| SqliteStoreError::Invalid("negative settings length".to_string()))?;
    if length > MAX_SETTINGS_BYTES {
        return Err(SqliteStoreError::TooLarge {
            max_bytes: MAX_SETTINGS_BYTES,
            actual_bytes: length,
        });
    }
    let bytes: Vec<u8> = tx
        .query_row(
            "SELECT settings_json FROM fee_settings_versions WHERE version = ?1",
            params![version],
            |row| row.get(0),
        )
        .map_err(db_err)?;
    let digest = SettingsDigest {
        algorithm: parse_hash_algorithm(&hash_algorithm)?,
        value: hash_value,
    };
    if !digest.matches(&bytes) {
        return Err(SqliteStoreError::Corrupt(format!(
            "hash mismatch for settings version {version}"
        )));
    }
    let settings: FeeSettings = serde_json::from_slice(&bytes)
        .map_err(|err| SqliteStoreError::Invalid(err.to_string()))?;
    settings.validate().map_err(|err| SqliteStoreError::Invalid(err.to_string()))?;
    let version = u64::try_from(version)
        .map_err(|_| SqliteStoreError::Corrupt("negative settings version".to_string()))?;
    Ok(Some(StoredFeeSettings {
        settings,
        version,
        updated_at_ms: saved_at,
    }))
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Ensures the parent directory for the store exists.
fn ensure_parent_dir(path: &Path) -> Result<(), SqliteStoreError> {
    let Some(parent) = path.parent() else {
        return Err(SqliteStoreError::Io("store path missing parent directory".to_string()));
    };
    if parent.as_os_str().is_empty() {
        return Ok(());
    }
    std::fs::create_dir_all(parent).map_err(|err| SqliteStoreError::Io(err.to_string()))
}

/// Validates store paths for safety limits.
fn validate_store_path(path: &Path) -> Result<(), SqliteStoreError> {
    let path_string = path.display().to_string();
    if path_string.is_empty() {
        return Err(SqliteStoreError::Invalid("store path is empty".to_string()));
    }
    if path_string.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(SqliteStoreError::Invalid("store path exceeds length limit".to_string()));
    }
    for component in path.components() {
        let name = component.as_os_str().to_string_lossy();
        if name.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(SqliteStoreError::Invalid(
                "store path contains an overlong component".to_string(),
            ));
        }
    }
    if path.is_dir() {
        return Err(SqliteStoreError::Invalid(
            "store path must be a file, not a directory".to_string(),
        ));
    }
    Ok(())
}

/// Opens an `SQLite` connection with secure defaults.
fn open_connection(config: &SqliteStoreConfig) -> Result<Connection, SqliteStoreError> {
    let flags = OpenFlags::SQLITE_OPEN_READ_WRITE
        | OpenFlags::SQLITE_OPEN_CREATE
        | OpenFlags::SQLITE_OPEN_FULL_MUTEX;
    let connection = Connection::open_with_flags(&config.path, flags).map_err(db_err)?;
    apply_pragmas(&connection, config)?;
    Ok(connection)
}

/// Applies `SQLite` pragmas required for durability.
fn apply_pragmas(
    connection: &Connection,
    config: &SqliteStoreConfig,
) -> Result<(), SqliteStoreError> {
    connection.execute_batch("PRAGMA foreign_keys = ON;").map_err(db_err)?;
    connection
        .execute_batch(&format!("PRAGMA journal_mode = {};", config.journal_mode.pragma_value()))
        .map_err(db_err)?;
    connection
        .execute_batch(&format!("PRAGMA synchronous = {};", config.sync_mode.pragma_value()))
        .map_err(db_err)?;
    connection
        .busy_timeout(std::time::Duration::from_millis(config.busy_timeout_ms))
        .map_err(db_err)?;
    Ok(())
}

/// Initializes the `SQLite` schema or validates the existing version.
fn initialize_schema(connection: &mut Connection) -> Result<(), SqliteStoreError> {
    let tx = connection.transaction().map_err(db_err)?;
    tx.execute_batch("CREATE TABLE IF NOT EXISTS store_meta (version INTEGER NOT NULL);")
        .map_err(db_err)?;
    let version: Option<i64> = tx
        .query_row("SELECT version FROM store_meta LIMIT 1", params![], |row| row.get(0))
        .optional()
        .map_err(db_err)?;
    match version {
        None => {
            tx.execute("INSERT INTO store_meta (version) VALUES (?1)", params![SCHEMA_VERSION])
                .map_err(db_err)?;
            tx.execute_batch(
                "CREATE TABLE IF NOT EXISTS fee_settings_versions (
                    version INTEGER PRIMARY KEY,
                    settings_json BLOB NOT NULL,
                    settings_hash TEXT NOT NULL,
                    hash_algorithm TEXT NOT NULL,
                    saved_at INTEGER NOT NULL
                );
                CREATE TABLE IF NOT EXISTS fee_settings (
                    id INTEGER PRIMARY KEY CHECK (id = 1),
                    latest_version INTEGER NOT NULL
                );",
            )
            .map_err(db_err)?;
        }
        Some(value) if value == SCHEMA_VERSION => {}
        Some(value) => {
            return Err(SqliteStoreError::VersionMismatch(format!(
                "unsupported schema version: {value}"
            )));
        }
    }
    tx.commit().map_err(db_err)?;
    Ok(())
}

/// Enforces version retention if configured.
fn enforce_retention(
    tx: &Transaction<'_>,
    latest_version: i64,
    max_versions: Option<u64>,
) -> Result<(), SqliteStoreError> {
    let Some(max_versions) = max_versions else {
        return Ok(());
    };
    if max_versions == 0 {
        return Err(SqliteStoreError::Invalid(
            "max_versions must be greater than zero".to_string(),
        ));
    }
    let max_versions = i64::try_from(max_versions)
        .map_err(|_| SqliteStoreError::Invalid("max_versions too large".to_string()))?;
    if latest_version > max_versions {
        let min_version = latest_version - max_versions + 1;
        tx.execute("DELETE FROM fee_settings_versions WHERE version < ?1", params![min_version])
            .map_err(db_err)?;
    }
    Ok(())
}

/// Returns the current unix epoch in milliseconds.
fn unix_millis() -> i64 {
    let now = SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default();
    i64::try_from(now.as_millis()).unwrap_or(i64::MAX)
}

/// Parses a stored hash algorithm label.
fn parse_hash_algorithm(label: &str) -> Result<HashAlgorithm, SqliteStoreError> {
    HashAlgorithm::from_label(label)
        .ok_or_else(|| SqliteStoreError::Invalid(format!("unsupported hash algorithm: {label}")))
}
