// crates/servicefee-core/src/runtime/audit.rs
// ============================================================================
// Module: Settings Audit Logging
// Description: Structured audit events for fee settings changes.
// Purpose: Emit JSON-line audit records without hard logging dependencies.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! Every administrative settings update, accepted or rejected, produces a
//! [`FeeAuditEvent`]. Sinks serialize events as one JSON object per line so
//! deployments can route them to whatever log pipeline they run.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs::OpenOptions;
use std::io;
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;

use serde::Serialize;

use crate::core::FeeSettings;
use crate::core::SettingsDigest;
use crate::interfaces::FeeAuditSink;
use crate::runtime::store::unix_millis;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Fee settings audit event payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeeAuditEvent {
    /// Event identifier (`settings_updated` or `settings_rejected`).
    pub event: &'static str,
    /// Event timestamp (milliseconds since epoch).
    pub timestamp_ms: i64,
    /// Administrator that requested the change.
    pub actor: String,
    /// Stored version after the update; `None` when rejected.
    pub version: Option<u64>,
    /// Digest of the settings that were active before the update.
    pub previous_hash: Option<SettingsDigest>,
    /// Digest of the requested settings.
    pub settings_hash: Option<SettingsDigest>,
    /// Requested settings.
    pub settings: FeeSettings,
    /// Rejection reason when the update failed.
    pub reason: Option<String>,
}

impl FeeAuditEvent {
    /// Builds a `settings_updated` event.
    #[must_use]
    pub fn updated(
        actor: &str,
        settings: FeeSettings,
        version: u64,
        previous_hash: Option<SettingsDigest>,
        settings_hash: Option<SettingsDigest>,
    ) -> Self {
        Self {
            event: "settings_updated",
            timestamp_ms: unix_millis(),
            actor: actor.to_string(),
            version: Some(version),
            previous_hash,
            settings_hash,
            settings,
            reason: None,
        }
    }

    /// Builds a `settings_rejected` event.
    #[must_use]
    pub fn rejected(actor: &str, settings: FeeSettings, reason: String) -> Self {
        Self {
            event: "settings_rejected",
            timestamp_ms: unix_millis(),
            actor: actor.to_string(),
            version: None,
            previous_hash: None,
            settings_hash: None,
            settings,
            reason: Some(reason),
        }
    }
}

// ============================================================================
// SECTION: Sinks
// ============================================================================

/// Sink that discards events.
pub struct NoopAuditSink;

impl FeeAuditSink for NoopAuditSink {
    fn record(&self, _event: &FeeAuditEvent) {}
}

/// Sink that writes JSON lines to stderr.
pub struct StderrAuditSink;

impl FeeAuditSink for StderrAuditSink {
    fn record(&self, event: &FeeAuditEvent) {
        if let Ok(payload) = serde_json::to_string(event) {
            let _ = writeln!(io::stderr(), "{payload}");
        }
    }
}

/// Sink that appends JSON lines to a file.
pub struct FileAuditSink {
    /// File handle used for append-only logging.
    file: Mutex<std::fs::File>,
}

impl FileAuditSink {
    /// Opens the audit log file in append mode.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened.
    pub fn new(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            file: Mutex::new(file),
        })
    }
}

impl FeeAuditSink for FileAuditSink {
    fn record(&self, event: &FeeAuditEvent) {
        let Ok(payload) = serde_json::to_string(event) else {
            return;
        };
        if let Ok(mut file) = self.file.lock() {
            let _ = writeln!(file, "{payload}");
        }
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
