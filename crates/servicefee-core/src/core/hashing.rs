// crates/servicefee-core/src/core/hashing.rs
// ============================================================================
// Module: Settings Fingerprints
// Description: Canonical encoding and SHA-256 digests of fee settings.
// Purpose: Fingerprint fee settings snapshots for audit and storage integrity.
// Dependencies: serde, serde_jcs, sha2
// ============================================================================

//! ## Overview
//! A settings snapshot is encoded once as RFC 8785 canonical JSON and the
//! digest is taken over those exact bytes. The SQLite store persists the
//! bytes alongside the digest and re-checks them on load; audit events carry
//! the digest of the settings before and after each update.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;
use sha2::Digest;
use sha2::Sha256;
use thiserror::Error;

use crate::core::settings::FeeSettings;

// ============================================================================
// SECTION: Algorithms
// ============================================================================

/// Digest algorithms a stored fingerprint may name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HashAlgorithm {
    /// SHA-256.
    Sha256,
}

impl HashAlgorithm {
    /// Stable label written to storage and audit records.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Sha256 => "sha256",
        }
    }

    /// Parses a stored label; unknown labels are `None`.
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "sha256" => Some(Self::Sha256),
            _ => None,
        }
    }

    /// Lowercase hex digest of `bytes`.
    fn hex_digest(self, bytes: &[u8]) -> String {
        match self {
            Self::Sha256 => format!("{:x}", Sha256::digest(bytes)),
        }
    }
}

/// Algorithm used for new fingerprints.
pub const DEFAULT_HASH_ALGORITHM: HashAlgorithm = HashAlgorithm::Sha256;

// ============================================================================
// SECTION: Digests
// ============================================================================

/// Fingerprint of an encoded settings snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingsDigest {
    /// Digest algorithm.
    pub algorithm: HashAlgorithm,
    /// Lowercase hex digest.
    pub value: String,
}

impl SettingsDigest {
    /// Digests already-encoded settings bytes.
    #[must_use]
    pub fn of_bytes(algorithm: HashAlgorithm, bytes: &[u8]) -> Self {
        Self {
            algorithm,
            value: algorithm.hex_digest(bytes),
        }
    }

    /// Returns true when `bytes` hash to this digest.
    #[must_use]
    pub fn matches(&self, bytes: &[u8]) -> bool {
        self.algorithm.hex_digest(bytes) == self.value
    }
}

/// Canonical encoding of a settings snapshot and its digest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalSettings {
    /// RFC 8785 JSON bytes.
    pub json: Vec<u8>,
    /// Digest of `json` under [`DEFAULT_HASH_ALGORITHM`].
    pub digest: SettingsDigest,
}

/// Errors raised while encoding settings.
#[derive(Debug, Error)]
pub enum HashError {
    /// JSON canonicalization failed.
    #[error("failed to canonicalize settings: {0}")]
    Canonicalization(String),
}

// ============================================================================
// SECTION: Encoding
// ============================================================================

/// Encodes `settings` canonically and digests the result.
///
/// # Errors
///
/// Returns [`HashError::Canonicalization`] when serialization fails.
pub fn canonical_settings(settings: &FeeSettings) -> Result<CanonicalSettings, HashError> {
    let json =
        serde_jcs::to_vec(settings).map_err(|err| HashError::Canonicalization(err.to_string()))?;
    let digest = SettingsDigest::of_bytes(DEFAULT_HASH_ALGORITHM, &json);
    Ok(CanonicalSettings {
        json,
        digest,
    })
}

/// Digest of the canonical encoding of `settings`.
///
/// # Errors
///
/// Returns [`HashError::Canonicalization`] when serialization fails.
pub fn settings_digest(settings: &FeeSettings) -> Result<SettingsDigest, HashError> {
    Ok(canonical_settings(settings)?.digest)
}

// ============================================================================
// SECTION: Tests
// ============================================================================
