// crates/servicefee-core/src/core/settings.rs
// ============================================================================
// Module: Service Fee Settings
// Description: Administratively editable fee configuration value object.
// Purpose: Declare the platform defaults once and enforce settings invariants.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! [`FeeSettings`] is the singleton configuration record the fee policy reads.
//! Defaults are declared here and nowhere else; call sites resolve a settings
//! snapshot once and pass it down explicitly.
//!
//! ## Invariants
//! - `fee_multiplier > 0`. Enforced by [`FeeSettings::validate`] when settings
//!   are written, and again by the calculator.

// ============================================================================
// SECTION: Imports
// ============================================================================

use bigdecimal::BigDecimal;
use serde::Deserialize;
use serde::Serialize;

use crate::core::fee::FeeError;
use crate::core::fee::calculate_service_fee;

// ============================================================================
// SECTION: Defaults
// ============================================================================

/// Subtotal below which no service fee is charged.
pub const DEFAULT_MIN_FREE_THRESHOLD: u64 = 50_000;
/// Fee charged per bracket.
pub const DEFAULT_FEE_AMOUNT: u64 = 1_000;
/// Bracket size used to tier the fee.
pub const DEFAULT_FEE_MULTIPLIER: u64 = 100_000;

// ============================================================================
// SECTION: Settings
// ============================================================================

/// Service fee configuration.
///
/// # Invariants
/// - `fee_multiplier` must be non-zero for the settings to be usable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FeeSettings {
    /// Subtotals strictly below this amount are fee-exempt.
    #[serde(alias = "minFreeThreshold")]
    pub min_free_threshold: u64,
    /// Fee charged per multiplier bracket.
    #[serde(alias = "feeAmount")]
    pub fee_amount: u64,
    /// Bracket size used to tier the fee.
    #[serde(alias = "feeMultiplier")]
    pub fee_multiplier: u64,
}

impl Default for FeeSettings {
    fn default() -> Self {
        Self {
            min_free_threshold: DEFAULT_MIN_FREE_THRESHOLD,
            fee_amount: DEFAULT_FEE_AMOUNT,
            fee_multiplier: DEFAULT_FEE_MULTIPLIER,
        }
    }
}

impl FeeSettings {
    /// Creates settings from explicit values without validating them.
    #[must_use]
    pub const fn new(min_free_threshold: u64, fee_amount: u64, fee_multiplier: u64) -> Self {
        Self {
            min_free_threshold,
            fee_amount,
            fee_multiplier,
        }
    }

    /// Checks the settings invariants.
    ///
    /// # Errors
    ///
    /// Returns [`FeeError::Configuration`] when `fee_multiplier` is zero.
    pub fn validate(&self) -> Result<(), FeeError> {
        if self.fee_multiplier == 0 {
            return Err(FeeError::Configuration("fee_multiplier must be greater than zero"));
        }
        Ok(())
    }

    /// Computes the service fee for `subtotal` under these settings.
    ///
    /// # Errors
    ///
    /// See [`calculate_service_fee`].
    pub fn fee_for(&self, subtotal: &BigDecimal) -> Result<u64, FeeError> {
        calculate_service_fee(subtotal, self)
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    #![allow(
        clippy::unwrap_used,
        clippy::expect_used,
        reason = "Test-only assertions are permitted."
    )]

    use super::*;

    #[test]
    fn default_settings_match_platform_defaults() {
        let settings = FeeSettings::default();
        assert_eq!(settings.min_free_threshold, 50_000);
        assert_eq!(settings.fee_amount, 1_000);
        assert_eq!(settings.fee_multiplier, 100_000);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn validate_rejects_zero_multiplier() {
        let settings = FeeSettings::new(0, 1_000, 0);
        let err = settings.validate().unwrap_err();
        assert!(matches!(err, FeeError::Configuration(_)));
    }

    #[test]
    fn validate_accepts_zero_fee_and_threshold() {
        assert!(FeeSettings::new(0, 0, 1).validate().is_ok());
    }

    #[test]
    fn deserializes_api_record_field_names() {
        let json = r#"{"minFreeThreshold":1,"feeAmount":2,"feeMultiplier":3}"#;
        let settings: FeeSettings = serde_json::from_str(json).unwrap();
        assert_eq!(settings, FeeSettings::new(1, 2, 3));
    }

    #[test]
    fn deserialize_rejects_unknown_fields() {
        let json = r#"{"min_free_threshold":1,"fee_amount":2,"fee_multiplier":3,"extra":4}"#;
        assert!(serde_json::from_str::<FeeSettings>(json).is_err());
    }

    #[test]
    fn deserialize_rejects_negative_values() {
        let json = r#"{"min_free_threshold":-1,"fee_amount":2,"fee_multiplier":3}"#;
        assert!(serde_json::from_str::<FeeSettings>(json).is_err());
    }
}
