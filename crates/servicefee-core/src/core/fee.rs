// crates/servicefee-core/src/core/fee.rs
// ============================================================================
// Module: Service Fee Calculator
// Description: Tiered service-fee calculation over a subtotal.
// Purpose: The single shared implementation of the fee policy.
// Dependencies: bigdecimal, thiserror
// ============================================================================

//! ## Overview
//! The service fee is zero below the free threshold and otherwise one
//! `fee_amount` per started `fee_multiplier` bracket:
//!
//! ```text
//! fee = 0                                            if subtotal < min_free_threshold
//! fee = ceil(subtotal / fee_multiplier) * fee_amount otherwise
//! ```
//!
//! ## Invariants
//! - The threshold comparison is strict: a subtotal equal to the threshold pays.
//! - Exact multiples do not start a new bracket.
//! - The ceiling is exact for fractional subtotals: `ceil(s / m)` equals
//!   `ceil(ceil(s) / m)` for integer `m > 0`, so only integer division is used.

// ============================================================================
// SECTION: Imports
// ============================================================================

use bigdecimal::BigDecimal;
use bigdecimal::RoundingMode;
use bigdecimal::Signed;
use bigdecimal::ToPrimitive;
use thiserror::Error;

use crate::core::settings::FeeSettings;

// ============================================================================
// SECTION: Limits
// ============================================================================

/// Largest order of magnitude an amount may have; `u128::MAX` is below `10^39`.
const MAX_AMOUNT_MAGNITUDE: i64 = 38;
/// Most fractional digits an amount may carry.
pub const MAX_FRACTIONAL_DIGITS: i64 = 64;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Fee calculation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FeeError {
    /// Settings violate their invariants. This is a configuration bug.
    #[error("fee configuration error: {0}")]
    Configuration(&'static str),
    /// An input amount is negative or malformed.
    #[error("invalid fee input: {0}")]
    InvalidInput(String),
    /// The computed fee does not fit the fee type.
    #[error("service fee overflow")]
    Overflow,
}

// ============================================================================
// SECTION: Calculator
// ============================================================================

/// Computes the service fee for `subtotal`.
///
/// # Errors
///
/// Returns [`FeeError::Configuration`] when `fee_multiplier` is zero,
/// [`FeeError::InvalidInput`] when `subtotal` is negative, and
/// [`FeeError::Overflow`] when the fee exceeds `u64::MAX`.
pub fn calculate_service_fee(
    subtotal: &BigDecimal,
    settings: &FeeSettings,
) -> Result<u64, FeeError> {
    let units = fee_units(subtotal, settings)?;
    units.checked_mul(settings.fee_amount).ok_or(FeeError::Overflow)
}

/// Returns the number of fee brackets charged for `subtotal`.
///
/// Zero when the subtotal is below the free threshold.
///
/// # Errors
///
/// Same conditions as [`calculate_service_fee`], minus the final multiply.
pub fn fee_units(subtotal: &BigDecimal, settings: &FeeSettings) -> Result<u64, FeeError> {
    settings.validate()?;
    if subtotal.is_negative() {
        return Err(FeeError::InvalidInput(format!(
            "subtotal must be non-negative, got {subtotal}"
        )));
    }
    check_amount_bounds("subtotal", subtotal)?;
    let threshold = BigDecimal::from(settings.min_free_threshold);
    if subtotal < &threshold {
        return Ok(0);
    }
    let whole = subtotal
        .with_scale_round(0, RoundingMode::Ceiling)
        .to_u128()
        .ok_or(FeeError::Overflow)?;
    let units = whole.div_ceil(u128::from(settings.fee_multiplier));
    u64::try_from(units).map_err(|_| FeeError::Overflow)
}

/// Rejects amounts whose exponent would make rounding or addition expensive.
///
/// Both checks read only the stored exponent and digit count, so they stay
/// cheap for values such as `1e10000000000`.
///
/// # Errors
///
/// Returns [`FeeError::Overflow`] at or above `10^39` and [`FeeError::InvalidInput`]
/// beyond [`MAX_FRACTIONAL_DIGITS`] fractional digits.
pub(crate) fn check_amount_bounds(field: &str, value: &BigDecimal) -> Result<(), FeeError> {
    if value.order_of_magnitude() > MAX_AMOUNT_MAGNITUDE {
        return Err(FeeError::Overflow);
    }
    if value.fractional_digit_count() > MAX_FRACTIONAL_DIGITS {
        return Err(FeeError::InvalidInput(format!(
            "{field} has more than {MAX_FRACTIONAL_DIGITS} fractional digits"
        )));
    }
    Ok(())
}

// ============================================================================
// SECTION: Tests
// ============================================================================
