// crates/servicefee-core/src/core/amount.rs
// ============================================================================
// Module: Amount Parsing
// Description: Strict parsing of monetary amounts arriving as strings.
// Purpose: Reject malformed or negative input before it reaches the calculator.
// Dependencies: bigdecimal, thiserror
// ============================================================================

//! ## Overview
//! Form fields and query parameters deliver amounts as text. This module turns
//! them into strict numeric types at the boundary. Only plain decimal notation
//! is accepted: an optional leading `-`, ASCII digits, and at most one `.` with
//! digits on both sides. Exponents, grouping separators, `NaN`, and infinities
//! are rejected outright.
//!
//! Negative values parse far enough to be reported as negative, never clamped.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::str::FromStr;

use bigdecimal::BigDecimal;
use bigdecimal::RoundingMode;
use bigdecimal::Signed;
use bigdecimal::ToPrimitive;
use thiserror::Error;

use crate::core::fee::FeeError;

// ============================================================================
// SECTION: Limits
// ============================================================================

/// Maximum accepted length of a raw amount string after trimming.
pub const MAX_AMOUNT_CHARS: usize = 64;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Amount parsing errors, tagged with the offending field name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AmountError {
    /// Field was empty or whitespace.
    #[error("{field} must not be empty")]
    Empty {
        /// Field name.
        field: String,
    },
    /// Field exceeded [`MAX_AMOUNT_CHARS`].
    #[error("{field} exceeds {max} characters", max = MAX_AMOUNT_CHARS)]
    TooLong {
        /// Field name.
        field: String,
    },
    /// Field is not a plain decimal number.
    #[error("{field} must be a decimal number, got {value:?}")]
    NotNumeric {
        /// Field name.
        field: String,
        /// Raw (trimmed) input.
        value: String,
    },
    /// Field is negative.
    #[error("{field} must be non-negative, got {value}")]
    Negative {
        /// Field name.
        field: String,
        /// Raw (trimmed) input.
        value: String,
    },
    /// Field has a fractional part where a whole number is required.
    #[error("{field} must be a whole number, got {value}")]
    NotWhole {
        /// Field name.
        field: String,
        /// Raw (trimmed) input.
        value: String,
    },
    /// Field does not fit the target integer type.
    #[error("{field} is out of range: {value}")]
    OutOfRange {
        /// Field name.
        field: String,
        /// Raw (trimmed) input.
        value: String,
    },
}

impl From<AmountError> for FeeError {
    fn from(error: AmountError) -> Self {
        Self::InvalidInput(error.to_string())
    }
}

// ============================================================================
// SECTION: Parsing
// ============================================================================

/// Parses a non-negative decimal amount.
///
/// # Errors
///
/// Returns [`AmountError`] when the input is empty, too long, not a plain
/// decimal number, or negative.
pub fn parse_amount(field: &str, raw: &str) -> Result<BigDecimal, AmountError> {
    let trimmed = raw.trim();
    check_shape(field, trimmed)?;
    let value = BigDecimal::from_str(trimmed).map_err(|_| AmountError::NotNumeric {
        field: field.to_string(),
        value: trimmed.to_string(),
    })?;
    if value.is_negative() {
        return Err(AmountError::Negative {
            field: field.to_string(),
            value: trimmed.to_string(),
        });
    }
    Ok(value)
}

/// Parses a non-negative whole number for a settings field.
///
/// # Errors
///
/// Returns [`AmountError`] for any [`parse_amount`] failure, for fractional
/// values, and for values above `u64::MAX`.
pub fn parse_setting_value(field: &str, raw: &str) -> Result<u64, AmountError> {
    let value = parse_amount(field, raw)?;
    if value.with_scale_round(0, RoundingMode::Down) != value {
        return Err(AmountError::NotWhole {
            field: field.to_string(),
            value: raw.trim().to_string(),
        });
    }
    value.to_u64().ok_or_else(|| AmountError::OutOfRange {
        field: field.to_string(),
        value: raw.trim().to_string(),
    })
}

/// Checks the lexical shape of a trimmed amount string.
fn check_shape(field: &str, trimmed: &str) -> Result<(), AmountError> {
    if trimmed.is_empty() {
        return Err(AmountError::Empty {
            field: field.to_string(),
        });
    }
    if trimmed.chars().count() > MAX_AMOUNT_CHARS {
        return Err(AmountError::TooLong {
            field: field.to_string(),
        });
    }
    let unsigned = trimmed.strip_prefix('-').unwrap_or(trimmed);
    let mut parts = unsigned.splitn(2, '.');
    let whole = parts.next().unwrap_or_default();
    let fraction = parts.next();
    let digits_only = |part: &str| !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit());
    let well_formed = digits_only(whole) && fraction.is_none_or(digits_only);
    if !well_formed {
        return Err(AmountError::NotNumeric {
            field: field.to_string(),
            value: trimmed.to_string(),
        });
    }
    Ok(())
}

// ============================================================================
// SECTION: Tests
// ============================================================================
