// crates/servicefee-core/src/core/total.rs
// ============================================================================
// Module: Order Totals
// Description: Aggregates subtotal, shipping, service fee, and discount.
// Purpose: Share one quote path between buyer previews and checkout.
// Dependencies: bigdecimal, serde
// ============================================================================

//! ## Overview
//! `total = subtotal + shipping + service_fee - discount`, clamped at zero.
//! The service fee always comes from [`calculate_service_fee`], so the amount
//! shown in a cart preview is the amount charged at checkout.

// ============================================================================
// SECTION: Imports
// ============================================================================

use bigdecimal::BigDecimal;
use bigdecimal::Signed;
use bigdecimal::Zero;
use serde::Serialize;

use crate::core::fee::FeeError;
use crate::core::fee::calculate_service_fee;
use crate::core::fee::check_amount_bounds;
use crate::core::fee::fee_units;
use crate::core::settings::FeeSettings;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Amounts feeding an order quote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderInputs {
    /// Sum of line-item prices.
    pub subtotal: BigDecimal,
    /// Shipping cost.
    pub shipping: BigDecimal,
    /// Voucher or promotional discount.
    pub discount: BigDecimal,
}

impl OrderInputs {
    /// Inputs with no shipping and no discount.
    #[must_use]
    pub fn from_subtotal(subtotal: BigDecimal) -> Self {
        Self {
            subtotal,
            shipping: BigDecimal::zero(),
            discount: BigDecimal::zero(),
        }
    }
}

/// Fully itemized order total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderQuote {
    /// Sum of line-item prices.
    pub subtotal: BigDecimal,
    /// Shipping cost.
    pub shipping: BigDecimal,
    /// Discount applied.
    pub discount: BigDecimal,
    /// Service fee charged.
    pub service_fee: u64,
    /// Fee brackets the service fee was charged for.
    pub fee_units: u64,
    /// Amount due, never negative.
    pub total: BigDecimal,
}

// ============================================================================
// SECTION: Quote
// ============================================================================

/// Builds an itemized quote for `inputs` under `settings`.
///
/// # Errors
///
/// Returns [`FeeError::InvalidInput`] when any amount is negative,
/// [`FeeError::Overflow`] when an amount is too large to total, and any error
/// raised by [`calculate_service_fee`].
pub fn quote_order(inputs: &OrderInputs, settings: &FeeSettings) -> Result<OrderQuote, FeeError> {
    ensure_non_negative("shipping", &inputs.shipping)?;
    ensure_non_negative("discount", &inputs.discount)?;
    check_amount_bounds("shipping", &inputs.shipping)?;
    check_amount_bounds("discount", &inputs.discount)?;
    let service_fee = calculate_service_fee(&inputs.subtotal, settings)?;
    let units = fee_units(&inputs.subtotal, settings)?;
    let gross = &inputs.subtotal + &inputs.shipping + BigDecimal::from(service_fee);
    let net = gross - &inputs.discount;
    let total = if net.is_negative() { BigDecimal::zero() } else { net };
    Ok(OrderQuote {
        subtotal: inputs.subtotal.clone(),
        shipping: inputs.shipping.clone(),
        discount: inputs.discount.clone(),
        service_fee,
        fee_units: units,
        total,
    })
}

/// Rejects negative amounts for `field`.
fn ensure_non_negative(field: &str, value: &BigDecimal) -> Result<(), FeeError> {
    if value.is_negative() {
        return Err(FeeError::InvalidInput(format!("{field} must be non-negative, got {value}")));
    }
    Ok(())
}

// ============================================================================
// SECTION: Tests
// ============================================================================
