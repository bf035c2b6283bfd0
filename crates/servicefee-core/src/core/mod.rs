// crates/servicefee-core/src/core/mod.rs
// ============================================================================
// Module: Service Fee Core Types
// Description: Fee settings, calculator, boundary parsing, and order totals.
// Purpose: Group the pure fee policy behind a single module path.
// Dependencies: bigdecimal, serde, serde_jcs, sha2
// ============================================================================

//! ## Overview
//! Everything in this module is side-effect free. Settings are plain values,
//! amounts are parsed at the boundary, and the calculator is a total function
//! over validated inputs.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod amount;
pub mod fee;
pub mod hashing;
pub mod settings;
pub mod total;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use amount::AmountError;
pub use amount::MAX_AMOUNT_CHARS;
pub use amount::parse_amount;
pub use amount::parse_setting_value;
pub use fee::FeeError;
pub use fee::MAX_FRACTIONAL_DIGITS;
pub use fee::calculate_service_fee;
pub use fee::fee_units;
pub use hashing::DEFAULT_HASH_ALGORITHM;
pub use hashing::CanonicalSettings;
pub use hashing::HashAlgorithm;
pub use hashing::HashError;
pub use hashing::SettingsDigest;
pub use hashing::canonical_settings;
pub use hashing::settings_digest;
pub use settings::DEFAULT_FEE_AMOUNT;
pub use settings::DEFAULT_FEE_MULTIPLIER;
pub use settings::DEFAULT_MIN_FREE_THRESHOLD;
pub use settings::FeeSettings;
pub use total::OrderInputs;
pub use total::OrderQuote;
pub use total::quote_order;
