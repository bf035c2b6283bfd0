// crates/servicefee-core/src/lib.rs
// ============================================================================
// Module: Service Fee Core Library
// Description: Public API surface for the Service Fee core.
// Purpose: Expose the fee policy, interfaces, and runtime helpers.
// Dependencies: crate::{core, interfaces, runtime}
// ============================================================================

//! ## Overview
//! Service Fee core implements the marketplace service-fee policy exactly once:
//! a tiered fee charged per `fee_multiplier` bracket of the order subtotal,
//! waived below a free threshold. Every fee preview and every checkout total
//! goes through [`calculate_service_fee`] so the buyer-visible amount and the
//! charged amount cannot diverge.
//!
//! The calculator is pure. Settings persistence and audit logging are reached
//! only through the explicit interfaces in [`interfaces`].

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod core;
pub mod interfaces;
pub mod runtime;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use core::*;

pub use interfaces::FeeAuditSink;
pub use interfaces::FeeSettingsStore;
pub use interfaces::SettingsChange;
pub use interfaces::StoreError;
pub use interfaces::StoredFeeSettings;
pub use runtime::ActiveFeeSettings;
pub use runtime::FeeAuditEvent;
pub use runtime::FeeSettingsError;
pub use runtime::FeeSettingsService;
pub use runtime::FileAuditSink;
pub use runtime::InMemoryFeeSettingsStore;
pub use runtime::NoopAuditSink;
pub use runtime::StderrAuditSink;
