// crates/servicefee-config/src/lib.rs
// ============================================================================
// Module: Service Fee Config Library
// Description: Canonical config model and validation.
// Purpose: Single source of truth for servicefee.toml semantics.
// Dependencies: servicefee-core, serde, toml
// ============================================================================

//! ## Overview
//! `servicefee-config` defines the configuration model for the service fee
//! tooling: fallback fee settings, the settings store backend, and audit
//! output. Loading is strict and fails closed; a zero `fee_multiplier` is
//! rejected here, before any fee is ever computed.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config::*;
