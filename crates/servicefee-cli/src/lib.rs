// crates/servicefee-cli/src/lib.rs
// ============================================================================
// Module: Service Fee CLI Library
// Description: Shared helpers for the service fee command-line interface.
// Purpose: Provide the message catalog and store wiring to the binary and tests.
// Dependencies: servicefee-core, servicefee-config, servicefee-store-sqlite
// ============================================================================

//! ## Overview
//! This library houses the CLI message catalog and the code that turns a
//! loaded [`servicefee_config::ServiceFeeConfig`] into a ready
//! [`servicefee_core::FeeSettingsService`]. The binary entry point
//! (`src/main.rs`) only parses arguments and renders output.

// ============================================================================
// SECTION: Modules
// ============================================================================

/// Internationalization helpers and message catalog.
pub mod i18n;
/// Settings service construction from configuration.
pub mod runtime;
