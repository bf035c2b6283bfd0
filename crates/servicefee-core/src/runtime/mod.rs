// crates/servicefee-core/src/runtime/mod.rs
// ============================================================================
// Module: Service Fee Runtime
// Description: Settings service, in-memory store, and audit sinks.
// Purpose: Wire the pure fee policy to persisted, audited settings.
// Dependencies: crate::core, crate::interfaces
// ============================================================================

//! ## Overview
//! The runtime owns the single configuration-loading call site
//! ([`FeeSettingsService::current`]) and the administrative update path.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod audit;
pub mod service;
pub mod store;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use audit::FeeAuditEvent;
pub use audit::FileAuditSink;
pub use audit::NoopAuditSink;
pub use audit::StderrAuditSink;
pub use service::ActiveFeeSettings;
pub use service::FeeSettingsError;
pub use service::FeeSettingsService;
pub use store::InMemoryFeeSettingsStore;
