// crates/servicefee-cli/src/i18n.rs
// ============================================================================
// Module: CLI Messages
// Description: English message catalog and placeholder rendering.
// Purpose: Keep every user-facing CLI string in one table.
// Dependencies: std::fmt
// ============================================================================

//! ## Overview
//! Output text is looked up by key with [`message`] and filled in by
//! [`render`]. The [`t!`](crate::t) macro combines both so call sites only
//! name the key and its `{placeholder}` values.
//!
//! ## Invariants
//! - Unknown keys render as the key itself.
//! - Placeholders without a matching argument are left verbatim.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt::Display;

// ============================================================================
// SECTION: Catalog
// ============================================================================

/// Returns the English template for `key`.
#[must_use]
pub fn message(key: &str) -> Option<&'static str> {
    let template = match key {
        "main.version" => "servicefee {version}",
        "output.stream.stdout" => "stdout",
        "output.stream.stderr" => "stderr",
        "output.stream.unknown" => "output",
        "output.write_failed" => "Failed to write to {stream}: {error}",
        "output.serialize_failed" => "Failed to serialize output: {error}",
        "config.load_failed" => "Failed to load config: {error}",
        "config.validate.ok" => "Config valid.",
        "input.invalid" => "Invalid input: {error}",
        "store.open_failed" => "Failed to open fee settings store: {error}",
        "audit.open_failed" => "Failed to open audit log at {path}: {error}",
        "quote.failed" => "Failed to quote order: {error}",
        "settings.load_failed" => "Failed to load fee settings: {error}",
        "settings.update.failed" => "Failed to update fee settings: {error}",
        "settings.update.ok" => "Fee settings saved (version {version}, actor {actor}).",
        "settings.update.memory_backend" => {
            "Note: store.backend=memory; the update is not persisted after this process exits."
        }
        _ => return None,
    };
    Some(template)
}

// ============================================================================
// SECTION: Rendering
// ============================================================================

/// Substitutes `{name}` placeholders in `template` with matching `args`.
#[must_use]
pub fn render(template: &str, args: &[(&str, &dyn Display)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[.. open]);
        let tail = &rest[open ..];
        let Some(close) = tail.find('}') else {
            out.push_str(tail);
            return out;
        };
        let name = &tail[1 .. close];
        match args.iter().find(|(key, _)| *key == name) {
            Some((_, value)) => out.push_str(&value.to_string()),
            None => out.push_str(&tail[..= close]),
        }
        rest = &tail[close + 1 ..];
    }
    out.push_str(rest);
    out
}

// ============================================================================
// SECTION: Macro
// ============================================================================

/// Renders the catalog message `$key` with named placeholder values.
#[macro_export]
macro_rules! t {
    ($key:literal $(, $name:ident = $value:expr )* $(,)?) => {
        $crate::i18n::render(
            $crate::i18n::message($key).unwrap_or($key),
            &[$( (stringify!($name), &$value as &dyn ::std::fmt::Display) ),*],
        )
    };
}

// ============================================================================
// SECTION: Tests
// ============================================================================
