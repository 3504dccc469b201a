//! Hostname normalization — the stable identity key used throughout the
//! store, frontier and session layers (spec §3 "Normalized hostname").

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref PARENTHETICAL: Regex = Regex::new(r"\s*\([^)]*\)").unwrap();
}

/// Normalize a hostname: strip parenthetical annotations (e.g. "(Serial:
/// ABC123)"), keep only the first DNS label, trim whitespace, lowercase.
///
/// Idempotent: normalizing an already-normalized hostname is a no-op.
pub fn normalize_hostname(raw: &str) -> String {
    let stripped = PARENTHETICAL.replace_all(raw, "");
    let first_label = stripped.split('.').next().unwrap_or("");
    first_label.trim().to_lowercase()
}
