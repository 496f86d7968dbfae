// src/checker/classify.rs
// =============================================================================
// This module decides what kind of check a raw reference needs.
//
// Every string maps to exactly one class:
// - Skip:     "", "#anchor", mailto:, tel:, javascript:
// - External: http:// or https://
// - Internal: everything else (relative, root-relative, "page.html#frag")
//
// Matching is on the literal prefix, the same way the references appear in
// the source.
// =============================================================================

use serde::Serialize;

const SKIPPED_PREFIXES: &[&str] = &["mailto:", "tel:", "javascript:", "#"];
const EXTERNAL_PREFIXES: &[&str] = &["http://", "https://"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkClass {
    /// Never checked (anchors and special protocols)
    Skip,
    /// Resolved against the filesystem
    Internal,
    /// Fetched over HTTP
    External,
}

pub fn classify(link: &str) -> LinkClass {
    if link.is_empty() || SKIPPED_PREFIXES.iter().any(|p| link.starts_with(p)) {
        LinkClass::Skip
    } else if EXTERNAL_PREFIXES.iter().any(|p| link.starts_with(p)) {
        LinkClass::External
    } else {
        LinkClass::Internal
    }
}
