// src/audit/mod.rs
// =============================================================================
// The audits this tool can run over a built site.
//
// - links:  every href/src checked against disk or the network
// - images: every <img> that is not wrapped in a <picture>
// =============================================================================

mod images;
mod links;

pub use images::ImageAuditor;
pub use links::{AuditPhase, LinkAuditor, LinkRecords};
