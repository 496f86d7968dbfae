// src/lib.rs
// =============================================================================
// site-auditor: audits a built static site for broken links and for images
// that skip the responsive <picture> element.
//
// Module map (leaves first):
// - crawl:   finds the HTML files under the site root
// - checker: extracts, classifies and checks link references
// - audit:   the link and image auditors that drive a run
// - report:  JSON artifacts, console summaries, exit codes
// - config / cli / logging / error: the ambient plumbing
// =============================================================================

pub mod audit;
pub mod checker;
pub mod cli;
pub mod config;
pub mod crawl;
pub mod error;
pub mod logging;
pub mod report;

pub use error::{AuditError, Result};
