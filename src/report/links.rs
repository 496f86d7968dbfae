// src/report/links.rs
// =============================================================================
// The link audit report.
//
// JSON shape (audits/link-audit-results.json):
// {
//   "timestamp": "...",
//   "summary": { "totalUniqueLinks": 12, "brokenLinksCount": 1 },
//   "brokenLinks": [ { "link": "...", "reason": "...", "sources": ["..."] } ],
//   "skippedFiles": ["..."]          <- only present when a file was unreadable
// }
// =============================================================================

use std::io::{self, Write};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditSummary {
    pub total_unique_links: usize,
    pub broken_links_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrokenLink {
    /// The reference exactly as written in the HTML
    pub link: String,
    pub reason: String,
    /// Files containing the reference, sorted
    pub sources: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditReport {
    pub timestamp: String,
    pub summary: AuditSummary,
    pub broken_links: Vec<BrokenLink>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub skipped_files: Vec<String>,
}

impl AuditReport {
    pub fn has_broken_links(&self) -> bool {
        !self.broken_links.is_empty()
    }
}

// Writes the broken-link breakdown and the final pass/fail line
//
// Errors come straight from the writer; a reader that went away shows up
// as ErrorKind::BrokenPipe for the caller to decide on.
pub fn print_link_summary(out: &mut impl Write, report: &AuditReport) -> io::Result<()> {
    if !report.skipped_files.is_empty() {
        writeln!(out, "\n⚠️  {} file(s) could not be read:", report.skipped_files.len())?;
        for file in &report.skipped_files {
            writeln!(out, "     - {}", file)?;
        }
    }

    if report.has_broken_links() {
        writeln!(out, "\n--- BROKEN LINKS ---")?;
        for item in &report.broken_links {
            writeln!(out, "\n❌ Link: {}", item.link)?;
            writeln!(out, "   Reason: {}", item.reason)?;
            writeln!(out, "   Found in:\n     - {}", item.sources.join("\n     - "))?;
        }
    }

    writeln!(out, "\n📊 Summary:")?;
    writeln!(out, "   📋 Unique links: {}", report.summary.total_unique_links)?;
    writeln!(out, "   ❌ Broken: {}", report.summary.broken_links_count)?;

    if report.has_broken_links() {
        writeln!(out, "\n❌ Found {} broken links.", report.summary.broken_links_count)?;
    } else {
        writeln!(out, "\n✅ Success! No broken links found.")?;
    }
    Ok(())
}
