// src/report/mod.rs
// =============================================================================
// This module turns finished audits into artifacts.
//
// Every audit produces:
// - a pretty-printed JSON file under the report directory (audits/ by default)
// - a human-readable summary on the console (stdout, or stderr under --json so
//   that stdout carries nothing but the JSON document)
// - a process exit code: 0 = clean, 1 = problems found, 2 = auditor crashed
//
// Submodules:
// - links: the broken-link report
// - images: the <img>-outside-<picture> report
// =============================================================================

mod images;
mod links;

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::{SecondsFormat, Utc};
use serde::Serialize;

use crate::error::Result;

pub use images::{print_image_summary, FileImageIssues, ImageAuditReport, ImageIssue, ImageSummary};
pub use links::{print_link_summary, AuditReport, AuditSummary, BrokenLink};

pub const EXIT_CLEAN: i32 = 0;
pub const EXIT_FINDINGS: i32 = 1;
pub const EXIT_FATAL: i32 = 2;

// ISO-8601 UTC with millisecond precision, e.g. "2024-05-01T12:00:00.000Z"
pub fn timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

// Writes `report` as pretty JSON to `dir/file_name`, creating `dir` if needed
//
// Returns the path written, so the caller can tell the user where to look.
pub fn write_json<T: Serialize>(report: &T, dir: &Path, file_name: &str) -> Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let path = dir.join(file_name);
    let json = serde_json::to_string_pretty(report)?;
    fs::write(&path, json)?;
    Ok(path)
}

// Destination for progress lines and summaries
pub fn console(json: bool) -> Box<dyn Write + Send> {
    if json {
        Box::new(io::stderr())
    } else {
        Box::new(io::stdout())
    }
}

// Prints `report` as pretty JSON followed by a newline
pub fn print_json<T: Serialize>(out: &mut impl Write, report: &T) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *out, report).map_err(io::Error::from)?;
    writeln!(out)?;
    out.flush()
}

// 0 when nothing was found, 1 otherwise
pub fn exit_code_for(findings: usize) -> i32 {
    if findings > 0 {
        EXIT_FINDINGS
    } else {
        EXIT_CLEAN
    }
}

// A writer whose reader has gone away, like stdout piped into `head`
#[cfg(test)]
pub(crate) struct ClosedPipe;

#[cfg(test)]
impl Write for ClosedPipe {
    fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
        Err(io::Error::from(io::ErrorKind::BrokenPipe))
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
