// src/config.rs
// =============================================================================
// Resolved run configuration.
//
// The CLI (src/cli.rs) only describes flags. Everything the auditors need is
// collected here, with defaults matching how the site's audit scripts were
// always run: current directory as the root, reports under audits/, ten
// external checks in flight, fifteen seconds per check.
// =============================================================================

use std::path::{Path, PathBuf};
use std::time::Duration;

/// Globs that are never scanned, on top of any user-supplied ones.
pub const DEFAULT_IGNORES: &[&str] = &["node_modules/**", "audits/**"];

pub const DEFAULT_CONCURRENCY: usize = 10;
pub const DEFAULT_TIMEOUT_SECS: u64 = 15;
pub const DEFAULT_OUT_DIR: &str = "audits";
pub const USER_AGENT: &str = "Mozilla/5.0 (compatible; Link-Checker-Bot/1.0)";

pub const LINK_REPORT_FILE: &str = "link-audit-results.json";
pub const IMAGE_REPORT_FILE: &str = "image-audit-results.json";

#[derive(Debug, Clone)]
pub struct AuditConfig {
    /// Site root; every reported path is relative to it
    pub root: PathBuf,
    /// Ignore globs, matched against root-relative paths
    pub ignore: Vec<String>,
    /// Where report files are written
    pub out_dir: PathBuf,
    /// Maximum external checks in flight
    pub concurrency: usize,
    /// Per-request timeout for external checks
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            ignore: DEFAULT_IGNORES.iter().map(|p| (*p).to_string()).collect(),
            out_dir: PathBuf::from(DEFAULT_OUT_DIR),
            concurrency: DEFAULT_CONCURRENCY,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: USER_AGENT.to_string(),
        }
    }
}

impl AuditConfig {
    // Config rooted at `root` with every other value defaulted
    pub fn for_root(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ..Self::default()
        }
    }

    // Adds extra ignore globs after the defaults
    pub fn with_extra_ignores(mut self, extra: &[String]) -> Self {
        for pattern in extra {
            if !self.ignore.contains(pattern) {
                self.ignore.push(pattern.clone());
            }
        }
        self
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        // Zero would stall buffer_unordered forever
        self.concurrency = concurrency.max(1);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_out_dir(mut self, out_dir: impl Into<PathBuf>) -> Self {
        self.out_dir = out_dir.into();
        self
    }

    // Report directory, resolved against the root when relative
    pub fn report_dir(&self) -> PathBuf {
        resolve_against(&self.root, &self.out_dir)
    }
}

fn resolve_against(root: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        root.join(path)
    }
}
