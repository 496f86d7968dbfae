// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// Running `site-auditor` with no subcommand audits links in the current
// directory, so in CI it is a single bare invocation after the site build.
// =============================================================================

use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};

use crate::config::{AuditConfig, DEFAULT_CONCURRENCY, DEFAULT_OUT_DIR, DEFAULT_TIMEOUT_SECS};

#[derive(Parser, Debug)]
#[command(
    name = "site-auditor",
    version,
    about = "Audit a built static site for broken links and unoptimized images",
    long_about = "site-auditor scans every HTML file under the site root, checks each href/src \
                  reference against the filesystem or the network, and writes a JSON report to \
                  audits/. Exit code 0 means clean, 1 means problems were found, 2 means the \
                  audit itself failed."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Site root to audit (defaults to the current directory)
    #[arg(long, global = true)]
    pub root: Option<PathBuf>,

    /// Directory for JSON reports, relative to the root unless absolute
    #[arg(long, global = true, default_value = DEFAULT_OUT_DIR)]
    pub out_dir: PathBuf,

    /// Extra glob of paths to skip (repeatable); node_modules/** and audits/** are always skipped
    #[arg(long = "ignore", global = true, value_name = "GLOB")]
    pub ignore: Vec<String>,

    /// Also print the JSON report to stdout
    #[arg(long, global = true)]
    pub json: bool,

    /// Increase log verbosity (-v info, -vv debug); RUST_LOG overrides
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Check every href/src reference (the default)
    ///
    /// Example: site-auditor links --concurrency 20
    Links(LinkArgs),

    /// Find <img> tags that are not wrapped in <picture>
    Images,
}

#[derive(Args, Debug, Clone)]
pub struct LinkArgs {
    /// Maximum number of external checks in flight
    #[arg(long, default_value_t = DEFAULT_CONCURRENCY)]
    pub concurrency: usize,

    /// Seconds before an external check is abandoned as "Timeout"
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout_secs: u64,
}

impl Default for LinkArgs {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_CONCURRENCY,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl Cli {
    // Options shared by every audit, resolved into an AuditConfig
    pub fn base_config(&self, cwd: PathBuf) -> AuditConfig {
        let root = self.root.clone().unwrap_or(cwd);
        AuditConfig::for_root(root)
            .with_extra_ignores(&self.ignore)
            .with_out_dir(self.out_dir.clone())
    }
}

impl LinkArgs {
    pub fn apply(&self, config: AuditConfig) -> AuditConfig {
        config
            .with_concurrency(self.concurrency)
            .with_timeout(Duration::from_secs(self.timeout_secs))
    }
}
