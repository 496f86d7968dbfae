// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Set up logging
// 3. Dispatch to the link audit (default) or the image audit
// 4. Write the JSON report and print the console summary (or the JSON
//    itself with --json)
// 5. Exit with proper code (0 = clean, 1 = problems found, 2 = error)
// =============================================================================

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser; // Parser trait enables the parse() method

use site_auditor::audit::{ImageAuditor, LinkAuditor};
use site_auditor::checker::HttpFetcher;
use site_auditor::cli::{Cli, Commands, LinkArgs};
use site_auditor::config::{AuditConfig, IMAGE_REPORT_FILE, LINK_REPORT_FILE};
use site_auditor::{logging, report};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let exit_code = match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            // The audit never finished: distinct from "finished with findings"
            tracing::error!(error = %format!("{:#}", e), "audit failed");
            let _ = writeln!(io::stderr(), "Error: {:#}", e);
            report::EXIT_FATAL
        }
    };

    std::process::exit(exit_code);
}

// Returns:
//   Ok(0) = nothing found
//   Ok(1) = broken links / unwrapped images found
//   Err   = the audit could not run to completion
async fn run(cli: Cli) -> Result<i32> {
    let cwd = std::env::current_dir().context("cannot determine current directory")?;
    let config = cli.base_config(cwd);
    let config = AuditConfig {
        root: absolute_root(config.root),
        ..config
    };

    match &cli.command {
        None => handle_link_audit(LinkArgs::default().apply(config), cli.json).await,
        Some(Commands::Links(args)) => handle_link_audit(args.apply(config), cli.json).await,
        Some(Commands::Images) => handle_image_audit(config, cli.json),
    }
}

// Canonical root when it exists, so "../" in links folds against real
// directory names; a missing root is left alone for the crawler to report
fn absolute_root(root: PathBuf) -> PathBuf {
    std::fs::canonicalize(&root).unwrap_or(root)
}

async fn handle_link_audit(config: AuditConfig, json: bool) -> Result<i32> {
    let fetcher = HttpFetcher::new(&config)?;
    let report_dir = config.report_dir();
    let mut auditor = LinkAuditor::new(config, fetcher).with_progress(report::console(json));
    let report = auditor.run().await?;

    let path = report::write_json(&report, &report_dir, LINK_REPORT_FILE)?;
    let code = report::exit_code_for(report.summary.broken_links_count);

    let mut console = report::console(json);
    let printed = writeln!(console, "\n📊 Detailed report saved to: {}", path.display())
        .and_then(|_| {
            if json {
                report::print_json(&mut io::stdout().lock(), &report)
            } else {
                report::print_link_summary(&mut console, &report)
            }
        });
    finish(printed, code)
}

fn handle_image_audit(config: AuditConfig, json: bool) -> Result<i32> {
    let report_dir = config.report_dir();
    let report = ImageAuditor::new(config)?
        .with_progress(report::console(json))
        .run()?;

    let path = report::write_json(&report, &report_dir, IMAGE_REPORT_FILE)?;
    let code = report::exit_code_for(report.summary.total_issues);

    let mut console = report::console(json);
    let printed = writeln!(console, "\n📊 Detailed report saved to: {}", path.display())
        .and_then(|_| {
            if json {
                report::print_json(&mut io::stdout().lock(), &report)
            } else {
                report::print_image_summary(&mut console, &report)
            }
        });
    finish(printed, code)
}

// The report file is already written by the time anything is printed, so a
// reader that hangs up early (`site-auditor | head`) does not change the
// outcome; any other write failure does
fn finish(printed: io::Result<()>, code: i32) -> Result<i32> {
    match printed {
        Ok(()) => Ok(code),
        Err(e) if e.kind() == io::ErrorKind::BrokenPipe => Ok(code),
        Err(e) => Err(e).context("failed to write to the console"),
    }
}
