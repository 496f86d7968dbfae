// src/audit/links.rs
// =============================================================================
// The link auditor: ties crawling, extraction, classification and checking
// together for one run.
//
// How a run goes:
//   Idle -> Crawling -> Extracting -> Classifying -> Checking -> Reporting -> Done
//                  \-> Fatal  (root missing / unreadable, no report produced)
//
// 1. Crawling:    list every HTML file under the root
// 2. Extracting:  collect href/src references into LinkRecords, one record
//                 per unique raw string, accumulating the files it appears in
// 3. Classifying: skipped links are settled, internal links are checked
//                 on disk right away (cheap and synchronous), external links
//                 are queued
// 4. Checking:    external links go out through the ExternalChecker, at most
//                 N at a time; results are merged back here by this task only
// 5. Reporting:   build the AuditReport
//
// Extraction finishes before any checking starts, because dedup needs the
// full set of unique links first.
// =============================================================================

use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::fs;
use std::io::{self, Write};

use indexmap::IndexMap;

use crate::checker::{
    check_internal, classify, CheckResult, ExternalChecker, Fetcher, LinkClass, ReferenceExtractor,
};
use crate::config::AuditConfig;
use crate::crawl::HtmlCrawler;
use crate::error::Result;
use crate::report::{timestamp, AuditReport, AuditSummary, BrokenLink};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditPhase {
    Idle,
    Crawling,
    Extracting,
    Classifying,
    Checking,
    Reporting,
    Done,
    Fatal,
}

// Unique references seen during a run, each with the set of files that
// contain it
//
// Keys are raw strings, so "page.html" and "page.html#top" are separate
// records. Iteration follows discovery order.
#[derive(Debug, Default)]
pub struct LinkRecords {
    map: IndexMap<String, BTreeSet<String>>,
}

impl LinkRecords {
    pub fn add(&mut self, link: String, source: &str) {
        self.map.entry(link).or_default().insert(source.to_string());
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn sources(&self, link: &str) -> Option<&BTreeSet<String>> {
        self.map.get(link)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &BTreeSet<String>)> {
        self.map.iter()
    }
}

pub struct LinkAuditor<F: Fetcher> {
    config: AuditConfig,
    extractor: ReferenceExtractor,
    checker: ExternalChecker<F>,
    phase: AuditPhase,
    records: LinkRecords,
    results: HashMap<String, CheckResult>,
    broken: Vec<BrokenLink>,
    skipped_files: Vec<String>,
    /// Console progress lines; stdout unless told otherwise
    progress: Box<dyn Write + Send>,
}

impl<F: Fetcher> LinkAuditor<F> {
    pub fn new(config: AuditConfig, fetcher: F) -> Self {
        let checker = ExternalChecker::new(fetcher, &config);
        Self {
            config,
            extractor: ReferenceExtractor::new(),
            checker,
            phase: AuditPhase::Idle,
            records: LinkRecords::default(),
            results: HashMap::new(),
            broken: Vec::new(),
            skipped_files: Vec::new(),
            progress: Box::new(io::stdout()),
        }
    }

    // Sends progress lines to `out` instead of stdout
    pub fn with_progress(mut self, out: Box<dyn Write + Send>) -> Self {
        self.progress = out;
        self
    }

    pub fn phase(&self) -> AuditPhase {
        self.phase
    }

    pub fn records(&self) -> &LinkRecords {
        &self.records
    }

    // The cached outcome for a raw link, once the run has checked it
    pub fn result_for(&self, link: &str) -> Option<&CheckResult> {
        self.results.get(link)
    }

    // Runs a full audit and returns the report
    //
    // Every call starts from scratch: nothing carries over from an earlier
    // run on the same auditor.
    pub async fn run(&mut self) -> Result<AuditReport> {
        self.reset();
        let root = self.config.root.display().to_string();
        self.say(format_args!("🔗 Starting link audit of {}", root));

        let files = match self.crawl() {
            Ok(files) => files,
            Err(e) => {
                self.enter(AuditPhase::Fatal);
                return Err(e);
            }
        };

        self.extract(&files);
        let external = self.classify();
        self.check_external(external).await;
        let report = self.report();

        self.enter(AuditPhase::Done);
        Ok(report)
    }

    fn reset(&mut self) {
        self.phase = AuditPhase::Idle;
        self.records = LinkRecords::default();
        self.results.clear();
        self.broken.clear();
        self.skipped_files.clear();
    }

    // Progress output is best-effort; a closed console never fails the audit
    fn say(&mut self, line: fmt::Arguments<'_>) {
        let _ = writeln!(self.progress, "{}", line);
    }

    fn enter(&mut self, phase: AuditPhase) {
        tracing::debug!(from = ?self.phase, to = ?phase, "link audit phase");
        self.phase = phase;
    }

    fn crawl(&mut self) -> Result<Vec<String>> {
        self.enter(AuditPhase::Crawling);
        let crawler = HtmlCrawler::new(&self.config.root, &self.config.ignore)?;
        let files = crawler.discover()?;
        self.say(format_args!("🔍 Found {} HTML files to audit.", files.len()));
        Ok(files)
    }

    // Reads each file and records its references
    //
    // A file that cannot be read is logged and listed in the report; the
    // rest of the site is still audited.
    pub(crate) fn extract(&mut self, files: &[String]) {
        self.enter(AuditPhase::Extracting);

        for file in files {
            let path = self.config.root.join(file);
            let bytes = match fs::read(&path) {
                Ok(bytes) => bytes,
                Err(e) => {
                    tracing::warn!(file = %file, error = %e, "skipping unreadable file");
                    self.skipped_files.push(file.clone());
                    continue;
                }
            };

            let content = String::from_utf8_lossy(&bytes);
            for link in self.extractor.extract(&content) {
                self.records.add(link, file);
            }
        }

        let unique = self.records.len();
        self.say(format_args!("📊 Found {} unique links to check.", unique));
    }

    // Settles skipped and internal links, returns the external ones
    fn classify(&mut self) -> Vec<String> {
        self.enter(AuditPhase::Classifying);

        let mut external = Vec::new();
        let mut settled = Vec::new();

        for (link, sources) in self.records.iter() {
            match classify(link) {
                LinkClass::Skip => settled.push((link.clone(), CheckResult::skipped())),
                LinkClass::Internal => {
                    let result = check_internal(&self.config.root, link, sources);
                    settled.push((link.clone(), result));
                }
                LinkClass::External => external.push(link.clone()),
            }
        }

        for (link, result) in settled {
            self.record_result(link, result);
        }
        external
    }

    async fn check_external(&mut self, urls: Vec<String>) {
        self.enter(AuditPhase::Checking);
        if urls.is_empty() {
            return;
        }

        self.say(format_args!("🌐 Checking {} external link(s)...", urls.len()));
        let outcomes = self.checker.check_all(urls).await;
        for (url, result) in outcomes {
            self.record_result(url, result);
        }
    }

    // Caches a result and, if broken, queues it for the report
    fn record_result(&mut self, link: String, result: CheckResult) {
        if self.results.contains_key(&link) {
            return;
        }

        if result.is_broken() {
            let sources = self
                .records
                .sources(&link)
                .map(|set| set.iter().cloned().collect())
                .unwrap_or_default();
            self.broken.push(BrokenLink {
                link: link.clone(),
                reason: result.reason().to_string(),
                sources,
            });
        }
        self.results.insert(link, result);
    }

    fn report(&mut self) -> AuditReport {
        self.enter(AuditPhase::Reporting);
        AuditReport {
            timestamp: timestamp(),
            summary: AuditSummary {
                total_unique_links: self.records.len(),
                broken_links_count: self.broken.len(),
            },
            broken_links: self.broken.clone(),
            skipped_files: self.skipped_files.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checker::fakes::{FakeFetcher, Scripted};
    use crate::checker::CheckStatus;
    use crate::error::AuditError;
    use std::path::Path;
    use std::sync::Arc;
    use std::time::Duration;
    use tempfile::TempDir;

    fn write(root: &Path, relative: &str, content: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn auditor(root: &Path, fetcher: Arc<FakeFetcher>) -> LinkAuditor<Arc<FakeFetcher>> {
        let config = AuditConfig::for_root(root).with_timeout(Duration::from_millis(200));
        LinkAuditor::new(config, fetcher).with_progress(Box::new(io::sink()))
    }

    #[tokio::test]
    async fn test_missing_internal_page() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "index.html", r#"<a href="about.html">About</a>"#);

        let mut auditor = auditor(dir.path(), Arc::new(FakeFetcher::new()));
        let report = auditor.run().await.unwrap();

        assert_eq!(report.summary.total_unique_links, 1);
        assert_eq!(report.summary.broken_links_count, 1);
        assert_eq!(
            report.broken_links,
            vec![BrokenLink {
                link: "about.html".to_string(),
                reason: "File not found: about.html".to_string(),
                sources: vec!["index.html".to_string()],
            }]
        );
        assert_eq!(auditor.phase(), AuditPhase::Done);
    }

    #[tokio::test]
    async fn test_external_404() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "index.html", r#"<a href="https://example.com/404">x</a>"#);

        let fetcher =
            Arc::new(FakeFetcher::new().respond("https://example.com/404", Scripted::Status(404)));
        let report = auditor(dir.path(), fetcher).run().await.unwrap();

        assert_eq!(report.broken_links.len(), 1);
        assert_eq!(report.broken_links[0].reason, "HTTP Error: 404");
    }

    #[tokio::test]
    async fn test_external_timeout_reason() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "index.html", r#"<script src="https://slow.example.com/a.js"></script>"#);

        let fetcher =
            Arc::new(FakeFetcher::new().respond("https://slow.example.com/a.js", Scripted::Hang));
        let report = auditor(dir.path(), fetcher).run().await.unwrap();

        assert_eq!(report.broken_links[0].reason, "Timeout");
    }

    #[tokio::test]
    async fn test_empty_site() {
        let dir = TempDir::new().unwrap();
        let report = auditor(dir.path(), Arc::new(FakeFetcher::new())).run().await.unwrap();

        assert_eq!(report.summary.total_unique_links, 0);
        assert_eq!(report.summary.broken_links_count, 0);
        assert!(!report.has_broken_links());
    }

    #[tokio::test]
    async fn test_shared_external_link_is_fetched_once() {
        let dir = TempDir::new().unwrap();
        for i in 0..50 {
            write(
                dir.path(),
                &format!("pages/p{i}.html"),
                r#"<a href="https://example.com/shared">s</a><a href="https://example.com/shared">again</a>"#,
            );
        }

        let fetcher = Arc::new(FakeFetcher::new());
        let mut auditor = auditor(dir.path(), Arc::clone(&fetcher));
        let report = auditor.run().await.unwrap();

        assert_eq!(fetcher.call_count("https://example.com/shared"), 1);
        assert_eq!(report.summary.total_unique_links, 1);
        assert_eq!(auditor.records().sources("https://example.com/shared").unwrap().len(), 50);
    }

    #[tokio::test]
    async fn test_same_link_in_two_files_is_one_record() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "a.html", r#"<a href="missing.html">x</a>"#);
        write(dir.path(), "b.html", r#"<a href="missing.html">y</a>"#);

        let report = auditor(dir.path(), Arc::new(FakeFetcher::new())).run().await.unwrap();

        assert_eq!(report.summary.total_unique_links, 1);
        assert_eq!(report.broken_links[0].sources, vec!["a.html", "b.html"]);
    }

    #[tokio::test]
    async fn test_skipped_links_never_reach_disk_or_network() {
        let dir = TempDir::new().unwrap();
        write(
            dir.path(),
            "index.html",
            r##"<a href="#top">t</a><a href="mailto:a@b.com">m</a><a href="tel:+15551234567">p</a><a href="javascript:void(0)">j</a>"##,
        );

        let fetcher = Arc::new(FakeFetcher::new());
        let mut auditor = auditor(dir.path(), Arc::clone(&fetcher));
        let report = auditor.run().await.unwrap();

        assert_eq!(report.summary.total_unique_links, 4);
        assert!(report.broken_links.is_empty());
        assert_eq!(fetcher.total_calls(), 0);
        assert_eq!(auditor.result_for("#top").unwrap().status, CheckStatus::Skipped);
    }

    #[tokio::test]
    async fn test_fragment_variants_are_distinct_records() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "page.html", "");
        write(
            dir.path(),
            "index.html",
            r#"<a href="page.html">p</a><a href="page.html#section">s</a><a href="gone.html#x">g</a>"#,
        );

        let mut auditor = auditor(dir.path(), Arc::new(FakeFetcher::new()));
        let report = auditor.run().await.unwrap();

        // page.html, page.html#section and gone.html#x
        assert_eq!(report.summary.total_unique_links, 3);
        assert_eq!(auditor.result_for("page.html").unwrap().status, CheckStatus::Ok);
        assert_eq!(auditor.result_for("page.html#section").unwrap().status, CheckStatus::Ok);
        assert_eq!(report.broken_links[0].link, "gone.html#x");
        assert_eq!(report.broken_links[0].reason, "File not found: gone.html");
    }

    #[tokio::test]
    async fn test_relative_links_resolve_from_source_directory() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "pages/images/x.png", "");
        write(dir.path(), "images/y.png", "");
        write(
            dir.path(),
            "pages/a.html",
            r#"<img src="images/x.png"><img src="/images/y.png"><img src="../images/y.png">"#,
        );

        let report = auditor(dir.path(), Arc::new(FakeFetcher::new())).run().await.unwrap();
        assert!(report.broken_links.is_empty(), "{:?}", report.broken_links);
    }

    #[tokio::test]
    async fn test_rerun_is_idempotent() {
        let dir = TempDir::new().unwrap();
        write(
            dir.path(),
            "index.html",
            r#"<a href="nope.html">n</a><a href="https://example.com/404">x</a><a href="https://example.com/">ok</a>"#,
        );

        let fetcher =
            Arc::new(FakeFetcher::new().respond("https://example.com/404", Scripted::Status(404)));
        let mut auditor = auditor(dir.path(), Arc::clone(&fetcher));
        let first = auditor.run().await.unwrap();
        let second = auditor.run().await.unwrap();

        assert_eq!(first.summary, second.summary);
        let links = |r: &AuditReport| r.broken_links.iter().map(|b| b.link.clone()).collect::<BTreeSet<_>>();
        assert_eq!(links(&first), links(&second));
        // Each run fetches each URL once; nothing is cached across runs
        assert_eq!(fetcher.call_count("https://example.com/404"), 2);
    }

    #[tokio::test]
    async fn test_missing_root_is_fatal() {
        let dir = TempDir::new().unwrap();
        let mut auditor = auditor(&dir.path().join("nope"), Arc::new(FakeFetcher::new()));

        let result = auditor.run().await;
        assert!(matches!(result, Err(AuditError::RootNotFound(_))));
        assert_eq!(auditor.phase(), AuditPhase::Fatal);
    }

    #[test]
    fn test_unreadable_file_is_skipped_not_fatal() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "index.html", r#"<a href="a.html">a</a>"#);

        let mut auditor = auditor(dir.path(), Arc::new(FakeFetcher::new()));
        // "vanished.html" was listed by the crawl but is gone by read time
        auditor.extract(&["index.html".to_string(), "vanished.html".to_string()]);

        assert_eq!(auditor.records().len(), 1);
        assert_eq!(auditor.skipped_files, vec!["vanished.html"]);
    }

    #[test]
    fn test_invalid_utf8_is_read_lossily() {
        let dir = TempDir::new().unwrap();
        let mut bytes = b"<a href=\"ok.html\">".to_vec();
        bytes.extend_from_slice(&[0xff, 0xfe]);
        fs::write(dir.path().join("index.html"), bytes).unwrap();

        let mut auditor = auditor(dir.path(), Arc::new(FakeFetcher::new()));
        auditor.extract(&["index.html".to_string()]);

        assert!(auditor.skipped_files.is_empty());
        assert!(auditor.records().sources("ok.html").is_some());
    }

    #[tokio::test]
    async fn test_closed_console_does_not_fail_the_audit() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "index.html", r#"<a href="missing.html">m</a>"#);

        let mut auditor = auditor(dir.path(), Arc::new(FakeFetcher::new()))
            .with_progress(Box::new(crate::report::ClosedPipe));
        let report = auditor.run().await.unwrap();

        assert_eq!(auditor.phase(), AuditPhase::Done);
        assert_eq!(report.summary.broken_links_count, 1);
    }

    #[derive(Clone, Default)]
    struct Captured(Arc<std::sync::Mutex<Vec<u8>>>);

    impl Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_progress_goes_to_the_given_writer() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "index.html", r#"<a href="https://example.com/">e</a>"#);

        let captured = Captured::default();
        let fetcher = Arc::new(FakeFetcher::new().respond("https://example.com/", Scripted::Status(200)));
        let mut auditor = auditor(dir.path(), fetcher).with_progress(Box::new(captured.clone()));
        auditor.run().await.unwrap();

        let text = String::from_utf8(captured.0.lock().unwrap().clone()).unwrap();
        assert!(text.contains("Starting link audit of"));
        assert!(text.contains("Found 1 HTML files to audit."));
        assert!(text.contains("Found 1 unique links to check."));
        assert!(text.contains("Checking 1 external link(s)..."));
    }
}
