// src/audit/images.rs
// =============================================================================
// This module finds <img> elements that were never converted to the
// responsive <picture> element.
//
// Unlike link extraction this needs the document tree: "is this <img> inside
// a <picture>?" is a question about ancestors, so we parse with scraper
// (html5ever underneath) and walk up from each image.
// =============================================================================

use std::fs;
use std::io::{self, Write};

use scraper::{ElementRef, Html, Selector};

use crate::config::AuditConfig;
use crate::crawl::HtmlCrawler;
use crate::error::{AuditError, Result};
use crate::report::{timestamp, FileImageIssues, ImageAuditReport, ImageIssue, ImageSummary};

const MISSING_ATTR: &str = "N/A";

pub struct ImageAuditor {
    config: AuditConfig,
    selector: Selector,
    progress: Box<dyn Write + Send>,
}

impl ImageAuditor {
    pub fn new(config: AuditConfig) -> Result<Self> {
        // Selector::parse returns an error type that borrows the input, so it
        // is flattened to a string here
        let selector = Selector::parse("img").map_err(|e| AuditError::Selector(e.to_string()))?;
        Ok(Self {
            config,
            selector,
            progress: Box::new(io::stdout()),
        })
    }

    pub fn with_progress(mut self, out: Box<dyn Write + Send>) -> Self {
        self.progress = out;
        self
    }

    // Scans every HTML file and collects unwrapped images per file
    pub fn run(&mut self) -> Result<ImageAuditReport> {
        let crawler = HtmlCrawler::new(&self.config.root, &self.config.ignore)?;
        let files = crawler.discover()?;
        // Best-effort, like all progress output
        let _ = writeln!(
            self.progress,
            "🖼️  Looking for <img> tags not wrapped in <picture> across {} HTML files...",
            files.len()
        );

        let mut summary = ImageSummary {
            files_scanned: files.len(),
            ..ImageSummary::default()
        };
        let mut unconverted_images = Vec::new();

        for file in &files {
            let path = self.config.root.join(file);
            let bytes = fs::read(&path).map_err(|e| AuditError::FileRead {
                path: path.clone(),
                source: e,
            })?;
            let images = self.find_unwrapped(&String::from_utf8_lossy(&bytes));

            if !images.is_empty() {
                tracing::debug!(file = %file, count = images.len(), "unwrapped images");
                summary.files_with_issues += 1;
                summary.total_issues += images.len();
                unconverted_images.push(FileImageIssues {
                    file: file.clone(),
                    images,
                });
            }
        }

        Ok(ImageAuditReport {
            timestamp: timestamp(),
            unconverted_images,
            summary,
        })
    }

    // Returns every <img> in `html` that has no <picture> ancestor
    pub fn find_unwrapped(&self, html: &str) -> Vec<ImageIssue> {
        let document = Html::parse_document(html);

        document
            .select(&self.selector)
            .filter(|img| !inside_picture(img))
            .map(|img| ImageIssue {
                tag: img.html(),
                src: attr_or_missing(&img, "src"),
                alt: attr_or_missing(&img, "alt"),
            })
            .collect()
    }
}

fn inside_picture(element: &ElementRef) -> bool {
    element
        .ancestors()
        .filter_map(|node| node.value().as_element())
        .any(|parent| parent.name() == "picture")
}

// Empty attributes count as missing
fn attr_or_missing(element: &ElementRef, name: &str) -> String {
    element
        .value()
        .attr(name)
        .filter(|value| !value.is_empty())
        .unwrap_or(MISSING_ATTR)
        .to_string()
}
