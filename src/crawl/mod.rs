// src/crawl/mod.rs
// =============================================================================
// This module finds the pages to audit.
//
// The site is already built, so "crawling" is a directory walk rather than
// an HTTP crawl: every .html file under the root, minus ignored paths.
// =============================================================================

mod files;

pub use files::{to_slash_path, HtmlCrawler};
