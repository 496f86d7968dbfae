// src/crawl/files.rs
// =============================================================================
// This module enumerates the HTML files of a built static site.
//
// How it works:
// 1. Check that the site root exists (a missing root is fatal)
// 2. Walk the tree with walkdir
// 3. Keep regular files ending in .html
// 4. Drop anything matching an ignore glob (node_modules/**, audits/**, ...)
//    or starting with a dot; ignored directories are not entered at all
// 5. Return root-relative paths, '/'-separated, sorted and deduplicated
//
// Returned paths are what the reports print under "sources", so they are
// always relative to the root and never contain backslashes.
// =============================================================================

use std::path::{Component, Path, PathBuf};

use globset::{Glob, GlobSet, GlobSetBuilder};
use walkdir::{DirEntry, WalkDir};

use crate::error::{AuditError, Result};

const HTML_EXTENSION: &str = "html";

pub struct HtmlCrawler {
    root: PathBuf,
    ignore: GlobSet,
    /// Directories never descended into: "node_modules/**" prunes "node_modules"
    prune: GlobSet,
}

impl HtmlCrawler {
    // Builds a crawler for `root`, compiling the ignore globs up front so a
    // bad pattern fails before any walking happens
    pub fn new(root: impl Into<PathBuf>, ignore_patterns: &[String]) -> Result<Self> {
        let ignore = build_globset(ignore_patterns.iter().map(String::as_str))?;
        let prune = build_globset(
            ignore_patterns
                .iter()
                .filter_map(|pattern| pattern.strip_suffix("/**"))
                .filter(|dir| !dir.is_empty()),
        )?;

        Ok(Self {
            root: root.into(),
            ignore,
            prune,
        })
    }

    // Walks the root and returns the sorted list of HTML files to scan
    //
    // Ignored and hidden (dot-prefixed) directories are pruned, so nothing
    // under them is ever read.
    pub fn discover(&self) -> Result<Vec<String>> {
        if !self.root.is_dir() {
            return Err(AuditError::RootNotFound(self.root.clone()));
        }

        let mut files = Vec::new();
        for entry in self.walk() {
            // An unreadable directory means we cannot promise a complete
            // audit, so it stops the run
            let entry = entry.map_err(|e| AuditError::Walk {
                root: self.root.clone(),
                source: e,
            })?;

            if !entry.file_type().is_file() || !is_html(entry.path()) {
                continue;
            }

            let Ok(relative) = entry.path().strip_prefix(&self.root) else {
                continue;
            };
            files.push(to_slash_path(relative));
        }

        files.sort();
        files.dedup();
        Ok(files)
    }

    // Every entry the walk visits; skipped directories are cut off before
    // they are read
    fn walk(&self) -> impl Iterator<Item = walkdir::Result<DirEntry>> + '_ {
        WalkDir::new(&self.root)
            .into_iter()
            .filter_entry(|entry| entry.depth() == 0 || !self.is_skipped(entry))
    }

    fn is_skipped(&self, entry: &DirEntry) -> bool {
        if entry.file_name().to_string_lossy().starts_with('.') {
            return true;
        }

        let Ok(relative) = entry.path().strip_prefix(&self.root) else {
            return false;
        };
        if self.ignore.is_match(relative) {
            return true;
        }
        entry.file_type().is_dir() && self.prune.is_match(relative)
    }
}

fn build_globset<'a>(patterns: impl Iterator<Item = &'a str>) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = Glob::new(pattern).map_err(|e| AuditError::InvalidPattern {
            pattern: pattern.to_string(),
            source: e,
        })?;
        builder.add(glob);
    }
    builder.build().map_err(|e| AuditError::InvalidPattern {
        pattern: "combined patterns".to_string(),
        source: e,
    })
}

fn is_html(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext == HTML_EXTENSION)
}

// "pages\a.html" and "pages/a.html" both become "pages/a.html"
pub fn to_slash_path(path: &Path) -> String {
    path.components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}
