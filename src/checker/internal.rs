// src/checker/internal.rs
// =============================================================================
// This module checks internal (on-disk) references.
//
// Resolution rules:
// - "#fragment" and "?query" suffixes are cut off first; only the path part
//   has to exist
// - "/x/y.png" is resolved against the site root
// - anything else is resolved against the directory of the FIRST file that
//   references it (sources are sorted, so "first" is stable across runs)
// - a directory counts as existing, the way static hosts serve index.html
//
// Known limitation: a relative link shared by pages in different directories
// is only checked from one of them.
// =============================================================================

use std::collections::BTreeSet;
use std::path::{Component, Path, PathBuf};

use super::result::CheckResult;
use crate::crawl::to_slash_path;

// Resolves `link` and reports whether it exists on disk
//
// Parameters:
//   root: the site root
//   link: the raw reference as written in the HTML
//   sources: root-relative paths of the files that contain it
pub fn check_internal(root: &Path, link: &str, sources: &BTreeSet<String>) -> CheckResult {
    let resolved = resolve_internal(root, link, sources);

    if resolved.exists() {
        CheckResult::ok()
    } else {
        let shown = resolved
            .strip_prefix(root)
            .map(to_slash_path)
            .unwrap_or_else(|_| resolved.display().to_string());
        CheckResult::broken(format!("File not found: {}", shown))
    }
}

// Maps a reference to the filesystem path it points at
pub fn resolve_internal(root: &Path, link: &str, sources: &BTreeSet<String>) -> PathBuf {
    let target = strip_suffixes(link);

    let base = if target.starts_with('/') {
        root.to_path_buf()
    } else {
        sources
            .iter()
            .next()
            .and_then(|first| Path::new(first).parent())
            .map(|dir| root.join(dir))
            .unwrap_or_else(|| root.to_path_buf())
    };

    normalize(&base.join(target.trim_start_matches('/')))
}

// "page.html?v=2#top" -> "page.html"
fn strip_suffixes(link: &str) -> &str {
    let without_fragment = link.split('#').next().unwrap_or("");
    without_fragment.split('?').next().unwrap_or("")
}

// Lexically folds "." and ".." so diagnostics show the path we actually
// looked for ("pages/../img/x.png" -> "img/x.png")
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                // "/.." is "/"
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => out.push(".."),
            },
            other => out.push(other.as_os_str()),
        }
    }
    out
}
