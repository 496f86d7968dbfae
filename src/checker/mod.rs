// src/checker/mod.rs
// =============================================================================
// This module contains all link checking logic.
//
// Submodules:
// - html: pulls raw href/src references out of HTML text
// - classify: decides skip / internal / external for each reference
// - internal: resolves internal references against the filesystem
// - http: checks external references over HTTP, with bounded concurrency
// - result: the CheckResult every check produces
// =============================================================================

mod classify;
mod html;
mod http;
mod internal;
mod result;

pub use classify::{classify, LinkClass};
pub use html::ReferenceExtractor;
pub use http::{ExternalChecker, FetchError, Fetcher, HttpFetcher};
pub use internal::check_internal;
pub use result::{CheckResult, CheckStatus};

#[cfg(test)]
pub(crate) use http::fakes;
