// src/checker/http.rs
// =============================================================================
// This module checks external (http/https) links.
//
// Key functionality:
// - One GET per unique URL, following redirects, with a client user-agent
// - A per-request timeout; a request that runs over is reported as "Timeout"
// - Bounded concurrency: at most N checks in flight at once
// - 2xx/3xx final status is ok, anything else is "HTTP Error: {status}"
//
// The network sits behind the Fetcher trait. HttpFetcher is the real
// reqwest-backed one; tests plug in scripted fetchers so no test ever needs
// an internet connection.
//
// Rust concepts:
// - Traits with async methods (returning impl Future)
// - Streams: buffer_unordered for a concurrency window
// - tokio::time::timeout to cap a single future
// =============================================================================

use std::future::Future;
use std::time::Duration;

use futures::stream::{self, StreamExt}; // StreamExt gives us .buffer_unordered()
use reqwest::{Client, ClientBuilder, StatusCode};
use url::Url;

use super::result::CheckResult;
use crate::config::AuditConfig;
use crate::error::{AuditError, Result};

const MAX_REDIRECTS: usize = 10;

// Why a single fetch failed before any HTTP status was available
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// The request ran past its deadline
    Timeout,
    /// DNS, connection refused, TLS, redirect loop, ... with its message
    Network(String),
}

// Performs one GET and yields the final status code
//
// Implementations must not retry: the checker relies on exactly one call
// per unique URL.
pub trait Fetcher: Send + Sync {
    fn fetch(&self, url: &str) -> impl Future<Output = std::result::Result<u16, FetchError>> + Send;
}

// The real fetcher, backed by a shared reqwest Client
//
// Client is cheap to clone (it's a reference counter internally) and keeps
// a connection pool, so one instance serves the whole run.
#[derive(Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(config: &AuditConfig) -> Result<Self> {
        let client = client_builder(config)
            .build()
            .map_err(AuditError::HttpClient)?;

        Ok(Self { client })
    }
}

fn client_builder(config: &AuditConfig) -> ClientBuilder {
    Client::builder()
        .user_agent(config.user_agent.as_str())
        .timeout(config.timeout)
        .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
}

impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> std::result::Result<u16, FetchError> {
        // reqwest only hands us the final response once redirects are
        // followed; the body is never read
        match self.client.get(url).send().await {
            Ok(response) => Ok(response.status().as_u16()),
            Err(e) => Err(categorize_error(e)),
        }
    }
}

// Sorts reqwest errors into timeout vs everything else
//
// For network failures the reason is the full error chain, since reqwest's
// top-level message ("error sending request for url") hides the cause.
fn categorize_error(error: reqwest::Error) -> FetchError {
    if error.is_timeout() {
        return FetchError::Timeout;
    }
    if error.is_redirect() {
        return FetchError::Network("Too many redirects".to_string());
    }

    let mut message = error.to_string();
    let mut source = std::error::Error::source(&error);
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = std::error::Error::source(cause);
    }
    FetchError::Network(message)
}

// Checks external URLs through a Fetcher, at most `concurrency` at a time
pub struct ExternalChecker<F: Fetcher> {
    fetcher: F,
    concurrency: usize,
    timeout: Duration,
}

impl<F: Fetcher> ExternalChecker<F> {
    pub fn new(fetcher: F, config: &AuditConfig) -> Self {
        Self {
            fetcher,
            concurrency: config.concurrency.max(1),
            timeout: config.timeout,
        }
    }

    // Checks every URL once and returns (url, result) pairs
    //
    // Checks are started in the order given but results come back in
    // completion order (hence "unordered"). Callers key results by URL, so
    // order does not matter.
    pub async fn check_all(&self, urls: Vec<String>) -> Vec<(String, CheckResult)> {
        stream::iter(urls)
            .map(move |url| async move {
                let result = self.check_one(&url).await;
                (url, result)
            })
            .buffer_unordered(self.concurrency)
            .collect()
            .await
    }

    // Checks a single URL
    pub async fn check_one(&self, url: &str) -> CheckResult {
        if let Err(e) = Url::parse(url) {
            return CheckResult::broken(format!("Invalid URL: {}", e));
        }

        // The fetcher has its own timeout too, but this one also covers
        // fetchers that never resolve at all
        let result = match tokio::time::timeout(self.timeout, self.fetcher.fetch(url)).await {
            Err(_elapsed) => CheckResult::timeout(),
            Ok(Err(FetchError::Timeout)) => CheckResult::timeout(),
            Ok(Err(FetchError::Network(message))) => CheckResult::broken(message),
            Ok(Ok(status)) => analyze_status(status),
        };

        tracing::debug!(url, status = ?result.status, reason = result.reason(), "external link checked");
        result
    }
}

// 2xx and 3xx are fine: redirects were already followed, so a 3xx here is
// something like 304 that still means the resource is there
fn analyze_status(status: u16) -> CheckResult {
    match StatusCode::from_u16(status) {
        Ok(code) if code.is_success() || code.is_redirection() => CheckResult::ok_http(status),
        _ => CheckResult::broken_http(status),
    }
}
