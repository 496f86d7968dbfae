// src/checker/result.rs
// =============================================================================
// The outcome of checking one unique link.
//
// A CheckResult is computed once per LinkRecord and never changed afterwards.
// Internal, external and skipped links all produce the same shape so the
// auditor can cache them in one map.
// =============================================================================

use serde::{Deserialize, Serialize};

pub const SKIP_REASON: &str = "Special protocol or anchor";
pub const TIMEOUT_REASON: &str = "Timeout";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckStatus {
    Ok,
    Broken,
    Skipped,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckResult {
    pub status: CheckStatus,
    /// Why the link was broken or skipped
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    /// Final HTTP status, for external links that got a response
    #[serde(skip_serializing_if = "Option::is_none")]
    pub http_status: Option<u16>,
}

impl CheckResult {
    pub fn ok() -> Self {
        Self {
            status: CheckStatus::Ok,
            reason: None,
            http_status: None,
        }
    }

    pub fn ok_http(status: u16) -> Self {
        Self {
            http_status: Some(status),
            ..Self::ok()
        }
    }

    pub fn skipped() -> Self {
        Self {
            status: CheckStatus::Skipped,
            reason: Some(SKIP_REASON.to_string()),
            http_status: None,
        }
    }

    pub fn broken(reason: impl Into<String>) -> Self {
        Self {
            status: CheckStatus::Broken,
            reason: Some(reason.into()),
            http_status: None,
        }
    }

    pub fn broken_http(status: u16) -> Self {
        Self {
            http_status: Some(status),
            ..Self::broken(format!("HTTP Error: {}", status))
        }
    }

    pub fn timeout() -> Self {
        Self::broken(TIMEOUT_REASON)
    }

    pub fn is_broken(&self) -> bool {
        self.status == CheckStatus::Broken
    }

    pub fn reason(&self) -> &str {
        self.reason.as_deref().unwrap_or("")
    }
}
