//! Request and issue logs filed against content entities.
//!
//! A log records either a proposed edit (`request`) or a reported problem
//! (`issue`). It is created once and only ever mutated by approval, which
//! flips `confirmed` and records the approver.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::account::ProfileId;
use super::content::{ContentKind, ContentRef};

/// Identifier of a request log
pub type RequestId = i64;

/// Maximum length of a request subject
pub const SUBJECT_MAX: usize = 40;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestType {
    /// Proposed change
    Request,

    /// Reported problem
    Issue,
}

impl RequestType {
    pub fn as_str(self) -> &'static str {
        match self {
            RequestType::Request => "request",
            RequestType::Issue => "issue",
        }
    }
}

impl std::fmt::Display for RequestType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for RequestType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "request" => Ok(RequestType::Request),
            "issue" => Ok(RequestType::Issue),
            _ => anyhow::bail!("Unknown request type: {}", s),
        }
    }
}

/// A logged request or issue
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestLog {
    pub id: RequestId,

    /// The content entity this log is about
    pub target: ContentRef,
    pub request_type: RequestType,
    pub subject: String,
    pub solution: String,
    pub note: String,

    /// Set by a moderator; never reset
    pub confirmed: bool,
    pub creator: Option<ProfileId>,
    pub approver: Option<ProfileId>,

    /// Creation time
    pub timestamp: DateTime<Utc>,
}

impl RequestLog {
    /// Still waiting for a moderator
    pub fn is_pending(&self) -> bool {
        !self.confirmed
    }
}

/// Input for filing a new log
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NewRequest {
    pub target: ContentRef,
    pub request_type: RequestType,
    pub subject: String,
    pub solution: String,
    #[serde(default)]
    pub note: String,
}

/// Selection of logs to list
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RequestFilter {
    /// Only logs against this exact entity
    pub target: Option<ContentRef>,

    /// Only logs against entities of this kind
    pub kind: Option<ContentKind>,

    /// Only confirmed (`Some(true)`) or pending (`Some(false)`) logs
    pub confirmed: Option<bool>,
}

impl RequestFilter {
    pub fn pending() -> Self {
        Self {
            confirmed: Some(false),
            ..Default::default()
        }
    }

    pub fn for_target(target: ContentRef) -> Self {
        Self {
            target: Some(target),
            ..Default::default()
        }
    }

    /// Whether a log matches every set criterion
    pub fn matches(&self, log: &RequestLog) -> bool {
        self.target.map_or(true, |t| t == log.target)
            && self.kind.map_or(true, |k| k == log.target.kind)
            && self.confirmed.map_or(true, |c| c == log.confirmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(target: ContentRef, confirmed: bool) -> RequestLog {
        RequestLog {
            id: 1,
            target,
            request_type: RequestType::Issue,
            subject: "bug".to_string(),
            solution: String::new(),
            note: String::new(),
            confirmed,
            creator: None,
            approver: None,
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn test_filter_matches() {
        let log = sample(ContentRef::function(4), false);

        assert!(RequestFilter::default().matches(&log));
        assert!(RequestFilter::pending().matches(&log));
        assert!(RequestFilter::for_target(ContentRef::function(4)).matches(&log));
        assert!(!RequestFilter::for_target(ContentRef::library(4)).matches(&log));

        let confirmed_only = RequestFilter {
            confirmed: Some(true),
            ..Default::default()
        };
        assert!(!confirmed_only.matches(&log));
    }

    #[test]
    fn test_is_pending() {
        assert!(sample(ContentRef::library(1), false).is_pending());
        assert!(!sample(ContentRef::library(1), true).is_pending());
    }

    #[test]
    fn test_request_type_serde() {
        let json = serde_json::to_string(&RequestType::Issue).unwrap();
        assert_eq!(json, "\"issue\"");
        assert_eq!("Request".parse::<RequestType>().unwrap(), RequestType::Request);
    }
}
