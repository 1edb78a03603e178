//! Audit record types and error definitions.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Outcome of an outbound call as stored in the audit log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RequestStatus {
    Success,
    Failure,
}

impl RequestStatus {
    /// Only a plain `200 OK` counts as success.
    pub fn from_http_status(status: reqwest::StatusCode) -> Self {
        if status == reqwest::StatusCode::OK {
            Self::Success
        } else {
            Self::Failure
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "Success",
            Self::Failure => "Failure",
        }
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RequestStatus {
    type Err = AuditError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Success" => Ok(Self::Success),
            "Failure" => Ok(Self::Failure),
            other => Err(AuditError::UnknownStatus(other.to_string())),
        }
    }
}

/// A row to append to the audit log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditRecord {
    pub user_id: String,
    /// Name of the operation that made the outbound call.
    pub endpoint: String,
    pub status: RequestStatus,
    /// Raw provider response body.
    pub response: String,
}

/// A stored audit row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuditEntry {
    pub id: i64,
    pub user_id: String,
    pub endpoint: String,
    pub status: RequestStatus,
    pub response: String,
    pub created_at: DateTime<Utc>,
}

/// Errors that can occur while reading or writing the audit log.
#[derive(Debug, Error)]
pub enum AuditError {
    #[error("audit database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("unknown audit status '{0}'")]
    UnknownStatus(String),
}

/// Result type for audit operations.
pub type AuditResult<T> = Result<T, AuditError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_from_http() {
        use reqwest::StatusCode;
        assert_eq!(RequestStatus::from_http_status(StatusCode::OK), RequestStatus::Success);
        assert_eq!(
            RequestStatus::from_http_status(StatusCode::NO_CONTENT),
            RequestStatus::Failure
        );
        assert_eq!(
            RequestStatus::from_http_status(StatusCode::BAD_GATEWAY),
            RequestStatus::Failure
        );
    }

    #[test]
    fn test_status_text_round_trip() {
        for status in [RequestStatus::Success, RequestStatus::Failure] {
            assert_eq!(status.as_str().parse::<RequestStatus>().unwrap(), status);
        }
        assert!(matches!(
            "success".parse::<RequestStatus>(),
            Err(AuditError::UnknownStatus(_))
        ));
    }
}
