use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use std::fmt;
use tracing::{error, warn};

/// Errors raised while listing, reading or filtering reports
#[derive(Debug)]
pub enum ReportError {
    /// Filesystem failure (missing directory, permission denied, ...)
    Io(std::io::Error),
    /// File is not JSON or lacks `report.metadata` / `report.violations`
    InvalidReport(String),
    /// Filename that could escape the reports directory or is not a .json file
    InvalidFilename(String),
    /// Unrecognized severity filter value
    InvalidFilter(String),
    NotFound(String),
}

impl ReportError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::InvalidReport(_) | Self::InvalidFilename(_) | Self::InvalidFilter(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::NotFound(_) => StatusCode::NOT_FOUND,
        }
    }

    /// Short error label used in the response envelope
    pub fn label(&self) -> &'static str {
        match self {
            Self::Io(_) => "Failed to load reports",
            Self::InvalidReport(_) => "Invalid report file",
            Self::InvalidFilename(_) => "Invalid filename",
            Self::InvalidFilter(_) => "Invalid filter",
            Self::NotFound(_) => "Report not found",
        }
    }

    /// Client-facing detail. IO errors stay generic so paths are not leaked.
    pub fn message(&self) -> String {
        match self {
            Self::Io(_) => "Unable to read the reports directory".to_string(),
            Self::InvalidReport(detail)
            | Self::InvalidFilename(detail)
            | Self::InvalidFilter(detail)
            | Self::NotFound(detail) => detail.clone(),
        }
    }
}

impl fmt::Display for ReportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "{}: {}", self.label(), e),
            _ => write!(f, "{}: {}", self.label(), self.message()),
        }
    }
}

impl std::error::Error for ReportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ReportError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl IntoResponse for ReportError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("{}", self);
        } else {
            warn!("{}", self);
        }
        let body = json!({
            "success": false,
            "error": self.label(),
            "message": self.message(),
        });
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let io = ReportError::Io(std::io::Error::from(std::io::ErrorKind::NotFound));
        assert_eq!(io.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            ReportError::InvalidReport("x".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ReportError::NotFound("x".into()).status(),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn test_io_message_is_generic() {
        let io = ReportError::Io(std::io::Error::other("/secret/path missing"));
        assert!(!io.message().contains("/secret"));
        assert!(io.to_string().contains("/secret"));
    }
}
