//! Error types for the server and CLI

use axum::extract::multipart::{MultipartError, MultipartRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use covbadge::CovbadgeError;
use thiserror::Error;

/// Result type for server operations
pub type ServerResult<T> = Result<T, ServerError>;

/// Errors that can occur while serving or running CLI commands
#[derive(Debug, Error)]
pub enum ServerError {
    /// Configuration error
    #[error("Configuration error: {message}")]
    Config {
        /// Error message
        message: String,
    },

    /// Logging could not be initialised
    #[error("Logging setup failed: {message}")]
    Logging {
        /// Error message
        message: String,
    },

    /// Request did not name a repository
    #[error("missing repo query parameter")]
    MissingRepo,

    /// Upload carried no file part
    #[error("no file part in upload")]
    MissingFile,

    /// Upload body is not valid multipart
    #[error("error creating multipart reader: {0}")]
    MultipartRejection(#[from] MultipartRejection),

    /// Multipart stream broke off or exceeded the size limit
    #[error("error reading upload: {0}")]
    Multipart(#[from] MultipartError),

    /// Badge rendering service could not be reached
    #[error("badge service request to {url} failed: {message}")]
    Shield {
        /// Requested badge URL
        url: String,
        /// Transport error text
        message: String,
    },

    /// Badge rendering service answered with a failure status
    #[error("badge service returned {status} for {url}")]
    ShieldStatus {
        /// Requested badge URL
        url: String,
        /// Upstream status code
        status: u16,
    },

    /// Parsing, aggregation or storage failure
    #[error(transparent)]
    Covbadge(#[from] CovbadgeError),

    /// Blocking task panicked or was cancelled
    #[error("background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    /// JSON output could not be produced
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ServerError {
    /// Create a configuration error
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a badge service transport error
    #[must_use]
    pub fn shield(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Shield {
            url: url.into(),
            message: message.into(),
        }
    }

    /// HTTP status this error is reported with
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::MissingRepo | Self::MissingFile => StatusCode::BAD_REQUEST,
            Self::MultipartRejection(rejection) => rejection.status(),
            Self::Multipart(err) => err.status(),
            Self::Shield { .. } | Self::ShieldStatus { .. } => StatusCode::BAD_GATEWAY,
            Self::Covbadge(err) if err.is_client_error() => StatusCode::BAD_REQUEST,
            Self::Covbadge(_)
            | Self::Config { .. }
            | Self::Logging { .. }
            | Self::Task(_)
            | Self::Json(_)
            | Self::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), error = %self, "request failed");
        } else {
            tracing::warn!(status = status.as_u16(), error = %self, "request rejected");
        }
        (status, self.to_string()).into_response()
    }
}
