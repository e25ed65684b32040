//! Error type for the media gateway.
//!
//! Request handlers return `Result<Response, Error>`; the [`IntoResponse`]
//! impl turns each failure into a bare HTTP status with no body.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use std::path::PathBuf;

/// Failures a single request can run into.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The requested file is absent or could not be opened.
    #[error("not found: {}", path.display())]
    NotFound {
        /// The path that was looked up.
        path: PathBuf,
    },

    /// The request resolved outside the directory it is allowed to read.
    #[error("forbidden: {}", path.display())]
    Forbidden {
        /// The offending request path.
        path: PathBuf,
    },

    /// An I/O operation failed after the file was opened.
    #[error("IO error: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Catch-all for unexpected internal errors.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Shorthand for [`Error::NotFound`].
    pub fn not_found(path: impl Into<PathBuf>) -> Self {
        Self::NotFound { path: path.into() }
    }

    /// Shorthand for [`Error::Forbidden`].
    pub fn forbidden(path: impl Into<PathBuf>) -> Self {
        Self::Forbidden { path: path.into() }
    }

    /// Map this error to an HTTP status code.
    pub fn http_status(&self) -> StatusCode {
        match self {
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Forbidden { .. } => StatusCode::FORBIDDEN,
            Self::Io { .. } | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<axum::http::Error> for Error {
    fn from(e: axum::http::Error) -> Self {
        Self::Internal(e.to_string())
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.http_status();

        match &self {
            Self::NotFound { .. } => tracing::debug!(error = %self, "File not exist"),
            Self::Forbidden { .. } => tracing::warn!(error = %self, "Rejected request path"),
            Self::Io { .. } | Self::Internal(_) => {
                tracing::error!(status = %status, error = %self, "Request failed")
            }
        }

        status.into_response()
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    #[test]
    fn not_found_produces_404() {
        let response = Error::not_found("/videos/missing.ts").into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn forbidden_produces_403() {
        let response = Error::forbidden("/videos/../etc/passwd").into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn io_error_produces_500() {
        let err: Error = std::io::Error::other("disk gone").into();
        assert_eq!(err.http_status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn error_response_has_empty_body() {
        let response = Error::not_found("/videos/missing.m3u8").into_response();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert!(body.is_empty());
    }
}
