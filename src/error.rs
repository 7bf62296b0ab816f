//! Custom error types for studium

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

/// Main error type for studium operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Qdrant error: {0}")]
    Qdrant(String),

    #[error("Embedding error: {0}")]
    Embedding(String),

    #[error("Extraction error: {0}")]
    Extract(String),

    #[error("Generation error: {0}")]
    Generation(String),

    #[error("Model returned malformed content: {0}")]
    MalformedAid(String),

    #[error("No API key configured: set one via POST /set_api_key or the environment")]
    MissingApiKey,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("Unsupported file format: {0} (only .pdf and .txt are accepted)")]
    UnsupportedFormat(String),

    #[error("Document already exists: {0}")]
    DuplicateDocument(String),

    #[error("Document not found: {0}")]
    DocumentNotFound(String),

    #[error("Invalid upload: {0}")]
    InvalidUpload(String),

    #[error("{0}")]
    Other(String),
}

impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Error::Other(err.to_string())
    }
}

/// Result type alias for studium
pub type Result<T> = std::result::Result<T, Error>;

/// Convert qdrant errors
impl From<qdrant_client::QdrantError> for Error {
    fn from(err: qdrant_client::QdrantError) -> Self {
        Error::Qdrant(err.to_string())
    }
}

impl Error {
    /// HTTP status code for this error when surfaced through the API
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::UnsupportedFormat(_) | Error::InvalidUpload(_) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            Error::DuplicateDocument(_) => StatusCode::CONFLICT,
            Error::DocumentNotFound(_) => StatusCode::NOT_FOUND,
            Error::MissingApiKey => StatusCode::UNAUTHORIZED,
            Error::Generation(_) | Error::MalformedAid(_) | Error::Http(_) => {
                StatusCode::BAD_GATEWAY
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(json!({
            "error": self.to_string(),
        }));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            Error::UnsupportedFormat("x.docx".into()).status_code(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            Error::DuplicateDocument("abc".into()).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            Error::DocumentNotFound("abc".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(Error::MissingApiKey.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            Error::Generation("upstream".into()).status_code(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            Error::Qdrant("down".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
