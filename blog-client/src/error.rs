use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BlogClientError {
    #[error("Request error: {0}")]
    RequestError(#[from] reqwest::Error),
    #[error("Not found")]
    NotFound,
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
    #[error("Forbidden: {0}")]
    Forbidden(String),
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },
}

/// Error envelope returned by the server.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
    #[serde(default)]
    details: Option<serde_json::Value>,
}

impl BlogClientError {
    /// Turns a non-success response into an error, keeping the server's
    /// message and field details where the body carries them.
    pub async fn from_http_response(resp: reqwest::Response) -> Self {
        let status = resp.status();
        let text = resp.text().await.unwrap_or_default();
        let message = match serde_json::from_str::<ErrorBody>(&text) {
            Ok(ErrorBody {
                error,
                details: Some(details),
            }) if status == StatusCode::BAD_REQUEST => format!("{error}: {details}"),
            Ok(body) => body.error,
            Err(_) => text,
        };

        match status {
            StatusCode::NOT_FOUND => BlogClientError::NotFound,
            StatusCode::UNAUTHORIZED => BlogClientError::Unauthorized(message),
            StatusCode::FORBIDDEN => BlogClientError::Forbidden(message),
            StatusCode::BAD_REQUEST => BlogClientError::InvalidRequest(message),
            StatusCode::CONFLICT => BlogClientError::Conflict(message),
            other => BlogClientError::Server {
                status: other.as_u16(),
                message,
            },
        }
    }
}
