//! Error type shared by every layer of shellify.
//!
//! Local, predictable conditions (missing configuration, missing session) get
//! their own variants so the command layer can fail fast with a clear message.
//! Everything coming back from the Spotify Web API is mapped through
//! [`Error::from_status`].

use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Shellify has not been configured. Run `shellify configure` first.")]
    NotConfigured,

    #[error("Shellify is not authenticated. Run `shellify authenticate` first.")]
    NotAuthenticated,

    #[error("Authorization timed out after {0} seconds without a callback")]
    AuthorizationTimeout(u64),

    #[error("Authorization failed: {0}")]
    AuthorizationFailed(String),

    #[error("Token refresh failed ({status}): {body}")]
    TokenRefresh { status: StatusCode, body: String },

    #[error("Unauthorized - the access token was rejected")]
    Unauthorized,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Rate limited - please wait before retrying")]
    RateLimited,

    #[error("Spotify API error ({status}): {message}")]
    Api { status: StatusCode, message: String },

    #[error("No playback devices available")]
    NoDevices,

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Prompt failed: {0}")]
    Prompt(#[from] dialoguer::Error),
}

/// Maximum length for error bodies carried in error messages
const MAX_ERROR_BODY_LENGTH: usize = 500;

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorDetail,
}

#[derive(Deserialize)]
struct ErrorDetail {
    message: String,
}

impl Error {
    /// Maps a non-success Web API response onto an error variant.
    ///
    /// Spotify wraps failures as `{"error": {"status": 404, "message": "..."}}`;
    /// the inner message is used when present, otherwise the raw body.
    pub fn from_status(status: StatusCode, body: &str) -> Self {
        let message = serde_json::from_str::<ErrorEnvelope>(body)
            .map(|e| e.error.message)
            .unwrap_or_else(|_| truncate_body(body));

        match status {
            StatusCode::UNAUTHORIZED => Error::Unauthorized,
            StatusCode::NOT_FOUND => Error::NotFound(message),
            StatusCode::TOO_MANY_REQUESTS => Error::RateLimited,
            _ => Error::Api { status, message },
        }
    }
}

fn truncate_body(body: &str) -> String {
    if body.len() <= MAX_ERROR_BODY_LENGTH {
        return body.to_string();
    }

    let mut end = MAX_ERROR_BODY_LENGTH;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}... (truncated, {} total bytes)", &body[..end], body.len())
}
