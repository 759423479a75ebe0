use thiserror::Error;

/// Errors surfaced by the synchronization engine.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("authentication required - please login")]
    NotAuthenticated,

    #[error("login rejected: {0}")]
    LoginRejected(String),

    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("server returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("storage error: {0}")]
    Storage(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("malformed payload: {0}")]
    Malformed(String),
}

pub type Result<T> = std::result::Result<T, CoreError>;
