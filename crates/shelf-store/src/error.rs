use crate::blob::Version;

/// Errors from content store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The write's version precondition did not hold: the path changed since
    /// it was read, or it exists and no version was supplied.
    #[error("version conflict writing {path} (expected {})", display_version(.expected))]
    Conflict {
        path: String,
        expected: Option<Version>,
    },

    /// The request never produced a response (connection, timeout, TLS).
    #[error("HTTP error calling {endpoint}: {source}")]
    Http {
        endpoint: String,
        source: reqwest::Error,
    },

    /// The store answered with an unexpected status.
    #[error("store {endpoint} returned {status}: {body}")]
    Api {
        endpoint: String,
        status: u16,
        body: String,
    },

    /// The credential was missing, invalid, or lacks access to the repository.
    #[error("store rejected credential for {endpoint} ({status})")]
    Unauthorized { endpoint: String, status: u16 },

    /// The store's response could not be decoded.
    #[error("failed to decode {path}: {reason}")]
    Decode { path: String, reason: String },

    /// The path is not a valid store path.
    #[error("invalid store path {path:?}: {reason}")]
    InvalidPath { path: String, reason: String },

    /// Client construction failed.
    #[error("configuration error: {0}")]
    Config(String),

    /// The backend is unavailable for a reason other than HTTP.
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    /// Whether this is a compare-and-swap rejection.
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict { .. })
    }
}

fn display_version(version: &Option<Version>) -> String {
    match version {
        Some(v) => v.short().to_string(),
        None => "new file".to_string(),
    }
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
