use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{StoreError, StoreResult};

/// Opaque version token for a stored path (the git blob SHA on the remote).
///
/// Tokens are only ever compared for equality; their format is the store's
/// business.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Version(String);

impl Version {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// First eight characters, for logs.
    pub fn short(&self) -> &str {
        let end = self.0.char_indices().nth(8).map_or(self.0.len(), |(i, _)| i);
        &self.0[..end]
    }
}

impl fmt::Debug for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Version({})", self.short())
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The current content of a path, as read from the store.
///
/// A path that does not exist has no `BlobRef`; reads return `Ok(None)`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BlobRef {
    pub path: String,
    pub bytes: Vec<u8>,
    /// Token to present when replacing this path.
    pub version: Version,
}

impl BlobRef {
    /// Content as UTF-8 text.
    pub fn text(&self) -> StoreResult<&str> {
        std::str::from_utf8(&self.bytes).map_err(|e| StoreError::Decode {
            path: self.path.clone(),
            reason: format!("not UTF-8: {e}"),
        })
    }
}

/// Check that `path` is a relative, slash-separated store path.
///
/// Rejects empty paths, leading or trailing slashes, empty segments, and
/// `.`/`..` segments.
pub fn validate_path(path: &str) -> StoreResult<()> {
    let invalid = |reason: &str| StoreError::InvalidPath {
        path: path.to_string(),
        reason: reason.to_string(),
    };
    if path.is_empty() {
        return Err(invalid("must not be empty"));
    }
    if path.starts_with('/') || path.ends_with('/') {
        return Err(invalid("must not start or end with '/'"));
    }
    for segment in path.split('/') {
        match segment {
            "" => return Err(invalid("must not contain empty segments")),
            "." | ".." => return Err(invalid("must not contain '.' or '..' segments")),
            _ => {}
        }
    }
    if path.chars().any(char::is_control) {
        return Err(invalid("must not contain control characters"));
    }
    Ok(())
}
