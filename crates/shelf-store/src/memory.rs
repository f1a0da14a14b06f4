use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::blob::{validate_path, BlobRef, Version};
use crate::error::{StoreError, StoreResult};
use crate::traits::ContentStore;

/// Domain tag mixed into every version hash.
const VERSION_DOMAIN: &str = "shelf-blob-v1";

/// A write accepted by an [`InMemoryContentStore`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommitRecord {
    pub path: String,
    pub message: String,
    pub version: Version,
}

#[derive(Clone, Debug)]
struct StoredFile {
    bytes: Vec<u8>,
    version: Version,
}

#[derive(Debug, Default)]
struct Inner {
    files: HashMap<String, StoredFile>,
    commits: Vec<CommitRecord>,
}

/// In-memory, HashMap-based content store.
///
/// Enforces the same compare-and-swap rules as the remote store. Version
/// tokens are domain-separated BLAKE3 hashes of the content, so writing the
/// same bytes twice yields the same token, as with git blob SHAs.
pub struct InMemoryContentStore {
    inner: RwLock<Inner>,
}

impl InMemoryContentStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner::default()),
        }
    }

    /// Place `bytes` at `path` unconditionally, bypassing version checks.
    ///
    /// Meant for seeding fixtures; not recorded as a commit.
    pub fn seed(&self, path: &str, bytes: impl Into<Vec<u8>>) -> StoreResult<Version> {
        validate_path(path)?;
        let bytes = bytes.into();
        let version = content_version(&bytes);
        let mut inner = self.inner.write().map_err(poisoned)?;
        inner.files.insert(
            path.to_string(),
            StoredFile {
                bytes,
                version: version.clone(),
            },
        );
        Ok(version)
    }

    /// Number of stored paths.
    pub fn len(&self) -> usize {
        self.inner.read().map(|i| i.files.len()).unwrap_or(0)
    }

    /// Returns `true` if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Sorted list of stored paths.
    pub fn paths(&self) -> Vec<String> {
        let mut paths: Vec<String> = self
            .inner
            .read()
            .map(|i| i.files.keys().cloned().collect())
            .unwrap_or_default();
        paths.sort();
        paths
    }

    /// Accepted writes, oldest first.
    pub fn commits(&self) -> Vec<CommitRecord> {
        self.inner
            .read()
            .map(|i| i.commits.clone())
            .unwrap_or_default()
    }
}

impl Default for InMemoryContentStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ContentStore for InMemoryContentStore {
    async fn read(&self, path: &str) -> StoreResult<Option<BlobRef>> {
        validate_path(path)?;
        let inner = self.inner.read().map_err(poisoned)?;
        Ok(inner.files.get(path).map(|file| BlobRef {
            path: path.to_string(),
            bytes: file.bytes.clone(),
            version: file.version.clone(),
        }))
    }

    async fn write(
        &self,
        path: &str,
        bytes: &[u8],
        expected: Option<&Version>,
        message: &str,
    ) -> StoreResult<Version> {
        validate_path(path)?;
        let mut inner = self.inner.write().map_err(poisoned)?;

        let current = inner.files.get(path).map(|f| &f.version);
        if current != expected {
            return Err(StoreError::Conflict {
                path: path.to_string(),
                expected: expected.cloned(),
            });
        }

        let version = content_version(bytes);
        inner.files.insert(
            path.to_string(),
            StoredFile {
                bytes: bytes.to_vec(),
                version: version.clone(),
            },
        );
        inner.commits.push(CommitRecord {
            path: path.to_string(),
            message: message.to_string(),
            version: version.clone(),
        });
        tracing::debug!(path, version = version.short(), "in-memory write accepted");
        Ok(version)
    }

    fn describe(&self) -> String {
        "in-memory".to_string()
    }
}

impl std::fmt::Debug for InMemoryContentStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryContentStore")
            .field("file_count", &self.len())
            .finish()
    }
}

fn content_version(bytes: &[u8]) -> Version {
    let mut hasher = blake3::Hasher::new();
    hasher.update(VERSION_DOMAIN.as_bytes());
    hasher.update(b":");
    hasher.update(bytes);
    Version::new(hex::encode(&hasher.finalize().as_bytes()[..20]))
}

fn poisoned<T>(e: std::sync::PoisonError<T>) -> StoreError {
    StoreError::Unavailable(format!("lock poisoned: {e}"))
}
