use async_trait::async_trait;

use crate::blob::{BlobRef, Version};
use crate::error::StoreResult;

/// Path-addressed content store with compare-and-swap writes.
///
/// All implementations must satisfy these invariants:
/// - `read` of a missing path returns `Ok(None)`.
/// - `write` with `expected = Some(v)` succeeds only if `v` is the path's
///   current version; otherwise it fails with `StoreError::Conflict`.
/// - `write` with `expected = None` succeeds only if the path does not exist.
/// - A successful write is visible to subsequent reads through the same
///   client, and returns the path's new version.
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Fetch the current bytes and version of `path`.
    async fn read(&self, path: &str) -> StoreResult<Option<BlobRef>>;

    /// Create or replace `path`, conditioned on `expected`.
    ///
    /// `message` describes the change; git-backed stores record it as the
    /// commit message.
    async fn write(
        &self,
        path: &str,
        bytes: &[u8],
        expected: Option<&Version>,
        message: &str,
    ) -> StoreResult<Version>;

    /// Check that the store is reachable with the configured credential.
    async fn probe(&self) -> StoreResult<()> {
        Ok(())
    }

    /// Short human-readable description of the backend, for logs.
    fn describe(&self) -> String;
}
