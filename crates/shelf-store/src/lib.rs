//! Path-addressed content storage for Remote Shelf.
//!
//! The store is a remote git repository used purely as a content store: files
//! are addressed by path, and every file carries a version token (the git
//! blob SHA) that must be presented to replace it. This gives writers an
//! optimistic compare-and-swap primitive.
//!
//! # Backends
//!
//! All backends implement the [`ContentStore`] trait:
//!
//! - [`GitHubContentStore`] -- HTTP client for the git-hosting contents API
//! - [`InMemoryContentStore`] -- `HashMap`-based store with identical CAS
//!   semantics, for tests and dry runs
//!
//! # Design Rules
//!
//! 1. A missing path is a normal read outcome (`Ok(None)`), never an error.
//! 2. Replacing an existing path requires its current version token.
//!    Omitting the token for an existing path is a [`StoreError::Conflict`].
//! 3. A stale token is a [`StoreError::Conflict`], never a silent overwrite.
//! 4. A successful write is visible to the next read by the same client.
//! 5. Credentials are injected at construction; rotating them means building
//!    a new client.

pub mod blob;
pub mod error;
pub mod github;
pub mod memory;
pub mod retry;
pub mod traits;

pub use blob::{validate_path, BlobRef, Version};
pub use error::{StoreError, StoreResult};
pub use github::{Credential, GitHubConfig, GitHubContentStore};
pub use memory::{CommitRecord, InMemoryContentStore};
pub use traits::ContentStore;
