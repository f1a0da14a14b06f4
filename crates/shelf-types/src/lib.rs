//! Foundation types for Remote Shelf.
//!
//! Remote Shelf registers physical remote controls: a photo of the remote is
//! stored as a blob in a git-hosted content store, and a catalog entry is
//! appended to the product list module that the storefront reads. Every other
//! crate in the workspace depends on `shelf-types`.
//!
//! # Key Types
//!
//! - [`ProductType`]: which catalog a remote belongs to (TV or AC)
//! - [`CatalogEntry`]: one record of the storefront product list
//! - [`UploadRequest`]: a transport-neutral upload, validated into a [`ValidUpload`]
//! - [`Layout`]: where blobs and catalog artifacts live inside the store

pub mod entry;
pub mod error;
pub mod layout;
pub mod product;
pub mod request;

pub use entry::CatalogEntry;
pub use error::{TypeError, TypeResult};
pub use layout::{Layout, ProductLayout};
pub use product::ProductType;
pub use request::{hyphenate_name, normalize_extension, UploadRequest, ValidUpload, DEFAULT_EXTENSION};
