use thiserror::Error;

use shelf_catalog::CatalogError;
use shelf_store::StoreError;
use shelf_types::TypeError;

/// Why an upload failed, or why its catalog update did.
#[derive(Debug, Error)]
pub enum UploadError {
    /// Missing or malformed input. Nothing was sent to the store.
    #[error("invalid upload: {0}")]
    Validation(#[from] TypeError),

    /// The photo could not be stored. The catalog was not touched.
    #[error("failed to store image at {path}: {source}")]
    BlobWrite { path: String, source: StoreError },

    /// The catalog artifact does not exist.
    #[error("catalog file {path} not found")]
    CatalogMissing { path: String },

    /// The catalog artifact has no usable array declaration.
    #[error("catalog file {path} is malformed: {source}")]
    CatalogMalformed { path: String, source: CatalogError },

    /// The catalog artifact could not be fetched or decoded.
    #[error("failed to read catalog file {path}: {source}")]
    CatalogRead { path: String, source: StoreError },

    /// Another upload changed the catalog between our read and our write.
    #[error("catalog file {path} changed concurrently ({attempts} attempt(s))")]
    CatalogWriteConflict { path: String, attempts: u32 },

    /// The patched catalog could not be written.
    #[error("failed to write catalog file {path}: {source}")]
    CatalogWriteTransport { path: String, source: StoreError },
}

impl UploadError {
    /// Stable machine-readable reason.
    ///
    /// A lost compare-and-swap race keeps its own `catalog-write-conflict`
    /// kind; callers that only care whether the catalog write failed should
    /// use [`is_catalog_write`](Self::is_catalog_write), which covers both
    /// that and `catalog-write-failed`.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation",
            Self::BlobWrite { .. } => "blob-write",
            Self::CatalogMissing { .. } | Self::CatalogMalformed { .. } => "catalog-missing",
            Self::CatalogRead { .. } => "catalog-read-failed",
            Self::CatalogWriteConflict { .. } => "catalog-write-conflict",
            Self::CatalogWriteTransport { .. } => "catalog-write-failed",
        }
    }

    /// Errors that leave the photo unstored.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::BlobWrite { .. })
    }

    /// The catalog could not be located in the fetched artifact.
    pub fn is_catalog_locate(&self) -> bool {
        matches!(self, Self::CatalogMissing { .. } | Self::CatalogMalformed { .. })
    }

    /// The patched catalog was computed but not written.
    pub fn is_catalog_write(&self) -> bool {
        matches!(
            self,
            Self::CatalogWriteConflict { .. } | Self::CatalogWriteTransport { .. }
        )
    }
}
