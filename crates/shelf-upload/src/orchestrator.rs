use std::sync::Arc;

use tracing::{debug, error, info, info_span, warn, Instrument};

use shelf_catalog::CatalogArtifact;
use shelf_store::{ContentStore, Version};
use shelf_types::{CatalogEntry, Layout, ProductType, UploadRequest, ValidUpload};

use crate::config::UploadConfig;
use crate::error::UploadError;
use crate::outcome::{UploadOutcome, UploadReceipt};

/// Drives one upload from request to classified outcome.
///
/// Holds no per-run state; a single orchestrator may serve any number of
/// concurrent runs.
pub struct UploadOrchestrator {
    store: Arc<dyn ContentStore>,
    layout: Layout,
    config: UploadConfig,
}

impl UploadOrchestrator {
    pub fn new(store: Arc<dyn ContentStore>, layout: Layout, config: UploadConfig) -> Self {
        Self {
            store,
            layout,
            config,
        }
    }

    pub fn store(&self) -> &Arc<dyn ContentStore> {
        &self.store
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn config(&self) -> &UploadConfig {
        &self.config
    }

    /// Validate `request` and run it. Never panics or returns an error: every
    /// failure is folded into the outcome.
    pub async fn upload(&self, request: UploadRequest) -> UploadOutcome {
        match request.validate() {
            Ok(upload) => self.run(upload).await,
            Err(e) => {
                warn!(error = %e, "rejected upload request");
                UploadOutcome::Failure(e.into())
            }
        }
    }

    /// Run an already-validated upload.
    pub async fn run(&self, upload: ValidUpload) -> UploadOutcome {
        let span = info_span!(
            "upload",
            product = %upload.product,
            name = %upload.name,
            shelf = %upload.shelf,
            store = %self.store.describe(),
        );
        self.run_inner(upload).instrument(span).await
    }

    async fn run_inner(&self, upload: ValidUpload) -> UploadOutcome {
        let blob_path = self.layout.blob_path(&upload);
        let blob_version = match self.write_blob(&blob_path, &upload).await {
            Ok(v) => v,
            Err(e) => {
                error!(path = %blob_path, error = %e, "image upload failed");
                return UploadOutcome::Failure(e);
            }
        };
        info!(path = %blob_path, version = %blob_version.short(), "image stored");

        let entry = self.layout.catalog_entry(&upload);
        let mut receipt = UploadReceipt {
            product: upload.product,
            file_name: upload.file_name(),
            blob_path,
            blob_version,
            catalog_path: self.layout.catalog_path(upload.product).to_string(),
            catalog_version: None,
            entry,
        };

        match self.append_entry(upload.product, &upload.name, &receipt.entry).await {
            Ok(v) => {
                info!(path = %receipt.catalog_path, version = %v.short(), "catalog updated");
                receipt.catalog_version = Some(v);
                UploadOutcome::Success(receipt)
            }
            Err(e) => {
                warn!(
                    path = %receipt.catalog_path,
                    reason = e.kind(),
                    error = %e,
                    "image stored but catalog not updated"
                );
                UploadOutcome::SuccessWithWarning(receipt, e)
            }
        }
    }

    async fn write_blob(&self, path: &str, upload: &ValidUpload) -> Result<Version, UploadError> {
        let blob_err = |source| UploadError::BlobWrite {
            path: path.to_string(),
            source,
        };

        let existing = self.store.read(path).await.map_err(blob_err)?;
        let expected = existing.map(|b| b.version);
        if let Some(v) = &expected {
            debug!(path, version = %v.short(), "replacing existing image");
        }

        let message = format!("Add remote image for {}", upload.name);
        self.store
            .write(path, &upload.image, expected.as_ref(), &message)
            .await
            .map_err(blob_err)
    }

    /// Read, patch, and conditionally write the catalog, retrying lost races
    /// up to `catalog_conflict_retries` times.
    async fn append_entry(
        &self,
        product: ProductType,
        name: &str,
        entry: &CatalogEntry,
    ) -> Result<Version, UploadError> {
        let path = self.layout.catalog_path(product);
        let variable = self.layout.variable_name(product);
        let message = format!("Add {name} remote to catalog");
        let max_attempts = self.config.catalog_conflict_retries.saturating_add(1);

        let mut attempt = 0;
        loop {
            attempt += 1;

            let blob = self
                .store
                .read(path)
                .await
                .map_err(|source| UploadError::CatalogRead {
                    path: path.to_string(),
                    source,
                })?
                .ok_or_else(|| UploadError::CatalogMissing {
                    path: path.to_string(),
                })?;
            let text = blob.text().map_err(|source| UploadError::CatalogRead {
                path: path.to_string(),
                source,
            })?;

            let malformed = |source| UploadError::CatalogMalformed {
                path: path.to_string(),
                source,
            };
            let artifact = CatalogArtifact::parse(text, variable).map_err(malformed)?;
            let patched = artifact.with_entry(entry).map_err(malformed)?;
            debug!(path, attempt, version = %blob.version.short(), "catalog patched");

            match self
                .store
                .write(path, patched.as_bytes(), Some(&blob.version), &message)
                .await
            {
                Ok(v) => return Ok(v),
                Err(e) if e.is_conflict() && attempt < max_attempts => {
                    warn!(path, attempt, "catalog changed concurrently, retrying");
                }
                Err(e) if e.is_conflict() => {
                    return Err(UploadError::CatalogWriteConflict {
                        path: path.to_string(),
                        attempts: attempt,
                    });
                }
                Err(source) => {
                    return Err(UploadError::CatalogWriteTransport {
                        path: path.to_string(),
                        source,
                    });
                }
            }
        }
    }
}
