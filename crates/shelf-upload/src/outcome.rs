use serde::{Deserialize, Serialize};

use shelf_store::Version;
use shelf_types::{CatalogEntry, ProductType};

use crate::error::UploadError;

/// What a run stored.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UploadReceipt {
    pub product: ProductType,
    pub file_name: String,
    pub blob_path: String,
    pub blob_version: Version,
    pub catalog_path: String,
    /// New catalog version; `None` when the catalog was not updated.
    pub catalog_version: Option<Version>,
    pub entry: CatalogEntry,
}

/// Classification of one upload run.
#[derive(Debug)]
pub enum UploadOutcome {
    /// Photo stored and catalog entry appended.
    Success(UploadReceipt),
    /// Photo stored; the catalog update failed for the given reason.
    SuccessWithWarning(UploadReceipt, UploadError),
    /// Nothing usable was stored.
    Failure(UploadError),
}

impl UploadOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    pub fn is_warning(&self) -> bool {
        matches!(self, Self::SuccessWithWarning(..))
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failure(_))
    }

    /// The receipt, if the photo was stored.
    pub fn receipt(&self) -> Option<&UploadReceipt> {
        match self {
            Self::Success(r) | Self::SuccessWithWarning(r, _) => Some(r),
            Self::Failure(_) => None,
        }
    }

    /// The warning or failure reason, if any.
    pub fn error(&self) -> Option<&UploadError> {
        match self {
            Self::Success(_) => None,
            Self::SuccessWithWarning(_, e) | Self::Failure(e) => Some(e),
        }
    }

    /// Operator-facing summary line.
    pub fn message(&self) -> String {
        match self {
            Self::Success(r) => format!(
                "{} remote uploaded as {} and added to the catalog",
                r.product, r.file_name
            ),
            Self::SuccessWithWarning(r, e) => format!(
                "{} remote image uploaded as {}, but the catalog was not updated: {e}",
                r.product, r.file_name
            ),
            Self::Failure(UploadError::Validation(e)) => format!("Invalid upload: {e}"),
            Self::Failure(e) => format!("Failed to upload image: {e}"),
        }
    }
}

/// Wire shape returned to upload clients.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warning: Option<bool>,
    pub message: String,
}

impl UploadResponse {
    /// A failure response that did not come from an orchestration run.
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            warning: None,
            message: message.into(),
        }
    }
}

impl From<&UploadOutcome> for UploadResponse {
    fn from(outcome: &UploadOutcome) -> Self {
        let message = outcome.message();
        match outcome {
            UploadOutcome::Success(_) => Self {
                success: true,
                warning: None,
                message,
            },
            UploadOutcome::SuccessWithWarning(..) => Self {
                success: true,
                warning: Some(true),
                message,
            },
            UploadOutcome::Failure(_) => Self::failure(message),
        }
    }
}
