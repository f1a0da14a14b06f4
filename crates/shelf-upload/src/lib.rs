//! Upload orchestration for Remote Shelf.
//!
//! One [`UploadOrchestrator::upload`] call handles one upload, strictly in
//! sequence:
//!
//! 1. validate the request (no remote calls on failure)
//! 2. read the photo's path, then write the photo with the version just read
//! 3. read the catalog artifact, splice in the new entry
//! 4. write the artifact back, conditioned on the version read in step 3
//!
//! A failed photo write is fatal ([`UploadOutcome::Failure`]). Once the photo
//! is stored, any catalog problem only downgrades the result to
//! [`UploadOutcome::SuccessWithWarning`]: the photo is durable and the
//! catalog entry can be reconciled by hand.

pub mod config;
pub mod error;
pub mod orchestrator;
pub mod outcome;

pub use config::UploadConfig;
pub use error::UploadError;
pub use orchestrator::UploadOrchestrator;
pub use outcome::{UploadOutcome, UploadReceipt, UploadResponse};

pub use shelf_types::{Layout, ProductType, UploadRequest};
