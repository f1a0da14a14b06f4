//! HTTP server for Remote Shelf.
//!
//! Accepts photo uploads (multipart or webcam data URLs), runs them through
//! the [`shelf_upload::UploadOrchestrator`], and reports the outcome as
//! `{success, warning?, message}`. Upload outcomes are always answered with
//! `200`; non-2xx statuses mean the request itself could not be read.

pub mod config;
pub mod error;
pub mod handler;
pub mod router;
pub mod server;
pub mod state;

pub use config::{credential_from_env, ServerConfig, DEFAULT_MAX_UPLOAD_BYTES};
pub use error::{AppError, ServerError, ServerResult};
pub use handler::StoreStatus;
pub use router::build_router;
pub use server::ShelfServer;
pub use state::AppState;
