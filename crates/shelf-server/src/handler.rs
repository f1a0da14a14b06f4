use std::path::Path;

use axum::extract::{Multipart, State};
use axum::response::Json;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{info, warn};

use shelf_store::Credential;
use shelf_types::UploadRequest;
use shelf_upload::UploadResponse;

use crate::error::AppError;
use crate::state::AppState;

const NO_STORE: &str = "No store credential configured";

/// Health check handler.
pub async fn health_handler() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "name": "shelf-server",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Result of probing the backing store.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreStatus {
    pub status: String,
    pub message: String,
}

impl StoreStatus {
    fn new(status: &str, message: impl Into<String>) -> Self {
        Self {
            status: status.to_string(),
            message: message.into(),
        }
    }
}

/// Report whether the store is configured and reachable.
pub async fn check_store_handler(State(state): State<AppState>) -> Json<StoreStatus> {
    let Some(orchestrator) = state.orchestrator() else {
        return Json(StoreStatus::new("no_token", NO_STORE));
    };
    let store = orchestrator.store();
    match store.probe().await {
        Ok(()) => Json(StoreStatus::new(
            "connected",
            format!("Connected to {}", store.describe()),
        )),
        Err(e) => {
            warn!(store = %store.describe(), error = %e, "store probe failed");
            Json(StoreStatus::new("error", format!("Store connection error: {e}")))
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct TokenRequest {
    #[serde(default)]
    pub token: String,
}

/// Rebuild the store client with a new credential.
pub async fn store_token_handler(
    State(state): State<AppState>,
    Json(req): Json<TokenRequest>,
) -> Json<UploadResponse> {
    let credential = Credential::new(req.token);
    if credential.is_empty() {
        return Json(UploadResponse::failure("Please enter a valid token"));
    }
    match state.rotate_credential(credential) {
        Ok(()) => {
            info!("store credential replaced");
            Json(UploadResponse {
                success: true,
                warning: None,
                message: "Token saved".into(),
            })
        }
        Err(e) => {
            warn!(error = %e, "credential rotation failed");
            Json(UploadResponse::failure(format!("Failed to save token: {e}")))
        }
    }
}

/// Multipart upload: `productType`, `name`, `shelf` text fields and an
/// `image` file whose name supplies the extension.
pub async fn upload_handler(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, AppError> {
    let mut request = UploadRequest::default();

    while let Some(field) = multipart.next_field().await? {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };
        match name.as_str() {
            "productType" => request.product_type = field.text().await?,
            "name" => request.name = field.text().await?,
            "shelf" => request.shelf = field.text().await?,
            "image" => {
                request.extension = field
                    .file_name()
                    .and_then(|f| Path::new(f).extension())
                    .and_then(|e| e.to_str())
                    .map(str::to_string);
                request.image = field.bytes().await?.to_vec();
            }
            _ => {}
        }
    }

    Ok(run_upload(&state, request).await)
}

/// Captured-frame upload with the image as a base64 data URL.
#[derive(Debug, Deserialize)]
pub struct WebcamUpload {
    #[serde(default)]
    pub image: String,
    #[serde(default, rename = "productType")]
    pub product_type: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub shelf: String,
}

pub async fn upload_webcam_handler(
    State(state): State<AppState>,
    Json(body): Json<WebcamUpload>,
) -> Result<Json<UploadResponse>, AppError> {
    let image = decode_data_url(&body.image)?;
    let request = UploadRequest {
        product_type: body.product_type,
        name: body.name,
        shelf: body.shelf,
        image,
        extension: Some("jpg".into()),
    };
    Ok(run_upload(&state, request).await)
}

async fn run_upload(state: &AppState, request: UploadRequest) -> Json<UploadResponse> {
    let Some(orchestrator) = state.orchestrator() else {
        warn!("upload refused: no store configured");
        return Json(UploadResponse::failure(NO_STORE));
    };
    let outcome = orchestrator.upload(request).await;
    Json(UploadResponse::from(&outcome))
}

/// Decode `data:<mime>;base64,<payload>`, or a bare base64 payload.
fn decode_data_url(data: &str) -> Result<Vec<u8>, AppError> {
    let payload = match data.split_once(',') {
        Some((_, payload)) => payload,
        None => data,
    };
    let payload: String = payload.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    STANDARD
        .decode(payload)
        .map_err(|e| AppError::BadRequest(format!("image is not valid base64: {e}")))
}
