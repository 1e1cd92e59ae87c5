//! API Handlers
use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use photocast_core::{ensure_batch_size, PhotocastError, PipelineRunner, RunSummary, PHOTOCAST_VERSION};
use serde::Deserialize;
use serde_json::{json, Value};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};

use crate::config::AppConfig;
use crate::metrics::Metrics;

pub const DEFAULT_TEST_CAPTION: &str = "Test photo from Photocast";

#[derive(Clone)]
pub struct AppState {
    pub runner: Arc<PipelineRunner>,
    pub config: Arc<AppConfig>,
    pub metrics: Metrics,
}

/// Failure body `{success: false, message, error}`
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: &'static str,
    source: PhotocastError,
}

impl ApiError {
    /// Always a 500
    fn new(message: &'static str, source: PhotocastError) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message,
            source,
        }
    }

    /// 400 when the caller's photo list breaks the batch limit, 500 otherwise
    fn for_request(message: &'static str, source: PhotocastError) -> Self {
        let status = if source.is_batch_limit() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };
        Self {
            status,
            message,
            source,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        error!(status = self.status.as_u16(), code = self.source.code(), error = %self.source, "{}", self.message);
        (
            self.status,
            Json(json!({
                "success": false,
                "message": self.message,
                "error": self.source.to_string(),
            })),
        )
            .into_response()
    }
}

#[derive(Debug, Deserialize)]
pub struct SendPhotosRequest {
    #[serde(default)]
    pub photos: Vec<PathBuf>,
    pub caption: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct TestSendPhotosRequest {
    pub caption: Option<String>,
}

pub async fn send_random_photos(
    State(state): State<AppState>,
) -> Result<Json<RunSummary>, ApiError> {
    let ctx = state.config.execution_context();
    state.metrics.runs_total.inc();

    match state.runner.run_batch(state.config.batch_size, &ctx).await {
        Ok(summary) => {
            state.metrics.photos_sent_total.inc_by(summary.sent_count as u64);
            Ok(Json(summary))
        }
        Err(e) => {
            state.metrics.runs_failed_total.inc();
            Err(ApiError::new("Failed to send random photos", e))
        }
    }
}

pub async fn send_photos(
    State(state): State<AppState>,
    Json(request): Json<SendPhotosRequest>,
) -> Result<Json<Value>, ApiError> {
    const FAILED: &str = "Failed to send photos to Telegram";
    ensure_batch_size(request.photos.len()).map_err(|e| ApiError::for_request(FAILED, e))?;

    let receipt = state
        .runner
        .sink()
        .send_batch(&request.photos, request.caption.as_deref())
        .await
        .map_err(|e| ApiError::for_request(FAILED, e))?;

    Ok(Json(json!({
        "success": true,
        "message": format!("Successfully sent {} photo(s) to Telegram", receipt.delivered),
        "result": receipt,
    })))
}

pub async fn test_send_photos(
    State(state): State<AppState>,
    request: Option<Json<TestSendPhotosRequest>>,
) -> Result<Json<Value>, ApiError> {
    let caption = request
        .and_then(|Json(body)| body.caption)
        .filter(|c| !c.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_TEST_CAPTION.to_string());
    let photo = state.config.test_image.clone();
    info!(path = %photo.display(), "sending test photo");

    let receipt = state
        .runner
        .sink()
        .send_batch(std::slice::from_ref(&photo), Some(&caption))
        .await
        .map_err(|e| ApiError::new("Failed to send test photo to Telegram", e))?;

    Ok(Json(json!({
        "success": true,
        "message": "Successfully sent test photo to Telegram",
        "photo_path": photo,
        "caption": caption,
        "result": receipt,
    })))
}

pub async fn check_connection(State(state): State<AppState>) -> Json<Value> {
    let connected = state.runner.sink().check_connection().await;
    let message = if connected {
        "Successfully connected to Telegram Bot API"
    } else {
        "Failed to connect to Telegram Bot API"
    };
    Json(json!({ "success": true, "connected": connected, "message": message }))
}

pub async fn bot_info(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let identity = state
        .runner
        .sink()
        .identity()
        .await
        .map_err(|e| ApiError::new("Failed to get bot information", e))?;

    Ok(Json(json!({
        "success": true,
        "message": "Successfully retrieved bot information",
        "bot_info": identity,
    })))
}

pub async fn health() -> (StatusCode, Json<Value>) {
    (
        StatusCode::OK,
        Json(json!({ "status": "ok", "version": PHOTOCAST_VERSION })),
    )
}

pub async fn metrics(State(state): State<AppState>) -> Response {
    match state.metrics.encode() {
        Ok(body) => ([(header::CONTENT_TYPE, prometheus::TEXT_FORMAT)], body).into_response(),
        Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response(),
    }
}
