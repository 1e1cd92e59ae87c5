//! Photocast API: HTTP endpoints around the batch runner
pub mod config;
pub mod handlers;
pub mod metrics;
pub mod middleware;

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use photocast_caption::CaptionBuilder;
use photocast_core::PipelineRunner;
use photocast_imaging::JpegCompressor;
use photocast_immich::ImmichClient;
use photocast_telegram::TelegramSink;

pub use config::AppConfig;
pub use handlers::{ApiError, AppState};
pub use metrics::Metrics;

pub fn create_app(state: AppState) -> Router {
    Router::new()
        .route("/final/send-random-photos", post(handlers::send_random_photos))
        .route("/telegram/send-photos", post(handlers::send_photos))
        .route("/telegram/test-send-photos", post(handlers::test_send_photos))
        .route("/telegram/check-connection", post(handlers::check_connection))
        .route("/telegram/bot-info", post(handlers::bot_info))
        .route("/health", get(handlers::health))
        .route("/metrics", get(handlers::metrics))
        .layer(middleware::trace())
        .layer(middleware::cors())
        .with_state(state)
}

/// Wires the production collaborators from `config`.
pub fn build_state(config: AppConfig) -> anyhow::Result<AppState> {
    let source = ImmichClient::new(&config.immich())?;
    let sink = TelegramSink::new(&config.telegram())?;
    let runner = PipelineRunner::new(
        Arc::new(source),
        Arc::new(JpegCompressor::default()),
        Arc::new(CaptionBuilder::default()),
        Arc::new(sink),
    );

    Ok(AppState {
        runner: Arc::new(runner),
        config: Arc::new(config),
        metrics: Metrics::new()?,
    })
}

pub async fn run(state: AppState) -> anyhow::Result<()> {
    let addr = format!("0.0.0.0:{}", state.config.port);
    let pipeline = state.runner.pipeline_id().to_string();
    let app = create_app(state);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!(%pipeline, "Photocast API listening on {}", addr);
    axum::serve(listener, app).await?;
    Ok(())
}
