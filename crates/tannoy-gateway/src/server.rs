//! Axum-based HTTP server.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use tannoy_agent::AnnounceError;
use tannoy_core::types::{AnnouncementRequest, Language};

use crate::state::GatewayState;

/// Build the API router.
pub fn router(state: Arc<GatewayState>) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/api/languages", get(languages_handler))
        .route("/api/announce", post(announce_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the gateway HTTP server and run until Ctrl-C.
pub async fn start_gateway(state: Arc<GatewayState>, port: u16) -> anyhow::Result<()> {
    let bind_addr = state.config.gateway_bind();
    let app = router(state);

    let addr = format!("{bind_addr}:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Gateway listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

#[derive(Debug, Deserialize)]
struct AnnounceBody {
    text: String,
    #[serde(default)]
    language: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AnnounceResponse {
    audio: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    mime_type: Option<String>,
    sample_rate: u32,
    channels: u16,
}

/// An error message with the status it is reported under.
struct ApiError(StatusCode, String);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.0, Json(json!({ "error": self.1 }))).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError(StatusCode::BAD_REQUEST, rejection.body_text())
    }
}

impl From<AnnounceError> for ApiError {
    fn from(err: AnnounceError) -> Self {
        let status = match &err {
            AnnounceError::Validation(_) => StatusCode::BAD_REQUEST,
            AnnounceError::Translation(_) | AnnounceError::Synthesis(_) => StatusCode::BAD_GATEWAY,
            AnnounceError::Decode(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        ApiError(status, err.to_string())
    }
}

async fn announce_handler(
    State(state): State<Arc<GatewayState>>,
    body: Result<Json<AnnounceBody>, JsonRejection>,
) -> Result<Json<AnnounceResponse>, ApiError> {
    let Json(body) = body?;
    let language = match body.language.as_deref() {
        Some(code) => code
            .parse::<Language>()
            .map_err(|e| ApiError(StatusCode::BAD_REQUEST, e.to_string()))?,
        None => Language::default(),
    };

    let request = AnnouncementRequest::new(body.text, language);
    let audio = state.announcer.announce(&request).await.map_err(|e| {
        warn!(error = %e, "Announcement request failed");
        ApiError::from(e)
    })?;

    Ok(Json(AnnounceResponse {
        audio: audio.data,
        mime_type: audio.mime_type,
        sample_rate: state.format.sample_rate,
        channels: state.format.channels,
    }))
}

async fn languages_handler() -> impl IntoResponse {
    let languages: Vec<_> = Language::ALL
        .iter()
        .map(|lang| {
            json!({
                "code": lang.code(),
                "name": lang.display_name(),
                "source": lang.is_source(),
            })
        })
        .collect();
    Json(languages)
}

async fn health_handler() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to install Ctrl-C handler");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
