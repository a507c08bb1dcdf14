//! ============================================================================
//! Routes - Eligibility check endpoint
//! ============================================================================
//! Response payloads use camelCase to stay wire-compatible with existing
//! clients of the original service.
//! ============================================================================

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use eligibility_core::{CheckError, Tier};

use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct CheckRequest {
    /// Mnemonic seed phrase or base58 private key.
    /// `seed` is the field name legacy clients send.
    #[serde(alias = "seed")]
    pub secret: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckResponse {
    pub success: bool,
    pub total_tx: u64,
    pub total_eligible_tx: u64,
    pub eligible: bool,
    pub tier: Option<Tier>,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub message: String,
}

/// Build the application router with timeout and trace layers.
pub fn router(state: AppState, request_timeout: Duration) -> Router {
    Router::new()
        .route("/check-eligibility", post(check_eligibility))
        .route("/health", get(health))
        .with_state(state)
        .layer(TimeoutLayer::new(request_timeout))
        .layer(TraceLayer::new_for_http())
}

async fn health() -> &'static str {
    "ok"
}

async fn check_eligibility(
    State(state): State<AppState>,
    Json(request): Json<CheckRequest>,
) -> Response {
    let secret = request.secret.as_deref().map(str::trim).unwrap_or("");
    if secret.is_empty() {
        return error_response(
            StatusCode::BAD_REQUEST,
            "Seed phrase or private key is required",
        );
    }

    match state.checker.check_secret(secret).await {
        Ok(result) => Json(CheckResponse {
            success: true,
            total_tx: result.total_tx,
            total_eligible_tx: result.total_eligible_tx,
            eligible: result.eligible,
            tier: result.tier,
        })
        .into_response(),
        Err(CheckError::InvalidSecret(e)) => {
            tracing::warn!("Rejected eligibility check: {}", e);
            error_response(StatusCode::BAD_REQUEST, &e.to_string())
        }
        Err(CheckError::Persistence(e)) => {
            tracing::error!("Failed to save check result: {}", e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to save data")
        }
    }
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (
        status,
        Json(ErrorResponse {
            success: false,
            message: message.to_string(),
        }),
    )
        .into_response()
}
