//! HTTP surface: request/response models and the axum router.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, put};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tower_http::trace::TraceLayer;

use crate::core::PendingSet;
use crate::ingress::{Ingress, ReportOutcome};

/// Body returned for an accepted report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportResponse {
    /// Hostname as reported.
    pub hostname: String,
    /// Whether it was newly added or already pending.
    pub status: ReportOutcome,
}

/// Body returned for a rejected report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Reason for rejection.
    pub error: String,
}

/// Health response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Health {
    /// Healthy flag.
    pub ok: bool,
    /// Hosts waiting for the next check.
    pub pending: usize,
}

/// Possible responses from the report endpoint.
pub enum PutDeviceResponse {
    /// Hostname accepted (added or already pending).
    Accepted(Json<ReportResponse>),
    /// Hostname failed validation.
    Rejected(Json<ErrorResponse>),
}

impl IntoResponse for PutDeviceResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Accepted(json) => (StatusCode::ACCEPTED, json).into_response(),
            Self::Rejected(json) => (StatusCode::UNPROCESSABLE_ENTITY, json).into_response(),
        }
    }
}

/// Build the HTTP router.
///
/// Includes a [`TraceLayer`] that logs each request through `tracing`.
pub fn router(ingress: Ingress) -> Router {
    Router::new()
        .route("/devices/{hostname}", put(put_device))
        .route("/health", get(health_check))
        .layer(TraceLayer::new_for_http())
        .with_state(ingress)
}

/// `PUT /devices/{hostname}`
async fn put_device(
    State(ingress): State<Ingress>,
    Path(hostname): Path<String>,
) -> PutDeviceResponse {
    match ingress.report(&hostname) {
        ReportOutcome::Rejected => PutDeviceResponse::Rejected(Json(ErrorResponse {
            error: format!("unrecognized hostname format: '{hostname}'"),
        })),
        status => PutDeviceResponse::Accepted(Json(ReportResponse { hostname, status })),
    }
}

/// `GET /health`
async fn health_check(State(ingress): State<Ingress>) -> Json<Health> {
    Json(health(ingress.pending()))
}

/// Return a health payload.
pub fn health(pending: &PendingSet) -> Health {
    Health {
        ok: true,
        pending: pending.len(),
    }
}
