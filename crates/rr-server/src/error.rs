//! Request-level error type and its HTTP mapping.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use rr_core::OsmId;
use rr_providers::ProviderError;
use rr_spatial::PlanError;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing, unparsable or out-of-range request coordinates.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The road-data provider failed; no graph can be built.
    #[error("failed to fetch road network data: {0}")]
    DataFetch(#[source] ProviderError),

    #[error("no roads found near the requested points")]
    NoNearbyRoad,

    #[error("no path between node {from} and node {to}")]
    NoPath { from: OsmId, to: OsmId },

    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            ApiError::DataFetch(_) => StatusCode::BAD_GATEWAY,
            ApiError::NoNearbyRoad | ApiError::NoPath { .. } => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<PlanError> for ApiError {
    fn from(e: PlanError) -> Self {
        match e {
            PlanError::NoNearbyRoad => ApiError::NoNearbyRoad,
            PlanError::NoPath { from, to } => ApiError::NoPath { from, to },
            PlanError::Spatial(e) => ApiError::Internal(e.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            ApiError::Internal(detail) => {
                error!(%detail, "route calculation failed");
                "internal server error".to_string()
            }
            other => other.to_string(),
        };
        (status, Json(json!({ "success": false, "error": message }))).into_response()
    }
}
