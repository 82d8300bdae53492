// crates/server/src/routes/generate.rs
//! Job creation: register a job id, then hand the work to the workflow engine.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// Response for POST /api/generate.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(test, derive(serde::Deserialize))]
pub struct GenerateResponse {
    pub job_id: String,
}

/// POST /api/generate - Start a generation job.
///
/// The body carries generation parameters (topic, keywords, count) that are
/// opaque to this service and forwarded to the engine verbatim. The minted
/// job id is a random v4 UUID: it doubles as the capability token pollers
/// present to `GET /api/jobs/{id}`.
pub async fn start_generation(
    State(state): State<Arc<AppState>>,
    Json(params): Json<Value>,
) -> ApiResult<(StatusCode, Json<GenerateResponse>)> {
    let job_id = Uuid::new_v4().to_string();
    state.store.create_job(&job_id)?;

    let callback_url = state.config.callback_url();
    if let Err(e) = state.engine.dispatch(&job_id, &callback_url, &params).await {
        // The job record stays around in Error state so a poller that
        // already has the id sees the failure instead of a silent 404.
        state.store.fail_job(&job_id, "workflow engine dispatch failed");
        return Err(ApiError::Engine(e.to_string()));
    }

    tracing::info!(job_id = %job_id, "generation job dispatched");
    Ok((StatusCode::ACCEPTED, Json(GenerateResponse { job_id })))
}

/// Create the generate routes router.
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/generate", post(start_generation))
}
