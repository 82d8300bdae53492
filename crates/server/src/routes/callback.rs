// crates/server/src/routes/callback.rs
//! Inbound webhook from the workflow engine.
//!
//! Accept-and-drop boundary: after the secret and jobId gates, every outcome
//! answers `200 {"ok": true}` — including logically discarded ones (empty
//! entries, unknown or terminal jobs). The engine has no corrective action,
//! and retrying a poison callback would loop forever.

use std::sync::Arc;

use axum::{extract::State, http::HeaderMap, routing::post, Json, Router};
use serde::Serialize;
use serde_json::Value;

use draftboard_core::normalizer;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// Header the engine must echo the shared secret in.
pub const CALLBACK_SECRET_HEADER: &str = "x-callback-secret";

/// Response for POST /api/callback.
#[derive(Debug, Serialize)]
#[cfg_attr(test, derive(serde::Deserialize))]
pub struct CallbackAck {
    pub ok: bool,
}

/// POST /api/callback - Receive partial or final results for a job.
pub async fn receive_callback(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(payload): Json<Value>,
) -> ApiResult<Json<CallbackAck>> {
    let presented = headers
        .get(CALLBACK_SECRET_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    if presented != state.config.callback_secret {
        return Err(ApiError::Forbidden);
    }

    let job_id = payload
        .get("jobId")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ApiError::BadRequest("missing jobId".to_string()))?;

    let report = normalizer::apply(&state.store, job_id, &payload);
    tracing::info!(
        job_id = %job_id,
        appended = report.appended,
        dropped_empty = report.dropped_empty,
        dropped_capped = report.dropped_capped,
        failed = report.failed,
        completed = report.completed,
        unknown_job = report.unknown_job,
        "callback processed"
    );

    Ok(Json(CallbackAck { ok: true }))
}

/// Create the callback routes router.
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/callback", post(receive_callback))
}
