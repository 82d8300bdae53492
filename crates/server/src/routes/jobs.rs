// crates/server/src/routes/jobs.rs
//! Polling endpoint: the read side of the aggregator.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};

use draftboard_core::JobView;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// GET /api/jobs/{id} - Current consistent snapshot of a job.
///
/// `404` means unknown or already evicted — for the poller that is a normal
/// terminal signal, not a fault. Job ids are unguessable v4 UUIDs and act as
/// the capability token; there is no per-request auth here.
pub async fn get_job(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<JobView>> {
    state
        .store
        .get_job(&id)
        .map(Json)
        .ok_or(ApiError::JobNotFound(id))
}

/// Create the jobs routes router.
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/jobs/{id}", get(get_job))
}
