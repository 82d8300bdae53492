// crates/server/src/engine.rs
//! Outbound dispatch to the external workflow engine.

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("engine rejected dispatch with status {0}")]
    Rejected(reqwest::StatusCode),
}

/// What the engine receives: the caller's generation parameters flattened
/// alongside the job id and the callback URL it must report results to.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DispatchRequest<'a> {
    job_id: &'a str,
    callback_url: &'a str,
    #[serde(flatten)]
    params: &'a Value,
}

/// Thin client over the engine's dispatch endpoint.
#[derive(Debug, Clone)]
pub struct EngineClient {
    http: reqwest::Client,
    dispatch_url: String,
}

impl EngineClient {
    pub fn new(dispatch_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            dispatch_url: dispatch_url.into(),
        }
    }

    /// Fire one generation request. The engine answers the actual work
    /// asynchronously through `POST /api/callback`.
    pub async fn dispatch(
        &self,
        job_id: &str,
        callback_url: &str,
        params: &Value,
    ) -> Result<(), EngineError> {
        let response = self
            .http
            .post(&self.dispatch_url)
            .json(&DispatchRequest {
                job_id,
                callback_url,
                params,
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(EngineError::Rejected(status));
        }
        tracing::debug!(job_id = %job_id, status = %status, "engine dispatch accepted");
        Ok(())
    }
}
