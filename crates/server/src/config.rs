// crates/server/src/config.rs
//! Environment-derived server configuration.

use std::time::Duration;

use anyhow::{Context, Result};
use draftboard_core::store::DEFAULT_MAX_RESULTS_PER_JOB;

/// Default port for the server.
const DEFAULT_PORT: u16 = 47610;

/// Default retention window before an untouched job is evicted.
const DEFAULT_RETENTION_SECS: u64 = 6 * 3600;

/// Default sweep cadence.
const DEFAULT_SWEEP_INTERVAL_SECS: u64 = 300;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
    /// Shared secret the workflow engine must echo in `x-callback-secret`.
    pub callback_secret: String,
    /// Full dispatch URL of the external workflow engine.
    pub engine_url: String,
    /// Externally reachable base URL of this service, used to build the
    /// callback URL handed to the engine.
    pub public_url: String,
    pub retention: Duration,
    pub sweep_interval: Duration,
    pub max_results_per_job: usize,
}

impl ServerConfig {
    /// Load from environment. `DRAFTBOARD_CALLBACK_SECRET` and
    /// `DRAFTBOARD_ENGINE_URL` are required; everything else has defaults.
    pub fn from_env() -> Result<Self> {
        let port = env_parse("DRAFTBOARD_PORT").unwrap_or(DEFAULT_PORT);
        Ok(Self {
            port,
            callback_secret: std::env::var("DRAFTBOARD_CALLBACK_SECRET")
                .context("DRAFTBOARD_CALLBACK_SECRET must be set")?,
            engine_url: std::env::var("DRAFTBOARD_ENGINE_URL")
                .context("DRAFTBOARD_ENGINE_URL must be set")?,
            public_url: std::env::var("DRAFTBOARD_PUBLIC_URL")
                .unwrap_or_else(|_| format!("http://localhost:{port}")),
            retention: Duration::from_secs(
                env_parse("DRAFTBOARD_RETENTION_SECS").unwrap_or(DEFAULT_RETENTION_SECS),
            ),
            sweep_interval: Duration::from_secs(
                env_parse("DRAFTBOARD_SWEEP_INTERVAL_SECS").unwrap_or(DEFAULT_SWEEP_INTERVAL_SECS),
            ),
            max_results_per_job: env_parse("DRAFTBOARD_MAX_RESULTS_PER_JOB")
                .unwrap_or(DEFAULT_MAX_RESULTS_PER_JOB),
        })
    }

    /// The callback endpoint the engine should POST results to.
    pub fn callback_url(&self) -> String {
        format!("{}/api/callback", self.public_url.trim_end_matches('/'))
    }

    /// Fixed config for tests: no environment reads, engine URL supplied by
    /// the test (usually a wiremock server).
    pub fn for_tests(engine_url: impl Into<String>) -> Self {
        Self {
            port: 0,
            callback_secret: "test-secret".to_string(),
            engine_url: engine_url.into(),
            public_url: "http://localhost:0".to_string(),
            retention: Duration::from_secs(3600),
            sweep_interval: Duration::from_secs(60),
            max_results_per_job: DEFAULT_MAX_RESULTS_PER_JOB,
        }
    }
}

fn env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    std::env::var(name).ok().and_then(|v| v.parse().ok())
}
