// crates/client/src/poller.rs
//! Fixed-interval HTTP driver over [`PollTracker`].

use std::time::Duration;

use thiserror::Error;

use draftboard_core::poll::{PollNext, PollTracker, RenderItem, StopReason};
use draftboard_core::JobView;

/// Default polling cadence. Purely client-paced: the server applies no rate
/// limiting, so a misconfigured interval is the client's own problem.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(3);

/// Why polling ended. All three are normal terminations — `Gone` covers a
/// job that expired (or never existed from this client's perspective) and
/// surfaces no error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome {
    Complete,
    Failed { message: String },
    Gone,
}

/// Transport-level failures. Distinct from [`PollOutcome::Failed`], which is
/// the producer reporting a failed generation.
#[derive(Debug, Error)]
pub enum PollError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected status {0}")]
    UnexpectedStatus(reqwest::StatusCode),
}

/// Polls one job until it turns terminal.
pub struct JobPoller {
    http: reqwest::Client,
    base_url: String,
    interval: Duration,
}

impl JobPoller {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            interval: DEFAULT_POLL_INTERVAL,
        }
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Poll `GET {base}/api/jobs/{id}` until a terminal signal, feeding each
    /// newly renderable item to `sink` exactly once. Identity-based dedup in
    /// the tracker makes a re-sent or re-ordered entry a no-op.
    pub async fn poll_until_done<F>(
        &self,
        job_id: &str,
        mut sink: F,
    ) -> Result<PollOutcome, PollError>
    where
        F: FnMut(RenderItem),
    {
        let url = format!(
            "{}/api/jobs/{}",
            self.base_url.trim_end_matches('/'),
            job_id
        );
        let mut tracker = PollTracker::new();

        loop {
            let response = self.http.get(&url).send().await?;
            let observation = match response.status() {
                reqwest::StatusCode::OK => {
                    let view: JobView = response.json().await?;
                    tracker.observe(&view)
                }
                reqwest::StatusCode::NOT_FOUND => tracker.observe_missing(),
                status => return Err(PollError::UnexpectedStatus(status)),
            };

            for item in observation.rendered {
                sink(item);
            }

            match observation.next {
                PollNext::Stop(StopReason::Complete) => return Ok(PollOutcome::Complete),
                PollNext::Stop(StopReason::Failed { message }) => {
                    return Ok(PollOutcome::Failed { message });
                }
                PollNext::Stop(StopReason::Gone) => {
                    tracing::debug!(job_id = %job_id, "job gone, polling stopped");
                    return Ok(PollOutcome::Gone);
                }
                PollNext::Continue => tokio::time::sleep(self.interval).await,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use draftboard_core::poll::RenderKind;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn fast_poller(server: &MockServer) -> JobPoller {
        JobPoller::new(server.uri()).with_interval(Duration::from_millis(1))
    }

    #[tokio::test]
    async fn test_poller_renders_incrementally_without_duplicates() {
        let server = MockServer::start().await;

        // first poll: one article, not complete
        Mock::given(method("GET"))
            .and(path("/api/jobs/j1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "generating",
                "results": [{"sequence": 1, "article": "X", "generatedAt": "t1"}],
                "resultsVersion": 1,
                "isComplete": false,
            })))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        // second poll: both entries, complete — entry 1 is re-sent
        Mock::given(method("GET"))
            .and(path("/api/jobs/j1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "done",
                "results": [
                    {"sequence": 1, "article": "X", "generatedAt": "t1"},
                    {"sequence": 2, "faqs": "Y", "generatedAt": "t2"},
                ],
                "resultsVersion": 2,
                "isComplete": true,
            })))
            .mount(&server)
            .await;

        let mut rendered = Vec::new();
        let outcome = fast_poller(&server)
            .poll_until_done("j1", |item| rendered.push(item))
            .await
            .unwrap();

        assert_eq!(outcome, PollOutcome::Complete);
        assert_eq!(rendered.len(), 2);
        assert_eq!(rendered[0].sequence, 1);
        assert_eq!(rendered[0].kind, RenderKind::Article);
        assert_eq!(rendered[1].sequence, 2);
        assert_eq!(rendered[1].kind, RenderKind::Faqs);
    }

    #[tokio::test]
    async fn test_poller_surfaces_generation_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/jobs/j1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "error",
                "results": [],
                "resultsVersion": 0,
                "isComplete": false,
                "error": "boom",
            })))
            .mount(&server)
            .await;

        let outcome = fast_poller(&server)
            .poll_until_done("j1", |_| panic!("nothing should render"))
            .await
            .unwrap();
        assert_eq!(outcome, PollOutcome::Failed { message: "boom".to_string() });
    }

    #[tokio::test]
    async fn test_poller_treats_404_as_normal_stop() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({
                "error": "Job not found",
            })))
            .mount(&server)
            .await;

        let outcome = fast_poller(&server)
            .poll_until_done("ghost", |_| panic!("nothing should render"))
            .await
            .unwrap();
        assert_eq!(outcome, PollOutcome::Gone);
    }

    #[tokio::test]
    async fn test_poller_errors_on_unexpected_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let err = fast_poller(&server)
            .poll_until_done("j1", |_| {})
            .await
            .unwrap_err();
        assert!(matches!(err, PollError::UnexpectedStatus(status) if status.as_u16() == 500));
    }
}
