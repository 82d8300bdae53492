// crates/core/src/job.rs
//! Job records, result entries, and the status state machine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle of a generation job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Pending,
    Generating,
    Done,
    Error,
}

impl JobStatus {
    /// Done and Error accept no further mutation.
    pub fn is_terminal(self) -> bool {
        matches!(self, JobStatus::Done | JobStatus::Error)
    }

    /// Total transition function. Returns the resulting status, or `None`
    /// when the transition is rejected. First terminal transition wins:
    /// nothing moves out of Done or Error, and nothing moves back to Pending.
    pub fn transition(self, next: JobStatus) -> Option<JobStatus> {
        if self.is_terminal() {
            return None;
        }
        match next {
            JobStatus::Pending => None,
            JobStatus::Generating => Some(JobStatus::Generating),
            JobStatus::Done => Some(JobStatus::Done),
            JobStatus::Error => Some(JobStatus::Error),
        }
    }
}

/// One generated content unit attached to a job.
///
/// `sequence` is a producer-assigned ordering hint, not a store-level
/// ordering guarantee — `Job::results` keeps insertion order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultEntry {
    pub sequence: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub article: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub faqs: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta_description: Option<String>,
    /// Producer-supplied timestamp string, passed through as-is.
    pub generated_at: String,
}

impl ResultEntry {
    /// An entry with neither article nor FAQs carries nothing worth storing.
    pub fn is_empty(&self) -> bool {
        fn blank(field: &Option<String>) -> bool {
            field.as_deref().is_none_or(|s| s.trim().is_empty())
        }
        blank(&self.article) && blank(&self.faqs)
    }
}

/// A tracked unit of asynchronous work. The id is an opaque, unguessable
/// capability token, unique for the process lifetime.
#[derive(Debug, Clone)]
pub struct Job {
    pub id: String,
    pub status: JobStatus,
    /// Human-readable failure message, set only in `Error`.
    pub error: Option<String>,
    /// Monotonic counter: +1 per accepted non-empty append, never decreases.
    pub results_version: u64,
    /// Append-only, insertion order; entries are immutable once stored.
    pub results: Vec<ResultEntry>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Job {
    pub fn new(id: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            status: JobStatus::Pending,
            error: None,
            results_version: 0,
            results: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.status == JobStatus::Done
    }

    /// Consistent wire snapshot for polling clients.
    pub fn view(&self) -> JobView {
        JobView {
            status: self.status,
            results: self.results.clone(),
            results_version: self.results_version,
            is_complete: self.is_complete(),
            error: self.error.clone(),
        }
    }
}

/// What `GET /api/jobs/{id}` returns: everything a poller needs to render
/// incremental progress and decide whether to keep polling.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobView {
    pub status: JobStatus,
    pub results: Vec<ResultEntry>,
    pub results_version: u64,
    pub is_complete: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
