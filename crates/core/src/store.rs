// crates/core/src/store.rs
//! Process-wide, in-memory registry of jobs.
//!
//! Constructed once at process start and handed to route handlers through
//! application state — never a module-level global — so tests get isolated
//! stores and the backing map could later be swapped for a shared cache
//! without touching call sites.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError, RwLock};
use std::time::Duration;

use chrono::Utc;

use crate::error::StoreError;
use crate::job::{Job, JobStatus, JobView, ResultEntry};

/// Hard ceiling on stored entries per job. An unbounded producer cannot grow
/// one job forever; appends past the cap are dropped without a version bump.
pub const DEFAULT_MAX_RESULTS_PER_JOB: usize = 500;

/// Outcome of `create_job`. Duplicate creation preserves the existing record
/// so a retried creation request cannot erase in-flight results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateOutcome {
    Created,
    AlreadyExists,
}

/// Outcome of `append_result`. Only `Appended` mutates the job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppendOutcome {
    Appended { version: u64 },
    /// Entry had neither article nor FAQs — dropped, no version bump.
    DroppedEmpty,
    /// Job already reached Done or Error — first terminal transition wins.
    IgnoredTerminal,
    /// Per-job results cap reached — dropped, no version bump.
    CapExceeded,
}

/// Outcome of `fail_job`. An unknown id is silently dropped rather than
/// materializing a job, so a stray callback cannot conjure state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailOutcome {
    Failed,
    IgnoredTerminal,
    UnknownJob,
}

/// Outcome of `complete_job`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompleteOutcome {
    Completed,
    IgnoredTerminal,
}

/// In-memory job registry.
///
/// The top-level map lock is held only for creation and lookup; the
/// append + version bump + status transition sequence runs under the per-job
/// mutex as one indivisible step, so unrelated jobs never serialize against
/// each other. No I/O happens under either lock.
pub struct JobStore {
    jobs: RwLock<HashMap<String, Arc<Mutex<Job>>>>,
    max_results_per_job: usize,
}

impl JobStore {
    pub fn new() -> Self {
        Self::with_max_results(DEFAULT_MAX_RESULTS_PER_JOB)
    }

    pub fn with_max_results(max_results_per_job: usize) -> Self {
        Self {
            jobs: RwLock::new(HashMap::new()),
            max_results_per_job,
        }
    }

    /// Register a job id. Idempotent: an existing id is a preserving no-op.
    pub fn create_job(&self, id: &str) -> Result<CreateOutcome, StoreError> {
        if id.trim().is_empty() {
            return Err(StoreError::InvalidArgument);
        }

        let mut jobs = recover(self.jobs.write());
        if jobs.contains_key(id) {
            tracing::debug!(job_id = %id, "duplicate create_job, preserving existing record");
            return Ok(CreateOutcome::AlreadyExists);
        }
        jobs.insert(id.to_string(), Arc::new(Mutex::new(Job::new(id))));
        tracing::debug!(job_id = %id, "job created");
        Ok(CreateOutcome::Created)
    }

    /// Append one result entry, bump the version, and advance the status —
    /// atomically, under the per-job lock.
    pub fn append_result(
        &self,
        id: &str,
        entry: ResultEntry,
        mark_complete: bool,
    ) -> Result<AppendOutcome, StoreError> {
        let slot = self.lookup(id)?;
        let mut job = recover(slot.lock());

        if job.status.is_terminal() {
            tracing::debug!(job_id = %id, status = ?job.status, "append ignored, job is terminal");
            return Ok(AppendOutcome::IgnoredTerminal);
        }
        if entry.is_empty() {
            tracing::debug!(job_id = %id, sequence = entry.sequence, "empty entry dropped");
            return Ok(AppendOutcome::DroppedEmpty);
        }
        if job.results.len() >= self.max_results_per_job {
            tracing::warn!(
                job_id = %id,
                cap = self.max_results_per_job,
                "results cap reached, entry dropped"
            );
            return Ok(AppendOutcome::CapExceeded);
        }

        job.results.push(entry);
        job.results_version += 1;
        let next = if mark_complete {
            JobStatus::Done
        } else {
            JobStatus::Generating
        };
        if let Some(status) = job.status.transition(next) {
            job.status = status;
        }
        job.updated_at = Utc::now();

        let version = job.results_version;
        tracing::debug!(job_id = %id, version, mark_complete, "result appended");
        Ok(AppendOutcome::Appended { version })
    }

    /// Transition a job straight to Done without touching its results — used
    /// when a callback signals completion but carries no storable entries.
    pub fn complete_job(&self, id: &str) -> Result<CompleteOutcome, StoreError> {
        let slot = self.lookup(id)?;
        let mut job = recover(slot.lock());

        match job.status.transition(JobStatus::Done) {
            Some(status) => {
                job.status = status;
                job.updated_at = Utc::now();
                tracing::debug!(job_id = %id, "job completed");
                Ok(CompleteOutcome::Completed)
            }
            None => Ok(CompleteOutcome::IgnoredTerminal),
        }
    }

    /// Mark a job failed. Unknown ids are dropped without materializing a
    /// job; terminal jobs are left untouched.
    pub fn fail_job(&self, id: &str, message: impl Into<String>) -> FailOutcome {
        let slot = {
            let jobs = recover(self.jobs.read());
            jobs.get(id).cloned()
        };
        let Some(slot) = slot else {
            tracing::debug!(job_id = %id, "fail_job for unknown id, dropped");
            return FailOutcome::UnknownJob;
        };

        let mut job = recover(slot.lock());
        match job.status.transition(JobStatus::Error) {
            Some(status) => {
                job.status = status;
                job.error = Some(message.into());
                job.updated_at = Utc::now();
                tracing::debug!(job_id = %id, "job failed");
                FailOutcome::Failed
            }
            None => FailOutcome::IgnoredTerminal,
        }
    }

    /// Consistent snapshot for pollers; `None` when the id is unknown or
    /// already evicted.
    pub fn get_job(&self, id: &str) -> Option<JobView> {
        let slot = {
            let jobs = recover(self.jobs.read());
            jobs.get(id).cloned()
        };
        slot.map(|slot| recover(slot.lock()).view())
    }

    /// Drop jobs whose `updated_at` is older than the retention window.
    /// Returns the number evicted.
    pub fn evict_stale(&self, retention: Duration) -> usize {
        let cutoff = Utc::now() - chrono::Duration::seconds(retention.as_secs().min(i64::MAX as u64) as i64);
        let mut jobs = recover(self.jobs.write());
        let before = jobs.len();
        jobs.retain(|_, slot| recover(slot.lock()).updated_at >= cutoff);
        before - jobs.len()
    }

    pub fn len(&self) -> usize {
        recover(self.jobs.read()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lookup(&self, id: &str) -> Result<Arc<Mutex<Job>>, StoreError> {
        let jobs = recover(self.jobs.read());
        jobs.get(id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }
}

impl Default for JobStore {
    fn default() -> Self {
        Self::new()
    }
}

/// A poisoned lock only means another thread panicked mid-operation; the
/// record behind it is still the best truth available.
fn recover<G>(result: Result<G, PoisonError<G>>) -> G {
    result.unwrap_or_else(PoisonError::into_inner)
}
