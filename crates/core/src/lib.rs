// crates/core/src/lib.rs
//! Draftboard core: the asynchronous job-result aggregator.
//!
//! A short-lived HTTP request starts a long-running generation workflow on an
//! external engine; disconnected polls observe its incremental progress until
//! completion or failure. This crate owns the three pieces with real stakes:
//!
//! - [`store::JobStore`] — process-wide, in-memory registry of jobs; owns all
//!   mutation atomicity and the terminal-state discipline.
//! - [`normalizer`] — turns heterogeneous webhook payloads into store calls
//!   with deterministic error/completion precedence.
//! - [`poll::PollTracker`] — the read-side contract a polling client follows
//!   to render incremental progress exactly once.

pub mod error;
pub mod job;
pub mod normalizer;
pub mod poll;
pub mod store;

pub use error::StoreError;
pub use job::{Job, JobStatus, JobView, ResultEntry};
pub use store::{AppendOutcome, CompleteOutcome, CreateOutcome, FailOutcome, JobStore};
