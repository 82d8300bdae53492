// crates/core/src/error.rs
use thiserror::Error;

/// Failures a store operation can actually report.
///
/// A mutation attempted against a terminal job is *not* an error. The
/// callback path is accept-and-drop, so those branches are modeled as
/// outcome enums on the operations themselves (see `store::AppendOutcome`).
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("job id must not be empty")]
    InvalidArgument,

    #[error("unknown job: {0}")]
    NotFound(String),
}
