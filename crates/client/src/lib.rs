// crates/client/src/lib.rs
//! Draftboard polling client.
//!
//! Drives the read-side contract from `draftboard-core` over HTTP: fetch the
//! job view on a fixed interval, hand newly renderable items to a sink
//! exactly once, stop on the first terminal signal.

pub mod poller;

pub use poller::{JobPoller, PollError, PollOutcome};
