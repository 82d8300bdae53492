// crates/server/src/sweep.rs
//! Background retention sweeper.
//!
//! Jobs are never persisted and never explicitly deleted, so without a sweep
//! the store grows for the process lifetime. The sweeper evicts jobs whose
//! `updated_at` fell outside the retention window; a poller that comes back
//! for an evicted job sees a plain 404 and stops.

use std::sync::Arc;
use std::time::Duration;

use draftboard_core::JobStore;

/// Spawn the periodic eviction task. Runs until the process exits.
pub fn spawn_sweeper(
    store: Arc<JobStore>,
    retention: Duration,
    interval: Duration,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        // the immediate first tick would sweep an empty store
        ticker.tick().await;
        loop {
            ticker.tick().await;
            let evicted = store.evict_stale(retention);
            if evicted > 0 {
                tracing::info!(evicted, remaining = store.len(), "evicted stale jobs");
            } else {
                tracing::debug!(jobs = store.len(), "sweep: nothing stale");
            }
        }
    })
}
