// crates/core/src/normalizer.rs
//! Callback normalizer: turns heterogeneous webhook payloads into store calls.
//!
//! The workflow engine's callbacks arrive in three shapes — an error report,
//! a batch of results, or a single result at the top level — with loosely
//! duck-typed completion flags. [`parse`] is a total, non-throwing function
//! over untrusted JSON returning a tagged [`CallbackPayload`]; [`apply`]
//! drives the [`JobStore`] from it with deterministic precedence: an error
//! wins over any co-present result data, and a completion signal is attached
//! only to the last surviving entry of the call.

use chrono::Utc;
use serde_json::Value;

use crate::error::StoreError;
use crate::job::ResultEntry;
use crate::store::{AppendOutcome, CompleteOutcome, FailOutcome, JobStore};

/// Canonical form of one inbound callback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallbackPayload {
    /// Producer reported failure; any result data in the payload is discarded.
    Error { message: String },
    /// A `results` array, already mapped to entries (empty ones included —
    /// filtering happens in [`apply`] so the parse stays total and lossless).
    Batch { entries: Vec<ResultEntry>, complete: bool },
    /// The top-level object itself is one entry.
    Single { entry: Box<ResultEntry>, complete: bool },
}

/// What one callback did to the store, for structured logging at the HTTP
/// boundary. Every branch here maps to a `200` response — the engine has no
/// corrective action, so nothing on this path is allowed to look like a 5xx.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ApplyReport {
    pub appended: usize,
    pub dropped_empty: usize,
    pub dropped_capped: usize,
    pub failed: bool,
    pub completed: bool,
    /// The job id was unknown (or already evicted); everything was dropped.
    pub unknown_job: bool,
}

/// Parse an inbound payload into its canonical form. Total: any JSON value
/// yields some `CallbackPayload`.
pub fn parse(payload: &Value) -> CallbackPayload {
    if let Some(message) = error_message(payload) {
        return CallbackPayload::Error { message };
    }

    let complete = completion_signal(payload);
    match payload.get("results").and_then(Value::as_array) {
        Some(results) => CallbackPayload::Batch {
            entries: results
                .iter()
                .enumerate()
                .map(|(i, v)| entry_from_value(v, i as u32 + 1))
                .collect(),
            complete,
        },
        None => CallbackPayload::Single {
            entry: Box::new(entry_from_value(payload, 1)),
            complete,
        },
    }
}

/// Apply one parsed callback to the store. Store-level `NotFound` is logged
/// and swallowed here — it never propagates to the HTTP boundary.
pub fn apply(store: &JobStore, job_id: &str, payload: &Value) -> ApplyReport {
    let mut report = ApplyReport::default();

    let (entries, complete) = match parse(payload) {
        CallbackPayload::Error { message } => {
            match store.fail_job(job_id, message) {
                FailOutcome::Failed => report.failed = true,
                FailOutcome::IgnoredTerminal => {
                    tracing::debug!(job_id = %job_id, "error callback for terminal job, ignored");
                }
                FailOutcome::UnknownJob => report.unknown_job = true,
            }
            return report;
        }
        CallbackPayload::Batch { entries, complete } => (entries, complete),
        CallbackPayload::Single { entry, complete } => (vec![*entry], complete),
    };

    let storable: Vec<ResultEntry> = entries
        .into_iter()
        .filter(|e| {
            let empty = e.is_empty();
            if empty {
                report.dropped_empty += 1;
            }
            !empty
        })
        .collect();

    let last = storable.len().saturating_sub(1);
    for (i, entry) in storable.into_iter().enumerate() {
        let mark_complete = complete && i == last;
        match store.append_result(job_id, entry, mark_complete) {
            Ok(AppendOutcome::Appended { .. }) => {
                report.appended += 1;
                if mark_complete {
                    report.completed = true;
                }
            }
            Ok(AppendOutcome::DroppedEmpty) => report.dropped_empty += 1,
            Ok(AppendOutcome::CapExceeded) => report.dropped_capped += 1,
            Ok(AppendOutcome::IgnoredTerminal) => {
                tracing::debug!(job_id = %job_id, "append for terminal job, remainder ignored");
                return report;
            }
            Err(StoreError::NotFound(_)) => {
                tracing::warn!(job_id = %job_id, "callback for unknown job, dropped");
                report.unknown_job = true;
                return report;
            }
            Err(e) => {
                tracing::warn!(job_id = %job_id, error = %e, "append rejected, dropped");
                return report;
            }
        }
    }

    // A completion signal must not be lost when the final entry was filtered
    // out or dropped by the cap.
    if complete && !report.completed {
        match store.complete_job(job_id) {
            Ok(CompleteOutcome::Completed) => report.completed = true,
            Ok(CompleteOutcome::IgnoredTerminal) => {}
            Err(StoreError::NotFound(_)) => {
                tracing::warn!(job_id = %job_id, "completion for unknown job, dropped");
                report.unknown_job = true;
            }
            Err(e) => {
                tracing::warn!(job_id = %job_id, error = %e, "completion rejected, dropped");
            }
        }
    }

    report
}

/// Error detection: `status == "error"`, or a non-empty `error`/`message`
/// string field. The extracted message prefers `error` over `message`.
fn error_message(payload: &Value) -> Option<String> {
    let explicit = string_field(payload, "error").or_else(|| string_field(payload, "message"));
    if status_is(payload, "error") {
        return Some(explicit.unwrap_or_else(|| "generation failed".to_string()));
    }
    explicit
}

/// Completion precedence, first present signal decides:
/// `isFinal` > `hasMore == false` > `status` of done/completed.
fn completion_signal(payload: &Value) -> bool {
    if let Some(is_final) = payload.get("isFinal").and_then(Value::as_bool) {
        return is_final;
    }
    if let Some(has_more) = payload.get("hasMore").and_then(Value::as_bool) {
        return !has_more;
    }
    status_is(payload, "done") || status_is(payload, "completed")
}

fn status_is(payload: &Value, expected: &str) -> bool {
    payload
        .get("status")
        .and_then(Value::as_str)
        .is_some_and(|s| s.eq_ignore_ascii_case(expected))
}

fn entry_from_value(value: &Value, default_sequence: u32) -> ResultEntry {
    ResultEntry {
        sequence: value
            .get("sequence")
            .and_then(Value::as_u64)
            .and_then(|n| u32::try_from(n).ok())
            .filter(|n| *n > 0)
            .unwrap_or(default_sequence),
        article: string_field(value, "article"),
        faqs: string_field(value, "faqs"),
        meta_title: string_field(value, "metaTitle"),
        meta_description: string_field(value, "metaDescription"),
        generated_at: string_field(value, "generatedAt")
            .unwrap_or_else(|| Utc::now().to_rfc3339()),
    }
}

fn string_field(value: &Value, key: &str) -> Option<String> {
    value
        .get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
}
