// crates/core/src/poll.rs
//! Read-side polling contract.
//!
//! A poller keeps one [`PollTracker`] per job and feeds it each fetched
//! [`JobView`]. The tracker decides what is newly renderable and whether to
//! keep polling; rendering the same identity twice is impossible by
//! construction (dedup by stable `(sequence, kind)` identity, not by count,
//! so out-of-order or re-sent entries never double-render). The tracker is
//! per-job, so the job id is an implicit part of every identity.

use std::collections::HashSet;

use crate::job::{JobStatus, JobView, ResultEntry};

/// Which piece of an entry a render item carries. One stored entry yields up
/// to one item per populated kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RenderKind {
    Article,
    Faqs,
}

/// One unit of content the client should render exactly once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderItem {
    pub sequence: u32,
    pub kind: RenderKind,
    pub text: String,
}

/// Why polling stopped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StopReason {
    /// Job reached Done; everything renderable has been handed out.
    Complete,
    /// Producer reported failure; surface the message.
    Failed { message: String },
    /// Job unknown or evicted — a normal terminal outcome, not an error.
    Gone,
}

/// Whether to schedule the next poll.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollNext {
    Continue,
    Stop(StopReason),
}

/// Result of observing one fetch: items to render this pass (possibly none),
/// then what to do next. A completing pass can carry both.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Observation {
    pub rendered: Vec<RenderItem>,
    pub next: PollNext,
}

/// Client-side polling state machine.
#[derive(Debug, Default)]
pub struct PollTracker {
    /// `None` until the first version is observed (the `-1` sentinel).
    last_seen_version: Option<u64>,
    rendered: HashSet<(u32, RenderKind)>,
}

impl PollTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one fetched view. Version comparison is `!=`, not `>`: the
    /// counter is monotonic on the server, the check is only a cheap
    /// new-data signal.
    pub fn observe(&mut self, view: &JobView) -> Observation {
        if view.status == JobStatus::Error {
            return Observation {
                rendered: Vec::new(),
                next: PollNext::Stop(StopReason::Failed {
                    message: view
                        .error
                        .clone()
                        .unwrap_or_else(|| "generation failed".to_string()),
                }),
            };
        }

        let mut rendered = Vec::new();
        if self.last_seen_version != Some(view.results_version) && !view.results.is_empty() {
            for entry in &view.results {
                self.collect_new(entry, &mut rendered);
            }
        }
        self.last_seen_version = Some(view.results_version);

        let next = if view.is_complete {
            PollNext::Stop(StopReason::Complete)
        } else {
            PollNext::Continue
        };
        Observation { rendered, next }
    }

    /// Feed a not-found fetch: stop polling, no error surfaced.
    pub fn observe_missing(&self) -> Observation {
        Observation {
            rendered: Vec::new(),
            next: PollNext::Stop(StopReason::Gone),
        }
    }

    fn collect_new(&mut self, entry: &ResultEntry, out: &mut Vec<RenderItem>) {
        let pieces = [
            (RenderKind::Article, entry.article.as_ref()),
            (RenderKind::Faqs, entry.faqs.as_ref()),
        ];
        for (kind, text) in pieces {
            let Some(text) = text else { continue };
            if self.rendered.insert((entry.sequence, kind)) {
                out.push(RenderItem {
                    sequence: entry.sequence,
                    kind,
                    text: text.clone(),
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn entry(seq: u32, article: Option<&str>, faqs: Option<&str>) -> ResultEntry {
        ResultEntry {
            sequence: seq,
            article: article.map(String::from),
            faqs: faqs.map(String::from),
            meta_title: None,
            meta_description: None,
            generated_at: "2026-08-30T00:00:00Z".to_string(),
        }
    }

    fn view(version: u64, complete: bool, results: Vec<ResultEntry>) -> JobView {
        JobView {
            status: if complete {
                JobStatus::Done
            } else if version > 0 {
                JobStatus::Generating
            } else {
                JobStatus::Pending
            },
            results,
            results_version: version,
            is_complete: complete,
            error: None,
        }
    }

    #[test]
    fn test_first_observation_renders_everything() {
        let mut tracker = PollTracker::new();
        let obs = tracker.observe(&view(1, false, vec![entry(1, Some("A"), None)]));

        assert_eq!(obs.rendered.len(), 1);
        assert_eq!(obs.rendered[0].kind, RenderKind::Article);
        assert_eq!(obs.next, PollNext::Continue);
    }

    #[test]
    fn test_unchanged_version_renders_nothing() {
        let mut tracker = PollTracker::new();
        let v = view(1, false, vec![entry(1, Some("A"), None)]);
        tracker.observe(&v);

        let obs = tracker.observe(&v);
        assert!(obs.rendered.is_empty());
        assert_eq!(obs.next, PollNext::Continue);
    }

    #[test]
    fn test_new_version_renders_only_unseen_identities() {
        let mut tracker = PollTracker::new();
        tracker.observe(&view(1, false, vec![entry(1, Some("A"), None)]));

        let obs = tracker.observe(&view(
            2,
            false,
            vec![entry(1, Some("A"), None), entry(2, None, Some("F"))],
        ));
        assert_eq!(obs.rendered.len(), 1);
        assert_eq!(obs.rendered[0].sequence, 2);
        assert_eq!(obs.rendered[0].kind, RenderKind::Faqs);
    }

    #[test]
    fn test_entry_with_both_kinds_yields_two_items() {
        let mut tracker = PollTracker::new();
        let obs = tracker.observe(&view(1, false, vec![entry(3, Some("A"), Some("F"))]));

        assert_eq!(obs.rendered.len(), 2);
        assert!(obs.rendered.iter().any(|i| i.kind == RenderKind::Article));
        assert!(obs.rendered.iter().any(|i| i.kind == RenderKind::Faqs));
    }

    #[test]
    fn test_complete_stops_after_final_render_pass() {
        let mut tracker = PollTracker::new();
        tracker.observe(&view(1, false, vec![entry(1, Some("X"), None)]));

        let obs = tracker.observe(&view(
            2,
            true,
            vec![entry(1, Some("X"), None), entry(2, None, Some("Y"))],
        ));
        assert_eq!(obs.rendered.len(), 1);
        assert_eq!(obs.next, PollNext::Stop(StopReason::Complete));
    }

    #[test]
    fn test_complete_without_new_data_still_stops() {
        let mut tracker = PollTracker::new();
        let obs = tracker.observe(&view(0, true, Vec::new()));
        assert!(obs.rendered.is_empty());
        assert_eq!(obs.next, PollNext::Stop(StopReason::Complete));
    }

    #[test]
    fn test_error_status_surfaces_message_and_stops() {
        let mut tracker = PollTracker::new();
        let v = JobView {
            status: JobStatus::Error,
            results: Vec::new(),
            results_version: 0,
            is_complete: false,
            error: Some("boom".to_string()),
        };

        let obs = tracker.observe(&v);
        assert!(obs.rendered.is_empty());
        assert_eq!(
            obs.next,
            PollNext::Stop(StopReason::Failed { message: "boom".to_string() })
        );
    }

    #[test]
    fn test_not_found_is_a_normal_stop() {
        let tracker = PollTracker::new();
        let obs = tracker.observe_missing();
        assert!(obs.rendered.is_empty());
        assert_eq!(obs.next, PollNext::Stop(StopReason::Gone));
    }

    #[test]
    fn test_rendering_is_idempotent_across_version_churn() {
        // Same identity showing up under a different version must not
        // double-render.
        let mut tracker = PollTracker::new();
        tracker.observe(&view(1, false, vec![entry(1, Some("A"), None)]));
        let obs = tracker.observe(&view(5, false, vec![entry(1, Some("A"), None)]));
        assert!(obs.rendered.is_empty());
    }
}
