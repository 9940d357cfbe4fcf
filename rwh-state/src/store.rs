//! The current-metrics slot and its single writer.
//!
//! `DashboardStore` owns the only `watch::Sender` for the current
//! `Snapshot`. Widgets hold `DashboardReader`s and can only read. A snapshot
//! is swapped in whole, so a reader sees either the old snapshot or the new
//! one, never a mix.

use crate::form::SiteField;
use crate::pending::PendingSubmission;
use chrono::{DateTime, Utc};
use log::{debug, info};
use rwh_estimate::Estimator;
use rwh_site::metrics::DerivedMetrics;
use rwh_site::site_input::{RawSiteInput, SiteInput};
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

/// One published estimation result.
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    /// Submission sequence number; 0 is the initial snapshot
    pub sequence: u64,
    pub input: SiteInput,
    pub metrics: DerivedMetrics,
    pub recorded_at: DateTime<Utc>,
}

/// A submission that has been numbered but not yet published.
#[derive(Debug)]
pub struct SubmissionTicket {
    sequence: u64,
    input: SiteInput,
}

impl SubmissionTicket {
    pub fn sequence(&self) -> u64 {
        self.sequence
    }
}

/// Single writer of the dashboard's current snapshot.
pub struct DashboardStore {
    estimator: Estimator,
    next_sequence: AtomicU64,
    draft: watch::Sender<RawSiteInput>,
    current: watch::Sender<Arc<Snapshot>>,
}

impl DashboardStore {
    /// Create a store whose first snapshot is estimated from `initial`.
    pub fn new(estimator: Estimator, initial: RawSiteInput) -> Self {
        let input = initial.coerce();
        let snapshot = Snapshot {
            sequence: 0,
            metrics: estimator.estimate(&input),
            input,
            recorded_at: Utc::now(),
        };
        let (current, _) = watch::channel(Arc::new(snapshot));
        let (draft, _) = watch::channel(initial);
        Self {
            estimator,
            next_sequence: AtomicU64::new(1),
            draft,
            current,
        }
    }

    /// Store initialized with the default dashboard form.
    pub fn with_defaults(estimator: Estimator) -> Self {
        Self::new(estimator, RawSiteInput::dashboard_defaults())
    }

    pub fn estimator(&self) -> &Estimator {
        &self.estimator
    }

    /// The form's current, unsubmitted values.
    pub fn draft(&self) -> RawSiteInput {
        self.draft.borrow().clone()
    }

    /// Record an edit to one form field; nothing is estimated until a submit.
    pub fn set_field(&self, field: SiteField, value: impl Into<String>) {
        let value = value.into();
        self.draft.send_modify(|draft| field.apply(draft, value));
    }

    /// The snapshot currently published.
    pub fn current(&self) -> Arc<Snapshot> {
        self.current.borrow().clone()
    }

    /// A read-only handle on the current snapshot.
    pub fn subscribe(&self) -> DashboardReader {
        DashboardReader {
            rx: self.current.subscribe(),
        }
    }

    /// Number a submission. Later tickets always win over earlier ones.
    pub fn begin_submission(&self, input: SiteInput) -> SubmissionTicket {
        let sequence = self.next_sequence.fetch_add(1, Ordering::SeqCst);
        debug!("Submission {} started for {:?}", sequence, input.location);
        SubmissionTicket { sequence, input }
    }

    /// Estimate a ticket and publish the result unless a newer submission
    /// already published. Returns whether the snapshot was replaced.
    pub fn complete(&self, ticket: SubmissionTicket) -> bool {
        let SubmissionTicket { sequence, input } = ticket;
        let snapshot = Arc::new(Snapshot {
            sequence,
            metrics: self.estimator.estimate(&input),
            input,
            recorded_at: Utc::now(),
        });
        let published = self.current.send_if_modified(|current| {
            if sequence > current.sequence {
                *current = snapshot;
                true
            } else {
                false
            }
        });
        if !published {
            info!("Discarded stale submission {}", sequence);
        }
        published
    }

    /// Estimate and publish immediately.
    pub fn submit(&self, input: SiteInput) -> bool {
        let ticket = self.begin_submission(input);
        self.complete(ticket)
    }

    /// Submit the form draft.
    pub fn submit_draft(&self) -> bool {
        let input = self.draft.borrow().coerce();
        self.submit(input)
    }

    /// Number a submission now and publish it after `delay`.
    ///
    /// Must be called inside a tokio runtime. The estimate itself still runs
    /// synchronously once the delay elapses; only the wait is cancellable.
    pub fn submit_delayed(self: &Arc<Self>, input: SiteInput, delay: Duration) -> PendingSubmission {
        let ticket = self.begin_submission(input);
        let sequence = ticket.sequence();
        let store = Arc::clone(self);
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            store.complete(ticket)
        });
        PendingSubmission::new(sequence, handle)
    }
}

/// Read-only view of the dashboard's current snapshot.
#[derive(Clone)]
pub struct DashboardReader {
    rx: watch::Receiver<Arc<Snapshot>>,
}

impl DashboardReader {
    pub fn current(&self) -> Arc<Snapshot> {
        self.rx.borrow().clone()
    }

    /// Wait for the next replacement; `None` once the store is gone.
    pub async fn changed(&mut self) -> Option<Arc<Snapshot>> {
        self.rx.changed().await.ok()?;
        Some(self.rx.borrow_and_update().clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rwh_site::metrics::FeasibilityRating;

    fn site(roof: f64, dwellers: u32) -> SiteInput {
        SiteInput {
            roof_area_sq_m: roof,
            dweller_count: dwellers,
            open_space_sq_m: 40.0,
            location: "Ranchi, Jharkhand".to_string(),
            roof_runoff_coefficient: Some(0.85),
            monthly_rainfall_mm: 750.0,
        }
    }

    #[test]
    fn test_initial_snapshot() {
        let store = DashboardStore::with_defaults(Estimator::default());
        let snapshot = store.current();
        assert_eq!(snapshot.sequence, 0);
        assert_eq!(snapshot.input.roof_area_sq_m, 120.0);
        assert_eq!(snapshot.metrics.feasibility_rating, FeasibilityRating::High);
        assert!((snapshot.metrics.annual_runoff_liters - 76_500.0).abs() < 1e-6);
        assert!(snapshot.metrics.payback_years.is_some());
    }

    #[test]
    fn test_submit_replaces_snapshot() {
        let store = DashboardStore::with_defaults(Estimator::default());
        assert!(store.submit(site(10.0, 1)));
        let snapshot = store.current();
        assert_eq!(snapshot.sequence, 1);
        assert_eq!(snapshot.metrics.feasibility_rating, FeasibilityRating::Low);
    }

    #[test]
    fn test_stale_completion_is_discarded() {
        let store = DashboardStore::with_defaults(Estimator::default());
        let first = store.begin_submission(site(10.0, 1));
        let second = store.begin_submission(site(60.0, 2));
        assert!(store.complete(second));
        assert!(!store.complete(first));
        let snapshot = store.current();
        assert_eq!(snapshot.sequence, 2);
        assert_eq!(snapshot.metrics.feasibility_rating, FeasibilityRating::Medium);
    }

    #[test]
    fn test_draft_edits_and_submit() {
        let store = DashboardStore::with_defaults(Estimator::default());
        store.set_field(SiteField::RoofArea, "55");
        store.set_field(SiteField::Dwellers, "2");
        assert_eq!(store.current().sequence, 0);
        assert_eq!(store.draft().roof_area.as_deref(), Some("55"));
        assert!(store.submit_draft());
        let snapshot = store.current();
        assert_eq!(snapshot.input.roof_area_sq_m, 55.0);
        assert_eq!(snapshot.metrics.feasibility_rating, FeasibilityRating::Medium);
    }

    #[test]
    fn test_readers_see_whole_snapshots() {
        let store = DashboardStore::with_defaults(Estimator::default());
        let estimator = store.estimator().clone();
        std::thread::scope(|scope| {
            for _ in 0..3 {
                let reader = store.subscribe();
                let estimator = estimator.clone();
                scope.spawn(move || {
                    for _ in 0..200 {
                        let snapshot = reader.current();
                        assert_eq!(snapshot.metrics, estimator.estimate(&snapshot.input));
                    }
                });
            }
            for step in 0..100u32 {
                store.submit(site(f64::from(step) * 3.0, step % 6));
            }
        });
        assert_eq!(store.current().sequence, 100);
    }

    #[tokio::test]
    async fn test_reader_is_notified() {
        let store = DashboardStore::with_defaults(Estimator::default());
        let mut reader = store.subscribe();
        store.submit(site(75.0, 3));
        let snapshot = reader.changed().await.unwrap();
        assert_eq!(snapshot.sequence, 1);
        assert_eq!(reader.current().sequence, 1);
        drop(store);
        assert!(reader.changed().await.is_none());
    }

    #[tokio::test]
    async fn test_delayed_last_click_wins() {
        let store = Arc::new(DashboardStore::with_defaults(Estimator::default()));
        let slow = store.submit_delayed(site(10.0, 1), Duration::from_millis(80));
        let fast = store.submit_delayed(site(200.0, 5), Duration::from_millis(5));
        assert_eq!(slow.sequence(), 1);
        assert_eq!(fast.sequence(), 2);
        assert!(fast.wait().await);
        assert!(!slow.wait().await);
        let snapshot = store.current();
        assert_eq!(snapshot.sequence, 2);
        assert_eq!(snapshot.metrics.feasibility_rating, FeasibilityRating::High);
    }

    #[tokio::test]
    async fn test_cancelled_submission_never_publishes() {
        let store = Arc::new(DashboardStore::with_defaults(Estimator::default()));
        let pending = store.submit_delayed(site(10.0, 1), Duration::from_secs(30));
        pending.cancel();
        assert!(!pending.wait().await);
        assert_eq!(store.current().sequence, 0);
    }
}
