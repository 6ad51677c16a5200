//! History of feedback stage changes.
//!
//! Immutable: [`SessionHistory::record`] returns a new history with the change
//! appended. The history lives only as long as the session that owns it and
//! keeps at most [`MAX_CHANGES`] entries, dropping the oldest first.

use super::session::ClusterId;
use super::state::FeedbackStage;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Number of changes a history retains.
pub const MAX_CHANGES: usize = 512;

/// Record of one applied event.
///
/// # Example
///
/// ```rust
/// use cluster_feedback::core::{ClusterId, FeedbackStage, StageChange, State};
/// use chrono::Utc;
///
/// let change = StageChange {
///     event: "choose_matches".to_string(),
///     from: FeedbackStage::Unanswered,
///     to: FeedbackStage::Agreed,
///     cluster: Some(ClusterId::from("Cluster 1")),
///     timestamp: Utc::now(),
/// };
/// assert!(change.to.is_final());
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StageChange {
    /// Name of the event that was applied
    pub event: String,
    /// Stage before the event
    pub from: FeedbackStage,
    /// Stage after the event
    pub to: FeedbackStage,
    /// Cluster the state referred to after the event
    pub cluster: Option<ClusterId>,
    /// When the event was applied
    pub timestamp: DateTime<Utc>,
}

/// Ordered history of applied events.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct SessionHistory {
    changes: Vec<StageChange>,
}

impl SessionHistory {
    pub fn new() -> Self {
        Self {
            changes: Vec::new(),
        }
    }

    /// Record a change, returning a new history.
    ///
    /// The existing history is left untouched. Once [`MAX_CHANGES`] entries
    /// are held, the oldest is dropped.
    pub fn record(&self, change: StageChange) -> Self {
        let keep = self.changes.len().min(MAX_CHANGES - 1);
        let mut changes = Vec::with_capacity(keep + 1);
        changes.extend_from_slice(&self.changes[self.changes.len() - keep..]);
        changes.push(change);
        Self { changes }
    }

    /// Stages traversed: the first `from`, then every `to`.
    pub fn path(&self) -> Vec<FeedbackStage> {
        let mut path = Vec::with_capacity(self.changes.len() + 1);
        if let Some(first) = self.changes.first() {
            path.push(first.from);
        }
        path.extend(self.changes.iter().map(|c| c.to));
        path
    }

    /// Clusters the session was assigned, in order, without repeats.
    pub fn clusters(&self) -> Vec<&ClusterId> {
        let mut clusters: Vec<&ClusterId> = Vec::new();
        for cluster in self.changes.iter().filter_map(|c| c.cluster.as_ref()) {
            if clusters.last() != Some(&cluster) {
                clusters.push(cluster);
            }
        }
        clusters
    }

    /// Time between the oldest retained and the last recorded change.
    ///
    /// `None` when nothing has been recorded.
    pub fn duration(&self) -> Option<Duration> {
        let (first, last) = (self.changes.first()?, self.changes.last()?);
        last.timestamp
            .signed_duration_since(first.timestamp)
            .to_std()
            .ok()
    }

    pub fn changes(&self) -> &[StageChange] {
        &self.changes
    }
}
