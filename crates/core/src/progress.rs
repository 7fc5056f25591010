//! Aggregate progress over a collection of technologies.

use serde::{Deserialize, Serialize};
use crate::technology::{Technology, TechnologyStatus};

/// Progress derived from a collection. Never stored; always recomputed
/// with [`ProgressSummary::of`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ProgressSummary {
    /// Number of records
    pub total: usize,

    /// Records with status `completed`
    pub completed: usize,

    /// Records with status `in-progress`
    pub in_progress: usize,

    /// Records with status `not-started`
    pub not_started: usize,

    /// Percentage complete (0-100), rounded half up
    pub percent: u8,
}

impl ProgressSummary {
    /// Compute the summary for `items`.
    pub fn of(items: &[Technology]) -> Self {
        let mut summary = Self {
            total: items.len(),
            ..Default::default()
        };

        for tech in items {
            match tech.status {
                TechnologyStatus::NotStarted => summary.not_started += 1,
                TechnologyStatus::InProgress => summary.in_progress += 1,
                TechnologyStatus::Completed => summary.completed += 1,
            }
        }

        summary.percent = percent(summary.completed, summary.total);
        summary
    }

    /// Count for a single status.
    pub fn count(&self, status: TechnologyStatus) -> usize {
        match status {
            TechnologyStatus::NotStarted => self.not_started,
            TechnologyStatus::InProgress => self.in_progress,
            TechnologyStatus::Completed => self.completed,
        }
    }

    /// Per-status counts in cycle order.
    pub fn breakdown(&self) -> [(TechnologyStatus, usize); 3] {
        TechnologyStatus::ALL.map(|status| (status, self.count(status)))
    }
}

/// `round(part / total * 100)`, 0 for an empty total.
fn percent(part: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    let rounded = (part * 200 + total) / (total * 2);
    rounded.min(100) as u8
}
