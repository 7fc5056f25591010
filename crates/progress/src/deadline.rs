//! Deadline queries.

use chrono::Duration;
use techtrack_core::{Date, Technology};

/// Days from `today` until the deadline; negative when past, `None` without
/// a deadline.
pub fn days_remaining(tech: &Technology, today: Date) -> Option<i64> {
    tech.deadline.map(|d| (d - today).num_days())
}

/// Unfinished technologies whose deadline is before `today`, earliest first.
pub fn overdue(items: &[Technology], today: Date) -> Vec<&Technology> {
    pending_by_deadline(items, |d| d < today)
}

/// Unfinished technologies due in `[today, today + within_days]`, earliest
/// first.
pub fn upcoming(items: &[Technology], today: Date, within_days: u32) -> Vec<&Technology> {
    let horizon = today + Duration::days(i64::from(within_days));
    pending_by_deadline(items, |d| d >= today && d <= horizon)
}

fn pending_by_deadline(items: &[Technology], keep: impl Fn(Date) -> bool) -> Vec<&Technology> {
    let mut found: Vec<&Technology> = items
        .iter()
        .filter(|t| !t.is_completed())
        .filter(|t| t.deadline.is_some_and(&keep))
        .collect();
    found.sort_by_key(|t| t.deadline);
    found
}
