//! Listing of recently added entries.

use chrono::{DateTime, TimeDelta, Utc};

use crate::tool::Tool;

/// Default look-back window in hours.
pub const DEFAULT_RECENT_HOURS: u32 = 24;

/// Tools whose `dateAdded` is at or after `now - hours`, newest first.
///
/// Undated tools are never recent.
#[must_use]
pub fn recently_added(tools: &[Tool], now: DateTime<Utc>, hours: u32) -> Vec<&Tool> {
    let cutoff = TimeDelta::try_hours(i64::from(hours))
        .and_then(|window| now.checked_sub_signed(window))
        .unwrap_or(DateTime::<Utc>::MIN_UTC);

    let mut recent: Vec<&Tool> = tools
        .iter()
        .filter(|tool| tool.date_added.is_some_and(|added| added >= cutoff))
        .collect();
    recent.sort_by(|a, b| b.date_added.cmp(&a.date_added));
    recent
}
