//! Backfill of `dateAdded` for entries that predate date tracking.

use chrono::{DateTime, TimeDelta, Utc};
use tracing::{info, instrument};

use crate::tool::Tool;

/// Default age given to undated entries so they do not show as new.
pub const DEFAULT_BACKFILL_DAYS: u32 = 30;

/// Outcome of a date backfill.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateBackfillReport {
    pub updated: usize,
    /// Entries that already had a date.
    pub skipped: usize,
    /// Timestamp written to every updated entry.
    pub stamp: DateTime<Utc>,
}

/// `now` minus `days`, or `None` if that falls outside the representable range.
#[must_use]
pub fn days_before(now: DateTime<Utc>, days: u32) -> Option<DateTime<Utc>> {
    TimeDelta::try_days(i64::from(days)).and_then(|delta| now.checked_sub_signed(delta))
}

/// Sets `stamp` on every tool without a `dateAdded`.
#[instrument(skip(tools), fields(total = tools.len()))]
pub fn backfill_dates(tools: &mut [Tool], stamp: DateTime<Utc>) -> DateBackfillReport {
    let mut report = DateBackfillReport {
        updated: 0,
        skipped: 0,
        stamp,
    };
    for tool in tools.iter_mut() {
        if tool.date_added.is_some() {
            report.skipped += 1;
        } else {
            tool.date_added = Some(stamp);
            report.updated += 1;
        }
    }
    info!(
        updated = report.updated,
        skipped = report.skipped,
        "Date backfill finished"
    );
    report
}
