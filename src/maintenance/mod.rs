//! Maintenance passes over an existing tools file.
//!
//! Each pass mutates a loaded `[Tool]` slice in place and returns a small
//! report; persisting the result is left to the caller.

pub mod dates;
pub mod descriptions;
pub mod popularity;
pub mod recent;

pub use dates::{DEFAULT_BACKFILL_DAYS, DateBackfillReport, backfill_dates, days_before};
pub use descriptions::{
    CleanupReport, clean_description, cleanup_descriptions, needs_fixing, quick_fix_descriptions,
    rewrite_description,
};
pub use popularity::{
    PopularityLookup, PopularityReport, backfill_popularity, search_popularity, top_by_popularity,
};
pub use recent::{DEFAULT_RECENT_HOURS, recently_added};
