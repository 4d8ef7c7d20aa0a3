//! Core types for hubcal.
//!
//! - `event`: stored base events and the occurrences derived from them
//! - `recurrence`: expansion of base events over a visible date range
//! - `date_range` / `view`: the visible range a calendar view shows
//! - `buckets`: per-day grouping of expanded occurrences
//! - `store`: the event repository and its in-memory and JSON-file backends

pub mod buckets;
pub mod config;
pub mod date_range;
pub mod error;
pub mod event;
pub mod recurrence;
pub mod store;
pub mod view;

pub use buckets::DayBuckets;
pub use date_range::DateRange;
pub use error::{HubCalError, HubCalResult};
pub use event::{BaseEvent, Occurrence, RecurringType, Reminder};
pub use recurrence::{expand, expand_at, occurrences_for_date};
pub use view::{Step, ViewMode, WeekStart};
