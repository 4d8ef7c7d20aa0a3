//! Event records.
//!
//! `BaseEvent` is the stored record, exactly as the event store hands it
//! over: dates stay raw strings because records may be malformed and the
//! expander decides what to do with them. `Occurrence` is one concrete
//! appearance of a base event inside a visible range, computed on demand
//! and never stored.

use std::fmt;

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

/// Recurrence cadence of a base event.
///
/// Unrecognized values survive a round trip through `Unknown` so a bad
/// record never fails to load; the expander stops such a series right away.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RecurringType {
    Daily,
    Weekly,
    Monthly,
    Yearly,
    Unknown(String),
}

impl RecurringType {
    pub fn as_str(&self) -> &str {
        match self {
            RecurringType::Daily => "daily",
            RecurringType::Weekly => "weekly",
            RecurringType::Monthly => "monthly",
            RecurringType::Yearly => "yearly",
            RecurringType::Unknown(raw) => raw,
        }
    }
}

impl From<String> for RecurringType {
    fn from(value: String) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "daily" => RecurringType::Daily,
            "weekly" => RecurringType::Weekly,
            "monthly" => RecurringType::Monthly,
            "yearly" => RecurringType::Yearly,
            _ => RecurringType::Unknown(value),
        }
    }
}

impl From<&str> for RecurringType {
    fn from(value: &str) -> Self {
        RecurringType::from(value.to_string())
    }
}

impl From<RecurringType> for String {
    fn from(value: RecurringType) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for RecurringType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A reminder attached to an event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reminder {
    pub enabled: bool,
    /// Minutes before the event start to trigger
    pub minutes_before: u32,
}

/// A calendar event as persisted by the event store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaseEvent {
    pub id: String,
    pub owner_id: String,
    pub title: String,

    /// Calendar date of the first (or only) day, normally YYYY-MM-DD
    pub start_date: String,
    /// Last day of the event; absent means a single-day event
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<String>,
    #[serde(default)]
    pub all_day: bool,

    // Recurrence fields
    #[serde(default)]
    pub is_recurring: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurring_type: Option<RecurringType>,
    /// Last date a new occurrence may start on
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurring_until: Option<String>,

    // Display payload, copied as-is onto every occurrence
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reminder: Option<Reminder>,
}

impl BaseEvent {
    /// A single-day, non-recurring event with an empty payload.
    pub fn new(id: impl Into<String>, title: impl Into<String>, start_date: impl Into<String>) -> Self {
        BaseEvent {
            id: id.into(),
            owner_id: String::new(),
            title: title.into(),
            start_date: start_date.into(),
            end_date: None,
            start_time: None,
            end_time: None,
            all_day: false,
            is_recurring: false,
            recurring_type: None,
            recurring_until: None,
            color: None,
            category: None,
            location: None,
            description: None,
            reminder: None,
        }
    }
}

impl fmt::Display for BaseEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.title)
    }
}

/// One concrete appearance of a base event within a visible range.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Occurrence {
    /// Rendering key: the base id for one-off events, a synthetic id for
    /// recurring ones (see [`crate::recurrence::occurrence_id`])
    pub id: String,
    /// Id of the base event; set only on synthesized occurrences
    pub original_id: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Base event payload. For synthesized occurrences its date strings are
    /// rewritten to this occurrence's dates.
    pub event: BaseEvent,
}

impl Occurrence {
    /// The id the event store knows. Updates and deletes must use this,
    /// never the synthetic `id`.
    pub fn target_id(&self) -> &str {
        self.original_id.as_deref().unwrap_or(&self.id)
    }

    pub fn is_synthetic(&self) -> bool {
        self.original_id.is_some()
    }

    pub fn title(&self) -> &str {
        &self.event.title
    }

    pub fn start_time(&self) -> Option<&str> {
        self.event.start_time.as_deref()
    }

    pub fn end_time(&self) -> Option<&str> {
        self.event.end_time.as_deref()
    }

    /// Whole days between start and end (0 for a single-day occurrence).
    pub fn duration_days(&self) -> i64 {
        (self.end_date - self.start_date).num_days()
    }

    /// True if `date` falls within `[start_date, end_date]`.
    pub fn spans(&self, date: NaiveDate) -> bool {
        self.start_date <= date && date <= self.end_date
    }

    /// Time of day used for display ordering. A missing or unreadable
    /// `start_time` sorts as midnight.
    pub fn sort_time(&self) -> NaiveTime {
        self.start_time()
            .and_then(parse_time)
            .unwrap_or(NaiveTime::MIN)
    }
}

impl fmt::Display for Occurrence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.event.title)
    }
}

/// Parse a time-of-day string in `HH:MM` or `HH:MM:SS` form.
pub fn parse_time(s: &str) -> Option<NaiveTime> {
    let s = s.trim();
    NaiveTime::parse_from_str(s, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M:%S"))
        .ok()
}
