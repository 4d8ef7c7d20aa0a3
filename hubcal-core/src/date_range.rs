//! Inclusive date ranges for selecting events.

use chrono::{Datelike, Duration, NaiveDate};

use crate::error::{HubCalError, HubCalResult};
use crate::view::{ViewMode, WeekStart};

/// Inclusive range of calendar days.
///
/// Time of day plays no part in membership: an event overlaps the range if
/// any of its days do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// Build a range, swapping the bounds if they are reversed.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        if end < start {
            DateRange { start: end, end: start }
        } else {
            DateRange { start, end }
        }
    }

    pub fn single_day(date: NaiveDate) -> Self {
        DateRange { start: date, end: date }
    }

    /// Range shown by a calendar view anchored at `anchor`.
    /// - month: whole weeks covering the anchor's month
    /// - week: the week containing the anchor
    /// - day: the anchor alone
    pub fn for_view(mode: ViewMode, anchor: NaiveDate, week_start: WeekStart) -> Self {
        match mode {
            ViewMode::Month => {
                let first = start_of_month(anchor);
                let last = end_of_month(anchor);
                DateRange {
                    start: week_start.start_of_week(first),
                    end: week_start.end_of_week(last),
                }
            }
            ViewMode::Week => DateRange {
                start: week_start.start_of_week(anchor),
                end: week_start.end_of_week(anchor),
            },
            ViewMode::Day => DateRange::single_day(anchor),
        }
    }

    /// Parse explicit `from`/`to` bounds (YYYY-MM-DD).
    /// A missing `to` makes a single-day range.
    pub fn from_args(from: &str, to: Option<&str>) -> HubCalResult<Self> {
        let start = parse_date_arg("from", from)?;
        let end = match to {
            Some(s) => parse_date_arg("to", s)?,
            None => start,
        };

        Ok(DateRange::new(start, end))
    }

    /// True if the span `[start, end]` shares at least one day with this range.
    pub fn overlaps(&self, start: NaiveDate, end: NaiveDate) -> bool {
        start <= self.end && end >= self.start
    }

    /// Every day in the range, in order.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> + use<> {
        let end = self.end;
        self.start.iter_days().take_while(move |d| *d <= end)
    }

    pub fn len_days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }
}

/// Parse a calendar date leniently.
///
/// Accepts `YYYY-MM-DD`, or any datetime string starting with one and
/// followed by `T` or a space (RFC 3339, ISO 8601); the time part is
/// ignored. Returns `None` for anything else.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();

    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Some(date);
    }

    let (date_part, rest) = value.split_at_checked(10)?;
    if !rest.starts_with(['T', ' ']) {
        return None;
    }
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
}

/// Parse a strict YYYY-MM-DD argument.
fn parse_date_arg(field: &'static str, s: &str) -> HubCalResult<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map_err(|_| HubCalError::InvalidDate {
        field,
        value: s.to_string(),
    })
}

pub(crate) fn start_of_month(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.day0()))
}

pub(crate) fn end_of_month(date: NaiveDate) -> NaiveDate {
    let first = start_of_month(date);
    first
        .checked_add_months(chrono::Months::new(1))
        .and_then(|next| next.pred_opt())
        .unwrap_or(NaiveDate::MAX)
}
