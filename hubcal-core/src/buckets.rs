//! Per-day grouping of expanded occurrences.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::date_range::DateRange;
use crate::event::Occurrence;

/// Occurrences indexed by each day of a range they cover.
///
/// A multi-day occurrence appears under every day it spans within the
/// range. Within a day, occurrences keep the order they were given in.
pub struct DayBuckets<'a> {
    days: BTreeMap<NaiveDate, Vec<&'a Occurrence>>,
}

impl<'a> DayBuckets<'a> {
    pub fn new(occurrences: &'a [Occurrence], range: &DateRange) -> Self {
        let mut days: BTreeMap<NaiveDate, Vec<&'a Occurrence>> =
            range.days().map(|d| (d, Vec::new())).collect();

        for occurrence in occurrences {
            let from = occurrence.start_date.max(range.start);
            let to = occurrence.end_date.min(range.end);
            if from > to {
                continue;
            }
            for (_, bucket) in days.range_mut(from..=to) {
                bucket.push(occurrence);
            }
        }

        DayBuckets { days }
    }

    /// Occurrences on `date`; empty for days outside the range.
    pub fn get(&self, date: NaiveDate) -> &[&'a Occurrence] {
        self.days.get(&date).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Every day of the range with its occurrences, in date order.
    pub fn iter(&self) -> impl Iterator<Item = (NaiveDate, &[&'a Occurrence])> {
        self.days.iter().map(|(d, o)| (*d, o.as_slice()))
    }

    /// Days that have at least one occurrence.
    pub fn busy_days(&self) -> impl Iterator<Item = (NaiveDate, &[&'a Occurrence])> {
        self.iter().filter(|(_, o)| !o.is_empty())
    }

    pub fn is_empty(&self) -> bool {
        self.days.values().all(Vec::is_empty)
    }
}
