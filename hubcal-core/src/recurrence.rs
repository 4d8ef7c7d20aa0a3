//! Recurring event expansion.
//!
//! Expands base events into the occurrences that overlap a visible date
//! range. One-off events pass through as themselves; recurring events are
//! stepped by their cadence and each overlapping step becomes a synthesized
//! occurrence carrying a derived id and a back-reference to its base event.

use chrono::{Datelike, Days, Local, Months, NaiveDate};
use tracing::{debug, warn};

use crate::date_range::{DateRange, parse_date};
use crate::error::{HubCalError, HubCalResult};
use crate::event::{BaseEvent, Occurrence, RecurringType};

/// Months past the end of the visible range that a series is stepped through
/// before giving up.
pub const ITERATION_MARGIN_MONTHS: u32 = 1;

/// How far an open-ended series runs when it has no `recurring_until`.
pub const DEFAULT_HORIZON_MONTHS: u32 = 12;

/// Last possible start of a series with no `recurring_until`: one year from `today`.
pub fn default_recurrence_horizon(today: NaiveDate) -> NaiveDate {
    today
        .checked_add_months(Months::new(DEFAULT_HORIZON_MONTHS))
        .unwrap_or(NaiveDate::MAX)
}

/// Latest occurrence start examined for `range`, whatever the series' own end.
pub fn iteration_limit(range: &DateRange) -> NaiveDate {
    range
        .end
        .checked_add_months(Months::new(ITERATION_MARGIN_MONTHS))
        .unwrap_or(NaiveDate::MAX)
}

/// Synthetic id for the occurrence of `base_id` starting on `start`.
///
/// Unique per (base event, start date) since a series never starts twice on
/// the same day. Only ever used as a display key; the store knows nothing of it.
pub fn occurrence_id(base_id: &str, start: NaiveDate) -> String {
    format!("{}-{}", base_id, start.format("%Y%m%d"))
}

/// Split a synthetic occurrence id into its base id and start date.
/// Inverse of [`occurrence_id`]; `None` for anything it could not have produced.
pub fn parse_occurrence_id(id: &str) -> Option<(&str, NaiveDate)> {
    let (base_id, stamp) = id.rsplit_once('-')?;
    if base_id.is_empty() || stamp.len() != 8 {
        return None;
    }
    let start = NaiveDate::parse_from_str(stamp, "%Y%m%d").ok()?;
    Some((base_id, start))
}

/// Expand `events` over `range`, taking "today" from the local clock.
pub fn expand(events: &[BaseEvent], range: &DateRange) -> Vec<Occurrence> {
    expand_at(events, range, Local::now().date_naive())
}

/// Expand `events` over `range`.
///
/// `today` anchors the default horizon of series without `recurring_until`.
/// Events whose dates cannot be read are skipped and logged; they never
/// affect the rest. The result is ordered by start time (missing times sort
/// as 00:00), ties keeping input order.
pub fn expand_at(events: &[BaseEvent], range: &DateRange, today: NaiveDate) -> Vec<Occurrence> {
    let mut occurrences = Vec::new();

    for event in events {
        match try_expand_event(event, range, today) {
            Ok(mut expanded) => occurrences.append(&mut expanded),
            Err(e) => {
                warn!(event_id = %event.id, error = %e, "Skipping event with unreadable dates");
            }
        }
    }

    occurrences.sort_by_key(Occurrence::sort_time);

    debug!(
        events = events.len(),
        occurrences = occurrences.len(),
        from = %range.start,
        to = %range.end,
        days = range.len_days(),
        "Expanded events"
    );

    occurrences
}

/// Expand a single base event over `range`, reporting unreadable dates as errors.
pub fn try_expand_event(
    event: &BaseEvent,
    range: &DateRange,
    today: NaiveDate,
) -> HubCalResult<Vec<Occurrence>> {
    let (start, end) = event_span(event)?;

    if !event.is_recurring {
        if range.overlaps(start, end) {
            return Ok(vec![Occurrence {
                id: event.id.clone(),
                original_id: None,
                start_date: start,
                end_date: end,
                event: event.clone(),
            }]);
        }
        return Ok(Vec::new());
    }

    let until = match event.recurring_until.as_deref() {
        Some(raw) => parse_event_date(event, "recurring_until", raw)?,
        None => default_recurrence_horizon(today),
    };
    let limit = iteration_limit(range);
    let duration = Days::new((end - start).num_days().unsigned_abs());

    let cadence = Cadence::from_type(event.recurring_type.as_ref());
    if cadence.is_none() {
        debug!(
            event_id = %event.id,
            recurring_type = ?event.recurring_type,
            "Unknown cadence, series stops after its first date"
        );
    }

    // Earliest start whose span can still reach the range
    let earliest = range.start.checked_sub_days(duration).unwrap_or(NaiveDate::MIN);

    let mut occurrences = Vec::new();
    let mut step = cadence.map_or(0, |c| c.first_candidate(start, earliest));

    loop {
        let cursor = match cadence {
            Some(c) => c.nth(start, step),
            None if step == 0 => Some(start),
            None => None,
        };
        let Some(cursor) = cursor else { break };
        if cursor > until || cursor > limit {
            break;
        }

        let occurrence_end = cursor.checked_add_days(duration).unwrap_or(NaiveDate::MAX);
        if range.overlaps(cursor, occurrence_end) {
            occurrences.push(synthesize(event, cursor, occurrence_end));
        }

        let Some(next) = step.checked_add(1) else { break };
        step = next;
    }

    Ok(occurrences)
}

/// All occurrences whose span contains `date`, in their existing order.
pub fn occurrences_for_date(occurrences: &[Occurrence], date: NaiveDate) -> Vec<&Occurrence> {
    occurrences.iter().filter(|o| o.spans(date)).collect()
}

/// Parsed first and last day of a base event. A missing end means a
/// single-day event; an end before the start is treated as the start.
fn event_span(event: &BaseEvent) -> HubCalResult<(NaiveDate, NaiveDate)> {
    let start = parse_event_date(event, "start_date", &event.start_date)?;
    let end = match event.end_date.as_deref() {
        Some(raw) => parse_event_date(event, "end_date", raw)?,
        None => start,
    };

    Ok((start, end.max(start)))
}

fn parse_event_date(event: &BaseEvent, field: &'static str, raw: &str) -> HubCalResult<NaiveDate> {
    parse_date(raw).ok_or_else(|| HubCalError::InvalidEventDate {
        event_id: event.id.clone(),
        field,
        value: raw.to_string(),
    })
}

fn synthesize(event: &BaseEvent, start: NaiveDate, end: NaiveDate) -> Occurrence {
    let mut payload = event.clone();
    payload.start_date = start.format("%Y-%m-%d").to_string();
    payload.end_date = Some(end.format("%Y-%m-%d").to_string());

    Occurrence {
        id: occurrence_id(&event.id, start),
        original_id: Some(event.id.clone()),
        start_date: start,
        end_date: end,
        event: payload,
    }
}

/// A known recurrence step.
///
/// Step `n` is always computed from the series start, so month and year
/// steps clamp to the last day of shorter months without drifting: a
/// Jan 31 monthly series runs Jan 31, Feb 29 (or 28), Mar 31, Apr 30.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Cadence {
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl Cadence {
    fn from_type(recurring_type: Option<&RecurringType>) -> Option<Self> {
        match recurring_type? {
            RecurringType::Daily => Some(Cadence::Daily),
            RecurringType::Weekly => Some(Cadence::Weekly),
            RecurringType::Monthly => Some(Cadence::Monthly),
            RecurringType::Yearly => Some(Cadence::Yearly),
            RecurringType::Unknown(_) => None,
        }
    }

    /// Start of step `n` of a series beginning at `anchor`.
    fn nth(self, anchor: NaiveDate, n: u32) -> Option<NaiveDate> {
        match self {
            Cadence::Daily => anchor.checked_add_days(Days::new(u64::from(n))),
            Cadence::Weekly => anchor.checked_add_days(Days::new(u64::from(n) * 7)),
            Cadence::Monthly => anchor.checked_add_months(Months::new(n)),
            Cadence::Yearly => anchor.checked_add_months(Months::new(n.checked_mul(12)?)),
        }
    }

    /// Index of a step at or before the first one starting on or after
    /// `earliest`. Every earlier step starts before `earliest`, so none of
    /// them can reach the range.
    fn first_candidate(self, anchor: NaiveDate, earliest: NaiveDate) -> u32 {
        if earliest <= anchor {
            return 0;
        }

        let days = (earliest - anchor).num_days();
        let months = i64::from(earliest.year() - anchor.year()) * 12
            + i64::from(earliest.month())
            - i64::from(anchor.month());

        let steps = match self {
            Cadence::Daily => days,
            Cadence::Weekly => days / 7,
            Cadence::Monthly => months - 1,
            Cadence::Yearly => months / 12 - 1,
        };

        u32::try_from(steps.max(0)).unwrap_or(u32::MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::{ViewMode, WeekStart};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn today() -> NaiveDate {
        date(2024, 1, 1)
    }

    fn one_off(id: &str, start: &str, end: Option<&str>) -> BaseEvent {
        let mut event = BaseEvent::new(id, format!("Event {id}"), start);
        event.end_date = end.map(str::to_string);
        event
    }

    fn recurring(
        id: &str,
        start: &str,
        end: Option<&str>,
        cadence: &str,
        until: Option<&str>,
    ) -> BaseEvent {
        let mut event = one_off(id, start, end);
        event.is_recurring = true;
        event.recurring_type = Some(RecurringType::from(cadence));
        event.recurring_until = until.map(str::to_string);
        event
    }

    fn starts(occurrences: &[Occurrence]) -> Vec<NaiveDate> {
        occurrences.iter().map(|o| o.start_date).collect()
    }

    /// Reference expansion: walks every step from the series start.
    fn expand_linear(event: &BaseEvent, range: &DateRange, today: NaiveDate) -> Vec<NaiveDate> {
        let (start, end) = event_span(event).unwrap();
        let until = event
            .recurring_until
            .as_deref()
            .and_then(parse_date)
            .unwrap_or_else(|| default_recurrence_horizon(today));
        let duration = Days::new((end - start).num_days() as u64);
        let cadence = Cadence::from_type(event.recurring_type.as_ref()).unwrap();

        let mut found = Vec::new();
        let mut n = 0;
        while let Some(cursor) = cadence.nth(start, n) {
            if cursor > until || cursor > iteration_limit(range) {
                break;
            }
            if range.overlaps(cursor, cursor + duration) {
                found.push(cursor);
            }
            n += 1;
        }
        found
    }

    #[test]
    fn test_non_recurring_event_found_on_its_day_only() {
        let events = vec![one_off("dentist", "2024-03-15", None)];
        let range = DateRange::for_view(ViewMode::Month, date(2024, 3, 1), WeekStart::Sunday);

        let expanded = expand_at(&events, &range, today());

        let on_day = occurrences_for_date(&expanded, date(2024, 3, 15));
        assert_eq!(on_day.len(), 1);
        assert_eq!(on_day[0].id, "dentist");
        assert_eq!(on_day[0].original_id, None);
        assert_eq!(on_day[0].event, events[0]);

        let later = date(2024, 3, 15) + Days::new(100);
        assert!(occurrences_for_date(&expanded, later).is_empty());
    }

    #[test]
    fn test_non_recurring_event_outside_range_is_dropped() {
        let events = vec![one_off("old", "2023-06-01", Some("2023-06-03"))];
        let range = DateRange::new(date(2024, 1, 1), date(2024, 1, 31));
        assert!(expand_at(&events, &range, today()).is_empty());
    }

    #[test]
    fn test_daily_recurrence_bounded_by_until() {
        let events = vec![recurring("run", "2024-01-01", None, "daily", Some("2024-01-05"))];
        let range = DateRange::new(date(2024, 1, 1), date(2024, 1, 31));

        let expanded = expand_at(&events, &range, today());

        assert_eq!(
            starts(&expanded),
            (1..=5).map(|d| date(2024, 1, d)).collect::<Vec<_>>()
        );
        for occ in &expanded {
            assert_eq!(occ.original_id.as_deref(), Some("run"));
            assert_eq!(occ.target_id(), "run");
            assert_ne!(occ.id, "run");
        }
        let ids: std::collections::HashSet<_> = expanded.iter().map(|o| o.id.as_str()).collect();
        assert_eq!(ids.len(), 5);
        assert_eq!(expanded[0].id, "run-20240101");
        assert_eq!(expanded[4].event.start_date, "2024-01-05");
    }

    #[test]
    fn test_until_is_inclusive_and_before_start_yields_nothing() {
        let range = DateRange::new(date(2024, 1, 1), date(2024, 1, 31));

        let events = vec![recurring("w", "2024-01-03", None, "weekly", Some("2024-01-17"))];
        assert_eq!(
            starts(&expand_at(&events, &range, today())),
            vec![date(2024, 1, 3), date(2024, 1, 10), date(2024, 1, 17)]
        );

        let events = vec![recurring("w", "2024-01-03", None, "weekly", Some("2024-01-02"))];
        assert!(expand_at(&events, &range, today()).is_empty());
    }

    #[test]
    fn test_multi_day_duration_preserved() {
        // Fri to Mon, three days apart
        let events = vec![recurring("trip", "2024-01-05", Some("2024-01-08"), "weekly", None)];
        let range = DateRange::for_view(ViewMode::Month, date(2024, 2, 1), WeekStart::Sunday);

        let expanded = expand_at(&events, &range, today());

        assert!(!expanded.is_empty());
        for occ in &expanded {
            assert_eq!(occ.duration_days(), 3);
            assert_eq!(occ.end_date, occ.start_date + Days::new(3));
            assert_eq!(occ.event.end_date, Some(occ.end_date.format("%Y-%m-%d").to_string()));
        }
    }

    #[test]
    fn test_occurrence_starting_before_range_is_kept() {
        // Saturday to Tuesday; the range opens on a Monday
        let events = vec![recurring("span", "2024-01-06", Some("2024-01-09"), "weekly", None)];
        let range = DateRange::new(date(2024, 1, 15), date(2024, 1, 15));

        let expanded = expand_at(&events, &range, today());

        assert_eq!(starts(&expanded), vec![date(2024, 1, 13)]);
        assert_eq!(occurrences_for_date(&expanded, date(2024, 1, 15)).len(), 1);
    }

    #[test]
    fn test_sort_by_start_time_with_missing_time_first() {
        let mut late = one_off("late", "2024-04-02", None);
        late.start_time = Some("09:00".to_string());
        let mut early = one_off("early", "2024-04-02", None);
        early.start_time = Some("07:30".to_string());
        let untimed = one_off("untimed", "2024-04-02", None);

        let range = DateRange::single_day(date(2024, 4, 2));
        let expanded = expand_at(&[late, early, untimed], &range, today());

        let ids: Vec<_> = expanded.iter().map(|o| o.id.as_str()).collect();
        assert_eq!(ids, vec!["untimed", "early", "late"]);
    }

    #[test]
    fn test_sort_is_stable_for_equal_times() {
        let events = vec![
            recurring("b", "2024-04-01", None, "daily", Some("2024-04-03")),
            one_off("a", "2024-04-02", None),
        ];
        let range = DateRange::new(date(2024, 4, 1), date(2024, 4, 3));

        let ids: Vec<_> = expand_at(&events, &range, today())
            .into_iter()
            .map(|o| o.id)
            .collect();
        assert_eq!(ids, vec!["b-20240401", "b-20240402", "b-20240403", "a"]);
    }

    #[test]
    fn test_event_across_month_boundary_in_both_month_views() {
        let events = vec![one_off("ski", "2024-01-30", Some("2024-02-02"))];

        for anchor in [date(2024, 1, 15), date(2024, 2, 15)] {
            for week_start in [WeekStart::Sunday, WeekStart::Monday] {
                let range = DateRange::for_view(ViewMode::Month, anchor, week_start);
                assert_eq!(expand_at(&events, &range, today()).len(), 1);
            }
        }

        let first_day = DateRange::single_day(date(2024, 1, 30));
        let last_day = DateRange::single_day(date(2024, 2, 2));
        assert_eq!(expand_at(&events, &first_day, today()).len(), 1);
        assert_eq!(expand_at(&events, &last_day, today()).len(), 1);
        assert!(expand_at(&events, &DateRange::single_day(date(2024, 2, 3)), today()).is_empty());
    }

    #[test]
    fn test_monthly_from_month_end_clamps_without_drift() {
        let events = vec![recurring("rent", "2024-01-31", None, "monthly", None)];
        let range = DateRange::new(date(2024, 2, 1), date(2024, 4, 30));

        assert_eq!(
            starts(&expand_at(&events, &range, today())),
            vec![date(2024, 2, 29), date(2024, 3, 31), date(2024, 4, 30)]
        );

        // Non-leap year
        let events = vec![recurring("rent", "2023-01-31", None, "monthly", None)];
        let range = DateRange::new(date(2023, 2, 1), date(2023, 3, 31));
        assert_eq!(
            starts(&expand_at(&events, &range, date(2023, 1, 1))),
            vec![date(2023, 2, 28), date(2023, 3, 31)]
        );
    }

    #[test]
    fn test_yearly_from_leap_day() {
        let events = vec![recurring("leap", "2024-02-29", None, "yearly", Some("2032-12-31"))];
        let range = DateRange::new(date(2024, 1, 1), date(2028, 12, 31));

        assert_eq!(
            starts(&expand_at(&events, &range, today())),
            vec![
                date(2024, 2, 29),
                date(2025, 2, 28),
                date(2026, 2, 28),
                date(2027, 2, 28),
                date(2028, 2, 29),
            ]
        );
    }

    #[test]
    fn test_default_horizon_ends_open_series() {
        let events = vec![recurring("daily", "2024-01-01", None, "daily", None)];
        let range = DateRange::new(date(2024, 12, 25), date(2025, 1, 10));

        let expanded = expand_at(&events, &range, today());

        assert_eq!(default_recurrence_horizon(today()), date(2025, 1, 1));
        assert_eq!(expanded.first().map(|o| o.start_date), Some(date(2024, 12, 25)));
        assert_eq!(expanded.last().map(|o| o.start_date), Some(date(2025, 1, 1)));
        assert_eq!(expanded.len(), 8);
    }

    #[test]
    fn test_view_far_from_series_start_uses_skip_ahead() {
        let events = vec![recurring("old", "1990-01-01", None, "daily", None)];
        let range = DateRange::new(date(2024, 6, 1), date(2024, 6, 30));

        let expanded = expand_at(&events, &range, today());

        assert_eq!(expanded.len(), 30);
        assert_eq!(expanded[0].id, "old-20240601");
    }

    #[test]
    fn test_skip_ahead_matches_linear_stepping() {
        let events = [
            recurring("d", "2023-03-10", Some("2023-03-12"), "daily", None),
            recurring("w", "2022-11-30", Some("2022-12-04"), "weekly", None),
            recurring("m", "2021-08-31", Some("2021-09-02"), "monthly", None),
            recurring("m2", "2023-12-15", None, "monthly", Some("2024-07-01")),
            recurring("y", "2012-02-29", Some("2012-03-01"), "yearly", None),
        ];
        let ranges = [
            DateRange::new(date(2024, 1, 1), date(2024, 1, 31)),
            DateRange::new(date(2024, 2, 25), date(2024, 3, 2)),
            DateRange::single_day(date(2024, 3, 1)),
            DateRange::new(date(2023, 12, 31), date(2024, 2, 3)),
            DateRange::new(date(2020, 1, 1), date(2024, 9, 1)),
        ];

        for event in &events {
            for range in &ranges {
                let fast = starts(&try_expand_event(event, range, today()).unwrap());
                assert_eq!(fast, expand_linear(event, range, today()), "{} over {range:?}", event.id);
            }
        }
    }

    #[test]
    fn test_unknown_cadence_stops_after_first_date() {
        let events = vec![
            recurring("odd", "2024-01-02", None, "fortnightly", None),
            recurring("odd-later", "2024-01-02", None, "fortnightly", None),
        ];
        let range = DateRange::new(date(2024, 1, 1), date(2024, 12, 31));

        let expanded = expand_at(&events[..1], &range, today());
        assert_eq!(starts(&expanded), vec![date(2024, 1, 2)]);
        assert_eq!(expanded[0].original_id.as_deref(), Some("odd"));

        let past_first = DateRange::new(date(2024, 1, 3), date(2024, 12, 31));
        assert!(expand_at(&events[1..], &past_first, today()).is_empty());
    }

    #[test]
    fn test_recurring_without_type_behaves_like_unknown() {
        let mut event = recurring("bare", "2024-01-02", None, "daily", None);
        event.recurring_type = None;
        let range = DateRange::new(date(2024, 1, 1), date(2024, 1, 31));

        assert_eq!(starts(&expand_at(&[event], &range, today())), vec![date(2024, 1, 2)]);
    }

    #[test]
    fn test_malformed_dates_skip_only_that_event() {
        let events = vec![
            one_off("bad-start", "someday", None),
            one_off("bad-end", "2024-01-10", Some("2024-13-01")),
            recurring("bad-until", "2024-01-10", None, "daily", Some("never")),
            one_off("good", "2024-01-10", None),
        ];
        let range = DateRange::new(date(2024, 1, 1), date(2024, 1, 31));

        let expanded = expand_at(&events, &range, today());
        let ids: Vec<_> = expanded.iter().map(|o| o.id.as_str()).collect();
        assert_eq!(ids, vec!["good"]);

        let err = try_expand_event(&events[2], &range, today()).unwrap_err();
        assert!(matches!(
            err,
            HubCalError::InvalidEventDate { field: "recurring_until", .. }
        ));
    }

    #[test]
    fn test_until_ignored_for_non_recurring_event() {
        let mut event = one_off("one", "2024-01-10", None);
        event.recurring_until = Some("garbage".to_string());
        let range = DateRange::new(date(2024, 1, 1), date(2024, 1, 31));

        assert_eq!(expand_at(&[event], &range, today()).len(), 1);
    }

    #[test]
    fn test_end_before_start_is_single_day() {
        let events = vec![recurring("rev", "2024-01-10", Some("2024-01-08"), "weekly", None)];
        let range = DateRange::new(date(2024, 1, 1), date(2024, 1, 20));

        let expanded = expand_at(&events, &range, today());
        assert_eq!(starts(&expanded), vec![date(2024, 1, 10), date(2024, 1, 17)]);
        assert!(expanded.iter().all(|o| o.duration_days() == 0));
    }

    #[test]
    fn test_datetime_strings_are_read_as_dates() {
        let events = vec![recurring(
            "iso",
            "2024-01-01T09:00:00.000Z",
            Some("2024-01-01T10:00:00.000Z"),
            "weekly",
            Some("2024-01-15T00:00:00.000Z"),
        )];
        let range = DateRange::new(date(2024, 1, 1), date(2024, 1, 31));

        assert_eq!(
            starts(&expand_at(&events, &range, today())),
            vec![date(2024, 1, 1), date(2024, 1, 8), date(2024, 1, 15)]
        );
    }

    #[test]
    fn test_empty_input() {
        let range = DateRange::single_day(today());
        assert!(expand_at(&[], &range, today()).is_empty());
    }

    #[test]
    fn test_iteration_limit_is_one_month_past_range() {
        let range = DateRange::new(date(2024, 1, 1), date(2024, 1, 31));
        assert_eq!(iteration_limit(&range), date(2024, 2, 29));
    }

    #[test]
    fn test_occurrence_id_format() {
        assert_eq!(occurrence_id("abc", date(2024, 7, 4)), "abc-20240704");

        let base = "0b9e6a2e-3c77-4f4e-9a51-6f1f0e1d2c3b";
        let id = occurrence_id(base, date(2024, 7, 4));
        assert_eq!(parse_occurrence_id(&id), Some((base, date(2024, 7, 4))));

        assert_eq!(parse_occurrence_id(base), None);
        assert_eq!(parse_occurrence_id("-20240704"), None);
        assert_eq!(parse_occurrence_id("abc-20241304"), None);
    }
}
