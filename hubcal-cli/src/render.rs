//! Terminal rendering for hubcal views.
//!
//! Extension traits add colored output to hubcal-core types using owo_colors.

use chrono::NaiveDate;
use hubcal_core::buckets::DayBuckets;
use hubcal_core::date_range::DateRange;
use hubcal_core::event::Occurrence;
use hubcal_core::view::ViewMode;
use owo_colors::OwoColorize;

/// Extension trait for TUI rendering with colors.
pub trait Render {
    fn render(&self) -> String;
}

impl Render for Occurrence {
    fn render(&self) -> String {
        let mut line = format!("{} {}", format_time(self), self.title());

        if let Some(location) = &self.event.location {
            line.push_str(&format!(" {}", format!("@ {location}").dimmed()));
        }
        if let Some(category) = &self.event.category {
            line.push_str(&format!(" {}", format!("#{category}").cyan()));
        }
        if self.is_synthetic() {
            line.push_str(&format!(" {}", "(repeats)".dimmed()));
        }

        line
    }
}

/// Render the occurrences of `range` grouped by day, skipping empty days.
pub fn render_agenda(occurrences: &[Occurrence], range: &DateRange, today: NaiveDate) -> String {
    let buckets = DayBuckets::new(occurrences, range);

    if buckets.is_empty() {
        return "No events found".dimmed().to_string();
    }

    let mut lines = Vec::new();
    for (day, on_day) in buckets.busy_days() {
        if !lines.is_empty() {
            lines.push(String::new());
        }
        lines.push(format_date_label(day, today).bold().to_string());

        for occurrence in on_day {
            let mut line = format!("  {}", occurrence.render());
            if let Some(progress) = span_progress(occurrence, day) {
                line.push_str(&format!(" {}", progress.dimmed()));
            }
            line.push_str(&format!(" {}", format!("[{}]", occurrence.id).dimmed()));
            lines.push(line);
        }
    }

    lines.join("\n")
}

/// Heading for a view, e.g. "January 2024" or "Week of Jan 7 2024".
pub fn render_view_title(mode: ViewMode, anchor: NaiveDate, range: &DateRange) -> String {
    let title = match mode {
        ViewMode::Month => anchor.format("%B %Y").to_string(),
        ViewMode::Week => format!("Week of {}", range.start.format("%b %-d %Y")),
        ViewMode::Day => anchor.format("%A, %B %-d %Y").to_string(),
    };
    title.bold().underline().to_string()
}

/// Format a date as a human-readable label (e.g. "Today", "Tomorrow", "Wed Feb 25")
fn format_date_label(date: NaiveDate, today: NaiveDate) -> String {
    let diff = (date - today).num_days();
    match diff {
        0 => "Today".to_string(),
        1 => "Tomorrow".to_string(),
        -1 => "Yesterday".to_string(),
        _ => date.format("%a %b %-d").to_string(),
    }
}

/// Format the time column of an occurrence (e.g. "15:00", "09:00-10:30" or "all-day")
fn format_time(occurrence: &Occurrence) -> String {
    match (occurrence.start_time(), occurrence.end_time()) {
        (Some(start), Some(end)) => format!("{:>11}", format!("{start}-{end}")),
        (Some(start), None) => format!("{start:>11}"),
        (None, _) => format!("{:>11}", "all-day"),
    }
}

/// "(day 2/3)" for a day inside a multi-day occurrence.
fn span_progress(occurrence: &Occurrence, day: NaiveDate) -> Option<String> {
    let total = occurrence.duration_days() + 1;
    if total == 1 {
        return None;
    }
    let current = (day - occurrence.start_date).num_days() + 1;
    Some(format!("(day {current}/{total})"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use hubcal_core::event::BaseEvent;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn occurrence(start_time: Option<&str>, end_time: Option<&str>) -> Occurrence {
        let mut event = BaseEvent::new("e1", "Offsite", "2024-05-06");
        event.start_time = start_time.map(str::to_string);
        event.end_time = end_time.map(str::to_string);
        Occurrence {
            id: "e1".to_string(),
            original_id: None,
            start_date: date(2024, 5, 6),
            end_date: date(2024, 5, 8),
            event,
        }
    }

    #[test]
    fn test_format_time() {
        assert_eq!(format_time(&occurrence(None, None)).trim(), "all-day");
        assert_eq!(format_time(&occurrence(Some("09:00"), None)).trim(), "09:00");
        assert_eq!(
            format_time(&occurrence(Some("09:00"), Some("10:30"))).trim(),
            "09:00-10:30"
        );
    }

    #[test]
    fn test_date_labels() {
        let today = date(2024, 2, 25);
        assert_eq!(format_date_label(today, today), "Today");
        assert_eq!(format_date_label(date(2024, 2, 26), today), "Tomorrow");
        assert_eq!(format_date_label(date(2024, 2, 28), today), "Wed Feb 28");
    }

    #[test]
    fn test_span_progress() {
        let occ = occurrence(None, None);
        assert_eq!(span_progress(&occ, date(2024, 5, 7)).as_deref(), Some("(day 2/3)"));

        let mut single = occ.clone();
        single.end_date = single.start_date;
        assert_eq!(span_progress(&single, date(2024, 5, 6)), None);
    }

    #[test]
    fn test_agenda_lists_each_day_of_a_span() {
        let occ = occurrence(None, None);
        let range = DateRange::new(date(2024, 5, 1), date(2024, 5, 31));

        let agenda = render_agenda(std::slice::from_ref(&occ), &range, date(2024, 1, 1));

        assert_eq!(agenda.matches("Offsite").count(), 3);
        assert!(agenda.contains("Mon May 6"));
        assert!(agenda.contains("(day 3/3)"));
    }

    #[test]
    fn test_single_day_agenda_shows_ids() {
        let mut occ = occurrence(Some("09:00"), None);
        occ.id = "e1-20240507".to_string();
        occ.original_id = Some("e1".to_string());
        let day = date(2024, 5, 7);

        let agenda = render_agenda(std::slice::from_ref(&occ), &DateRange::single_day(day), day);

        assert!(agenda.contains("Today"));
        assert!(agenda.contains("[e1-20240507]"));
        assert!(agenda.contains("(day 2/3)"));
    }

    #[test]
    fn test_empty_agenda() {
        let range = DateRange::single_day(date(2024, 5, 1));
        assert!(render_agenda(&[], &range, date(2024, 5, 1)).contains("No events found"));
    }
}
