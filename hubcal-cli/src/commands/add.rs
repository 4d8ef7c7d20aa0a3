use anyhow::Result;
use hubcal_core::store::{EventStore, NewEvent};
use owo_colors::OwoColorize;

use super::fields::{EventDetails, check_event_dates};
use crate::dates::{format_date, parse_date_input};

pub fn run(
    store: &mut dyn EventStore,
    owner: &str,
    title: String,
    start: &str,
    details: EventDetails,
) -> Result<()> {
    let new = build_event(owner, title, start, details)?;
    let event = store.create(new)?;

    let repeat = event
        .recurring_type
        .as_ref()
        .map(|t| format!(" (repeats {t})"))
        .unwrap_or_default();
    println!("{}{}", format!("  Created: {}", event.title).green(), repeat.dimmed());
    println!("  {}", event.id.dimmed());

    Ok(())
}

fn build_event(owner: &str, title: String, start: &str, details: EventDetails) -> Result<NewEvent> {
    let start = parse_date_input(start)?;
    let details = details.parse()?;

    check_event_dates(
        start,
        details.end,
        details.until,
        details.recurring_type.is_some(),
    )?;

    let mut new = NewEvent::new(owner, title, format_date(start));
    new.end_date = details.end.map(format_date);
    new.all_day = details.start_time.is_none();
    new.start_time = details.start_time;
    new.end_time = details.end_time;
    new.location = details.location;
    new.category = details.category;
    new.color = details.color;
    new.description = details.description;
    new.reminder = details.reminder;
    if let Some(recurring_type) = details.recurring_type {
        new = new.repeating(recurring_type, details.until.map(format_date));
    }

    Ok(new)
}
