use anyhow::Result;
use chrono::Local;
use hubcal_core::config::HubCalConfig;
use hubcal_core::date_range::DateRange;
use hubcal_core::recurrence::{expand, expand_at, occurrences_for_date};
use hubcal_core::store::EventStore;
use hubcal_core::view::{Step, ViewMode};

use crate::dates::parse_date_input;
use crate::render::{render_agenda, render_view_title};

/// Print the month, week or day view around `date` (default today).
pub fn run(
    store: &dyn EventStore,
    config: &HubCalConfig,
    mode: Option<ViewMode>,
    date: Option<&str>,
    step: Option<Step>,
) -> Result<()> {
    let today = Local::now().date_naive();
    let mode = mode.unwrap_or(config.default_view);

    let mut anchor = match date {
        Some(s) => parse_date_input(s)?,
        None => today,
    };
    if let Some(step) = step {
        anchor = mode.step(anchor, step);
    }

    let range = DateRange::for_view(mode, anchor, config.week_start);
    let events = store.list(&config.owner)?;
    let occurrences = expand_at(&events, &range, today);

    println!("{}", render_view_title(mode, anchor, &range));
    println!();
    println!("{}", render_agenda(&occurrences, &range, today));

    Ok(())
}

/// Print the occurrences of a single day.
pub fn run_day(store: &dyn EventStore, config: &HubCalConfig, date: Option<&str>) -> Result<()> {
    let today = Local::now().date_naive();
    let day = match date {
        Some(s) => parse_date_input(s)?,
        None => today,
    };

    let range = DateRange::single_day(day);
    let events = store.list(&config.owner)?;
    let occurrences = expand_at(&events, &range, today);

    println!("{}", render_view_title(ViewMode::Day, day, &range));
    println!();

    let on_day: Vec<_> = occurrences_for_date(&occurrences, day)
        .into_iter()
        .cloned()
        .collect();
    println!("{}", render_agenda(&on_day, &range, today));

    Ok(())
}

/// Print an agenda for an explicit date range.
pub fn run_range(
    store: &dyn EventStore,
    config: &HubCalConfig,
    from: &str,
    to: Option<&str>,
) -> Result<()> {
    let range = DateRange::from_args(from, to)?;
    let events = store.list(&config.owner)?;
    let occurrences = expand(&events, &range);

    println!("{}", render_agenda(&occurrences, &range, Local::now().date_naive()));

    Ok(())
}
