use anyhow::Result;
use chrono::{Duration, Local, NaiveDate};
use hubcal_core::date_range::parse_date;
use hubcal_core::event::BaseEvent;
use hubcal_core::store::{EventPatch, EventStore, resolve_target_id};
use owo_colors::OwoColorize;

use super::fields::{UpdateFields, check_event_dates};
use crate::dates::format_date;

/// Update an event. An occurrence id is resolved to its base event, so the
/// change applies to the whole series.
pub fn run(store: &mut dyn EventStore, id: &str, fields: UpdateFields) -> Result<()> {
    let patch = require_changes(fields.into_patch()?)?;

    let target = resolve_target_id(store, id, Local::now().date_naive())?;
    if target != id {
        println!(
            "{}",
            format!("  {id} is an occurrence of {target}; updating the whole series").dimmed()
        );
    }

    let stored = store.get(&target)?;
    let patch = fit_patch(&stored, patch)?;

    let event = store.update(&target, patch)?;
    println!("{}", format!("  Updated: {}", event.title).yellow());

    Ok(())
}

fn require_changes(patch: EventPatch) -> Result<EventPatch> {
    if patch.is_empty() {
        anyhow::bail!("Nothing to update. Pass at least one field, e.g. --title");
    }
    Ok(patch)
}

/// Adjust `patch` to `stored` and check the event it would produce.
///
/// Moving the start of a multi-day event without a new end keeps its length.
fn fit_patch(stored: &BaseEvent, mut patch: EventPatch) -> Result<EventPatch> {
    if let Some(end) = shifted_end(stored, &patch) {
        patch.end_date = Some(Some(format_date(end)));
    }

    let mut updated = stored.clone();
    patch.clone().apply(&mut updated);

    let start = parse_date(&updated.start_date).ok_or_else(|| {
        anyhow::anyhow!(
            "Event {} has an unreadable start date \"{}\"",
            updated.id,
            updated.start_date
        )
    })?;
    check_event_dates(
        start,
        updated.end_date.as_deref().and_then(parse_date),
        updated.recurring_until.as_deref().and_then(parse_date),
        updated.is_recurring,
    )?;

    Ok(patch)
}

/// New end date when the patch moves the start but leaves the end alone.
fn shifted_end(stored: &BaseEvent, patch: &EventPatch) -> Option<NaiveDate> {
    if patch.end_date.is_some() {
        return None;
    }

    let new_start = parse_date(patch.start_date.as_deref()?)?;
    let old_start = parse_date(&stored.start_date)?;
    let old_end = parse_date(stored.end_date.as_deref()?)?;

    Some(new_start + (old_end - old_start).max(Duration::zero()))
}
