use anyhow::Result;
use chrono::Local;
use hubcal_core::store::{EventStore, resolve_target_id};
use owo_colors::OwoColorize;

/// Delete an event. An occurrence id deletes the whole series.
pub fn run(store: &mut dyn EventStore, id: &str) -> Result<()> {
    let target = resolve_target_id(store, id, Local::now().date_naive())?;
    let event = store.get(&target)?;

    store.delete(&target)?;

    if event.is_recurring {
        println!("{}", format!("  Deleted series: {}", event.title).red());
    } else {
        println!("{}", format!("  Deleted: {}", event.title).red());
    }

    Ok(())
}
