//! Date and time arguments typed by the user.

use anyhow::Result;
use chrono::{NaiveDate, NaiveTime};
use hubcal_core::date_range::parse_date;
use hubcal_core::event::parse_time;

/// Expand common abbreviations that fuzzydate doesn't handle.
fn expand_abbreviations(input: &str) -> String {
    let abbrevs = [
        ("mon", "monday"),
        ("tue", "tuesday"),
        ("tues", "tuesday"),
        ("wed", "wednesday"),
        ("thu", "thursday"),
        ("thur", "thursday"),
        ("thurs", "thursday"),
        ("fri", "friday"),
        ("sat", "saturday"),
        ("sun", "sunday"),
        ("tmrw", "tomorrow"),
    ];

    input
        .to_lowercase()
        .split_whitespace()
        .map(|word| {
            abbrevs
                .iter()
                .find(|(abbr, _)| *abbr == word)
                .map_or(word, |(_, full)| *full)
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Parse a calendar date: YYYY-MM-DD first, then natural language
/// ("today", "next friday", "march 3").
pub fn parse_date_input(input: &str) -> Result<NaiveDate> {
    if let Some(date) = parse_date(input) {
        return Ok(date);
    }

    let expanded = expand_abbreviations(input);
    let dt = fuzzydate::parse(&expanded)
        .map_err(|_| anyhow::anyhow!("Could not parse date: \"{}\"", input))?;

    Ok(dt.date())
}

/// Parse a time of day (HH:MM) and return it normalized.
pub fn parse_time_input(input: &str) -> Result<String> {
    let time: NaiveTime = parse_time(input)
        .ok_or_else(|| anyhow::anyhow!("Invalid time \"{}\". Expected HH:MM", input))?;

    Ok(time.format("%H:%M").to_string())
}

/// Storage form of a date.
pub fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}
