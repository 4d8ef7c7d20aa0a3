//! Event fields shared by `add` and `update`.

use anyhow::Result;
use chrono::NaiveDate;
use clap::{Args, ValueEnum};
use hubcal_core::event::{RecurringType, Reminder};
use hubcal_core::store::EventPatch;

use crate::dates::{format_date, parse_date_input, parse_time_input};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Repeat {
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl From<Repeat> for RecurringType {
    fn from(repeat: Repeat) -> Self {
        match repeat {
            Repeat::Daily => RecurringType::Daily,
            Repeat::Weekly => RecurringType::Weekly,
            Repeat::Monthly => RecurringType::Monthly,
            Repeat::Yearly => RecurringType::Yearly,
        }
    }
}

/// Optional field that `update --clear` can remove
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ClearField {
    End,
    StartTime,
    EndTime,
    Until,
    Location,
    Category,
    Color,
    Description,
    Remind,
}

#[derive(Args, Debug, Default)]
pub struct EventDetails {
    /// Last day of the event (YYYY-MM-DD or natural language)
    #[arg(short, long)]
    pub end: Option<String>,

    /// Start time (HH:MM); events without one are all-day
    #[arg(long)]
    pub start_time: Option<String>,

    /// End time (HH:MM)
    #[arg(long)]
    pub end_time: Option<String>,

    /// Repeat the event
    #[arg(short, long, value_enum)]
    pub repeat: Option<Repeat>,

    /// Last day a repeat may start on (defaults to one year from today)
    #[arg(long)]
    pub until: Option<String>,

    #[arg(short, long)]
    pub location: Option<String>,

    #[arg(long)]
    pub category: Option<String>,

    #[arg(long)]
    pub color: Option<String>,

    #[arg(long)]
    pub description: Option<String>,

    /// Remind this many minutes before the start
    #[arg(long)]
    pub remind: Option<u32>,
}

/// Validated `EventDetails`.
#[derive(Debug, Default)]
pub struct ParsedDetails {
    pub end: Option<NaiveDate>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub recurring_type: Option<RecurringType>,
    pub until: Option<NaiveDate>,
    pub location: Option<String>,
    pub category: Option<String>,
    pub color: Option<String>,
    pub description: Option<String>,
    pub reminder: Option<Reminder>,
}

impl EventDetails {
    pub fn parse(self) -> Result<ParsedDetails> {
        Ok(ParsedDetails {
            end: self.end.as_deref().map(parse_date_input).transpose()?,
            start_time: self.start_time.as_deref().map(parse_time_input).transpose()?,
            end_time: self.end_time.as_deref().map(parse_time_input).transpose()?,
            recurring_type: self.repeat.map(RecurringType::from),
            until: self.until.as_deref().map(parse_date_input).transpose()?,
            location: self.location,
            category: self.category,
            color: self.color,
            description: self.description,
            reminder: self.remind.map(|minutes_before| Reminder {
                enabled: true,
                minutes_before,
            }),
        })
    }
}

/// Date rules a stored event must satisfy, whether added or updated.
pub fn check_event_dates(
    start: NaiveDate,
    end: Option<NaiveDate>,
    until: Option<NaiveDate>,
    repeats: bool,
) -> Result<()> {
    if end.is_some_and(|end| end < start) {
        anyhow::bail!("End date is before start date {}", start);
    }
    if until.is_some() && !repeats {
        anyhow::bail!("--until only applies to repeating events; add --repeat");
    }

    Ok(())
}

#[derive(Args, Debug, Default)]
pub struct UpdateFields {
    #[arg(short, long)]
    pub title: Option<String>,

    /// New first day of the event (moves a whole series)
    #[arg(short, long)]
    pub start: Option<String>,

    #[command(flatten)]
    pub details: EventDetails,

    /// Stop the event from repeating
    #[arg(long, conflicts_with_all = ["repeat", "until"])]
    pub no_repeat: bool,

    /// Remove a field (may be given more than once)
    #[arg(long, value_enum)]
    pub clear: Vec<ClearField>,
}

impl UpdateFields {
    pub fn into_patch(self) -> Result<EventPatch> {
        let mut patch = EventPatch {
            title: self.title,
            start_date: self
                .start
                .as_deref()
                .map(parse_date_input)
                .transpose()?
                .map(format_date),
            ..Default::default()
        };

        let details = self.details.parse()?;
        patch.end_date = details.end.map(|d| Some(format_date(d)));
        if let Some(time) = details.start_time {
            patch.start_time = Some(Some(time));
            patch.all_day = Some(false);
        }
        patch.end_time = details.end_time.map(Some);
        if let Some(recurring_type) = details.recurring_type {
            patch.is_recurring = Some(true);
            patch.recurring_type = Some(Some(recurring_type));
        }
        patch.recurring_until = details.until.map(|d| Some(format_date(d)));
        patch.location = details.location.map(Some);
        patch.category = details.category.map(Some);
        patch.color = details.color.map(Some);
        patch.description = details.description.map(Some);
        patch.reminder = details.reminder.map(Some);

        if self.no_repeat {
            patch.is_recurring = Some(false);
            patch.recurring_type = Some(None);
            patch.recurring_until = Some(None);
        }

        for field in self.clear {
            match field {
                ClearField::End => patch.end_date = Some(None),
                ClearField::StartTime => {
                    patch.start_time = Some(None);
                    patch.all_day = Some(true);
                }
                ClearField::EndTime => patch.end_time = Some(None),
                ClearField::Until => patch.recurring_until = Some(None),
                ClearField::Location => patch.location = Some(None),
                ClearField::Category => patch.category = Some(None),
                ClearField::Color => patch.color = Some(None),
                ClearField::Description => patch.description = Some(None),
                ClearField::Remind => patch.reminder = Some(None),
            }
        }

        Ok(patch)
    }
}
