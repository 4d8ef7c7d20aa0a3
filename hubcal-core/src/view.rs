//! Calendar view parameters supplied by the view layer.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Duration, Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::HubCalError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    Month,
    Week,
    Day,
}

/// Direction to move a view's anchor date
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Previous,
    Next,
}

impl ViewMode {
    /// Move `anchor` by one unit of this view (a month, a week or a day).
    /// Month steps clamp to the last day of shorter months.
    pub fn step(self, anchor: NaiveDate, step: Step) -> NaiveDate {
        let moved = match (self, step) {
            (ViewMode::Month, Step::Next) => anchor.checked_add_months(Months::new(1)),
            (ViewMode::Month, Step::Previous) => anchor.checked_sub_months(Months::new(1)),
            (ViewMode::Week, Step::Next) => anchor.checked_add_signed(Duration::weeks(1)),
            (ViewMode::Week, Step::Previous) => anchor.checked_sub_signed(Duration::weeks(1)),
            (ViewMode::Day, Step::Next) => anchor.succ_opt(),
            (ViewMode::Day, Step::Previous) => anchor.pred_opt(),
        };
        moved.unwrap_or(anchor)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ViewMode::Month => "month",
            ViewMode::Week => "week",
            ViewMode::Day => "day",
        }
    }
}

impl FromStr for ViewMode {
    type Err = HubCalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "month" => Ok(ViewMode::Month),
            "week" => Ok(ViewMode::Week),
            "day" => Ok(ViewMode::Day),
            other => Err(HubCalError::Config(format!(
                "Unknown view mode '{other}'. Expected month, week or day"
            ))),
        }
    }
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// First day of the week in week and month views
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeekStart {
    #[default]
    Sunday,
    Monday,
}

impl WeekStart {
    pub fn start_of_week(self, date: NaiveDate) -> NaiveDate {
        let offset = match self {
            WeekStart::Sunday => date.weekday().num_days_from_sunday(),
            WeekStart::Monday => date.weekday().num_days_from_monday(),
        };
        date - Duration::days(i64::from(offset))
    }

    pub fn end_of_week(self, date: NaiveDate) -> NaiveDate {
        self.start_of_week(date) + Duration::days(6)
    }
}

impl FromStr for WeekStart {
    type Err = HubCalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sunday" => Ok(WeekStart::Sunday),
            "monday" => Ok(WeekStart::Monday),
            other => Err(HubCalError::Config(format!(
                "Unknown week start '{other}'. Expected sunday or monday"
            ))),
        }
    }
}

impl fmt::Display for WeekStart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            WeekStart::Sunday => "sunday",
            WeekStart::Monday => "monday",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_step_month_clamps() {
        assert_eq!(ViewMode::Month.step(date(2024, 1, 31), Step::Next), date(2024, 2, 29));
        assert_eq!(ViewMode::Month.step(date(2024, 3, 31), Step::Previous), date(2024, 2, 29));
        assert_eq!(ViewMode::Month.step(date(2024, 12, 15), Step::Next), date(2025, 1, 15));
    }

    #[test]
    fn test_step_week_and_day() {
        assert_eq!(ViewMode::Week.step(date(2024, 3, 1), Step::Next), date(2024, 3, 8));
        assert_eq!(ViewMode::Week.step(date(2024, 3, 1), Step::Previous), date(2024, 2, 23));
        assert_eq!(ViewMode::Day.step(date(2024, 3, 1), Step::Previous), date(2024, 2, 29));
        assert_eq!(ViewMode::Day.step(date(2024, 12, 31), Step::Next), date(2025, 1, 1));
    }

    #[test]
    fn test_view_mode_from_str() {
        assert_eq!("Week".parse::<ViewMode>().unwrap(), ViewMode::Week);
        assert_eq!(" day".parse::<ViewMode>().unwrap(), ViewMode::Day);
        assert!("year".parse::<ViewMode>().is_err());
    }

    #[test]
    fn test_week_start_from_str() {
        assert_eq!("Monday".parse::<WeekStart>().unwrap(), WeekStart::Monday);
        assert_eq!(WeekStart::Sunday.to_string(), "sunday");
        assert!("friday".parse::<WeekStart>().is_err());
    }

    #[test]
    fn test_week_bounds() {
        // 2024-03-17 is a Sunday
        let sunday = date(2024, 3, 17);
        assert_eq!(WeekStart::Sunday.start_of_week(sunday), sunday);
        assert_eq!(WeekStart::Monday.start_of_week(sunday), date(2024, 3, 11));
        assert_eq!(WeekStart::Monday.end_of_week(sunday), sunday);
    }
}
