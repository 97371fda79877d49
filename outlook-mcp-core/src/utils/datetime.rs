//! Date parsing, range restriction and display helpers.
//!
//! Outlook reports item times in the local time zone of the profile, so every
//! timestamp handled here is a `NaiveDateTime`.

use chrono::{Datelike, Days, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

/// Accepted date format for `since` / `until`.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parses a `YYYY-MM-DD` date argument.
pub fn parse_date(field: &str, value: &str) -> CoreResult<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).map_err(|_| {
        CoreError::InvalidInput(format!("{field} must be a date in YYYY-MM-DD format, got '{value}'"))
    })
}

/// Renders a date in the argument format.
#[must_use]
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Parses an optional date argument, treating an empty string as absent.
pub fn parse_optional_date(field: &str, value: Option<&str>) -> CoreResult<Option<NaiveDate>> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(v) => parse_date(field, v).map(Some),
    }
}

/// Date restriction applied alongside the text query.
///
/// `since` is inclusive from midnight. `until` is inclusive of the whole
/// calendar day, i.e. exclusive at the following midnight.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub since: Option<NaiveDate>,
    pub until: Option<NaiveDate>,
}

impl DateRange {
    /// Builds a range, rejecting `since` after `until`.
    pub fn new(since: Option<NaiveDate>, until: Option<NaiveDate>) -> CoreResult<Self> {
        if let (Some(s), Some(u)) = (since, until) {
            if s > u {
                return Err(CoreError::InvalidInput(format!(
                    "since ({s}) must not be after until ({u})"
                )));
            }
        }
        Ok(Self { since, until })
    }

    /// Whether any bound is set.
    #[must_use]
    pub fn is_bounded(&self) -> bool {
        self.since.is_some() || self.until.is_some()
    }

    /// Tightens the lower bound to `today - days`.
    #[must_use]
    pub fn with_days_back(self, days: u32, today: NaiveDate) -> Self {
        let start = today
            .checked_sub_days(Days::new(u64::from(days)))
            .unwrap_or(NaiveDate::MIN);
        let since = match self.since {
            Some(s) if s > start => s,
            _ => start,
        };
        Self {
            since: Some(since),
            until: self.until,
        }
    }

    /// Tests a timestamp against both bounds.
    #[must_use]
    pub fn contains(&self, at: NaiveDateTime) -> bool {
        let day = at.date();
        self.since.is_none_or(|s| day >= s) && self.until.is_none_or(|u| day <= u)
    }

    /// First instant *after* the range, if bounded above.
    #[must_use]
    pub fn exclusive_end(&self) -> Option<NaiveDateTime> {
        self.until
            .and_then(|u| u.checked_add_days(Days::new(1)))
            .and_then(|d| d.and_hms_opt(0, 0, 0))
    }
}

/// Compact display: `HH:MM` today, `Mon DD` this year, `Mon DD YYYY` otherwise.
#[must_use]
pub fn format_compact(at: NaiveDateTime, now: NaiveDateTime) -> String {
    if at.date() == now.date() {
        at.format("%H:%M").to_string()
    } else if at.year() == now.year() {
        at.format("%b %d").to_string()
    } else {
        at.format("%b %d %Y").to_string()
    }
}

/// Short numeric display used by filter results.
#[must_use]
pub fn format_short(at: NaiveDateTime, now: NaiveDateTime) -> String {
    if at.date() == now.date() {
        at.format("%m/%d %H:%M").to_string()
    } else if at.year() == now.year() {
        at.format("%m/%d").to_string()
    } else {
        at.format("%Y-%m-%d").to_string()
    }
}

/// Full timestamp used by item detail output.
#[must_use]
pub fn format_full(at: NaiveDateTime) -> String {
    at.format("%Y-%m-%d %H:%M:%S").to_string()
}
