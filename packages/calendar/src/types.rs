// ABOUTME: Calendar event types shared by the gateway trait and its Google implementation
// ABOUTME: Includes the display formatting used by the upcoming-meetings response

use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use serde::Serialize;

/// Display format for timed events, e.g. `Jan 02, 2026 03:04 PM`
pub const DATETIME_DISPLAY_FORMAT: &str = "%b %d, %Y %I:%M %p";

/// Display format for date-only values, e.g. `Jan 02, 2026`
pub const DATE_DISPLAY_FORMAT: &str = "%b %d, %Y";

/// Start or end of an event: timed (with the offset Google reported) or all-day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventTime {
    DateTime(DateTime<FixedOffset>),
    AllDay(NaiveDate),
}

impl EventTime {
    /// Human-readable form. All-day values keep the ISO date with an `(All day)` suffix.
    pub fn display(&self) -> String {
        match self {
            Self::DateTime(dt) => dt.format(DATETIME_DISPLAY_FORMAT).to_string(),
            Self::AllDay(date) => format!("{} (All day)", date.format("%Y-%m-%d")),
        }
    }

    /// Whether this start falls in `[from, to)`. All-day values compare by calendar date.
    pub fn starts_within(&self, from: DateTime<Utc>, to: DateTime<Utc>) -> bool {
        match self {
            Self::DateTime(dt) => {
                let instant = dt.with_timezone(&Utc);
                instant >= from && instant < to
            }
            Self::AllDay(date) => *date >= from.date_naive() && *date < to.date_naive(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub id: String,
    pub title: String,
    pub description: String,
    pub start: EventTime,
    pub end: EventTime,
    pub link: String,
    pub attendees: Vec<String>,
}

/// A single timed event to create on the primary calendar
#[derive(Debug, Clone)]
pub struct NewEvent {
    pub title: String,
    pub description: String,
    pub start: DateTime<FixedOffset>,
    pub end: DateTime<FixedOffset>,
    pub attendees: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreatedEvent {
    pub id: String,
    pub link: String,
}
