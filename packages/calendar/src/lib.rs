// ABOUTME: Calgate calendar gateway: list upcoming and create events on a user's primary Google calendar
// ABOUTME: Callers supply the user's provider access token on every call

pub mod error;
pub mod gateway;
pub mod google;
pub mod types;

pub use error::{CalendarError, CalendarResult};
pub use gateway::CalendarGateway;
pub use google::{GoogleCalendarClient, CALENDAR_API_BASE, DEFAULT_TIME_ZONE};
pub use types::{
    CreatedEvent, Event, EventTime, NewEvent, DATETIME_DISPLAY_FORMAT, DATE_DISPLAY_FORMAT,
};
