// ABOUTME: Google Calendar v3 REST client implementing the calendar gateway
// ABOUTME: Lists expanded single events with paging and inserts timed events on the primary calendar

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{CalendarError, CalendarResult};
use crate::gateway::CalendarGateway;
use crate::types::{CreatedEvent, Event, EventTime, NewEvent};

/// Base URL for Google Calendar API v3.
pub const CALENDAR_API_BASE: &str = "https://www.googleapis.com/calendar/v3";

pub const DEFAULT_TIME_ZONE: &str = "Asia/Kolkata";

const PRIMARY_CALENDAR: &str = "primary";
const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone)]
pub struct GoogleCalendarClient {
    http_client: Client,
    base_url: String,
    time_zone: String,
}

impl GoogleCalendarClient {
    pub fn new(time_zone: impl Into<String>) -> CalendarResult<Self> {
        Self::with_base_url(CALENDAR_API_BASE, time_zone)
    }

    /// Point the client at another API root (used by tests).
    pub fn with_base_url(
        base_url: impl Into<String>,
        time_zone: impl Into<String>,
    ) -> CalendarResult<Self> {
        let http_client = Client::builder()
            .timeout(HTTP_TIMEOUT)
            .build()
            .map_err(|e| CalendarError::Configuration(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            time_zone: time_zone.into(),
        })
    }

    pub fn time_zone(&self) -> &str {
        &self.time_zone
    }

    fn events_url(&self) -> String {
        format!(
            "{}/calendars/{}/events",
            self.base_url,
            urlencoding::encode(PRIMARY_CALENDAR)
        )
    }

    async fn list_events_page(
        &self,
        access_token: &str,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
        page_token: Option<&str>,
    ) -> CalendarResult<EventListResponse> {
        let mut request = self
            .http_client
            .get(self.events_url())
            .bearer_auth(access_token)
            .query(&[
                ("timeMin", from.to_rfc3339_opts(SecondsFormat::Secs, true)),
                ("timeMax", to.to_rfc3339_opts(SecondsFormat::Secs, true)),
                ("singleEvents", "true".to_string()),
                ("orderBy", "startTime".to_string()),
            ]);

        if let Some(token) = page_token {
            request = request.query(&[("pageToken", token)]);
        }

        let response = ensure_success(request.send().await?).await?;
        let body = response
            .text()
            .await
            .map_err(|e| CalendarError::network(format!("failed to read response: {}", e)))?;

        serde_json::from_str(&body)
            .map_err(|e| CalendarError::invalid_response(format!("failed to parse response: {}", e)))
    }
}

#[async_trait]
impl CalendarGateway for GoogleCalendarClient {
    async fn list_upcoming(
        &self,
        access_token: &str,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> CalendarResult<Vec<Event>> {
        let mut events = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let page = self
                .list_events_page(access_token, from, to, page_token.as_deref())
                .await?;

            events.extend(
                page.items
                    .into_iter()
                    .filter_map(convert_event)
                    .filter(|e| e.start.starts_within(from, to)),
            );

            match page.next_page_token {
                Some(token) if !token.is_empty() => page_token = Some(token),
                _ => break,
            }
        }

        debug!(count = events.len(), "Fetched upcoming events");
        Ok(events)
    }

    async fn create_event(
        &self,
        access_token: &str,
        event: NewEvent,
    ) -> CalendarResult<CreatedEvent> {
        let body = InsertEventRequest {
            summary: &event.title,
            description: &event.description,
            start: InsertEventTime {
                date_time: event.start.to_rfc3339(),
                time_zone: &self.time_zone,
            },
            end: InsertEventTime {
                date_time: event.end.to_rfc3339(),
                time_zone: &self.time_zone,
            },
            attendees: event
                .attendees
                .iter()
                .map(|email| InsertAttendee { email })
                .collect(),
        };

        let response = self
            .http_client
            .post(self.events_url())
            .bearer_auth(access_token)
            .json(&body)
            .send()
            .await?;
        let response = ensure_success(response).await?;

        let created: InsertEventResponse = response
            .json()
            .await
            .map_err(|e| CalendarError::invalid_response(format!("failed to parse created event: {}", e)))?;

        debug!(event_id = %created.id, attendees = event.attendees.len(), "Created calendar event");
        Ok(CreatedEvent {
            id: created.id,
            link: created.html_link.unwrap_or_default(),
        })
    }
}

/// Turn a non-2xx response into `Upstream` with Google's message.
async fn ensure_success(response: Response) -> CalendarResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ApiErrorResponse>(&body)
        .map(|e| e.error.message)
        .unwrap_or_else(|_| {
            if body.trim().is_empty() {
                status
                    .canonical_reason()
                    .unwrap_or("calendar API error")
                    .to_string()
            } else {
                body
            }
        });

    warn!(status = %status, "Calendar API rejected request");
    Err(CalendarError::upstream(status.as_u16(), message))
}

fn convert_event(event: ApiEvent) -> Option<Event> {
    if event.status.as_deref() == Some("cancelled") {
        return None;
    }

    let id = event.id?;
    let start = convert_time(&event.start).or_else(|| {
        warn!(event_id = %id, "event has no usable start time");
        None
    })?;
    let end = convert_time(&event.end).unwrap_or_else(|| start.clone());

    Some(Event {
        id,
        title: event.summary.unwrap_or_default(),
        description: event.description.unwrap_or_default(),
        start,
        end,
        link: event.html_link.unwrap_or_default(),
        attendees: event
            .attendees
            .unwrap_or_default()
            .into_iter()
            .filter_map(|a| a.email)
            .collect(),
    })
}

fn convert_time(time: &ApiEventTime) -> Option<EventTime> {
    match (&time.date_time, &time.date) {
        (Some(dt), _) => DateTime::parse_from_rfc3339(dt)
            .map_err(|e| warn!("failed to parse event time: {}", e))
            .ok()
            .map(EventTime::DateTime),
        (None, Some(date)) => NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .map_err(|e| warn!("failed to parse event date: {}", e))
            .ok()
            .map(EventTime::AllDay),
        (None, None) => None,
    }
}

/// Response from the events.list endpoint.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EventListResponse {
    #[serde(default)]
    items: Vec<ApiEvent>,
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiEvent {
    id: Option<String>,
    summary: Option<String>,
    description: Option<String>,
    #[serde(default)]
    start: ApiEventTime,
    #[serde(default)]
    end: ApiEventTime,
    html_link: Option<String>,
    status: Option<String>,
    attendees: Option<Vec<ApiAttendee>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiEventTime {
    date_time: Option<String>,
    date: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiAttendee {
    email: Option<String>,
}

#[derive(Debug, Serialize)]
struct InsertEventRequest<'a> {
    summary: &'a str,
    description: &'a str,
    start: InsertEventTime<'a>,
    end: InsertEventTime<'a>,
    attendees: Vec<InsertAttendee<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct InsertEventTime<'a> {
    date_time: String,
    time_zone: &'a str,
}

#[derive(Debug, Serialize)]
struct InsertAttendee<'a> {
    email: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InsertEventResponse {
    id: String,
    html_link: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorResponse {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}
