// ABOUTME: Protected meeting endpoints backed by the calendar gateway
// ABOUTME: Create a meeting and list the upcoming window, using the provider token from the credential

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use calgate_calendar::{Event, NewEvent, DATE_DISPLAY_FORMAT};

use crate::error::{ApiResult, AppError};
use crate::middleware::CurrentCredential;
use crate::state::AppState;

pub const MEETING_CREATED_MESSAGE: &str = "Meeting created successfully!";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMeetingRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub attendees: Vec<String>,
    pub start_time: String,
    pub end_time: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMeetingResponse {
    pub message: &'static str,
    pub event_id: String,
    pub link: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MeetingView {
    pub id: String,
    pub title: String,
    pub description: String,
    pub start_time: String,
    pub end_time: String,
    pub link: String,
    pub attendees: Vec<String>,
}

impl From<Event> for MeetingView {
    fn from(event: Event) -> Self {
        Self {
            start_time: event.start.display(),
            end_time: event.end.display(),
            id: event.id,
            title: event.title,
            description: event.description,
            link: event.link,
            attendees: event.attendees,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct Period {
    pub from: String,
    pub to: String,
}

#[derive(Debug, Serialize)]
pub struct UpcomingMeetingsResponse {
    pub events: Vec<MeetingView>,
    pub period: Period,
}

fn parse_time(field: &str, value: &str) -> ApiResult<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(value.trim()).map_err(|_| {
        AppError::validation(format!("{} must be an RFC 3339 timestamp", field))
    })
}

pub async fn create_meeting(
    State(state): State<AppState>,
    credential: CurrentCredential,
    payload: Result<Json<CreateMeetingRequest>, JsonRejection>,
) -> ApiResult<Json<CreateMeetingResponse>> {
    let Json(request) =
        payload.map_err(|rejection| AppError::validation(rejection.body_text()))?;

    let start = parse_time("startTime", &request.start_time)?;
    let end = parse_time("endTime", &request.end_time)?;
    let attendees: Vec<String> = request
        .attendees
        .into_iter()
        .map(|a| a.trim().to_string())
        .filter(|a| !a.is_empty())
        .collect();

    info!(
        user_id = %credential.user_id(),
        attendees = attendees.len(),
        "Creating meeting"
    );

    let created = state
        .calendar
        .create_event(
            credential.provider_access_token(),
            NewEvent {
                title: request.title,
                description: request.description,
                start,
                end,
                attendees,
            },
        )
        .await?;

    Ok(Json(CreateMeetingResponse {
        message: MEETING_CREATED_MESSAGE,
        event_id: created.id,
        link: created.link,
    }))
}

pub async fn upcoming_meetings(
    State(state): State<AppState>,
    credential: CurrentCredential,
) -> ApiResult<Json<UpcomingMeetingsResponse>> {
    let from = Utc::now();
    let to = from
        .checked_add_signed(state.upcoming_window)
        .ok_or_else(|| AppError::config("upcoming meetings window is out of range"))?;

    let events = state
        .calendar
        .list_upcoming(credential.provider_access_token(), from, to)
        .await?;

    info!(
        user_id = %credential.user_id(),
        count = events.len(),
        "Listed upcoming meetings"
    );

    Ok(Json(UpcomingMeetingsResponse {
        events: events.into_iter().map(MeetingView::from).collect(),
        period: Period {
            from: from.format(DATE_DISPLAY_FORMAT).to_string(),
            to: to.format(DATE_DISPLAY_FORMAT).to_string(),
        },
    }))
}
