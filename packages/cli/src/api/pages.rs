// ABOUTME: Static HTML pages: landing page and the meeting scheduler
// ABOUTME: The scheduler reads its credential from the query string client-side

use axum::response::Html;

const INDEX_HTML: &str = include_str!("../../templates/index.html");
const SCHEDULE_MEETING_HTML: &str = include_str!("../../templates/schedule-meeting.html");

pub async fn home() -> Html<&'static str> {
    Html(INDEX_HTML)
}

pub async fn schedule_meeting() -> Html<&'static str> {
    Html(SCHEDULE_MEETING_HTML)
}
