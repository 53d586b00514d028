// ABOUTME: The calendar gateway seam used by the HTTP layer
// ABOUTME: Implemented by the Google client and by stubs in tests

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::CalendarResult;
use crate::types::{CreatedEvent, Event, NewEvent};

/// Calendar operations performed on behalf of a user, authorized by their
/// provider access token.
#[async_trait]
pub trait CalendarGateway: Send + Sync {
    /// Events on the primary calendar whose start is in `[from, to)`, ordered by start.
    async fn list_upcoming(
        &self,
        access_token: &str,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> CalendarResult<Vec<Event>>;

    async fn create_event(&self, access_token: &str, event: NewEvent)
        -> CalendarResult<CreatedEvent>;
}
