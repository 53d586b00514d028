use axum::{
    middleware,
    routing::{get, post},
    Router,
};

pub mod health;
pub mod meetings;
pub mod oauth;
pub mod pages;

use crate::middleware::require_credential;
use crate::state::AppState;

pub fn create_router(state: AppState) -> Router {
    // Bearer credential required
    let protected = Router::new()
        .route("/create-meeting", post(meetings::create_meeting))
        .route("/upcoming-meetings", get(meetings::upcoming_meetings))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_credential,
        ));

    Router::new()
        .route("/", get(pages::home))
        .route("/schedule-meeting", get(pages::schedule_meeting))
        .route("/auth/", get(oauth::missing_provider))
        .route("/auth/{provider}", get(oauth::begin_auth))
        .route("/auth/{provider}/callback", get(oauth::auth_callback))
        .route("/logout/{provider}", get(oauth::logout))
        .route("/api/health", get(health::health_check))
        .merge(protected)
        .with_state(state)
}
