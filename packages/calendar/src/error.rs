// ABOUTME: Error types for calendar operations
// ABOUTME: Upstream carries Google's own message so callers can pass it through

use thiserror::Error;

pub type CalendarResult<T> = Result<T, CalendarError>;

#[derive(Error, Debug)]
pub enum CalendarError {
    /// Google answered with a non-2xx status
    #[error("{message}")]
    Upstream { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid response from calendar API: {0}")]
    InvalidResponse(String),

    #[error("Invalid configuration: {0}")]
    Configuration(String),
}

impl CalendarError {
    pub fn upstream(status: u16, message: impl Into<String>) -> Self {
        Self::Upstream {
            status,
            message: message.into(),
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::InvalidResponse(message.into())
    }
}

impl From<reqwest::Error> for CalendarError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            CalendarError::network("request timeout")
        } else if e.is_connect() {
            CalendarError::network(format!("connection failed: {}", e))
        } else if e.is_decode() {
            CalendarError::invalid_response(e.to_string())
        } else {
            CalendarError::network(format!("request failed: {}", e))
        }
    }
}
