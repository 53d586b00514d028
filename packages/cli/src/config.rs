// ABOUTME: Server configuration loaded from environment variables (and .env)
// ABOUTME: Validated once at startup; any problem here is fatal

use std::env;
use std::fmt;

use calgate_auth::{SigningSecret, TokenError, DEFAULT_VALIDITY_HOURS, MAX_VALIDITY_HOURS};
use calgate_calendar::DEFAULT_TIME_ZONE;
use thiserror::Error;

pub const SECRET_KEY_VAR: &str = "SECRET_KEY";

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_REDIRECT_URL: &str = "http://localhost:8080/auth/google/callback";
const DEFAULT_CORS_ORIGIN: &str = "http://localhost:8080";
const DEFAULT_UPCOMING_WINDOW_DAYS: i64 = 7;
const MAX_UPCOMING_WINDOW_DAYS: i64 = 365;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),
    #[error("Invalid value for {var}: {value}")]
    InvalidNumber { var: &'static str, value: String },
    #[error("Port {0} is out of valid range (1-65535)")]
    PortOutOfRange(u16),
    #[error("{var} must be at least {min}")]
    BelowMinimum { var: &'static str, min: i64 },
    #[error("{var} must be at most {max}")]
    AboveMaximum { var: &'static str, max: i64 },
    #[error("Invalid signing secret: {0}")]
    Secret(#[from] TokenError),
}

#[derive(Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub signing_secret: SigningSecret,
    pub google_client_id: String,
    pub google_client_secret: String,
    pub oauth_redirect_url: String,
    /// SQLite URL; `None` runs without a profile store
    pub database_url: Option<String>,
    pub token_encryption_key: Option<String>,
    pub cors_origin: String,
    pub credential_ttl_hours: i64,
    pub upcoming_window_days: i64,
    pub calendar_time_zone: String,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("google_client_id", &self.google_client_id)
            .field("oauth_redirect_url", &self.oauth_redirect_url)
            .field("persistence", &self.database_url.is_some())
            .field("cors_origin", &self.cors_origin)
            .field("credential_ttl_hours", &self.credential_ttl_hours)
            .field("upcoming_window_days", &self.upcoming_window_days)
            .field("calendar_time_zone", &self.calendar_time_zone)
            .finish_non_exhaustive()
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from any key/value source. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let require = |key: &'static str| get(key).ok_or(ConfigError::MissingVar(key));

        let signing_secret = SigningSecret::new(require(SECRET_KEY_VAR)?)?;
        let google_client_id = require("GOOGLE_CLIENT_ID")?;
        let google_client_secret = require("GOOGLE_CLIENT_SECRET")?;

        let port = match get("PORT") {
            Some(value) => value
                .trim()
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidNumber { var: "PORT", value })?,
            None => DEFAULT_PORT,
        };
        if port == 0 {
            return Err(ConfigError::PortOutOfRange(port));
        }

        let credential_ttl_hours = parse_in_range(
            &get,
            "CREDENTIAL_TTL_HOURS",
            DEFAULT_VALIDITY_HOURS,
            1,
            MAX_VALIDITY_HOURS,
        )?;
        let upcoming_window_days = parse_in_range(
            &get,
            "UPCOMING_WINDOW_DAYS",
            DEFAULT_UPCOMING_WINDOW_DAYS,
            1,
            MAX_UPCOMING_WINDOW_DAYS,
        )?;

        Ok(Config {
            host: get("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port,
            signing_secret,
            google_client_id,
            google_client_secret,
            oauth_redirect_url: get("OAUTH_REDIRECT_URL")
                .unwrap_or_else(|| DEFAULT_REDIRECT_URL.to_string()),
            database_url: get("DB_URL"),
            token_encryption_key: get("TOKEN_ENCRYPTION_KEY"),
            cors_origin: get("CORS_ORIGIN").unwrap_or_else(|| DEFAULT_CORS_ORIGIN.to_string()),
            credential_ttl_hours,
            upcoming_window_days,
            calendar_time_zone: get("CALENDAR_TIME_ZONE")
                .unwrap_or_else(|| DEFAULT_TIME_ZONE.to_string()),
        })
    }

    /// Key material for sealing stored provider tokens
    pub fn token_key_material(&self) -> &[u8] {
        match &self.token_encryption_key {
            Some(key) => key.as_bytes(),
            None => self.signing_secret.as_bytes(),
        }
    }
}

fn parse_in_range<G>(
    get: &G,
    var: &'static str,
    default: i64,
    min: i64,
    max: i64,
) -> Result<i64, ConfigError>
where
    G: Fn(&str) -> Option<String>,
{
    let value = match get(var) {
        Some(raw) => raw
            .trim()
            .parse::<i64>()
            .map_err(|_| ConfigError::InvalidNumber { var, value: raw })?,
        None => default,
    };
    if value < min {
        return Err(ConfigError::BelowMinimum { var, min });
    }
    if value > max {
        return Err(ConfigError::AboveMaximum { var, max });
    }
    Ok(value)
}
