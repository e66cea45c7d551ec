//! Application configuration loaded from environment variables.
//!
//! Read once at startup. A `.env` file is honored for local development.

use chrono::{FixedOffset, Offset, Utc};
use std::env;

use crate::services::aggregator::StreakPolicy;

const DEFAULT_WEEKLY_EXPECTED_DAYS: u32 = 5;

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    // --- Environment Variables (non-sensitive) ---
    /// Frontend URL allowed by CORS
    pub frontend_url: String,
    /// Server port
    pub port: u16,
    /// Base URL of the remote backend API; `None` serves from memory
    pub backend_url: Option<String>,
    /// Offset of users' local time from UTC, in minutes
    pub tz_offset_minutes: i32,
    /// Active days per week users aim for
    pub weekly_expected_days: u32,
    /// Which records make a day count toward streaks
    pub streak_policy: StreakPolicy,

    // --- Secrets ---
    /// JWT signing key for session tokens (raw bytes)
    pub jwt_signing_key: Vec<u8>,
    /// Service token sent to the backend API
    pub backend_token: Option<String>,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        Ok(Self {
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:5173".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),
            backend_url: env::var("BACKEND_URL")
                .ok()
                .map(|v| v.trim().trim_end_matches('/').to_string())
                .filter(|v| !v.is_empty()),
            tz_offset_minutes: parse_var("TZ_OFFSET_MINUTES", 0)?,
            weekly_expected_days: parse_var("WEEKLY_EXPECTED_DAYS", DEFAULT_WEEKLY_EXPECTED_DAYS)?,
            streak_policy: match env::var("STREAK_POLICY") {
                Ok(raw) => raw
                    .parse()
                    .map_err(|_| ConfigError::Invalid("STREAK_POLICY"))?,
                Err(_) => StreakPolicy::default(),
            },

            jwt_signing_key: env::var("JWT_SIGNING_KEY")
                .map_err(|_| ConfigError::Missing("JWT_SIGNING_KEY"))?
                .into_bytes(),
            backend_token: env::var("BACKEND_TOKEN")
                .ok()
                .map(|v| v.trim().to_string()),
        })
    }

    /// Config for tests: in-memory store, UTC, default policy.
    pub fn test_default() -> Self {
        Self {
            frontend_url: "http://localhost:5173".to_string(),
            port: 8080,
            backend_url: None,
            tz_offset_minutes: 0,
            weekly_expected_days: DEFAULT_WEEKLY_EXPECTED_DAYS,
            streak_policy: StreakPolicy::default(),
            jwt_signing_key: b"test_jwt_key_32_bytes_minimum!!".to_vec(),
            backend_token: None,
        }
    }

    /// Users' local UTC offset.
    ///
    /// Out-of-range offsets fall back to UTC.
    pub fn timezone(&self) -> FixedOffset {
        FixedOffset::east_opt(self.tz_offset_minutes.saturating_mul(60)).unwrap_or_else(|| {
            tracing::warn!(
                offset_minutes = self.tz_offset_minutes,
                "Invalid timezone offset, using UTC"
            );
            Utc.fix()
        })
    }
}

fn parse_var<T: std::str::FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid(name)),
        Err(_) => Ok(default),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for environment variable: {0}")]
    Invalid(&'static str),
}
