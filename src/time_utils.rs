// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared helpers for date/time formatting.

use chrono::{DateTime, SecondsFormat, Utc};

use crate::error::AppError;

/// Format a UTC timestamp as RFC3339 using a `Z` suffix.
pub fn format_utc_rfc3339(date: DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Parse an optional RFC3339 query parameter into UTC.
pub fn parse_rfc3339_param(
    name: &str,
    raw: Option<&str>,
) -> Result<Option<DateTime<Utc>>, AppError> {
    raw.map(|raw| {
        DateTime::parse_from_rfc3339(raw)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|_| {
                AppError::BadRequest(format!(
                    "Invalid '{}' parameter: must be RFC3339 datetime",
                    name
                ))
            })
    })
    .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rfc3339_param_normalizes_offset() {
        let parsed = parse_rfc3339_param("at", Some("2026-05-01T08:00:00-05:00"))
            .unwrap()
            .unwrap();
        assert_eq!(format_utc_rfc3339(parsed), "2026-05-01T13:00:00Z");
    }

    #[test]
    fn test_parse_rfc3339_param_absent_and_invalid() {
        assert!(parse_rfc3339_param("at", None).unwrap().is_none());
        let err = parse_rfc3339_param("at", Some("yesterday")).unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }
}
