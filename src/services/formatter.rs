// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Presentation helpers shared by the dashboard, feed and leaderboard.
//!
//! All functions are pure: the reference "now" and the user's UTC offset
//! are always passed in.

use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use serde::Deserialize;
use std::collections::BTreeMap;

use crate::models::ActivityRecord;

const MINUTE: i64 = 60;
const HOUR: i64 = 60 * MINUTE;
const DAY: i64 = 24 * HOUR;

/// Language for user-facing labels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Pt,
}

/// Apply a multiplier to base points and round the way the web client does.
///
/// Halves round toward positive infinity (`Math.round`), so `49.5 -> 50`
/// and `-2.5 -> -2`. Non-finite products yield 0.
pub fn rounded_points(base: f64, multiplier: f64) -> i64 {
    let value = base * multiplier;
    if !value.is_finite() {
        return 0;
    }
    let floor = value.floor();
    let rounded = if value - floor >= 0.5 {
        floor + 1.0
    } else {
        floor
    };
    rounded as i64
}

/// Render a "time ago" label.
///
/// Timestamps in the future are treated as "just now". Larger elapsed
/// times never produce a more recent-sounding label.
pub fn relative_time(timestamp: DateTime<Utc>, now: DateTime<Utc>, locale: Locale) -> String {
    let elapsed = now.signed_duration_since(timestamp).num_seconds().max(0);

    let (count, unit) = if elapsed < MINUTE {
        return match locale {
            Locale::En => "just now".to_string(),
            Locale::Pt => "agora mesmo".to_string(),
        };
    } else if elapsed < HOUR {
        (elapsed / MINUTE, Unit::Minute)
    } else if elapsed < DAY {
        (elapsed / HOUR, Unit::Hour)
    } else if elapsed < 7 * DAY {
        (elapsed / DAY, Unit::Day)
    } else if elapsed < 30 * DAY {
        (elapsed / (7 * DAY), Unit::Week)
    } else if elapsed < 365 * DAY {
        (elapsed / (30 * DAY), Unit::Month)
    } else {
        (elapsed / (365 * DAY), Unit::Year)
    };

    let name = unit.name(locale, count != 1);
    match locale {
        Locale::En => format!("{} {} ago", count, name),
        Locale::Pt => format!("há {} {}", count, name),
    }
}

#[derive(Clone, Copy)]
enum Unit {
    Minute,
    Hour,
    Day,
    Week,
    Month,
    Year,
}

impl Unit {
    fn name(self, locale: Locale, plural: bool) -> &'static str {
        match (locale, self, plural) {
            (Locale::En, Unit::Minute, false) => "minute",
            (Locale::En, Unit::Minute, true) => "minutes",
            (Locale::En, Unit::Hour, false) => "hour",
            (Locale::En, Unit::Hour, true) => "hours",
            (Locale::En, Unit::Day, false) => "day",
            (Locale::En, Unit::Day, true) => "days",
            (Locale::En, Unit::Week, false) => "week",
            (Locale::En, Unit::Week, true) => "weeks",
            (Locale::En, Unit::Month, false) => "month",
            (Locale::En, Unit::Month, true) => "months",
            (Locale::En, Unit::Year, false) => "year",
            (Locale::En, Unit::Year, true) => "years",
            (Locale::Pt, Unit::Minute, false) => "minuto",
            (Locale::Pt, Unit::Minute, true) => "minutos",
            (Locale::Pt, Unit::Hour, false) => "hora",
            (Locale::Pt, Unit::Hour, true) => "horas",
            (Locale::Pt, Unit::Day, false) => "dia",
            (Locale::Pt, Unit::Day, true) => "dias",
            (Locale::Pt, Unit::Week, false) => "semana",
            (Locale::Pt, Unit::Week, true) => "semanas",
            (Locale::Pt, Unit::Month, false) => "mês",
            (Locale::Pt, Unit::Month, true) => "meses",
            (Locale::Pt, Unit::Year, false) => "ano",
            (Locale::Pt, Unit::Year, true) => "anos",
        }
    }
}

/// Calendar day of a timestamp in the user's local time.
///
/// This is the grouping key for both the activity feed and streaks.
pub fn date_bucket_key(timestamp: DateTime<Utc>, tz: &FixedOffset) -> NaiveDate {
    timestamp.with_timezone(tz).date_naive()
}

/// `YYYY-MM-DD` form of [`date_bucket_key`].
pub fn date_bucket_label(timestamp: DateTime<Utc>, tz: &FixedOffset) -> String {
    date_bucket_key(timestamp, tz).format("%Y-%m-%d").to_string()
}

/// Format points with thousands separators ("12,345").
pub fn format_points(points: i64) -> String {
    let digits = points.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if points < 0 {
        out.push('-');
    }
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Group records by local calendar day, newest day first.
///
/// Within a day, records are ordered newest first.
pub fn group_by_day<'a>(
    records: &'a [ActivityRecord],
    tz: &FixedOffset,
) -> Vec<(NaiveDate, Vec<&'a ActivityRecord>)> {
    let mut days: BTreeMap<NaiveDate, Vec<&'a ActivityRecord>> = BTreeMap::new();
    for record in records {
        days.entry(date_bucket_key(record.occurred_at, tz))
            .or_default()
            .push(record);
    }

    days.into_iter()
        .rev()
        .map(|(day, mut items)| {
            items.sort_by(|a, b| b.occurred_at.cmp(&a.occurred_at));
            (day, items)
        })
        .collect()
}
