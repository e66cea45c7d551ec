// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! API routes for the authenticated user's own activity.

use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::{ActivityKind, ActivityRecord, ActivitySummary, ValidationStatus};
use crate::services::aggregator::{sum_points, ActivityAggregator};
use crate::services::formatter::{
    date_bucket_label, format_points, group_by_day, relative_time, Locale,
};
use crate::time_utils::{format_utc_rfc3339, parse_rfc3339_param};
use crate::AppState;
use axum::{
    extract::{Query, State},
    routing::get,
    Extension, Json, Router,
};
use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub const MAX_PER_PAGE: u32 = 100;

/// API routes (require authentication via JWT).
/// The auth middleware is applied in routes/mod.rs for these routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/me/summary", get(get_summary))
        .route("/api/activities", get(get_activities))
        .route("/api/feed", get(get_feed))
}

/// Records for one user, or an empty list if the backend is unreachable.
///
/// Read views degrade to zero-valued output instead of failing.
pub(crate) async fn records_or_empty(state: &AppState, user_id: u64) -> Vec<ActivityRecord> {
    match state.activities.list_for_owner(user_id).await {
        Ok(records) => records,
        Err(e) => {
            tracing::warn!(user_id, error = %e, "Failed to fetch activities, using empty list");
            Vec::new()
        }
    }
}

/// Slice one page out of an in-memory list.
pub(crate) fn paginate<T: Clone>(items: &[T], page: u32, per_page: u32) -> Result<Vec<T>> {
    if page < 1 {
        return Err(AppError::BadRequest(
            "Page must be greater than 0".to_string(),
        ));
    }
    let limit = per_page.clamp(1, MAX_PER_PAGE) as usize;

    // Use checked multiplication to prevent overflow
    let start = (page as usize - 1)
        .checked_mul(limit)
        .ok_or_else(|| AppError::BadRequest("Page number causes overflow".to_string()))?;

    if start >= items.len() {
        return Ok(vec![]);
    }
    let end = start.saturating_add(limit).min(items.len());
    Ok(items[start..end].to_vec())
}

/// The aggregator bucketed in the caller's UTC offset, when the request
/// names one; otherwise the deployment default.
pub(crate) fn local_aggregator(
    state: &AppState,
    tz_offset_minutes: Option<i32>,
) -> Result<ActivityAggregator> {
    let Some(minutes) = tz_offset_minutes else {
        return Ok(state.aggregator);
    };

    let tz = minutes
        .checked_mul(60)
        .and_then(FixedOffset::east_opt)
        .ok_or_else(|| {
            AppError::BadRequest(format!(
                "Invalid 'tz_offset_minutes' parameter: {} is out of range",
                minutes
            ))
        })?;
    Ok(state.aggregator.with_tz(tz))
}

pub(crate) fn default_page() -> u32 {
    1
}
pub(crate) fn default_per_page() -> u32 {
    50
}

// ─── Dashboard Summary ───────────────────────────────────────

#[derive(Deserialize)]
struct SummaryQuery {
    /// Reference instant (RFC3339); defaults to now
    at: Option<String>,
    /// Caller's UTC offset; defaults to the configured offset
    tz_offset_minutes: Option<i32>,
    #[serde(default)]
    lang: Locale,
}

#[derive(Serialize)]
pub struct SummaryResponse {
    #[serde(flatten)]
    pub summary: ActivitySummary,
    pub total_points_display: String,
    /// "time ago" label of the newest record, if any
    pub last_activity: Option<String>,
    pub as_of: String,
}

/// Totals, period breakdown and streak for the current user.
async fn get_summary(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Query(params): Query<SummaryQuery>,
) -> Result<Json<SummaryResponse>> {
    let now = parse_rfc3339_param("at", params.at.as_deref())?.unwrap_or_else(Utc::now);
    let aggregator = local_aggregator(&state, params.tz_offset_minutes)?;

    let records = records_or_empty(&state, user.user_id).await;
    let summary = aggregator.aggregate(&records, now);

    let last_activity = records
        .iter()
        .filter(|r| r.occurred_at <= now)
        .map(|r| r.occurred_at)
        .max()
        .map(|at| relative_time(at, now, params.lang));

    tracing::debug!(
        user_id = user.user_id,
        records = records.len(),
        total_points = summary.total_points,
        current_streak = summary.streak.current_streak,
        "Computed activity summary"
    );

    Ok(Json(SummaryResponse {
        total_points_display: format_points(summary.total_points),
        summary,
        last_activity,
        as_of: format_utc_rfc3339(now),
    }))
}

// ─── Activities ──────────────────────────────────────────────

#[derive(Deserialize)]
struct ActivitiesQuery {
    /// Filter by workout or meal
    kind: Option<ActivityKind>,
    /// Filter by validation status
    status: Option<ValidationStatus>,
    at: Option<String>,
    tz_offset_minutes: Option<i32>,
    #[serde(default)]
    lang: Locale,
    /// Pagination: page number (1-indexed)
    #[serde(default = "default_page")]
    page: u32,
    /// Pagination: items per page
    #[serde(default = "default_per_page")]
    per_page: u32,
}

/// One record as shown in lists and the feed.
#[derive(Serialize, Clone, Debug)]
pub struct ActivityItem {
    pub id: u64,
    pub kind: ActivityKind,
    pub occurred_at: String,
    pub day: String,
    pub relative_time: String,
    pub points: i64,
    pub points_display: String,
    pub validation_status: ValidationStatus,
}

impl ActivityItem {
    fn from_record(
        record: &ActivityRecord,
        tz: &FixedOffset,
        now: DateTime<Utc>,
        lang: Locale,
    ) -> Self {
        let points = record.effective_points();
        Self {
            id: record.id,
            kind: record.kind,
            occurred_at: format_utc_rfc3339(record.occurred_at),
            day: date_bucket_label(record.occurred_at, tz),
            relative_time: relative_time(record.occurred_at, now, lang),
            points,
            points_display: format_points(points),
            validation_status: record.validation_status,
        }
    }
}

#[derive(Serialize)]
pub struct ActivitiesResponse {
    pub activities: Vec<ActivityItem>,
    pub page: u32,
    pub per_page: u32,
    /// Total number of activities matching the query.
    pub total: u32,
}

/// Current user's activities, newest first.
async fn get_activities(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Query(params): Query<ActivitiesQuery>,
) -> Result<Json<ActivitiesResponse>> {
    tracing::debug!(
        user_id = user.user_id,
        kind = ?params.kind,
        status = ?params.status,
        page = params.page,
        "Fetching activities"
    );

    let now = parse_rfc3339_param("at", params.at.as_deref())?.unwrap_or_else(Utc::now);
    let aggregator = local_aggregator(&state, params.tz_offset_minutes)?;

    let mut records: Vec<ActivityRecord> = records_or_empty(&state, user.user_id)
        .await
        .into_iter()
        .filter(|r| params.kind.map_or(true, |k| r.kind == k))
        .filter(|r| params.status.map_or(true, |s| r.validation_status == s))
        .collect();
    records.sort_by(|a, b| b.occurred_at.cmp(&a.occurred_at).then(b.id.cmp(&a.id)));

    let total = records.len() as u32;
    let page = paginate(&records, params.page, params.per_page)?;

    Ok(Json(ActivitiesResponse {
        activities: page
            .iter()
            .map(|r| ActivityItem::from_record(r, aggregator.tz(), now, params.lang))
            .collect(),
        page: params.page,
        per_page: params.per_page.clamp(1, MAX_PER_PAGE),
        total,
    }))
}

// ─── Feed ────────────────────────────────────────────────────

#[derive(Deserialize)]
struct FeedQuery {
    at: Option<String>,
    tz_offset_minutes: Option<i32>,
    #[serde(default)]
    lang: Locale,
}

#[derive(Serialize)]
pub struct FeedDay {
    pub day: String,
    pub points: i64,
    pub activities: Vec<ActivityItem>,
}

/// Current user's activities grouped by local calendar day, newest first.
async fn get_feed(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Query(params): Query<FeedQuery>,
) -> Result<Json<Vec<FeedDay>>> {
    let now = parse_rfc3339_param("at", params.at.as_deref())?.unwrap_or_else(Utc::now);
    let aggregator = local_aggregator(&state, params.tz_offset_minutes)?;
    let records = records_or_empty(&state, user.user_id).await;

    let days = group_by_day(&records, aggregator.tz())
        .into_iter()
        .map(|(day, items)| FeedDay {
            day: day.format("%Y-%m-%d").to_string(),
            points: sum_points(items.iter().copied()),
            activities: items
                .into_iter()
                .map(|r| ActivityItem::from_record(r, aggregator.tz(), now, params.lang))
                .collect(),
        })
        .collect();

    Ok(Json(days))
}
