// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Admin routes: activity moderation.
//!
//! Both auth and admin middleware are applied in routes/mod.rs.

use crate::error::Result;
use crate::middleware::auth::AuthUser;
use crate::models::{ActivityKind, ActivityRecord, ValidationStatus};
use crate::routes::api::{default_page, default_per_page, paginate, MAX_PER_PAGE};
use crate::services::ModerationFilter;
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/admin/activities", get(list_activities))
        .route(
            "/api/admin/activities/{id}/validation",
            post(validate_activity),
        )
}

#[derive(Deserialize)]
struct AdminActivitiesQuery {
    status: Option<ValidationStatus>,
    owner_id: Option<u64>,
    kind: Option<ActivityKind>,
    #[serde(default = "default_page")]
    page: u32,
    #[serde(default = "default_per_page")]
    per_page: u32,
}

#[derive(Serialize)]
pub struct AdminActivitiesResponse {
    pub activities: Vec<ActivityRecord>,
    pub page: u32,
    pub per_page: u32,
    pub total: u32,
}

/// Moderation queue with filtering and page slicing.
async fn list_activities(
    State(state): State<Arc<AppState>>,
    Query(params): Query<AdminActivitiesQuery>,
) -> Result<Json<AdminActivitiesResponse>> {
    let filter = ModerationFilter {
        status: params.status,
        owner_id: params.owner_id,
        kind: params.kind,
    };

    let records = state.moderation.list(&filter).await;
    let total = records.len() as u32;
    let activities = paginate(&records, params.page, params.per_page)?;

    Ok(Json(AdminActivitiesResponse {
        activities,
        page: params.page,
        per_page: params.per_page.clamp(1, MAX_PER_PAGE),
        total,
    }))
}

#[derive(Deserialize)]
pub struct ValidationRequest {
    pub decision: ValidationStatus,
}

/// Approve or reject a pending activity.
async fn validate_activity(
    State(state): State<Arc<AppState>>,
    Extension(admin): Extension<AuthUser>,
    Path(activity_id): Path<u64>,
    Json(body): Json<ValidationRequest>,
) -> Result<Json<ActivityRecord>> {
    tracing::info!(
        admin_id = admin.user_id,
        activity_id,
        decision = body.decision.as_str(),
        "Moderation decision requested"
    );

    let record = state.moderation.decide(activity_id, body.decision).await?;
    Ok(Json(record))
}
