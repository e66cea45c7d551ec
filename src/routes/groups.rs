// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Group routes: memberships, invitations, leaderboards and the selected group.

use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::{GroupMembership, MemberScore};
use crate::routes::api::local_aggregator;
use crate::services::aggregator::Period;
use crate::services::ranking::scores_from_activity;
use crate::time_utils::{format_utc_rfc3339, parse_rfc3339_param};
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    response::sse::{Event, KeepAlive, Sse},
    routing::{get, post},
    Extension, Json, Router,
};
use chrono::Utc;
use futures_util::stream::{self, Stream};
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::sync::Arc;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/groups", get(list_groups))
        .route("/api/groups/{id}/leaderboard", get(get_leaderboard))
        .route("/api/groups/{id}/invitation", post(respond_to_invitation))
        .route("/api/selection", get(get_selection).put(put_selection))
        .route("/api/selection/stream", get(selection_stream))
}

/// The caller's accepted membership in a group, or 403.
async fn require_membership(
    state: &AppState,
    group_id: u64,
    user: &AuthUser,
) -> Result<Vec<GroupMembership>> {
    if state.groups.get_group(group_id).await?.is_none() {
        return Err(AppError::NotFound(format!("Group {} not found", group_id)));
    }

    let members = state.groups.members_of(group_id).await?;
    let is_member = members
        .iter()
        .any(|m| m.member_id == user.user_id && m.is_active());

    if !is_member && !user.is_admin() {
        return Err(AppError::Forbidden(format!(
            "Not a member of group {}",
            group_id
        )));
    }
    Ok(members)
}

// ─── Memberships ─────────────────────────────────────────────

/// Current user's memberships, including pending invitations.
async fn list_groups(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Vec<GroupMembership>>> {
    let memberships = state.groups.memberships_for_user(user.user_id).await?;
    Ok(Json(memberships))
}

#[derive(Deserialize)]
pub struct InvitationRequest {
    pub accept: bool,
}

#[derive(Serialize)]
pub struct InvitationResponse {
    /// The membership after accepting; `None` when rejected
    pub membership: Option<GroupMembership>,
}

/// Accept or reject a pending group invitation.
async fn respond_to_invitation(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(group_id): Path<u64>,
    Json(body): Json<InvitationRequest>,
) -> Result<Json<InvitationResponse>> {
    let membership = state
        .groups
        .respond_to_invitation(group_id, user.user_id, body.accept)
        .await?;

    if membership.is_none() {
        state.selection.clear_if_selected(user.user_id, group_id);
    }

    tracing::info!(
        user_id = user.user_id,
        group_id,
        accepted = body.accept,
        "Invitation answered"
    );

    Ok(Json(InvitationResponse { membership }))
}

// ─── Leaderboard ─────────────────────────────────────────────

#[derive(Deserialize)]
struct LeaderboardQuery {
    #[serde(default)]
    period: Period,
    at: Option<String>,
    tz_offset_minutes: Option<i32>,
}

#[derive(Serialize)]
pub struct LeaderboardResponse {
    pub group_id: u64,
    pub period: &'static str,
    pub as_of: String,
    pub ranked: Vec<MemberScore>,
    pub top_three: Vec<MemberScore>,
}

fn period_name(period: Period) -> &'static str {
    match period {
        Period::Today => "today",
        Period::Week => "week",
        Period::Month => "month",
        Period::All => "all",
    }
}

/// Rank a group's members by points earned in the period.
async fn get_leaderboard(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(group_id): Path<u64>,
    Query(params): Query<LeaderboardQuery>,
) -> Result<Json<LeaderboardResponse>> {
    let now = parse_rfc3339_param("at", params.at.as_deref())?.unwrap_or_else(Utc::now);
    let aggregator = local_aggregator(&state, params.tz_offset_minutes)?;
    let members = require_membership(&state, group_id, &user).await?;

    let member_ids: Vec<u64> = members
        .iter()
        .filter(|m| m.is_active())
        .map(|m| m.member_id)
        .collect();

    let records = match state.activities.list_for_owners(&member_ids).await {
        Ok(records) => records,
        Err(e) => {
            tracing::warn!(group_id, error = %e, "Failed to fetch group activities, ranking nobody");
            Vec::new()
        }
    };

    let candidates = scores_from_activity(&members, &records, params.period, now, &aggregator);
    let board = state.ranking.project(candidates);

    tracing::debug!(
        group_id,
        period = period_name(params.period),
        ranked = board.ranked.len(),
        "Built leaderboard"
    );

    Ok(Json(LeaderboardResponse {
        group_id,
        period: period_name(params.period),
        as_of: format_utc_rfc3339(now),
        ranked: board.ranked,
        top_three: board.top_three,
    }))
}

// ─── Selected Group ──────────────────────────────────────────

#[derive(Serialize, Deserialize)]
pub struct SelectionBody {
    pub group_id: Option<u64>,
}

async fn get_selection(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Json<SelectionBody> {
    Json(SelectionBody {
        group_id: state.selection.current(user.user_id),
    })
}

/// Change the selected group. Only accepted memberships can be selected.
async fn put_selection(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(body): Json<SelectionBody>,
) -> Result<Json<SelectionBody>> {
    if let Some(group_id) = body.group_id {
        let memberships = state.groups.memberships_for_user(user.user_id).await?;
        let allowed = memberships
            .iter()
            .any(|m| m.group_id == group_id && m.is_active());
        if !allowed {
            return Err(AppError::Forbidden(format!(
                "Not a member of group {}",
                group_id
            )));
        }
    }

    state.selection.select(user.user_id, body.group_id);
    Ok(Json(SelectionBody {
        group_id: body.group_id,
    }))
}

/// Server-sent events: the current selection, then one event per change.
async fn selection_stream(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Sse<impl Stream<Item = std::result::Result<Event, Infallible>>> {
    let rx = state.selection.subscribe(user.user_id);

    let events = stream::unfold((rx, true), |(mut rx, first)| async move {
        if !first && rx.changed().await.is_err() {
            return None;
        }
        let selected = *rx.borrow_and_update();
        let data = selected.map_or_else(|| "null".to_string(), |id| id.to_string());
        let event = Event::default().event("selection").data(data);
        Some((Ok(event), (rx, false)))
    });

    Sse::new(events).keep_alive(KeepAlive::default())
}
