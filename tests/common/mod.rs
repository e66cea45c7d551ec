// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use chrono::{DateTime, Utc};
use fitness_tracker::config::Config;
use fitness_tracker::db::MemoryStore;
use fitness_tracker::middleware::auth::{create_jwt, Role};
use fitness_tracker::models::{
    ActivityKind, ActivityRecord, Group, GroupMembership, GroupRole, ValidationStatus,
};
use fitness_tracker::routes::create_router;
use fitness_tracker::AppState;
use std::sync::Arc;

/// Reference instant passed as `?at=` so results do not depend on the clock.
#[allow(dead_code)]
pub const NOW: &str = "2026-03-10T12:00:00Z";

#[allow(dead_code)]
pub const ALICE: u64 = 1;
#[allow(dead_code)]
pub const BOB: u64 = 2;
#[allow(dead_code)]
pub const CAROL: u64 = 3;
/// Invited to both groups, has not answered yet
#[allow(dead_code)]
pub const DAVE: u64 = 4;
/// Not in any group
#[allow(dead_code)]
pub const ERIN: u64 = 5;

#[allow(dead_code)]
pub const MORNING_CREW: u64 = 10;
#[allow(dead_code)]
pub const LUNCH_CLUB: u64 = 20;

fn at(ts: &str) -> DateTime<Utc> {
    ts.parse().expect("valid timestamp")
}

fn activity(
    id: u64,
    owner_id: u64,
    kind: ActivityKind,
    occurred_at: &str,
    base_points: f64,
    multiplier: f64,
    validation_status: ValidationStatus,
) -> ActivityRecord {
    ActivityRecord {
        id,
        owner_id,
        kind,
        occurred_at: at(occurred_at),
        base_points,
        multiplier,
        validation_status,
    }
}

fn membership(group_id: u64, member_id: u64, name: &str, role: GroupRole, pending: bool) -> GroupMembership {
    GroupMembership {
        group_id,
        member_id,
        display_name: name.to_string(),
        role,
        pending,
    }
}

/// Store with two groups and a handful of records around [`NOW`].
///
/// Alice: 60 + 80 approved, one pending workout on 03-08 (total 140).
/// Bob: 150 approved today, one rejected record in February.
/// Carol: member without records. Dave: invited, 500 approved points.
#[allow(dead_code)]
pub fn seeded_store() -> MemoryStore {
    use ActivityKind::*;
    use ValidationStatus::*;

    let store = MemoryStore::new();

    store.insert_group(Group {
        id: MORNING_CREW,
        name: "Morning Crew".to_string(),
        description: Some("Before-work workouts".to_string()),
    });
    store.insert_group(Group {
        id: LUNCH_CLUB,
        name: "Lunch Club".to_string(),
        description: None,
    });

    store.insert_membership(membership(MORNING_CREW, ALICE, "Alice", GroupRole::Owner, false));
    store.insert_membership(membership(MORNING_CREW, BOB, "Bob", GroupRole::Member, false));
    store.insert_membership(membership(MORNING_CREW, CAROL, "Carol", GroupRole::Member, false));
    store.insert_membership(membership(MORNING_CREW, DAVE, "Dave", GroupRole::Member, true));
    store.insert_membership(membership(LUNCH_CLUB, ALICE, "Alice", GroupRole::Owner, false));
    store.insert_membership(membership(LUNCH_CLUB, DAVE, "Dave", GroupRole::Member, true));

    store.insert_activity(activity(100, ALICE, Workout, "2026-03-10T08:00:00Z", 50.0, 1.2, Approved));
    store.insert_activity(activity(101, ALICE, Meal, "2026-03-09T19:00:00Z", 40.0, 2.0, Approved));
    store.insert_activity(activity(102, ALICE, Workout, "2026-03-08T07:00:00Z", 25.0, 2.0, Pending));
    store.insert_activity(activity(103, BOB, Workout, "2026-03-10T09:00:00Z", 100.0, 1.5, Approved));
    store.insert_activity(activity(104, BOB, Workout, "2026-02-01T09:00:00Z", 30.0, 1.0, Rejected));
    store.insert_activity(activity(105, DAVE, Workout, "2026-03-10T06:00:00Z", 500.0, 1.0, Approved));

    store
}

/// Create a test app over [`seeded_store`].
/// Returns the router, the shared state and the store for direct inspection.
#[allow(dead_code)]
pub fn create_test_app() -> (axum::Router, Arc<AppState>, MemoryStore) {
    let config = Config::test_default();
    let store = seeded_store();

    let state = Arc::new(AppState::new(
        config,
        Arc::new(store.clone()),
        Arc::new(store.clone()),
    ));

    (create_router(state.clone()), state, store)
}

/// Create a session token for testing.
#[allow(dead_code)]
pub fn create_test_jwt(user_id: u64, signing_key: &[u8]) -> String {
    create_jwt(user_id, Role::User, signing_key).expect("Failed to create test JWT")
}

#[allow(dead_code)]
pub fn create_admin_jwt(user_id: u64, signing_key: &[u8]) -> String {
    create_jwt(user_id, Role::Admin, signing_key).expect("Failed to create test JWT")
}

/// Read a response body as JSON.
#[allow(dead_code)]
pub async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let body = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .expect("Failed to read body");
    serde_json::from_slice(&body).expect("Body is not JSON")
}
