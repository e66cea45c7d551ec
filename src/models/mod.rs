// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod activity;
pub mod group;
pub mod member;
pub mod stats;

pub use activity::{ActivityKind, ActivityRecord, ValidationStatus};
pub use group::{Group, GroupMembership, GroupRole};
pub use member::{Leaderboard, MemberScore};
pub use stats::{ActivitySummary, PeriodBucket, PeriodCounts, StreakState};
