// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Leaderboard member model.

use serde::{Deserialize, Serialize};

/// A member's score for ranking.
///
/// `total_points` is `None` for members with no activity in the selected
/// period; such members are never ranked. `position` is assigned by
/// [`RankingProjector`](crate::services::RankingProjector).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberScore {
    pub member_id: u64,
    pub display_name: String,
    #[serde(default)]
    pub total_points: Option<i64>,
    #[serde(default)]
    pub position: Option<u32>,
}

impl MemberScore {
    pub fn new(member_id: u64, display_name: impl Into<String>, total_points: Option<i64>) -> Self {
        Self {
            member_id,
            display_name: display_name.into(),
            total_points,
            position: None,
        }
    }
}

/// Ranked members plus the podium.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Leaderboard {
    pub ranked: Vec<MemberScore>,
    pub top_three: Vec<MemberScore>,
}
