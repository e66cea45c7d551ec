// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Leaderboard ranking.

use chrono::{DateTime, Utc};
use std::collections::HashMap;

use crate::models::{ActivityRecord, GroupMembership, Leaderboard, MemberScore};
use crate::services::aggregator::{ActivityAggregator, Period};

const PODIUM_SIZE: usize = 3;

/// Turns scored candidates into a ranked leaderboard.
///
/// Members without a score are left out entirely. Ties keep their input
/// order and still get distinct, sequential positions.
#[derive(Debug, Clone, Copy, Default)]
pub struct RankingProjector;

impl RankingProjector {
    pub fn project(&self, candidates: Vec<MemberScore>) -> Leaderboard {
        let mut ranked: Vec<MemberScore> = candidates
            .into_iter()
            .filter(|c| c.total_points.is_some())
            .collect();

        // `sort_by` is stable, which keeps ties in input order.
        ranked.sort_by(|a, b| b.total_points.cmp(&a.total_points));

        for (index, member) in ranked.iter_mut().enumerate() {
            member.position = Some(index as u32 + 1);
        }

        let top_three = ranked.iter().take(PODIUM_SIZE).cloned().collect();

        Leaderboard { ranked, top_three }
    }
}

/// Build leaderboard candidates for a group's active members.
///
/// A member scores `None` when they have no approved activity in `period`.
pub fn scores_from_activity(
    members: &[GroupMembership],
    records: &[ActivityRecord],
    period: Period,
    now: DateTime<Utc>,
    aggregator: &ActivityAggregator,
) -> Vec<MemberScore> {
    let mut by_owner: HashMap<u64, Vec<ActivityRecord>> = HashMap::new();
    for record in records {
        by_owner
            .entry(record.owner_id)
            .or_default()
            .push(record.clone());
    }

    members
        .iter()
        .filter(|m| m.is_active())
        .map(|m| {
            let points = by_owner
                .get(&m.member_id)
                .and_then(|owned| aggregator.points_in_period(owned, period, now));
            MemberScore::new(m.member_id, m.display_name.clone(), points)
        })
        .collect()
}
