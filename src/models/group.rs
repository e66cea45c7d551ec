// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Group and membership models.

use serde::{Deserialize, Serialize};

/// A named collection of members with its own leaderboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// A user's membership in a group.
///
/// A pending membership is an invitation the invitee has not answered yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupMembership {
    pub group_id: u64,
    pub member_id: u64,
    /// Name shown on leaderboards
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub role: GroupRole,
    #[serde(default)]
    pub pending: bool,
}

impl GroupMembership {
    /// Whether the member has accepted and takes part in the group.
    pub fn is_active(&self) -> bool {
        !self.pending
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupRole {
    Owner,
    Admin,
    #[default]
    Member,
}
