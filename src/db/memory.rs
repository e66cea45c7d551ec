// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! In-memory repositories for tests and local development.

use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::Arc;

use crate::db::{ActivityRepository, GroupRepository};
use crate::error::AppError;
use crate::models::{ActivityRecord, Group, GroupMembership, ValidationStatus};

/// Repository backed by concurrent hash maps.
#[derive(Clone, Default)]
pub struct MemoryStore {
    activities: Arc<DashMap<u64, ActivityRecord>>,
    groups: Arc<DashMap<u64, Group>>,
    /// Keyed by (group_id, member_id)
    memberships: Arc<DashMap<(u64, u64), GroupMembership>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_activity(&self, record: ActivityRecord) {
        self.activities.insert(record.id, record);
    }

    pub fn insert_group(&self, group: Group) {
        self.groups.insert(group.id, group);
    }

    pub fn insert_membership(&self, membership: GroupMembership) {
        self.memberships
            .insert((membership.group_id, membership.member_id), membership);
    }

    fn collect_activities(&self, keep: impl Fn(&ActivityRecord) -> bool) -> Vec<ActivityRecord> {
        let mut records: Vec<ActivityRecord> = self
            .activities
            .iter()
            .filter(|r| keep(r.value()))
            .map(|r| r.value().clone())
            .collect();
        records.sort_by(|a, b| a.occurred_at.cmp(&b.occurred_at).then(a.id.cmp(&b.id)));
        records
    }

    fn collect_memberships(
        &self,
        keep: impl Fn(&GroupMembership) -> bool,
    ) -> Vec<GroupMembership> {
        let mut members: Vec<GroupMembership> = self
            .memberships
            .iter()
            .filter(|m| keep(m.value()))
            .map(|m| m.value().clone())
            .collect();
        members.sort_by_key(|m| (m.group_id, m.member_id));
        members
    }
}

#[async_trait]
impl ActivityRepository for MemoryStore {
    async fn list_for_owner(&self, owner_id: u64) -> Result<Vec<ActivityRecord>, AppError> {
        Ok(self.collect_activities(|r| r.owner_id == owner_id))
    }

    async fn list_for_owners(&self, owner_ids: &[u64]) -> Result<Vec<ActivityRecord>, AppError> {
        Ok(self.collect_activities(|r| owner_ids.contains(&r.owner_id)))
    }

    async fn list_all(&self) -> Result<Vec<ActivityRecord>, AppError> {
        Ok(self.collect_activities(|_| true))
    }

    async fn get(&self, id: u64) -> Result<Option<ActivityRecord>, AppError> {
        Ok(self.activities.get(&id).map(|r| r.value().clone()))
    }

    async fn set_validation(
        &self,
        id: u64,
        status: ValidationStatus,
    ) -> Result<ActivityRecord, AppError> {
        let mut record = self
            .activities
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound(format!("Activity {} not found", id)))?;

        record.validation_status = record.validation_status.transition(status)?;
        Ok(record.value().clone())
    }
}

#[async_trait]
impl GroupRepository for MemoryStore {
    async fn get_group(&self, group_id: u64) -> Result<Option<Group>, AppError> {
        Ok(self.groups.get(&group_id).map(|g| g.value().clone()))
    }

    async fn memberships_for_user(&self, user_id: u64) -> Result<Vec<GroupMembership>, AppError> {
        Ok(self.collect_memberships(|m| m.member_id == user_id))
    }

    async fn members_of(&self, group_id: u64) -> Result<Vec<GroupMembership>, AppError> {
        Ok(self.collect_memberships(|m| m.group_id == group_id))
    }

    async fn respond_to_invitation(
        &self,
        group_id: u64,
        user_id: u64,
        accept: bool,
    ) -> Result<Option<GroupMembership>, AppError> {
        let key = (group_id, user_id);
        let pending = self
            .memberships
            .get(&key)
            .map(|m| m.pending)
            .ok_or_else(|| {
                AppError::NotFound(format!("No invitation to group {} for user", group_id))
            })?;

        if !pending {
            return Err(AppError::Conflict(
                "Invitation was already accepted".to_string(),
            ));
        }

        if accept {
            let mut membership = self
                .memberships
                .get_mut(&key)
                .ok_or_else(|| AppError::NotFound("Invitation disappeared".to_string()))?;
            membership.pending = false;
            Ok(Some(membership.value().clone()))
        } else {
            self.memberships.remove(&key);
            Ok(None)
        }
    }
}
