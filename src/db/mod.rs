//! Data access layer.
//!
//! Each entity is reached through one repository trait, so routes never
//! know whether records come from the remote backend or from memory.

pub mod memory;

pub use memory::MemoryStore;

use async_trait::async_trait;

use crate::error::AppError;
use crate::models::{ActivityRecord, Group, GroupMembership, ValidationStatus};

/// Workout and meal records.
#[async_trait]
pub trait ActivityRepository: Send + Sync {
    /// All records logged by one user.
    async fn list_for_owner(&self, owner_id: u64) -> Result<Vec<ActivityRecord>, AppError>;

    /// All records logged by any of `owner_ids`.
    async fn list_for_owners(&self, owner_ids: &[u64]) -> Result<Vec<ActivityRecord>, AppError>;

    /// Every record (moderation views).
    async fn list_all(&self) -> Result<Vec<ActivityRecord>, AppError>;

    async fn get(&self, id: u64) -> Result<Option<ActivityRecord>, AppError>;

    /// Record a moderator decision and return the updated record.
    async fn set_validation(
        &self,
        id: u64,
        status: ValidationStatus,
    ) -> Result<ActivityRecord, AppError>;
}

/// Groups and memberships.
#[async_trait]
pub trait GroupRepository: Send + Sync {
    async fn get_group(&self, group_id: u64) -> Result<Option<Group>, AppError>;

    /// Memberships of one user, including pending invitations.
    async fn memberships_for_user(&self, user_id: u64) -> Result<Vec<GroupMembership>, AppError>;

    /// Members of one group, including pending invitations.
    async fn members_of(&self, group_id: u64) -> Result<Vec<GroupMembership>, AppError>;

    /// Accept or reject a pending invitation.
    ///
    /// Returns the accepted membership, or `None` when rejected.
    async fn respond_to_invitation(
        &self,
        group_id: u64,
        user_id: u64,
        accept: bool,
    ) -> Result<Option<GroupMembership>, AppError>;
}
