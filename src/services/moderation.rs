// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Moderation of submitted activities.
//!
//! Keeps a query cache of records for the admin views. Decisions show up
//! in the cache immediately and are rolled back if the backend refuses
//! them.

use dashmap::DashMap;
use std::collections::HashSet;
use std::sync::Arc;

use crate::db::ActivityRepository;
use crate::error::{AppError, Result};
use crate::models::{ActivityKind, ActivityRecord, ValidationStatus};
use crate::services::optimistic::run_optimistic;

/// Filter for the moderation list.
#[derive(Debug, Clone, Default)]
pub struct ModerationFilter {
    pub status: Option<ValidationStatus>,
    pub owner_id: Option<u64>,
    pub kind: Option<ActivityKind>,
}

impl ModerationFilter {
    fn matches(&self, record: &ActivityRecord) -> bool {
        self.status.map_or(true, |s| record.validation_status == s)
            && self.owner_id.map_or(true, |o| record.owner_id == o)
            && self.kind.map_or(true, |k| record.kind == k)
    }
}

pub struct ModerationService {
    repo: Arc<dyn ActivityRepository>,
    cache: DashMap<u64, ActivityRecord>,
}

impl ModerationService {
    pub fn new(repo: Arc<dyn ActivityRepository>) -> Self {
        Self {
            repo,
            cache: DashMap::new(),
        }
    }

    /// Refresh the cache and return matching records, newest first.
    ///
    /// If the refresh fails the last cached view is served.
    pub async fn list(&self, filter: &ModerationFilter) -> Vec<ActivityRecord> {
        match self.repo.list_all().await {
            Ok(records) => {
                // Upsert first, then evict; readers never see a missing entry.
                let fresh: HashSet<u64> = records.iter().map(|r| r.id).collect();
                for record in records {
                    self.cache.insert(record.id, record);
                }
                self.cache.retain(|id, _| fresh.contains(id));
            }
            Err(e) => {
                tracing::warn!(error = %e, cached = self.cache.len(), "Moderation refresh failed, serving cache");
            }
        }

        let mut records: Vec<ActivityRecord> = self
            .cache
            .iter()
            .filter(|r| filter.matches(r.value()))
            .map(|r| r.value().clone())
            .collect();
        records.sort_by(|a, b| b.occurred_at.cmp(&a.occurred_at).then(b.id.cmp(&a.id)));
        records
    }

    /// Current cached view of one record.
    pub fn cached(&self, id: u64) -> Option<ActivityRecord> {
        self.cache.get(&id).map(|r| r.value().clone())
    }

    /// Approve or reject a pending record.
    pub async fn decide(&self, id: u64, decision: ValidationStatus) -> Result<ActivityRecord> {
        if decision == ValidationStatus::Pending {
            return Err(AppError::BadRequest(
                "Decision must be 'approved' or 'rejected'".to_string(),
            ));
        }

        if !self.cache.contains_key(&id) {
            let record = self
                .repo
                .get(id)
                .await?
                .ok_or_else(|| AppError::NotFound(format!("Activity {} not found", id)))?;
            self.cache.insert(id, record);
        }

        let repo = self.repo.clone();
        let confirmed = run_optimistic(
            &self.cache,
            id,
            |record| {
                record.validation_status = record.validation_status.transition(decision)?;
                Ok(())
            },
            |_| async move { repo.set_validation(id, decision).await },
        )
        .await?;

        // Server state replaces the optimistic value.
        self.cache.insert(id, confirmed.clone());

        tracing::info!(
            activity_id = id,
            owner_id = confirmed.owner_id,
            status = confirmed.validation_status.as_str(),
            "Validation decision recorded"
        );
        Ok(confirmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryStore;
    use async_trait::async_trait;

    fn record(id: u64, status: ValidationStatus) -> ActivityRecord {
        ActivityRecord {
            id,
            owner_id: 3,
            kind: ActivityKind::Meal,
            occurred_at: "2026-04-01T12:00:00Z".parse().unwrap(),
            base_points: 20.0,
            multiplier: 1.0,
            validation_status: status,
        }
    }

    /// Serves reads from memory but refuses every decision.
    struct RejectingRepo(MemoryStore);

    #[async_trait]
    impl ActivityRepository for RejectingRepo {
        async fn list_for_owner(&self, owner_id: u64) -> Result<Vec<ActivityRecord>> {
            self.0.list_for_owner(owner_id).await
        }
        async fn list_for_owners(&self, owner_ids: &[u64]) -> Result<Vec<ActivityRecord>> {
            self.0.list_for_owners(owner_ids).await
        }
        async fn list_all(&self) -> Result<Vec<ActivityRecord>> {
            self.0.list_all().await
        }
        async fn get(&self, id: u64) -> Result<Option<ActivityRecord>> {
            self.0.get(id).await
        }
        async fn set_validation(&self, _id: u64, _status: ValidationStatus) -> Result<ActivityRecord> {
            Err(AppError::Backend("HTTP 503: unavailable".to_string()))
        }
    }

    #[tokio::test]
    async fn test_decide_updates_cache_and_store() {
        let store = MemoryStore::new();
        store.insert_activity(record(1, ValidationStatus::Pending));
        let service = ModerationService::new(Arc::new(store.clone()));

        let updated = service.decide(1, ValidationStatus::Approved).await.unwrap();

        assert_eq!(updated.validation_status, ValidationStatus::Approved);
        assert_eq!(
            service.cached(1).unwrap().validation_status,
            ValidationStatus::Approved
        );
        assert_eq!(
            store.get(1).await.unwrap().unwrap().validation_status,
            ValidationStatus::Approved
        );
    }

    #[tokio::test]
    async fn test_backend_failure_rolls_back_cache() {
        let store = MemoryStore::new();
        store.insert_activity(record(1, ValidationStatus::Pending));
        let service = ModerationService::new(Arc::new(RejectingRepo(store)));

        let err = service
            .decide(1, ValidationStatus::Rejected)
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Backend(_)));
        assert_eq!(
            service.cached(1).unwrap().validation_status,
            ValidationStatus::Pending
        );
    }

    #[tokio::test]
    async fn test_terminal_record_conflicts() {
        let store = MemoryStore::new();
        store.insert_activity(record(1, ValidationStatus::Approved));
        let service = ModerationService::new(Arc::new(store));

        let err = service
            .decide(1, ValidationStatus::Rejected)
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Conflict(_)));
        assert_eq!(
            service.cached(1).unwrap().validation_status,
            ValidationStatus::Approved
        );
    }

    #[tokio::test]
    async fn test_pending_decision_is_bad_request() {
        let service = ModerationService::new(Arc::new(MemoryStore::new()));
        let err = service
            .decide(1, ValidationStatus::Pending)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[tokio::test]
    async fn test_unknown_record_not_found() {
        let service = ModerationService::new(Arc::new(MemoryStore::new()));
        let err = service
            .decide(42, ValidationStatus::Approved)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_list_filters_and_orders() {
        let store = MemoryStore::new();
        let mut older = record(1, ValidationStatus::Pending);
        older.occurred_at = "2026-03-01T12:00:00Z".parse().unwrap();
        store.insert_activity(older);
        store.insert_activity(record(2, ValidationStatus::Pending));
        store.insert_activity(record(3, ValidationStatus::Approved));
        let service = ModerationService::new(Arc::new(store));

        let pending = service
            .list(&ModerationFilter {
                status: Some(ValidationStatus::Pending),
                ..Default::default()
            })
            .await;

        let ids: Vec<u64> = pending.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![2, 1]);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_refresh_never_hides_cached_records() {
        let store = MemoryStore::new();
        for id in 1..=200 {
            store.insert_activity(record(id, ValidationStatus::Pending));
        }
        let service = Arc::new(ModerationService::new(Arc::new(store)));
        service.list(&ModerationFilter::default()).await;

        let refresher = {
            let service = service.clone();
            tokio::spawn(async move {
                for _ in 0..50 {
                    service.list(&ModerationFilter::default()).await;
                }
            })
        };

        let readers: Vec<_> = (0..3)
            .map(|_| {
                let service = service.clone();
                tokio::spawn(async move {
                    for _ in 0..50 {
                        for id in 1..=200 {
                            assert!(service.cached(id).is_some(), "record {} vanished", id);
                        }
                        tokio::task::yield_now().await;
                    }
                })
            })
            .collect();

        refresher.await.unwrap();
        for reader in readers {
            reader.await.unwrap();
        }
    }

    /// Serves `list_all` from a replaceable snapshot.
    struct SnapshotRepo(std::sync::Mutex<Vec<ActivityRecord>>);

    #[async_trait]
    impl ActivityRepository for SnapshotRepo {
        async fn list_for_owner(&self, _owner_id: u64) -> Result<Vec<ActivityRecord>> {
            Ok(Vec::new())
        }
        async fn list_for_owners(&self, _owner_ids: &[u64]) -> Result<Vec<ActivityRecord>> {
            Ok(Vec::new())
        }
        async fn list_all(&self) -> Result<Vec<ActivityRecord>> {
            Ok(self.0.lock().unwrap().clone())
        }
        async fn get(&self, _id: u64) -> Result<Option<ActivityRecord>> {
            Ok(None)
        }
        async fn set_validation(&self, id: u64, _status: ValidationStatus) -> Result<ActivityRecord> {
            Err(AppError::NotFound(format!("Activity {} not found", id)))
        }
    }

    #[tokio::test]
    async fn test_refresh_evicts_records_gone_upstream() {
        let repo = Arc::new(SnapshotRepo(std::sync::Mutex::new(vec![
            record(1, ValidationStatus::Pending),
            record(2, ValidationStatus::Pending),
        ])));
        let service = ModerationService::new(repo.clone());
        assert_eq!(service.list(&ModerationFilter::default()).await.len(), 2);

        *repo.0.lock().unwrap() = vec![record(2, ValidationStatus::Approved)];
        let listed = service.list(&ModerationFilter::default()).await;

        assert_eq!(listed.len(), 1);
        assert!(service.cached(1).is_none());
        assert_eq!(
            service.cached(2).unwrap().validation_status,
            ValidationStatus::Approved
        );
    }
}
