// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Optimistic cache updates with automatic rollback.
//!
//! A mutation is applied to the local cache first so readers see it
//! immediately. If the guard is dropped without [`Optimistic::commit`]
//! (the backend call failed, or the handler returned early) the previous
//! value is restored.

use dashmap::DashMap;
use std::future::Future;
use std::hash::Hash;

use crate::error::AppError;

/// Guard for one optimistically mutated cache entry.
pub struct Optimistic<'a, K, V>
where
    K: Eq + Hash + Clone + std::fmt::Debug,
    V: Clone + PartialEq,
{
    cache: &'a DashMap<K, V>,
    key: K,
    snapshot: Option<V>,
    applied: V,
}

impl<'a, K, V> Optimistic<'a, K, V>
where
    K: Eq + Hash + Clone + std::fmt::Debug,
    V: Clone + PartialEq,
{
    /// Apply `mutate` to the cached entry for `key`.
    ///
    /// The cache is untouched if the entry is missing or `mutate` fails.
    pub fn apply<F>(cache: &'a DashMap<K, V>, key: K, mutate: F) -> Result<Self, AppError>
    where
        F: FnOnce(&mut V) -> Result<(), AppError>,
    {
        let mut entry = cache
            .get_mut(&key)
            .ok_or_else(|| AppError::NotFound(format!("{:?} is not cached", key)))?;

        let snapshot = entry.clone();
        let mut applied = snapshot.clone();
        mutate(&mut applied)?;
        *entry = applied.clone();
        drop(entry);

        Ok(Self {
            cache,
            key,
            snapshot: Some(snapshot),
            applied,
        })
    }

    /// The value now visible in the cache.
    pub fn applied(&self) -> &V {
        &self.applied
    }

    /// Keep the mutation.
    pub fn commit(mut self) {
        self.snapshot = None;
    }
}

impl<K, V> Drop for Optimistic<'_, K, V>
where
    K: Eq + Hash + Clone + std::fmt::Debug,
    V: Clone + PartialEq,
{
    fn drop(&mut self) {
        let Some(snapshot) = self.snapshot.take() else {
            return;
        };

        // Only undo our own write; a newer value from a refetch wins.
        if let Some(mut entry) = self.cache.get_mut(&self.key) {
            if *entry == self.applied {
                *entry = snapshot;
                tracing::warn!(key = ?self.key, "Rolled back optimistic update");
            }
        }
    }
}

/// Apply `mutate` locally, then confirm with `remote`.
///
/// The local change is kept only if `remote` succeeds.
pub async fn run_optimistic<K, V, T, M, R, Fut>(
    cache: &DashMap<K, V>,
    key: K,
    mutate: M,
    remote: R,
) -> Result<T, AppError>
where
    K: Eq + Hash + Clone + std::fmt::Debug,
    V: Clone + PartialEq,
    M: FnOnce(&mut V) -> Result<(), AppError>,
    R: FnOnce(V) -> Fut,
    Fut: Future<Output = Result<T, AppError>>,
{
    let guard = Optimistic::apply(cache, key, mutate)?;
    let result = remote(guard.applied().clone()).await?;
    guard.commit();
    Ok(result)
}
