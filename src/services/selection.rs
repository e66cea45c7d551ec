// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Per-user "selected group" store with change notification.
//!
//! Every view that depends on the selected group subscribes once and is
//! woken on each change, instead of re-reading the value on a timer.

use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::watch;

/// Shared selected-group state, keyed by user ID.
#[derive(Clone, Default)]
pub struct SelectionStore {
    channels: Arc<DashMap<u64, watch::Sender<Option<u64>>>>,
}

impl SelectionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Currently selected group for a user.
    pub fn current(&self, user_id: u64) -> Option<u64> {
        self.channels
            .get(&user_id)
            .and_then(|tx| *tx.borrow())
    }

    /// Change the selection and notify every subscriber.
    ///
    /// Returns the previous selection. Setting the same value again does
    /// not wake subscribers.
    pub fn select(&self, user_id: u64, group_id: Option<u64>) -> Option<u64> {
        let mut previous = None;
        self.with_sender(user_id, |sender| {
            sender.send_if_modified(|current| {
                previous = *current;
                if *current == group_id {
                    false
                } else {
                    *current = group_id;
                    true
                }
            })
        });

        tracing::debug!(user_id, ?previous, selected = ?group_id, "Group selection changed");
        previous
    }

    /// Subscribe to a user's selection.
    ///
    /// The receiver sees the current value immediately and every later change.
    pub fn subscribe(&self, user_id: u64) -> watch::Receiver<Option<u64>> {
        self.with_sender(user_id, |sender| sender.subscribe())
    }

    /// Clear the selection if it points at `group_id` (e.g. after leaving it).
    pub fn clear_if_selected(&self, user_id: u64, group_id: u64) {
        if let Some(sender) = self.channels.get(&user_id) {
            sender.send_if_modified(|current| {
                if *current == Some(group_id) {
                    *current = None;
                    true
                } else {
                    false
                }
            });
        }
    }

    fn with_sender<R>(&self, user_id: u64, f: impl FnOnce(&watch::Sender<Option<u64>>) -> R) -> R {
        let sender = self
            .channels
            .entry(user_id)
            .or_insert_with(|| watch::channel(None).0);
        f(&*sender)
    }
}
