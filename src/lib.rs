// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Fitness-Tracker: points, streaks and group leaderboards for logged
//! workouts and meals.
//!
//! This crate provides the backend API that aggregates activity records,
//! ranks group members and lets admins moderate submissions.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;

use config::Config;
use db::{ActivityRepository, GroupRepository};
use services::{ActivityAggregator, ModerationService, RankingProjector, SelectionStore};
use std::sync::Arc;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub activities: Arc<dyn ActivityRepository>,
    pub groups: Arc<dyn GroupRepository>,
    pub aggregator: ActivityAggregator,
    pub ranking: RankingProjector,
    pub selection: SelectionStore,
    pub moderation: ModerationService,
}

impl AppState {
    pub fn new(
        config: Config,
        activities: Arc<dyn ActivityRepository>,
        groups: Arc<dyn GroupRepository>,
    ) -> Self {
        let aggregator = ActivityAggregator::new(
            config.streak_policy,
            config.timezone(),
            config.weekly_expected_days,
        );
        let moderation = ModerationService::new(activities.clone());

        Self {
            config,
            activities,
            groups,
            aggregator,
            ranking: RankingProjector,
            selection: SelectionStore::new(),
            moderation,
        }
    }
}
