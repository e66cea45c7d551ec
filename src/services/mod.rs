// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod aggregator;
pub mod backend;
pub mod formatter;
pub mod moderation;
pub mod optimistic;
pub mod ranking;
pub mod selection;

pub use aggregator::{ActivityAggregator, Period, StreakPolicy};
pub use backend::BackendClient;
pub use moderation::{ModerationFilter, ModerationService};
pub use optimistic::{run_optimistic, Optimistic};
pub use ranking::RankingProjector;
pub use selection::SelectionStore;
