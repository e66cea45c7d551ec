//! Derived statistics for the dashboard, profile and stats views.
//!
//! Nothing here is persisted. Every value is recomputed from the raw
//! activity records fetched from the backend.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Aggregated view of one user's activity records.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActivitySummary {
    /// Sum of effective points over approved records
    pub total_points: i64,
    pub period_counts: PeriodCounts,
    pub streak: StreakState,
}

/// Count and point sum for one reporting period.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodBucket {
    /// Qualifying records in the period
    pub count: u32,
    /// Effective points of approved records in the period
    pub points: i64,
}

/// Per-period breakdown.
///
/// `today` is the local calendar day containing "now"; the week and month
/// are trailing 7- and 30-day windows ending at "now".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodCounts {
    pub today: PeriodBucket,
    pub this_week: PeriodBucket,
    pub this_month: PeriodBucket,
}

/// Streak figures derived from qualifying calendar days.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakState {
    // ─── Runs ────────────────────────────────────────────────────
    /// Consecutive qualifying days ending today (or yesterday)
    pub current_streak: u32,
    /// Longest run anywhere in the history
    pub longest_streak: u32,

    // ─── Weekly Goal ─────────────────────────────────────────────
    /// Active days the user aims for per week
    pub weekly_expected: u32,
    /// Active days still missing in the trailing week
    pub weekly_remaining: u32,

    // ─── Metadata ────────────────────────────────────────────────
    /// Most recent qualifying day (local calendar)
    pub last_activity_date: Option<NaiveDate>,
}
