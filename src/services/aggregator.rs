// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Activity aggregation: point totals, period breakdowns and streaks.
//!
//! The aggregator is a pure transformation over records already fetched
//! from the backend. It never fails: empty or partial input produces
//! zero-valued output so the dashboard stays renderable.

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, Utc};
use serde::Deserialize;
use std::collections::BTreeSet;
use std::str::FromStr;

use crate::models::{
    ActivityRecord, ActivitySummary, PeriodBucket, PeriodCounts, StreakState, ValidationStatus,
};
use crate::services::formatter::date_bucket_key;

const WEEK_DAYS: i64 = 7;
const MONTH_DAYS: i64 = 30;

/// Which records make a calendar day count as active.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StreakPolicy {
    /// Only moderator-approved records
    ApprovedOnly,
    /// Approved and still-pending records
    #[default]
    NonRejected,
    /// Any submitted record
    Any,
}

impl StreakPolicy {
    pub fn qualifies(self, status: ValidationStatus) -> bool {
        match self {
            StreakPolicy::ApprovedOnly => status == ValidationStatus::Approved,
            StreakPolicy::NonRejected => status != ValidationStatus::Rejected,
            StreakPolicy::Any => true,
        }
    }
}

impl FromStr for StreakPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "approved_only" => Ok(StreakPolicy::ApprovedOnly),
            "non_rejected" => Ok(StreakPolicy::NonRejected),
            "any" => Ok(StreakPolicy::Any),
            other => Err(format!("unknown streak policy: {}", other)),
        }
    }
}

/// Trailing window used by leaderboards and period buckets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Period {
    Today,
    Week,
    Month,
    #[default]
    All,
}

/// Computes [`ActivitySummary`] values for one user.
#[derive(Debug, Clone, Copy)]
pub struct ActivityAggregator {
    policy: StreakPolicy,
    tz: FixedOffset,
    weekly_expected: u32,
}

impl ActivityAggregator {
    pub fn new(policy: StreakPolicy, tz: FixedOffset, weekly_expected: u32) -> Self {
        Self {
            policy,
            tz,
            weekly_expected,
        }
    }

    pub fn tz(&self) -> &FixedOffset {
        &self.tz
    }

    /// Same policy and goal, bucketed in another local offset.
    pub fn with_tz(&self, tz: FixedOffset) -> Self {
        Self { tz, ..*self }
    }

    /// Summarize a user's records as of `now`.
    pub fn aggregate(&self, records: &[ActivityRecord], now: DateTime<Utc>) -> ActivitySummary {
        let total_points = sum_points(records);

        ActivitySummary {
            total_points,
            period_counts: self.period_counts(records, now),
            streak: self.streak(records, now),
        }
    }

    /// Whether a record falls in `period` as of `now`.
    pub fn in_period(&self, record: &ActivityRecord, period: Period, now: DateTime<Utc>) -> bool {
        if record.occurred_at > now {
            return false;
        }
        match period {
            Period::Today => {
                date_bucket_key(record.occurred_at, &self.tz) == date_bucket_key(now, &self.tz)
            }
            Period::Week => record.occurred_at > now - Duration::days(WEEK_DAYS),
            Period::Month => record.occurred_at > now - Duration::days(MONTH_DAYS),
            Period::All => true,
        }
    }

    /// Effective points earned in `period`, or `None` if nothing approved
    /// happened in it.
    pub fn points_in_period(
        &self,
        records: &[ActivityRecord],
        period: Period,
        now: DateTime<Utc>,
    ) -> Option<i64> {
        let mut approved = records
            .iter()
            .filter(|r| r.validation_status == ValidationStatus::Approved)
            .filter(|r| self.in_period(r, period, now))
            .peekable();

        approved.peek()?;
        Some(sum_points(approved))
    }

    fn period_counts(&self, records: &[ActivityRecord], now: DateTime<Utc>) -> PeriodCounts {
        let bucket = |period: Period| {
            records
                .iter()
                .filter(|r| self.in_period(r, period, now))
                .fold(PeriodBucket::default(), |mut acc, r| {
                    if self.policy.qualifies(r.validation_status) {
                        acc.count = acc.count.saturating_add(1);
                    }
                    acc.points = acc.points.saturating_add(r.effective_points());
                    acc
                })
        };

        PeriodCounts {
            today: bucket(Period::Today),
            this_week: bucket(Period::Week),
            this_month: bucket(Period::Month),
        }
    }

    fn streak(&self, records: &[ActivityRecord], now: DateTime<Utc>) -> StreakState {
        let days: BTreeSet<NaiveDate> = records
            .iter()
            .filter(|r| r.occurred_at <= now)
            .filter(|r| self.policy.qualifies(r.validation_status))
            .map(|r| date_bucket_key(r.occurred_at, &self.tz))
            .collect();

        let active_this_week = records
            .iter()
            .filter(|r| self.policy.qualifies(r.validation_status))
            .filter(|r| self.in_period(r, Period::Week, now))
            .map(|r| date_bucket_key(r.occurred_at, &self.tz))
            .collect::<BTreeSet<_>>()
            .len() as u32;

        let today = date_bucket_key(now, &self.tz);

        StreakState {
            current_streak: current_run(&days, today),
            longest_streak: longest_run(&days),
            weekly_expected: self.weekly_expected,
            weekly_remaining: self.weekly_expected.saturating_sub(active_this_week),
            last_activity_date: days.iter().next_back().copied(),
        }
    }
}

/// Sum of effective points, saturating at the `i64` bounds.
pub fn sum_points<'a>(records: impl IntoIterator<Item = &'a ActivityRecord>) -> i64 {
    records
        .into_iter()
        .fold(0i64, |total, r| total.saturating_add(r.effective_points()))
}

/// Consecutive days ending today, or ending yesterday if today has no
/// activity yet.
fn current_run(days: &BTreeSet<NaiveDate>, today: NaiveDate) -> u32 {
    let mut cursor = if days.contains(&today) {
        today
    } else {
        match today.pred_opt() {
            Some(yesterday) if days.contains(&yesterday) => yesterday,
            _ => return 0,
        }
    };

    let mut run = 0;
    while days.contains(&cursor) {
        run += 1;
        match cursor.pred_opt() {
            Some(prev) => cursor = prev,
            None => break,
        }
    }
    run
}

fn longest_run(days: &BTreeSet<NaiveDate>) -> u32 {
    let mut longest = 0;
    let mut run = 0;
    let mut previous: Option<NaiveDate> = None;

    for &day in days {
        run = match previous {
            Some(prev) if prev.succ_opt() == Some(day) => run + 1,
            _ => 1,
        };
        longest = longest.max(run);
        previous = Some(day);
    }
    longest
}
