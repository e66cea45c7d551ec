// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Activity record model (workout check-ins and meal logs).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::services::formatter::rounded_points;

/// A workout check-in or meal log as returned by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityRecord {
    /// Backend record ID
    pub id: u64,
    /// User who logged the activity
    pub owner_id: u64,
    /// Workout or meal
    #[serde(default)]
    pub kind: ActivityKind,
    /// When the activity happened
    pub occurred_at: DateTime<Utc>,
    /// Points before the multiplier is applied
    #[serde(default)]
    pub base_points: f64,
    /// Server-computed scoring factor
    #[serde(default = "default_multiplier")]
    pub multiplier: f64,
    /// Moderator decision state
    #[serde(default)]
    pub validation_status: ValidationStatus,
}

fn default_multiplier() -> f64 {
    1.0
}

impl ActivityRecord {
    /// Points this record contributes to totals.
    ///
    /// Zero unless approved. Non-finite inputs also yield zero.
    pub fn effective_points(&self) -> i64 {
        if self.validation_status != ValidationStatus::Approved {
            return 0;
        }
        if !self.base_points.is_finite() || !self.multiplier.is_finite() {
            return 0;
        }
        rounded_points(self.base_points, self.multiplier)
    }
}

/// What kind of activity a record is.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityKind {
    #[default]
    Workout,
    Meal,
}

/// Moderator decision on a submitted activity.
///
/// `Pending` moves to `Approved` or `Rejected` exactly once; both are terminal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

impl ValidationStatus {
    pub fn is_terminal(self) -> bool {
        !matches!(self, ValidationStatus::Pending)
    }

    /// Validate a moderator decision against the current state.
    pub fn transition(self, to: ValidationStatus) -> Result<ValidationStatus, AppError> {
        if self.is_terminal() || !to.is_terminal() {
            return Err(AppError::Conflict(format!(
                "Cannot change validation status from {} to {}",
                self.as_str(),
                to.as_str()
            )));
        }
        Ok(to)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ValidationStatus::Pending => "pending",
            ValidationStatus::Approved => "approved",
            ValidationStatus::Rejected => "rejected",
        }
    }
}
