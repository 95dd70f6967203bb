use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Which path produced a stored roadmap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "text", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum PlanSource {
    /// The generative model returned a usable plan.
    Generated,
    /// The template-based builder produced the plan.
    Fallback,
}

impl fmt::Display for PlanSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Generated => "generated",
            Self::Fallback => "fallback",
        };
        f.write_str(s)
    }
}

impl FromStr for PlanSource {
    type Err = PlanSourceParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "generated" => Ok(Self::Generated),
            "fallback" => Ok(Self::Fallback),
            other => Err(PlanSourceParseError(other.to_owned())),
        }
    }
}

/// Error returned when parsing an invalid [`PlanSource`] string.
#[derive(Debug, Clone, thiserror::Error)]
#[error("invalid plan source: {0:?}")]
pub struct PlanSourceParseError(pub String);

// ---------------------------------------------------------------------------
// Row structs
// ---------------------------------------------------------------------------

/// A goal -- the user's objective plus the headline numbers of its roadmap.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Goal {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub deadline: NaiveDate,
    pub hours_per_week: f64,
    pub estimated_effort_hours: f64,
    pub achievable_hours: f64,
    pub weeks_available: i32,
    pub source: PlanSource,
    pub created_at: DateTime<Utc>,
}

/// A milestone -- one ordered phase of a goal's roadmap.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Milestone {
    pub id: Uuid,
    pub goal_id: Uuid,
    pub position: i32,
    pub title: String,
    pub start_date: NaiveDate,
    pub target_date: NaiveDate,
    /// Percentage of completed tasks, 0-100.
    pub progress: i32,
    pub created_at: DateTime<Utc>,
}

/// A task inside a milestone.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Task {
    pub id: Uuid,
    pub milestone_id: Uuid,
    pub position: i32,
    pub task_name: String,
    pub estimated_hours: f64,
    pub is_completed: bool,
    pub created_at: DateTime<Utc>,
}

/// Percentage of completed tasks, rounded down. An empty milestone is 0%.
pub fn progress_percent(completed: i64, total: i64) -> i32 {
    if total <= 0 {
        return 0;
    }
    let pct = (completed.clamp(0, total) * 100) / total;
    // Bounded to 0..=100 by the clamp above.
    pct as i32
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
