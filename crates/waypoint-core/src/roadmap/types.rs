//! Roadmap value types and the validated input to plan generation.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Hours per week assumed when the caller does not give one.
pub const DEFAULT_HOURS_PER_WEEK: f64 = 5.0;

/// Hours in a week; the most anyone can commit.
pub const MAX_HOURS_PER_WEEK: f64 = 168.0;

/// A generated roadmap. Produced fresh for every request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    pub estimated_effort_hours: f64,
    pub achievable_hours: f64,
    pub weeks_available: u32,
    pub milestones: Vec<Milestone>,
}

/// One ordered phase of a roadmap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Milestone {
    pub title: String,
    pub start_date: NaiveDate,
    pub target_date: NaiveDate,
    pub tasks: Vec<Task>,
}

/// An atomic unit of work with an hour estimate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub title: String,
    pub estimated_hours: f64,
}

impl Task {
    pub fn new(title: impl Into<String>, estimated_hours: f64) -> Self {
        Self {
            title: title.into(),
            estimated_hours,
        }
    }
}

/// Errors from validating the caller's planning input.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlanRequestError {
    #[error("title and targetDate required")]
    MissingField,

    #[error("invalid targetDate {0:?} (expected YYYY-MM-DD or an RFC 3339 timestamp)")]
    InvalidDate(String),

    #[error("hoursPerWeek must be a positive number no greater than 168, got {0}")]
    InvalidHours(f64),
}

/// Validated input for one plan generation.
#[derive(Debug, Clone, PartialEq)]
pub struct PlanRequest {
    pub title: String,
    pub description: String,
    /// The deadline as an instant; a bare date means midnight UTC.
    pub target: DateTime<Utc>,
    pub hours_per_week: f64,
}

impl PlanRequest {
    /// Validate raw caller input.
    ///
    /// `title` and `target_date` must be non-blank. `hours_per_week`
    /// defaults to [`DEFAULT_HOURS_PER_WEEK`] and must be positive and at
    /// most [`MAX_HOURS_PER_WEEK`] when given.
    pub fn new(
        title: &str,
        description: &str,
        target_date: &str,
        hours_per_week: Option<f64>,
    ) -> Result<Self, PlanRequestError> {
        let title = title.trim();
        let target_date = target_date.trim();
        if title.is_empty() || target_date.is_empty() {
            return Err(PlanRequestError::MissingField);
        }

        let target = parse_target_date(target_date)
            .ok_or_else(|| PlanRequestError::InvalidDate(target_date.to_string()))?;

        let hours_per_week = hours_per_week.unwrap_or(DEFAULT_HOURS_PER_WEEK);
        if !(hours_per_week > 0.0 && hours_per_week <= MAX_HOURS_PER_WEEK) {
            return Err(PlanRequestError::InvalidHours(hours_per_week));
        }

        Ok(Self {
            title: title.to_string(),
            description: description.trim().to_string(),
            target,
            hours_per_week,
        })
    }

    /// The calendar date of the deadline.
    pub fn deadline(&self) -> NaiveDate {
        self.target.date_naive()
    }
}

/// Parse `YYYY-MM-DD` (midnight UTC) or an RFC 3339 timestamp.
pub fn parse_target_date(input: &str) -> Option<DateTime<Utc>> {
    if let Ok(date) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc());
    }
    DateTime::parse_from_rfc3339(input)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}
