//! The model's plan as it arrived: every field optional, every number
//! possibly of the wrong type.
//!
//! [`RawPlan::from_value`] performs the minimal shape check. Anything that
//! passes it is handed to [`super::normalize`], which turns it into a fully
//! typed [`super::Plan`].

use serde_json::{Map, Value};
use thiserror::Error;

use super::types::Plan;

/// Why a parsed response cannot be used as a plan.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShapeError {
    #[error("response is not a JSON object")]
    NotAnObject,

    #[error("response has no milestones")]
    NoMilestones,

    #[error("first milestone has no title")]
    UntitledFirstMilestone,
}

/// A numeric field whose type is not guaranteed.
#[derive(Debug, Clone, PartialEq)]
pub enum LooseNumber {
    /// Absent or `null`.
    Missing,
    Number(f64),
    /// Present but not a number (a string, boolean, array, ...).
    Other(Value),
}

impl LooseNumber {
    fn from_field(value: Option<&Value>) -> Self {
        match value {
            None | Some(Value::Null) => Self::Missing,
            Some(Value::Number(n)) => n.as_f64().map_or(Self::Missing, Self::Number),
            Some(other) => Self::Other(other.clone()),
        }
    }

    /// JavaScript-style truthiness: missing, `0`, `NaN`, `false` and `""`
    /// are falsy.
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Missing => false,
            Self::Number(n) => *n != 0.0 && !n.is_nan(),
            Self::Other(v) => is_truthy(v),
        }
    }

    /// The value if it is a finite, strictly positive number.
    pub fn positive(&self) -> Option<f64> {
        match self {
            Self::Number(n) if n.is_finite() && *n > 0.0 => Some(*n),
            _ => None,
        }
    }
}

/// A task as the model described it.
#[derive(Debug, Clone, PartialEq)]
pub struct RawTask {
    pub title: Option<String>,
    pub estimated_hours: LooseNumber,
}

/// A milestone as the model described it.
#[derive(Debug, Clone, PartialEq)]
pub struct RawMilestone {
    pub title: Option<String>,
    pub start_date: Option<String>,
    pub target_date: Option<String>,
    /// `None` when the field is absent, not an array, or empty.
    pub tasks: Option<Vec<RawTask>>,
}

/// A plan that passed the minimal shape check.
#[derive(Debug, Clone, PartialEq)]
pub struct RawPlan {
    pub estimated_effort_hours: LooseNumber,
    pub achievable_hours: LooseNumber,
    pub weeks_available: LooseNumber,
    /// Never empty.
    pub milestones: Vec<RawMilestone>,
}

impl RawPlan {
    /// Check the minimal shape and read the loosely typed fields.
    ///
    /// The value must be an object with a non-empty `milestones` array whose
    /// first element has a truthy `title`.
    pub fn from_value(value: &Value) -> Result<Self, ShapeError> {
        let obj = value.as_object().ok_or(ShapeError::NotAnObject)?;

        let milestones = match obj.get("milestones") {
            Some(Value::Array(items)) if !items.is_empty() => items,
            _ => return Err(ShapeError::NoMilestones),
        };

        let first_title = milestones[0].get("title");
        if !first_title.is_some_and(is_truthy) {
            return Err(ShapeError::UntitledFirstMilestone);
        }

        Ok(Self {
            estimated_effort_hours: LooseNumber::from_field(obj.get("estimated_effort_hours")),
            achievable_hours: LooseNumber::from_field(obj.get("achievable_hours")),
            weeks_available: LooseNumber::from_field(obj.get("weeks_available")),
            milestones: milestones.iter().map(RawMilestone::from_value).collect(),
        })
    }
}

impl RawMilestone {
    fn from_value(value: &Value) -> Self {
        let Some(obj) = value.as_object() else {
            return Self {
                title: None,
                start_date: None,
                target_date: None,
                tasks: None,
            };
        };

        let tasks = match obj.get("tasks") {
            Some(Value::Array(items)) if !items.is_empty() => {
                Some(items.iter().map(RawTask::from_value).collect())
            }
            _ => None,
        };

        Self {
            title: text_field(obj, "title"),
            start_date: text_field(obj, "start_date"),
            target_date: text_field(obj, "target_date"),
            tasks,
        }
    }
}

impl RawTask {
    fn from_value(value: &Value) -> Self {
        match value {
            Value::Object(obj) => Self {
                title: text_field(obj, "title"),
                estimated_hours: LooseNumber::from_field(obj.get("estimated_hours")),
            },
            // A bare string is taken as the task title.
            Value::String(s) if !s.trim().is_empty() => Self {
                title: Some(s.trim().to_string()),
                estimated_hours: LooseNumber::Missing,
            },
            _ => Self {
                title: None,
                estimated_hours: LooseNumber::Missing,
            },
        }
    }
}

impl From<&Plan> for RawPlan {
    fn from(plan: &Plan) -> Self {
        Self {
            estimated_effort_hours: LooseNumber::Number(plan.estimated_effort_hours),
            achievable_hours: LooseNumber::Number(plan.achievable_hours),
            weeks_available: LooseNumber::Number(f64::from(plan.weeks_available)),
            milestones: plan
                .milestones
                .iter()
                .map(|m| RawMilestone {
                    title: Some(m.title.clone()),
                    start_date: Some(m.start_date.format("%Y-%m-%d").to_string()),
                    target_date: Some(m.target_date.format("%Y-%m-%d").to_string()),
                    tasks: Some(
                        m.tasks
                            .iter()
                            .map(|t| RawTask {
                                title: Some(t.title.clone()),
                                estimated_hours: LooseNumber::Number(t.estimated_hours),
                            })
                            .collect(),
                    ),
                })
                .collect(),
        }
    }
}

/// JavaScript-style truthiness of a JSON value.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// A non-blank string field, trimmed. Numbers are rendered as text.
fn text_field(obj: &Map<String, Value>, key: &str) -> Option<String> {
    match obj.get(key)? {
        Value::String(s) => Some(s.trim().to_string()).filter(|s| !s.is_empty()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
