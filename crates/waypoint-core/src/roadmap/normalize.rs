//! Turn a shape-checked [`RawPlan`] into a fully populated [`Plan`].
//!
//! Every field has an explicit default rule:
//!
//! | field                         | rule when missing or unusable                 |
//! |-------------------------------|-----------------------------------------------|
//! | `achievable_hours`, `weeks_available` | local values (both, if either is not a positive number) |
//! | `weeks_available`             | floored to whole weeks, at least 4            |
//! | oversized figures             | local values (both) when weeks exceed `MAX_WEEKS` or the effort is not finite |
//! | `estimated_effort_hours`      | always `achievable_hours * weeks_available`   |
//! | milestone `title`             | `Milestone {n}`                               |
//! | milestone dates               | the milestone's weekly window from `now`      |
//! | milestone `tasks`             | two generic tasks for the goal                |
//! | task `title`                  | `Task {n}`                                    |
//! | task `estimated_hours`        | `0`                                           |
//!
//! Normalizing an already normalized plan returns it unchanged.

use chrono::{DateTime, NaiveDate, Utc};

use super::availability::{Availability, MAX_WEEKS, MIN_WEEKS, week_window};
use super::raw::{LooseNumber, RawMilestone, RawPlan, RawTask};
use super::types::{Milestone, Plan, Task, parse_target_date};

/// Hours assigned to the first generic task.
pub const DEFAULT_RESEARCH_HOURS: f64 = 8.0;
/// Hours assigned to the second generic task.
pub const DEFAULT_PRACTICE_HOURS: f64 = 6.0;

/// Normalize a model-provided plan.
///
/// `local` is the budget computed from the caller's input; it backs every
/// headline number the model left out or got wrong.
pub fn normalize(raw: RawPlan, goal_title: &str, local: Availability, now: DateTime<Utc>) -> Plan {
    let achievable = coalesce(&raw.achievable_hours, local.achievable_hours);
    let weeks = coalesce(&raw.weeks_available, f64::from(local.weeks));

    let usable = match (achievable, weeks.and_then(whole_weeks)) {
        (Some(a), Some(w)) if (a * f64::from(w)).is_finite() => Some((a, w)),
        _ => None,
    };
    let (achievable_hours, weeks_available) =
        usable.unwrap_or((local.achievable_hours, local.weeks));

    let milestones = raw
        .milestones
        .into_iter()
        .enumerate()
        .map(|(i, m)| normalize_milestone(m, i, goal_title, now))
        .collect();

    Plan {
        estimated_effort_hours: achievable_hours * f64::from(weeks_available),
        achievable_hours,
        weeks_available,
        milestones,
    }
}

/// The two generic tasks used when a milestone arrives without any.
pub fn default_tasks(goal_title: &str) -> Vec<Task> {
    vec![
        Task::new(format!("Research about {goal_title}"), DEFAULT_RESEARCH_HOURS),
        Task::new(format!("Practical task for {goal_title}"), DEFAULT_PRACTICE_HOURS),
    ]
}

/// Falsy values are replaced by `local`; truthy values must be positive
/// numbers to be usable.
fn coalesce(value: &LooseNumber, local: f64) -> Option<f64> {
    if value.is_truthy() {
        value.positive()
    } else {
        Some(local)
    }
}

/// Floor to whole weeks, at least [`MIN_WEEKS`]. `None` above [`MAX_WEEKS`].
fn whole_weeks(weeks: f64) -> Option<u32> {
    let floored = weeks.floor();
    if floored > f64::from(MAX_WEEKS) {
        return None;
    }
    // Positive and within u32 range after the check above.
    Some((floored as u32).max(MIN_WEEKS))
}

fn normalize_milestone(
    raw: RawMilestone,
    index: usize,
    goal_title: &str,
    now: DateTime<Utc>,
) -> Milestone {
    let (default_start, default_target) = week_window(now, index);

    let tasks = match raw.tasks {
        Some(tasks) => tasks.into_iter().enumerate().map(normalize_task).collect(),
        None => default_tasks(goal_title),
    };

    Milestone {
        title: raw
            .title
            .unwrap_or_else(|| format!("Milestone {}", index + 1)),
        start_date: raw
            .start_date
            .as_deref()
            .and_then(parse_date)
            .unwrap_or(default_start),
        target_date: raw
            .target_date
            .as_deref()
            .and_then(parse_date)
            .unwrap_or(default_target),
        tasks,
    }
}

fn normalize_task((index, raw): (usize, RawTask)) -> Task {
    let hours = match raw.estimated_hours {
        LooseNumber::Number(n) if n.is_finite() && n >= 0.0 => n,
        _ => 0.0,
    };
    Task {
        title: raw.title.unwrap_or_else(|| format!("Task {}", index + 1)),
        estimated_hours: hours,
    }
}

fn parse_date(s: &str) -> Option<NaiveDate> {
    parse_target_date(s).map(|dt| dt.date_naive())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 5, 4, 8, 0, 0).unwrap()
    }

    fn local() -> Availability {
        Availability {
            weeks: 12,
            achievable_hours: 120.0,
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn raw(value: serde_json::Value) -> RawPlan {
        RawPlan::from_value(&value).expect("shape check should pass")
    }

    #[test]
    fn keeps_complete_model_output() {
        let plan = normalize(
            raw(json!({
                "estimated_effort_hours": 300,
                "achievable_hours": 100,
                "weeks_available": 10,
                "milestones": [{
                    "title": "Milestone 1: Basics",
                    "start_date": "2026-05-04",
                    "target_date": "2026-05-18",
                    "tasks": [{ "title": "Read docs", "estimated_hours": 5 }]
                }]
            })),
            "Learn Go",
            local(),
            now(),
        );
        assert_eq!(plan.achievable_hours, 100.0);
        assert_eq!(plan.weeks_available, 10);
        // Effort is always recomputed from the other two figures.
        assert_eq!(plan.estimated_effort_hours, 1000.0);
        assert_eq!(plan.milestones[0].title, "Milestone 1: Basics");
        assert_eq!(plan.milestones[0].target_date, date(2026, 5, 18));
        assert_eq!(plan.milestones[0].tasks, vec![Task::new("Read docs", 5.0)]);
    }

    #[test]
    fn missing_headline_numbers_use_local_values() {
        let plan = normalize(
            raw(json!({ "achievable_hours": 0, "milestones": [{ "title": "A" }] })),
            "Learn Go",
            local(),
            now(),
        );
        assert_eq!(plan.achievable_hours, 120.0);
        assert_eq!(plan.weeks_available, 12);
        assert_eq!(plan.estimated_effort_hours, 1440.0);
    }

    #[test]
    fn wrongly_typed_numbers_replace_both_with_local_values() {
        let plan = normalize(
            raw(json!({
                "achievable_hours": "about 100",
                "weeks_available": 20,
                "milestones": [{ "title": "A" }]
            })),
            "Learn Go",
            local(),
            now(),
        );
        assert_eq!(plan.achievable_hours, 120.0);
        assert_eq!(plan.weeks_available, 12);
        assert_eq!(plan.estimated_effort_hours, 1440.0);
    }

    #[test]
    fn model_weeks_are_floored_and_clamped() {
        let plan = normalize(
            raw(json!({ "achievable_hours": 30, "weeks_available": 2.7, "milestones": [{ "title": "A" }] })),
            "Learn Go",
            local(),
            now(),
        );
        assert_eq!(plan.weeks_available, MIN_WEEKS);

        let plan = normalize(
            raw(json!({ "achievable_hours": 30, "weeks_available": 9.9, "milestones": [{ "title": "A" }] })),
            "Learn Go",
            local(),
            now(),
        );
        assert_eq!(plan.weeks_available, 9);
        assert_eq!(plan.estimated_effort_hours, 270.0);
    }

    #[test]
    fn oversized_numbers_replace_both_with_local_values() {
        let replies = [
            json!({ "achievable_hours": 40, "weeks_available": 3_000_000_000u64, "milestones": [{ "title": "A" }] }),
            json!({ "achievable_hours": 1e308, "weeks_available": 10, "milestones": [{ "title": "A" }] }),
            json!({ "achievable_hours": 1e308, "weeks_available": 3_000_000_000u64, "milestones": [{ "title": "A" }] }),
        ];
        for reply in replies {
            let plan = normalize(raw(reply.clone()), "Learn Go", local(), now());
            assert_eq!(plan.achievable_hours, 120.0, "reply {reply}");
            assert_eq!(plan.weeks_available, 12, "reply {reply}");
            assert_eq!(plan.estimated_effort_hours, 1440.0, "reply {reply}");
            assert!(i32::try_from(plan.weeks_available).is_ok());
            let json = serde_json::to_value(&plan).unwrap();
            assert!(json["estimated_effort_hours"].is_number(), "reply {reply}");
        }
    }

    #[test]
    fn missing_start_date_uses_weekly_window() {
        let plan = normalize(
            raw(json!({
                "milestones": [
                    { "title": "One", "tasks": [{ "title": "a", "estimated_hours": 1 }] },
                    { "title": "Two", "target_date": "2026-07-01", "tasks": [{ "title": "b", "estimated_hours": 1 }] }
                ]
            })),
            "Learn Go",
            local(),
            now(),
        );
        let first = &plan.milestones[0];
        let second = &plan.milestones[1];
        assert_eq!(first.start_date, date(2026, 5, 4));
        assert_eq!(first.target_date, date(2026, 5, 11));
        // One week after the first window starts.
        assert_eq!(second.start_date, date(2026, 5, 11));
        assert_eq!(second.target_date, date(2026, 7, 1));
    }

    #[test]
    fn unparseable_dates_count_as_missing() {
        let plan = normalize(
            raw(json!({ "milestones": [{ "title": "A", "start_date": "early May", "target_date": "2026-06-01T00:00:00Z" }] })),
            "Learn Go",
            local(),
            now(),
        );
        assert_eq!(plan.milestones[0].start_date, date(2026, 5, 4));
        assert_eq!(plan.milestones[0].target_date, date(2026, 6, 1));
    }

    #[test]
    fn empty_task_lists_get_default_tasks() {
        let plan = normalize(
            raw(json!({ "milestones": [{ "title": "A", "tasks": [] }, { "title": "B" }] })),
            "Learn Go",
            local(),
            now(),
        );
        for m in &plan.milestones {
            assert_eq!(
                m.tasks,
                vec![
                    Task::new("Research about Learn Go", 8.0),
                    Task::new("Practical task for Learn Go", 6.0),
                ]
            );
        }
    }

    #[test]
    fn untitled_milestones_and_tasks_get_numbered_titles() {
        let plan = normalize(
            raw(json!({
                "milestones": [
                    { "title": "A" },
                    { "tasks": [{ "estimated_hours": -3 }, { "title": "real", "estimated_hours": "4" }] }
                ]
            })),
            "Learn Go",
            local(),
            now(),
        );
        assert_eq!(plan.milestones[1].title, "Milestone 2");
        assert_eq!(
            plan.milestones[1].tasks,
            vec![Task::new("Task 1", 0.0), Task::new("real", 0.0)]
        );
    }

    #[test]
    fn normalization_is_idempotent() {
        let once = normalize(
            raw(json!({
                "achievable_hours": 44.5,
                "weeks_available": 6.5,
                "milestones": [
                    { "title": "A", "tasks": [{ "title": "x", "estimated_hours": 2 }] },
                    { "title": "B", "start_date": "2026-06-01" },
                    {}
                ]
            })),
            "Learn Go",
            local(),
            now(),
        );
        let later = now() + chrono::Duration::days(3);
        let twice = normalize(RawPlan::from(&once), "Learn Go", local(), later);
        assert_eq!(once, twice);
    }

    #[test]
    fn every_milestone_has_tasks() {
        let plan = normalize(
            raw(json!({ "milestones": [{ "title": "A" }, null, "text", { "tasks": null }] })),
            "Goal",
            local(),
            now(),
        );
        assert_eq!(plan.milestones.len(), 4);
        assert!(plan.milestones.iter().all(|m| !m.tasks.is_empty()));
    }
}
