//! Deterministic template roadmap used whenever the model cannot deliver.

use chrono::{DateTime, Utc};

use super::availability::{Availability, week_window};
use super::normalize::{DEFAULT_PRACTICE_HOURS, DEFAULT_RESEARCH_HOURS};
use super::template::stages_for;
use super::types::{Milestone, Plan, Task};

/// Margin added on top of the achievable hours when estimating effort.
pub const CONTINGENCY_FACTOR: f64 = 1.2;

/// Build a roadmap from the goal's template stages. Never fails.
///
/// Stage `i` becomes milestone `"Milestone {i+1}: {stage}"` covering the
/// `i`-th week from `now`, with one research task and one practice task.
pub fn fallback_plan(goal_title: &str, local: Availability, now: DateTime<Utc>) -> Plan {
    let milestones = stages_for(goal_title)
        .iter()
        .enumerate()
        .map(|(i, stage)| {
            let (start_date, target_date) = week_window(now, i);
            Milestone {
                title: format!("Milestone {}: {stage}", i + 1),
                start_date,
                target_date,
                tasks: vec![
                    Task::new(format!("Learn and research: {stage}"), DEFAULT_RESEARCH_HOURS),
                    Task::new(format!("Practice or implement: {stage}"), DEFAULT_PRACTICE_HOURS),
                ],
            }
        })
        .collect();

    Plan {
        estimated_effort_hours: local.achievable_hours * CONTINGENCY_FACTOR,
        achievable_hours: local.achievable_hours,
        weeks_available: local.weeks,
        milestones,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 5, 23, 59, 0).unwrap()
    }

    fn local() -> Availability {
        Availability {
            weeks: 12,
            achievable_hours: 120.0,
        }
    }

    #[test]
    fn frontend_fallback_structure() {
        let plan = fallback_plan("Frontend Developer", local(), now());
        assert_eq!(plan.weeks_available, 12);
        assert_eq!(plan.achievable_hours, 120.0);
        assert!((plan.estimated_effort_hours - 144.0).abs() < 1e-9);

        let titles: Vec<&str> = plan.milestones.iter().map(|m| m.title.as_str()).collect();
        assert_eq!(
            titles,
            vec![
                "Milestone 1: HTML, CSS & responsive design",
                "Milestone 2: JavaScript fundamentals",
                "Milestone 3: React.js and frontend frameworks",
                "Milestone 4: Version control and hosting",
            ]
        );

        let second = &plan.milestones[1];
        assert_eq!(
            second.tasks,
            vec![
                Task::new("Learn and research: JavaScript fundamentals", 8.0),
                Task::new("Practice or implement: JavaScript fundamentals", 6.0),
            ]
        );
    }

    #[test]
    fn fallback_dates_are_weekly() {
        let plan = fallback_plan("Learn piano", local(), now());
        for (i, m) in plan.milestones.iter().enumerate() {
            assert_eq!((m.target_date - m.start_date).num_days(), 7, "milestone {i}");
            if i > 0 {
                assert_eq!(m.start_date, plan.milestones[i - 1].target_date);
            }
        }
        assert_eq!(
            plan.milestones[0].start_date,
            NaiveDate::from_ymd_opt(2026, 1, 5).unwrap()
        );
    }

    #[test]
    fn fallback_is_deterministic() {
        let a = fallback_plan("Grow a YouTube channel", local(), now());
        let b = fallback_plan("Grow a YouTube channel", local(), now());
        assert_eq!(a, b);
        assert_eq!(a.milestones.len(), 5);
    }
}
