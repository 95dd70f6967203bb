//! Roadmap service layer.
//!
//! Stores a generated roadmap (goal row, milestones, tasks) in a single
//! database transaction and reads it back as one nested record.

use anyhow::{Context, Result};
use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

use waypoint_db::models::{Goal, Milestone, Task};
use waypoint_db::queries::goals::{self as goal_queries, NewGoal};
use waypoint_db::queries::{milestones as milestone_queries, tasks as task_queries};

use super::generate::GeneratedPlan;
use super::types::PlanRequest;

/// A stored milestone with its tasks.
#[derive(Debug, Clone, Serialize)]
pub struct MilestoneRecord {
    #[serde(flatten)]
    pub milestone: Milestone,
    pub tasks: Vec<Task>,
}

/// A stored goal with its whole roadmap.
#[derive(Debug, Clone, Serialize)]
pub struct RoadmapRecord {
    pub goal: Goal,
    pub milestones: Vec<MilestoneRecord>,
}

/// Persist the goal and its roadmap.
///
/// Inserts the goal row, every milestone (progress 0) and every task
/// (not completed) inside one transaction. If any insert fails nothing is
/// kept.
pub async fn save_roadmap(
    pool: &PgPool,
    request: &PlanRequest,
    generated: &GeneratedPlan,
) -> Result<Goal> {
    let plan = &generated.plan;
    let weeks_available =
        i32::try_from(plan.weeks_available).context("weeks_available out of range")?;

    let mut tx = pool.begin().await.context("failed to begin transaction")?;

    let goal = goal_queries::insert_goal(
        &mut *tx,
        &NewGoal {
            title: &request.title,
            description: &request.description,
            deadline: request.deadline(),
            hours_per_week: request.hours_per_week,
            estimated_effort_hours: plan.estimated_effort_hours,
            achievable_hours: plan.achievable_hours,
            weeks_available,
            source: generated.source,
        },
    )
    .await?;

    for (m_pos, m) in (0i32..).zip(&plan.milestones) {
        let milestone = milestone_queries::insert_milestone(
            &mut *tx,
            goal.id,
            m_pos,
            &m.title,
            m.start_date,
            m.target_date,
        )
        .await?;

        for (t_pos, t) in (0i32..).zip(&m.tasks) {
            task_queries::insert_task(&mut *tx, milestone.id, t_pos, &t.title, t.estimated_hours)
                .await?;
        }
    }

    tx.commit().await.context("failed to commit transaction")?;

    Ok(goal)
}

/// Fetch a goal with its milestones and tasks, in roadmap order.
pub async fn get_roadmap(pool: &PgPool, goal_id: Uuid) -> Result<Option<RoadmapRecord>> {
    let Some(goal) = goal_queries::get_goal(pool, goal_id).await? else {
        return Ok(None);
    };

    let milestones = milestone_queries::list_milestones_for_goal(pool, goal_id).await?;
    let mut records = Vec::with_capacity(milestones.len());
    for milestone in milestones {
        let tasks = task_queries::list_tasks_for_milestone(pool, milestone.id).await?;
        records.push(MilestoneRecord { milestone, tasks });
    }

    Ok(Some(RoadmapRecord {
        goal,
        milestones: records,
    }))
}
