//! Database query functions for the `milestones` table.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use sqlx::{PgConnection, PgExecutor, PgPool};
use uuid::Uuid;

use crate::models::{Milestone, progress_percent};

/// Insert a milestone for a goal. `progress` starts at 0.
pub async fn insert_milestone<'e, E>(
    executor: E,
    goal_id: Uuid,
    position: i32,
    title: &str,
    start_date: NaiveDate,
    target_date: NaiveDate,
) -> Result<Milestone>
where
    E: PgExecutor<'e>,
{
    let milestone = sqlx::query_as::<_, Milestone>(
        "INSERT INTO milestones (goal_id, position, title, start_date, target_date, progress) \
         VALUES ($1, $2, $3, $4, $5, 0) \
         RETURNING *",
    )
    .bind(goal_id)
    .bind(position)
    .bind(title)
    .bind(start_date)
    .bind(target_date)
    .fetch_one(executor)
    .await
    .with_context(|| format!("failed to insert milestone {title:?}"))?;

    Ok(milestone)
}

/// List a goal's milestones in roadmap order.
pub async fn list_milestones_for_goal(pool: &PgPool, goal_id: Uuid) -> Result<Vec<Milestone>> {
    let milestones = sqlx::query_as::<_, Milestone>(
        "SELECT * FROM milestones WHERE goal_id = $1 ORDER BY position ASC",
    )
    .bind(goal_id)
    .fetch_all(pool)
    .await
    .context("failed to list milestones for goal")?;

    Ok(milestones)
}

/// Recompute a milestone's `progress` from its tasks' completion flags.
///
/// Returns the new progress value.
pub async fn refresh_progress(conn: &mut PgConnection, milestone_id: Uuid) -> Result<i32> {
    let (completed, total): (i64, i64) = sqlx::query_as(
        "SELECT COUNT(*) FILTER (WHERE is_completed), COUNT(*) \
         FROM tasks WHERE milestone_id = $1",
    )
    .bind(milestone_id)
    .fetch_one(&mut *conn)
    .await
    .context("failed to count milestone tasks")?;

    let progress = progress_percent(completed, total);

    let result = sqlx::query("UPDATE milestones SET progress = $1 WHERE id = $2")
        .bind(progress)
        .bind(milestone_id)
        .execute(&mut *conn)
        .await
        .context("failed to update milestone progress")?;

    if result.rows_affected() == 0 {
        anyhow::bail!("milestone {milestone_id} not found");
    }

    Ok(progress)
}
