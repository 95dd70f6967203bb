//! Database query functions for the `tasks` table.

use anyhow::{Context, Result};
use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;

use crate::models::Task;
use crate::queries::milestones;

/// Insert a task into a milestone. `is_completed` starts as false.
pub async fn insert_task<'e, E>(
    executor: E,
    milestone_id: Uuid,
    position: i32,
    task_name: &str,
    estimated_hours: f64,
) -> Result<Task>
where
    E: PgExecutor<'e>,
{
    let task = sqlx::query_as::<_, Task>(
        "INSERT INTO tasks (milestone_id, position, task_name, estimated_hours, is_completed) \
         VALUES ($1, $2, $3, $4, false) \
         RETURNING *",
    )
    .bind(milestone_id)
    .bind(position)
    .bind(task_name)
    .bind(estimated_hours)
    .fetch_one(executor)
    .await
    .with_context(|| format!("failed to insert task {task_name:?}"))?;

    Ok(task)
}

/// List a milestone's tasks in order.
pub async fn list_tasks_for_milestone(pool: &PgPool, milestone_id: Uuid) -> Result<Vec<Task>> {
    let tasks = sqlx::query_as::<_, Task>(
        "SELECT * FROM tasks WHERE milestone_id = $1 ORDER BY position ASC",
    )
    .bind(milestone_id)
    .fetch_all(pool)
    .await
    .context("failed to list tasks for milestone")?;

    Ok(tasks)
}

/// Set a task's completion flag and recompute its milestone's progress.
///
/// Both updates run in one transaction. Returns `None` if the task does
/// not exist.
pub async fn set_task_completed(
    pool: &PgPool,
    id: Uuid,
    is_completed: bool,
) -> Result<Option<(Task, i32)>> {
    let mut tx = pool.begin().await.context("failed to begin transaction")?;

    let task = sqlx::query_as::<_, Task>(
        "UPDATE tasks SET is_completed = $1 WHERE id = $2 RETURNING *",
    )
    .bind(is_completed)
    .bind(id)
    .fetch_optional(&mut *tx)
    .await
    .context("failed to update task completion")?;

    let Some(task) = task else {
        return Ok(None);
    };

    let progress = milestones::refresh_progress(&mut *tx, task.milestone_id).await?;

    tx.commit().await.context("failed to commit transaction")?;

    Ok(Some((task, progress)))
}
