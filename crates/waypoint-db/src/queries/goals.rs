//! Database query functions for the `goals` table.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;

use crate::models::{Goal, PlanSource};

/// Column values for a new goal row.
#[derive(Debug, Clone)]
pub struct NewGoal<'a> {
    pub title: &'a str,
    pub description: &'a str,
    pub deadline: NaiveDate,
    pub hours_per_week: f64,
    pub estimated_effort_hours: f64,
    pub achievable_hours: f64,
    pub weeks_available: i32,
    pub source: PlanSource,
}

/// Insert a new goal row. Returns the inserted goal with server-generated
/// defaults (id, created_at).
///
/// Accepts any executor so callers can run it inside a transaction.
pub async fn insert_goal<'e, E>(executor: E, goal: &NewGoal<'_>) -> Result<Goal>
where
    E: PgExecutor<'e>,
{
    let row = sqlx::query_as::<_, Goal>(
        "INSERT INTO goals (title, description, deadline, hours_per_week, \
                            estimated_effort_hours, achievable_hours, weeks_available, source) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
         RETURNING *",
    )
    .bind(goal.title)
    .bind(goal.description)
    .bind(goal.deadline)
    .bind(goal.hours_per_week)
    .bind(goal.estimated_effort_hours)
    .bind(goal.achievable_hours)
    .bind(goal.weeks_available)
    .bind(goal.source)
    .fetch_one(executor)
    .await
    .with_context(|| format!("failed to insert goal {:?}", goal.title))?;

    Ok(row)
}

/// Fetch a goal by its ID.
pub async fn get_goal(pool: &PgPool, id: Uuid) -> Result<Option<Goal>> {
    let goal = sqlx::query_as::<_, Goal>("SELECT * FROM goals WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
        .context("failed to fetch goal")?;

    Ok(goal)
}

/// List all goals, newest first.
pub async fn list_goals(pool: &PgPool) -> Result<Vec<Goal>> {
    let goals = sqlx::query_as::<_, Goal>("SELECT * FROM goals ORDER BY created_at DESC, id")
        .fetch_all(pool)
        .await
        .context("failed to list goals")?;

    Ok(goals)
}
