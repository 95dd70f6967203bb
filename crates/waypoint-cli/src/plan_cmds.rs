//! CLI handlers for roadmap commands.
//!
//! Implements:
//! - `waypoint plan <title> --target-date D` -- generate, store and print a roadmap
//! - `waypoint show [goal-id]`               -- show one roadmap or list all goals
//! - `waypoint complete <task-id> [--undo]`  -- toggle a task and refresh progress

use anyhow::{Context, Result};
use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

use waypoint_core::roadmap::{GeneratedPlan, PlanGenerator, PlanRequest, get_roadmap, save_roadmap};
use waypoint_db::queries::{goals as goal_queries, tasks as task_queries};

/// Raw `waypoint plan` arguments.
#[derive(Debug, Clone)]
pub struct PlanInput {
    pub title: String,
    pub description: String,
    pub target_date: String,
    pub hours_per_week: Option<f64>,
}

#[derive(Debug, Serialize)]
struct PlanOutput<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    goal_id: Option<Uuid>,
    #[serde(flatten)]
    roadmap: &'a GeneratedPlan,
}

/// Parse a UUID argument, naming the kind of ID in the error.
pub fn parse_id(kind: &str, raw: &str) -> Result<Uuid> {
    raw.trim()
        .parse()
        .with_context(|| format!("invalid {kind} ID: {raw:?}"))
}

// -----------------------------------------------------------------------
// waypoint plan
// -----------------------------------------------------------------------

/// Generate a roadmap and print it as JSON. Stores it when `pool` is given.
pub async fn run_plan(
    generator: &PlanGenerator,
    pool: Option<&PgPool>,
    input: &PlanInput,
) -> Result<()> {
    let request = PlanRequest::new(
        &input.title,
        &input.description,
        &input.target_date,
        input.hours_per_week,
    )?;

    let roadmap = generator.generate(&request).await;

    let goal_id = match pool {
        Some(pool) => Some(
            save_roadmap(pool, &request, &roadmap)
                .await
                .context("DB transaction failed")?
                .id,
        ),
        None => None,
    };

    let output = PlanOutput {
        goal_id,
        roadmap: &roadmap,
    };
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

// -----------------------------------------------------------------------
// waypoint show
// -----------------------------------------------------------------------

pub async fn run_show(pool: &PgPool, goal_id: Option<&str>) -> Result<()> {
    match goal_id {
        Some(id) => show_one(pool, parse_id("goal", id)?).await,
        None => show_all(pool).await,
    }
}

/// List all goals, newest first.
async fn show_all(pool: &PgPool) -> Result<()> {
    let goals = goal_queries::list_goals(pool).await?;

    if goals.is_empty() {
        println!("No goals found. Use `waypoint plan <title> --target-date <date>` to create one.");
        return Ok(());
    }

    // ID is always 36 chars (UUID). Source max is 9 (generated).
    let id_w = 36;
    let title_w = goals.iter().map(|g| g.title.len()).max().unwrap_or(5).max(5);
    let source_w = 9;

    println!(
        "{:<id_w$}  {:<title_w$}  {:<10}  {:<source_w$}  CREATED",
        "ID", "TITLE", "DEADLINE", "SOURCE",
    );
    for goal in &goals {
        println!(
            "{:<id_w$}  {:<title_w$}  {:<10}  {:<source_w$}  {}",
            goal.id,
            goal.title,
            goal.deadline.format("%Y-%m-%d"),
            goal.source.to_string(),
            goal.created_at.format("%Y-%m-%d %H:%M"),
        );
    }

    Ok(())
}

/// Print one goal with its milestones and tasks.
async fn show_one(pool: &PgPool, goal_id: Uuid) -> Result<()> {
    let record = get_roadmap(pool, goal_id)
        .await?
        .with_context(|| format!("goal {goal_id} not found"))?;
    let goal = &record.goal;

    println!("Goal: {}", goal.title);
    println!("  ID:               {}", goal.id);
    if !goal.description.is_empty() {
        println!("  Description:      {}", goal.description);
    }
    println!("  Deadline:         {}", goal.deadline.format("%Y-%m-%d"));
    println!("  Hours per week:   {}", goal.hours_per_week);
    println!("  Weeks available:  {}", goal.weeks_available);
    println!("  Achievable hours: {}", goal.achievable_hours);
    println!("  Estimated effort: {}", goal.estimated_effort_hours);
    println!("  Source:           {}", goal.source);
    println!(
        "  Created:          {}",
        goal.created_at.format("%Y-%m-%d %H:%M:%S UTC")
    );

    for entry in &record.milestones {
        let m = &entry.milestone;
        println!();
        println!(
            "  [{:>3}%] {}  ({} -> {})",
            m.progress,
            m.title,
            m.start_date.format("%Y-%m-%d"),
            m.target_date.format("%Y-%m-%d"),
        );
        for task in &entry.tasks {
            let mark = if task.is_completed { 'x' } else { ' ' };
            println!(
                "    [{mark}] {} ({} h)  {}",
                task.task_name, task.estimated_hours, task.id
            );
        }
    }

    Ok(())
}

// -----------------------------------------------------------------------
// waypoint complete
// -----------------------------------------------------------------------

pub async fn run_complete(pool: &PgPool, task_id: &str, completed: bool) -> Result<()> {
    let id = parse_id("task", task_id)?;

    let (task, progress) = task_queries::set_task_completed(pool, id, completed)
        .await?
        .with_context(|| format!("task {id} not found"))?;

    let state = if task.is_completed {
        "completed"
    } else {
        "not completed"
    };
    println!("Task {} marked {state}.", task.id);
    println!("  Milestone progress: {progress}%");
    Ok(())
}

// -----------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------
