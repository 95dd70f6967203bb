use std::time::Duration;

use anyhow::{Context, Result};
use sqlx::postgres::PgPoolOptions;
use sqlx::{Executor, FromRow, PgPool};
use tracing::info;

use crate::config::DbConfig;

/// Schema for goals, milestones and tasks, embedded from `migrations/`.
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!();

const POOL_SIZE: u32 = 5;
const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(10);

/// Row counts of the roadmap tables, reported by `waypoint db-init`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromRow)]
pub struct RoadmapCounts {
    pub goals: i64,
    pub milestones: i64,
    pub tasks: i64,
}

impl RoadmapCounts {
    /// `(table, rows)` pairs in schema order.
    pub fn rows(&self) -> [(&'static str, i64); 3] {
        [
            ("goals", self.goals),
            ("milestones", self.milestones),
            ("tasks", self.tasks),
        ]
    }
}

async fn connect(url: &str, max_connections: u32) -> Result<PgPool> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(ACQUIRE_TIMEOUT)
        .connect(url)
        .await
        .with_context(|| format!("failed to connect to database at {url}"))
}

/// Open the pool shared by the roadmap commands and the HTTP server.
pub async fn create_pool(config: &DbConfig) -> Result<PgPool> {
    connect(&config.database_url, POOL_SIZE).await
}

/// Bring the roadmap schema up to date.
pub async fn run_migrations(pool: &PgPool) -> Result<()> {
    MIGRATOR
        .run(pool)
        .await
        .context("failed to migrate roadmap schema")?;
    info!(migrations = MIGRATOR.iter().count(), "roadmap schema up to date");
    Ok(())
}

/// Create the configured database through the `postgres` maintenance
/// database when it is missing.
pub async fn ensure_database_exists(config: &DbConfig) -> Result<()> {
    let db_name = config
        .database_name()
        .context("could not determine database name from URL")?;
    // CREATE DATABASE takes an identifier, not a bind parameter.
    if !db_name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        anyhow::bail!("database name {db_name:?} contains invalid characters");
    }

    let admin = connect(&config.maintenance_url(), 1).await?;
    let result = create_if_missing(&admin, db_name).await;
    admin.close().await;
    result
}

async fn create_if_missing(admin: &PgPool, db_name: &str) -> Result<()> {
    let exists: bool =
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM pg_database WHERE datname = $1)")
            .bind(db_name)
            .fetch_one(admin)
            .await
            .context("failed to query pg_database")?;
    if exists {
        info!(db = db_name, "database already exists");
        return Ok(());
    }

    admin
        .execute(format!("CREATE DATABASE {db_name}").as_str())
        .await
        .with_context(|| format!("failed to create database {db_name}"))?;
    info!(db = db_name, "database created");
    Ok(())
}

/// Count the stored goals, milestones and tasks.
pub async fn roadmap_counts(pool: &PgPool) -> Result<RoadmapCounts> {
    sqlx::query_as::<_, RoadmapCounts>(
        "SELECT (SELECT COUNT(*) FROM goals)      AS goals, \
                (SELECT COUNT(*) FROM milestones) AS milestones, \
                (SELECT COUNT(*) FROM tasks)      AS tasks",
    )
    .fetch_one(pool)
    .await
    .context("failed to count roadmap rows")
}
