use anyhow::Context;
use sqlx::PgPool;

use waypoint_core::roadmap::{get_roadmap, render_markdown};

use crate::plan_cmds::parse_id;

/// Export a stored roadmap as Markdown to a file or stdout.
pub async fn run_export(pool: &PgPool, goal_id: &str, output: Option<&str>) -> anyhow::Result<()> {
    let id = parse_id("goal", goal_id)?;

    let record = get_roadmap(pool, id)
        .await?
        .with_context(|| format!("goal {id} not found"))?;
    let markdown = render_markdown(&record);

    match output {
        Some(path) => {
            std::fs::write(path, &markdown)
                .with_context(|| format!("cannot create output file: {path}"))?;
            println!("Exported {} milestones to {path}", record.milestones.len());
        }
        None => print!("{markdown}"),
    }

    Ok(())
}
