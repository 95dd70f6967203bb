mod config;
mod export_cmd;
mod plan_cmds;
mod serve_cmd;

use clap::{Parser, Subcommand};

use waypoint_db::pool;

use config::WaypointConfig;

#[derive(Parser)]
#[command(name = "waypoint", about = "Goal roadmap planner")]
struct Cli {
    /// Database URL (overrides WAYPOINT_DATABASE_URL env var)
    #[arg(long, global = true)]
    database_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write a waypoint config file (no database required)
    Init {
        /// PostgreSQL connection URL
        #[arg(long, default_value = "postgresql://localhost:5432/waypoint")]
        db_url: String,
        /// Overwrite existing config file
        #[arg(long)]
        force: bool,
    },
    /// Initialize the waypoint database (requires config file or env vars)
    DbInit,
    /// Run the HTTP server and web UI
    Serve {
        /// Address to bind
        #[arg(long, default_value = "127.0.0.1")]
        bind: String,
        /// Port to listen on (defaults to $PORT, then 4000)
        #[arg(long)]
        port: Option<u16>,
    },
    /// Generate a roadmap for a goal and print it as JSON
    Plan {
        /// What you want to achieve
        title: String,
        /// Deadline, YYYY-MM-DD or an RFC 3339 timestamp
        #[arg(long)]
        target_date: String,
        /// Hours you can spend per week
        #[arg(long)]
        hours_per_week: Option<f64>,
        /// Extra context for the planner
        #[arg(long, default_value = "")]
        description: String,
        /// Print the plan without storing it
        #[arg(long)]
        no_save: bool,
    },
    /// Show a stored roadmap (omit goal_id to list all goals)
    Show {
        /// Goal ID to show (omit to list all)
        goal_id: Option<String>,
    },
    /// Export a stored roadmap as Markdown
    Export {
        /// Goal ID to export
        goal_id: String,
        /// Output file path (defaults to stdout)
        #[arg(long)]
        output: Option<String>,
    },
    /// Mark a task as completed
    Complete {
        /// Task ID to update
        task_id: String,
        /// Mark the task as not completed instead
        #[arg(long)]
        undo: bool,
    },
}

/// Execute the `waypoint init` command: write config file.
fn cmd_init(db_url: &str, force: bool) -> anyhow::Result<()> {
    let path = config::config_path();

    if path.exists() && !force {
        anyhow::bail!(
            "config file already exists at {}\nUse --force to overwrite.",
            path.display()
        );
    }

    let cfg = config::ConfigFile {
        database: config::DatabaseSection {
            url: db_url.to_string(),
        },
        genai: config::GenaiSection::default(),
    };

    config::save_config(&cfg)?;

    println!("Config written to {}", path.display());
    println!("  database.url = {db_url}");
    println!();
    println!("Set {} (or genai.api_key in the file) to use Gemini.", config::API_KEY_ENV);
    println!("Next: run `waypoint db-init` to create and migrate the database.");

    Ok(())
}

/// Execute the `waypoint db-init` command: create database and run migrations.
async fn cmd_db_init(cli_db_url: Option<&str>) -> anyhow::Result<()> {
    let resolved = WaypointConfig::resolve(cli_db_url)?;

    println!("Initializing waypoint database...");

    pool::ensure_database_exists(&resolved.db_config).await?;

    let db_pool = pool::create_pool(&resolved.db_config).await?;
    pool::run_migrations(&db_pool).await?;

    let counts = pool::roadmap_counts(&db_pool).await?;
    println!("Database ready. Tables:");
    for (table, count) in counts.rows() {
        println!("  {table}: {count} rows");
    }

    db_pool.close().await;

    println!("waypoint db-init complete.");
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so `plan` output stays valid JSON.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Init { db_url, force } => {
            cmd_init(&db_url, force)?;
        }
        Commands::DbInit => {
            cmd_db_init(cli.database_url.as_deref()).await?;
        }
        Commands::Serve { bind, port } => {
            let resolved = WaypointConfig::resolve(cli.database_url.as_deref())?;
            let port = serve_cmd::resolve_port(port)?;
            let generator = resolved.plan_generator()?;
            let db_pool = pool::create_pool(&resolved.db_config).await?;
            let state = serve_cmd::AppState {
                pool: db_pool.clone(),
                generator,
            };
            let result = serve_cmd::run_serve(state, &bind, port).await;
            db_pool.close().await;
            result?;
        }
        Commands::Plan {
            title,
            target_date,
            hours_per_week,
            description,
            no_save,
        } => {
            let resolved = WaypointConfig::resolve(cli.database_url.as_deref())?;
            let generator = resolved.plan_generator()?;
            let input = plan_cmds::PlanInput {
                title,
                description,
                target_date,
                hours_per_week,
            };
            if no_save {
                plan_cmds::run_plan(&generator, None, &input).await?;
            } else {
                let db_pool = pool::create_pool(&resolved.db_config).await?;
                let result = plan_cmds::run_plan(&generator, Some(&db_pool), &input).await;
                db_pool.close().await;
                result?;
            }
        }
        Commands::Show { goal_id } => {
            let resolved = WaypointConfig::resolve(cli.database_url.as_deref())?;
            let db_pool = pool::create_pool(&resolved.db_config).await?;
            let result = plan_cmds::run_show(&db_pool, goal_id.as_deref()).await;
            db_pool.close().await;
            result?;
        }
        Commands::Export { goal_id, output } => {
            let resolved = WaypointConfig::resolve(cli.database_url.as_deref())?;
            let db_pool = pool::create_pool(&resolved.db_config).await?;
            let result = export_cmd::run_export(&db_pool, &goal_id, output.as_deref()).await;
            db_pool.close().await;
            result?;
        }
        Commands::Complete { task_id, undo } => {
            let resolved = WaypointConfig::resolve(cli.database_url.as_deref())?;
            let db_pool = pool::create_pool(&resolved.db_config).await?;
            let result = plan_cmds::run_complete(&db_pool, &task_id, !undo).await;
            db_pool.close().await;
            result?;
        }
    }

    Ok(())
}
