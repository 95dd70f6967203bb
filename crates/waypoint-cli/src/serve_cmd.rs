use std::net::SocketAddr;

use anyhow::{Context, Result};
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::{StatusCode, header};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, patch, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info};
use uuid::Uuid;

use waypoint_core::roadmap::{
    GeneratedPlan, PlanGenerator, PlanRequest, export_file_name, get_roadmap, render_markdown,
    save_roadmap,
};
use waypoint_db::models::Task;
use waypoint_db::queries::{goals as goal_db, tasks as task_db};

pub const DEFAULT_PORT: u16 = 4000;
pub const PORT_ENV: &str = "PORT";

const INDEX_HTML: &str = include_str!("../assets/index.html");

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

pub struct AppError {
    status: StatusCode,
    message: String,
}

impl AppError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: msg.into(),
        }
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: msg.into(),
        }
    }

    pub fn internal(err: anyhow::Error) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: format!("{err:#}"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = serde_json::json!({ "error": self.message });
        (self.status, Json(body)).into_response()
    }
}

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Body of `POST /api/generate-plan`. Field names follow the web form.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratePlanBody {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub target_date: Option<String>,
    #[serde(default)]
    pub hours_per_week: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct GeneratePlanResponse {
    pub goal_id: Uuid,
    #[serde(flatten)]
    pub roadmap: GeneratedPlan,
}

#[derive(Debug, Deserialize)]
pub struct UpdateTaskBody {
    pub is_completed: bool,
}

#[derive(Debug, Serialize)]
pub struct UpdateTaskResponse {
    pub task: Task,
    /// The owning milestone's recomputed progress.
    pub progress: i32,
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

/// Shared handler state: the pool plus the process-wide plan generator.
#[derive(Debug, Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub generator: PlanGenerator,
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/api/health", get(health))
        .route("/api/generate-plan", post(generate_plan))
        .route("/api/goals", get(list_goals))
        .route("/api/goals/{id}", get(get_goal_detail))
        .route("/api/goals/{id}/export", get(export_goal))
        .route("/api/tasks/{id}", patch(update_task))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

/// Pick the listen port: `--port` > `PORT` env > [`DEFAULT_PORT`].
pub fn resolve_port(cli_port: Option<u16>) -> Result<u16> {
    if let Some(port) = cli_port {
        return Ok(port);
    }
    match std::env::var(PORT_ENV) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .with_context(|| format!("{PORT_ENV} is not a valid port: {raw:?}")),
        _ => Ok(DEFAULT_PORT),
    }
}

pub async fn run_serve(state: AppState, bind: &str, port: u16) -> Result<()> {
    let app = build_router(state);
    let addr: SocketAddr = format!("{bind}:{port}").parse()?;
    info!("waypoint serve listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("waypoint serve shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!(error = %err, "failed to listen for Ctrl+C");
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "ok": true }))
}

async fn generate_plan(
    State(state): State<AppState>,
    payload: Result<Json<GeneratePlanBody>, JsonRejection>,
) -> Result<Response, AppError> {
    let Json(body) = payload.map_err(|rejection| AppError::bad_request(rejection.body_text()))?;

    let request = PlanRequest::new(
        body.title.as_deref().unwrap_or_default(),
        body.description.as_deref().unwrap_or_default(),
        body.target_date.as_deref().unwrap_or_default(),
        body.hours_per_week,
    )
    .map_err(|err| AppError::bad_request(err.to_string()))?;

    let roadmap = state.generator.generate(&request).await;

    let goal = save_roadmap(&state.pool, &request, &roadmap)
        .await
        .map_err(|err| {
            error!(error = ?err, "failed to persist roadmap");
            AppError {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                message: "DB transaction failed".to_string(),
            }
        })?;

    info!(goal_id = %goal.id, source = %roadmap.source, "roadmap stored");

    Ok(Json(GeneratePlanResponse {
        goal_id: goal.id,
        roadmap,
    })
    .into_response())
}

async fn list_goals(State(state): State<AppState>) -> Result<Response, AppError> {
    let goals = goal_db::list_goals(&state.pool)
        .await
        .map_err(AppError::internal)?;

    Ok(Json(goals).into_response())
}

async fn get_goal_detail(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    let record = get_roadmap(&state.pool, id)
        .await
        .map_err(AppError::internal)?
        .ok_or_else(|| AppError::not_found(format!("goal {id} not found")))?;

    Ok(Json(record).into_response())
}

async fn export_goal(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    let record = get_roadmap(&state.pool, id)
        .await
        .map_err(AppError::internal)?
        .ok_or_else(|| AppError::not_found(format!("goal {id} not found")))?;

    let disposition = format!("attachment; filename=\"{}\"", export_file_name(&record));

    Ok((
        [
            (header::CONTENT_TYPE, "text/markdown; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        render_markdown(&record),
    )
        .into_response())
}

async fn update_task(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    payload: Result<Json<UpdateTaskBody>, JsonRejection>,
) -> Result<Response, AppError> {
    let Json(body) = payload.map_err(|rejection| AppError::bad_request(rejection.body_text()))?;

    let (task, progress) = task_db::set_task_completed(&state.pool, id, body.is_completed)
        .await
        .map_err(AppError::internal)?
        .ok_or_else(|| AppError::not_found(format!("task {id} not found")))?;

    Ok(Json(UpdateTaskResponse { task, progress }).into_response())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
