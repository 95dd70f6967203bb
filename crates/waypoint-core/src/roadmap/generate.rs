//! Plan generation: one model request, normalization, template fallback.
//!
//! ```text
//! START -> REQUEST_SENT -> VALIDATED -> RETURNED
//!                      \-> FALLBACK  -> RETURNED
//! ```
//!
//! Any failure before `VALIDATED` (service error, timeout, no JSON, bad
//! shape) goes straight to `FALLBACK`. Both paths return a usable plan.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use waypoint_db::models::PlanSource;

use super::availability::Availability;
use super::extract::{ExtractError, extract_json_object};
use super::fallback::fallback_plan;
use super::normalize::normalize;
use super::prompt::build_prompt;
use super::raw::{RawPlan, ShapeError};
use super::types::{Plan, PlanRequest};
use crate::genai::{RoadmapModel, ServiceError};

/// Why the model's answer was not used.
#[derive(Debug, Error)]
pub enum RequestError {
    #[error(transparent)]
    Service(#[from] ServiceError),

    #[error(transparent)]
    Extract(#[from] ExtractError),

    #[error("unusable plan: {0}")]
    Shape(#[from] ShapeError),
}

/// A plan plus the path that produced it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeneratedPlan {
    #[serde(flatten)]
    pub plan: Plan,
    pub source: PlanSource,
}

/// Generates roadmaps with an injected model.
///
/// Cheap to clone; share one per process.
#[derive(Clone)]
pub struct PlanGenerator {
    model: Arc<dyn RoadmapModel>,
    timeout: Duration,
}

impl PlanGenerator {
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

    pub fn new(model: Arc<dyn RoadmapModel>, timeout: Duration) -> Self {
        Self { model, timeout }
    }

    pub fn model_name(&self) -> &str {
        self.model.name()
    }

    /// Generate a roadmap relative to the current time.
    pub async fn generate(&self, request: &PlanRequest) -> GeneratedPlan {
        self.generate_at(request, Utc::now()).await
    }

    /// Generate a roadmap as if the current time were `now`.
    pub async fn generate_at(&self, request: &PlanRequest, now: DateTime<Utc>) -> GeneratedPlan {
        let local = Availability::compute(request.target, request.hours_per_week, now);
        let prompt = build_prompt(request, local);

        match self.request_plan(&prompt).await {
            Ok(raw) => {
                let plan = normalize(raw, &request.title, local, now);
                info!(
                    model = self.model.name(),
                    milestones = plan.milestones.len(),
                    estimated_effort_hours = plan.estimated_effort_hours,
                    "roadmap generated by model"
                );
                GeneratedPlan {
                    plan,
                    source: PlanSource::Generated,
                }
            }
            Err(err) => {
                warn!(
                    model = self.model.name(),
                    error = %err,
                    "model roadmap unavailable, using template fallback"
                );
                GeneratedPlan {
                    plan: fallback_plan(&request.title, local, now),
                    source: PlanSource::Fallback,
                }
            }
        }
    }

    /// One request to the model, bounded by the timeout, then extraction
    /// and the shape check.
    async fn request_plan(&self, prompt: &str) -> Result<RawPlan, RequestError> {
        let text = match tokio::time::timeout(self.timeout, self.model.generate(prompt)).await {
            Ok(result) => result?,
            Err(_) => return Err(ServiceError::Timeout(self.timeout).into()),
        };
        debug!(response_len = text.len(), "model responded");

        let value = extract_json_object(&text)?;
        Ok(RawPlan::from_value(&value)?)
    }
}

impl std::fmt::Debug for PlanGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlanGenerator")
            .field("model", &self.model.name())
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use chrono::{Duration as ChronoDuration, NaiveDate, TimeZone};

    use crate::genai::OfflineModel;
    use crate::roadmap::availability::MIN_WEEKS;

    /// Replies with a fixed text and counts calls.
    struct CannedModel {
        reply: Result<String, u16>,
        calls: AtomicUsize,
    }

    impl CannedModel {
        fn ok(text: &str) -> Arc<Self> {
            Arc::new(Self {
                reply: Ok(text.to_string()),
                calls: AtomicUsize::new(0),
            })
        }

        fn failing(status: u16) -> Arc<Self> {
            Arc::new(Self {
                reply: Err(status),
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl RoadmapModel for CannedModel {
        fn name(&self) -> &str {
            "canned"
        }

        async fn generate(&self, _prompt: &str) -> Result<String, ServiceError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.reply {
                Ok(text) => Ok(text.clone()),
                Err(status) => Err(ServiceError::Status {
                    status: *status,
                    body: String::new(),
                }),
            }
        }
    }

    struct StalledModel;

    #[async_trait]
    impl RoadmapModel for StalledModel {
        fn name(&self) -> &str {
            "stalled"
        }

        async fn generate(&self, _prompt: &str) -> Result<String, ServiceError> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok("{}".to_string())
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 2, 2, 10, 0, 0).unwrap()
    }

    fn request(title: &str, days_ahead: i64, hours: f64) -> PlanRequest {
        PlanRequest {
            title: title.to_string(),
            description: String::new(),
            target: now() + ChronoDuration::days(days_ahead),
            hours_per_week: hours,
        }
    }

    fn generator(model: Arc<dyn RoadmapModel>) -> PlanGenerator {
        PlanGenerator::new(model, Duration::from_secs(5))
    }

    #[tokio::test]
    async fn frontend_scenario_with_failing_service() {
        let model = CannedModel::failing(500);
        let result = generator(model.clone())
            .generate_at(&request("Frontend Developer", 90, 10.0), now())
            .await;

        assert_eq!(result.source, PlanSource::Fallback);
        assert_eq!(model.calls.load(Ordering::SeqCst), 1, "no retries");
        let plan = &result.plan;
        assert_eq!(plan.weeks_available, 12);
        assert_eq!(plan.achievable_hours, 120.0);
        assert!((plan.estimated_effort_hours - plan.achievable_hours * 1.2).abs() < 1e-9);
        assert_eq!(plan.milestones.len(), 4);
        assert_eq!(plan.milestones[0].title, "Milestone 1: HTML, CSS & responsive design");
        assert_eq!(plan.milestones[2].title, "Milestone 3: React.js and frontend frameworks");
    }

    #[tokio::test]
    async fn past_deadline_clamps_weeks() {
        let result = generator(Arc::new(OfflineModel))
            .generate_at(&request("Learn chess", -20, 3.0), now())
            .await;
        assert_eq!(result.plan.weeks_available, MIN_WEEKS);
        assert_eq!(result.plan.achievable_hours, 12.0);
    }

    #[tokio::test]
    async fn empty_milestones_fall_back() {
        let model = CannedModel::ok("Here is your plan: {\"milestones\": []}");
        let result = generator(model)
            .generate_at(&request("Backend engineer", 60, 8.0), now())
            .await;
        assert_eq!(result.source, PlanSource::Fallback);
        assert_eq!(result.plan.milestones[1].title, "Milestone 2: Databases & SQL");
    }

    #[tokio::test]
    async fn prose_without_json_falls_back() {
        let model = CannedModel::ok("Sorry, I can't help with that.");
        let result = generator(model)
            .generate_at(&request("Backend engineer", 60, 8.0), now())
            .await;
        assert_eq!(result.source, PlanSource::Fallback);
    }

    #[tokio::test]
    async fn valid_response_is_normalized() {
        let model = CannedModel::ok(
            r#"```json
{
  "estimated_effort_hours": 999,
  "achievable_hours": 80,
  "weeks_available": 8,
  "milestones": [
    {"title": "Basics", "start_date": "2026-02-02", "target_date": "2026-02-09",
     "tasks": [{"title": "Syntax", "estimated_hours": 5}]},
    {"title": "Ownership", "target_date": "2026-02-20",
     "tasks": [{"title": "Borrowing", "estimated_hours": 6}]},
    {"title": "Projects", "tasks": []}
  ]
}
```"#,
        );
        let result = generator(model)
            .generate_at(&request("Learn Rust", 56, 10.0), now())
            .await;

        assert_eq!(result.source, PlanSource::Generated);
        let plan = result.plan;
        assert_eq!(plan.achievable_hours, 80.0);
        assert_eq!(plan.weeks_available, 8);
        assert_eq!(plan.estimated_effort_hours, 640.0);
        assert_eq!(plan.milestones.len(), 3);

        // Milestone 2 lacks start_date: it gets the second weekly window.
        assert_eq!(
            plan.milestones[1].start_date,
            NaiveDate::from_ymd_opt(2026, 2, 9).unwrap()
        );
        assert_eq!(plan.milestones[2].tasks.len(), 2);
        assert_eq!(plan.milestones[2].tasks[0].title, "Research about Learn Rust");
    }

    #[tokio::test(start_paused = true)]
    async fn timeout_falls_back() {
        let result = PlanGenerator::new(Arc::new(StalledModel), Duration::from_secs(10))
            .generate_at(&request("Frontend Developer", 30, 4.0), now())
            .await;
        assert_eq!(result.source, PlanSource::Fallback);
    }

    #[tokio::test]
    async fn fallback_is_repeatable() {
        let g = generator(Arc::new(OfflineModel));
        let req = request("Get fit and healthy", 45, 5.0);
        let a = g.generate_at(&req, now()).await;
        let b = g.generate_at(&req, now()).await;
        assert_eq!(a, b);
    }

    #[tokio::test]
    async fn every_plan_satisfies_invariants() {
        let replies = [
            "{\"milestones\": [{\"title\": \"Only\"}]}",
            "{\"milestones\": [{\"title\": \"A\", \"tasks\": [{}]}, {}], \"weeks_available\": -3}",
            "nothing useful",
            "{\"milestones\": [{\"tasks\": []}]}",
        ];
        for reply in replies {
            let result = generator(CannedModel::ok(reply))
                .generate_at(&request("Data analyst", 10, 2.0), now())
                .await;
            let plan = &result.plan;
            assert!(plan.weeks_available >= MIN_WEEKS, "reply {reply:?}");
            assert!(!plan.milestones.is_empty(), "reply {reply:?}");
            assert!(
                plan.milestones.iter().all(|m| !m.tasks.is_empty()),
                "reply {reply:?}"
            );
        }
    }

    #[test]
    fn generated_plan_serializes_flat() {
        let plan = fallback_plan(
            "Learn piano",
            Availability {
                weeks: 4,
                achievable_hours: 20.0,
            },
            now(),
        );
        let json = serde_json::to_value(GeneratedPlan {
            plan,
            source: PlanSource::Fallback,
        })
        .unwrap();
        assert_eq!(json["source"], "fallback");
        assert_eq!(json["weeks_available"], 4);
        assert!(json["milestones"].is_array());
    }
}
