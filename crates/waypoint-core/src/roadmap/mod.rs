//! Roadmap generation, normalization, persistence and export.

pub mod availability;
pub mod export;
pub mod extract;
pub mod fallback;
pub mod generate;
pub mod normalize;
pub mod prompt;
pub mod raw;
pub mod service;
pub mod template;
pub mod types;

pub use availability::{Availability, MAX_WEEKS, MIN_WEEKS};
pub use export::{export_file_name, render_markdown};
pub use generate::{GeneratedPlan, PlanGenerator, RequestError};
pub use normalize::normalize;
pub use raw::RawPlan;
pub use service::{MilestoneRecord, RoadmapRecord, get_roadmap, save_roadmap};
pub use types::{
    DEFAULT_HOURS_PER_WEEK, MAX_HOURS_PER_WEEK, Milestone, Plan, PlanRequest, PlanRequestError,
    Task,
};
