//! Goal roadmap planning.
//!
//! [`roadmap::PlanGenerator`] asks a [`genai::RoadmapModel`] for a roadmap,
//! repairs what comes back, and falls back to topic templates whenever the
//! model cannot deliver. [`roadmap::save_roadmap`] persists the result.

pub mod genai;
pub mod roadmap;
