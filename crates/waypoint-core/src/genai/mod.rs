//! Generative model port and its implementations.
//!
//! ```text
//! PlanGenerator --generate(prompt)--> &dyn RoadmapModel
//!                                         |
//!                    +--------------------+------------------+
//!                    |                                       |
//!               GeminiClient                           OfflineModel
//!        (POST :generateContent)                 (always NotConfigured)
//! ```

pub mod gemini;
pub mod offline;
pub mod trait_def;

pub use gemini::{GeminiClient, GeminiConfig};
pub use offline::OfflineModel;
pub use trait_def::{RoadmapModel, ServiceError};
