//! Query functions, one module per table.

pub mod goals;
pub mod milestones;
pub mod tasks;
