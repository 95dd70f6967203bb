//! PostgreSQL persistence for goals, milestones, and tasks.

pub mod config;
pub mod models;
pub mod pool;
pub mod queries;
