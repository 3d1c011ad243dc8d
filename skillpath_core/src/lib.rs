#![forbid(unsafe_code)]

//! Core domain model and business logic for SkillPath.
//!
//! This crate provides:
//! - Domain types (exercises, progress, products, athletes)
//! - Exercise catalog and prerequisite graph validation
//! - Skill unlock evaluation
//! - Product catalog query engine
//! - Leaderboard and community feed
//! - File sources (JSON snapshots, CSV export)

pub mod types;
pub mod error;
pub mod catalog;
pub mod graph;
pub mod skills;
pub mod products;
pub mod query;
pub mod progress;
pub mod leaderboard;
pub mod community;
pub mod export;
pub mod config;
pub mod logging;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use catalog::{build_default_catalog, get_default_catalog, sample_progress};
pub use config::Config;
pub use graph::{GraphError, PrerequisiteGraph};
pub use skills::{
    exercises_by_category, exercises_by_category_id, is_unlocked, next_unlockable,
    prerequisites_of, summarize, unlock_overview, ExerciseUnlock, ProgressSummary,
};
pub use products::{
    default_products, save_products, validate_products, InMemorySource, JsonFileSource,
    ProductSource,
};
pub use query::{featured_products, find_product, products_in_category, query, QuerySpec};
pub use leaderboard::{default_leaderboard, rank_athletes, university_standings};
pub use community::{default_feed, recent_activity, relative_time};
pub use export::write_products_csv;
