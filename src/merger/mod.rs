//! Merging of per-thread stacks into a shared call graph.
//!
//! This module turns independent stacks into:
//! - A deduplicated forest of call sites (engine)
//! - Shape statistics about that forest (stats)

pub mod engine;
pub mod stats;

// Re-export main types and functions
pub use engine::{merge, MergeConfig, MergeEngine};
pub use stats::{calculate_stats, GraphStats};
