//! Graph serialization.
//!
//! This module converts merged graphs into Graphviz DOT text for an
//! external renderer, plus a plain-text tree for terminals.

pub mod escape;
pub mod generator;
pub mod tables;
pub mod text;

// Re-export main types
pub use generator::{generate_dot, serialize, DotConfig, DotStyle, RankDir};
pub use tables::{build_segments, Segment};
pub use text::generate_text_tree;
