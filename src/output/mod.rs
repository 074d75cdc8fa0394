//! Output writers for merged graphs.
//!
//! This module handles writing data to disk in various formats:
//! - DOT text for Graphviz
//! - JSON graph documents (for `render` and `validate`)

pub mod dot;
pub mod json;

// Re-export main functions
pub use dot::write_dot;
pub use json::{read_graph, write_graph, GraphDocument};
