//! CLI command implementations.
//!
//! Each command is implemented in its own module.
//! Commands orchestrate the various library components to perform user tasks.

pub mod merge;
pub mod models;
pub mod utils;

// Re-export main command functions
pub use merge::{execute_merge, execute_render, load_stacks, validate_args};
pub use models::{InputSource, MergeArgs, RenderArgs};
pub use utils::{display_schema, display_version, validate_graph_file};
