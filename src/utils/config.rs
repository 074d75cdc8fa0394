//! Configuration and constants for the CLI.

/// Current graph document schema version
pub const SCHEMA_VERSION: &str = "1.0.0";

/// Name of the emitted DOT graph
pub const DOT_GRAPH_NAME: &str = "parallel_stacks";

/// Default indentation depth for the text tree before it is cut off
pub const DEFAULT_MAX_TREE_DEPTH: usize = 15;

/// 0 means every frame of every stack is merged
pub const DEFAULT_DEPTH_LIMIT: usize = 0;

// Field names for JSON stack documents (debug adapters use different names)
pub const STACKS_FIELD_NAMES: &[&str] = &["stacks", "threads", "result"];
