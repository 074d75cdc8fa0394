//! Parallel Stacks
//!
//! Merges the call stacks of many threads into one graph, the way an IDE
//! "Parallel Stacks" window does, and serializes it as Graphviz DOT.
//!
//! Threads that share a call path share nodes; where their paths diverge
//! the graph branches. Each node counts the threads that pass through it.
//!
//! ## Getting Started
//!
//! ```bash
//! parallel-stacks merge --stacks "helper, main; other, main" | dot -Tsvg > stacks.svg
//! ```
//!
//! As a library:
//!
//! ```
//! use parallel_stacks::{merge, serialize, Frame, Stack};
//!
//! let stacks = vec![
//!     Stack::new(vec![Frame::named("helper"), Frame::named("main")]),
//!     Stack::new(vec![Frame::named("other"), Frame::named("main")]),
//! ];
//! let graph = merge(&stacks);
//! assert_eq!(graph.roots().len(), 1);
//!
//! let dot = serialize(&graph).unwrap();
//! assert!(dot.contains("(2 threads)"));
//! ```

pub mod commands;
pub mod dot;
pub mod merger;
pub mod model;
pub mod output;
pub mod parser;
pub mod utils;

pub use dot::{generate_dot, serialize, DotConfig};
pub use merger::{merge, MergeConfig, MergeEngine};
pub use model::{Frame, Graph, IdentityPolicy, MergeNode, NodeId, Stack};
pub use utils::error::GraphError;
