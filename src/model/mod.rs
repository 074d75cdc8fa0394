//! Data model shared by the merge engine and the serializer.
//!
//! - `Frame` / `Stack`: transient per-thread input
//! - `IdentityPolicy` / `FrameKey`: what counts as the same call site
//! - `Graph` / `MergeNode`: the merged forest

pub mod frame;
pub mod graph;
pub mod identity;

pub use frame::{Frame, Stack};
pub use graph::{Graph, MergeNode, NodeId};
pub use identity::{FrameKey, IdentityPolicy};
