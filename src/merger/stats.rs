//! Shape statistics for a merged graph.
//!
//! Branch points are where threads that shared a call path diverge;
//! they are what makes a Parallel Stacks view worth looking at.

use crate::model::Graph;
use log::debug;
use serde::{Deserialize, Serialize};

/// Summary of a merged graph
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphStats {
    /// Non-empty stacks that were merged
    pub stack_count: usize,

    /// Total merge nodes
    pub node_count: usize,

    /// Distinct entry points
    pub root_count: usize,

    /// Distinct innermost call sites
    pub leaf_count: usize,

    /// Nodes with more than one callee
    pub branch_points: usize,

    /// Deepest node depth (roots are 0)
    pub max_depth: usize,
}

/// Calculate statistics for a graph
pub fn calculate_stats(graph: &Graph) -> GraphStats {
    let nodes = graph.nodes();

    let stats = GraphStats {
        stack_count: graph.stack_count(),
        node_count: nodes.len(),
        root_count: graph.roots().len(),
        leaf_count: graph.leaves().count(),
        branch_points: nodes.iter().filter(|n| n.children.len() > 1).count(),
        max_depth: nodes.iter().map(|n| n.depth).max().unwrap_or(0),
    };

    debug!("Graph stats: {}", stats.summary());
    stats
}

impl GraphStats {
    /// Ratio of frames saved by merging, given the total input frame count
    pub fn compression(&self, total_frames: usize) -> f64 {
        if total_frames == 0 {
            return 0.0;
        }
        (1.0 - self.node_count as f64 / total_frames as f64) * 100.0
    }

    /// Get human-readable summary
    pub fn summary(&self) -> String {
        format!(
            "Stacks: {} | Nodes: {} | Roots: {} | Leaves: {} | Branch points: {} | Max depth: {}",
            self.stack_count,
            self.node_count,
            self.root_count,
            self.leaf_count,
            self.branch_points,
            self.max_depth
        )
    }
}
