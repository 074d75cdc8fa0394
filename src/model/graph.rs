//! The merged call graph.
//!
//! Nodes live in an arena addressed by `NodeId`; parents point at their
//! callees through `children`. A graph is a forest with one tree per
//! distinct outermost frame.

use super::frame::Frame;
use super::identity::{FrameKey, IdentityPolicy};
use crate::utils::error::GraphError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Index of a node inside its graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(usize);

impl NodeId {
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A call site shared by every stack that passes through it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeNode {
    pub id: NodeId,

    /// First-seen frame for this call site
    pub frame: Frame,

    /// Distance from the root (roots are 0)
    pub depth: usize,

    /// Callees, in first-seen order
    pub children: Vec<NodeId>,

    /// Number of stacks that visited this node
    pub thread_count: usize,

    /// Positions (among merged stacks) of the stacks that visited this node
    pub threads: Vec<usize>,

    /// Whether row/column were part of this node's identity key
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub positional: bool,
}

impl MergeNode {
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    pub fn key(&self) -> FrameKey {
        FrameKey::new(&self.frame, self.positional)
    }
}

/// Result of merging a set of stacks
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Graph {
    identity: IdentityPolicy,
    roots: Vec<NodeId>,
    nodes: Vec<MergeNode>,
    #[serde(default)]
    thread_labels: Vec<Option<String>>,
}

impl Graph {
    /// Assemble a graph from already-built parts.
    ///
    /// No checks are made here; call [`Graph::validate`] before trusting
    /// a graph that did not come out of the merge engine.
    pub fn from_parts(
        identity: IdentityPolicy,
        roots: Vec<NodeId>,
        nodes: Vec<MergeNode>,
        thread_labels: Vec<Option<String>>,
    ) -> Self {
        Self {
            identity,
            roots,
            nodes,
            thread_labels,
        }
    }

    pub fn empty(identity: IdentityPolicy) -> Self {
        Self {
            identity,
            ..Default::default()
        }
    }

    pub fn identity(&self) -> IdentityPolicy {
        self.identity
    }

    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    pub fn nodes(&self) -> &[MergeNode] {
        &self.nodes
    }

    pub fn node(&self, id: NodeId) -> Option<&MergeNode> {
        self.nodes.get(id.index())
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of non-empty stacks that went into the graph
    pub fn stack_count(&self) -> usize {
        self.thread_labels.len()
    }

    /// Label of a merged stack, falling back to `#<position>`
    pub fn thread_label(&self, position: usize) -> String {
        match self.thread_labels.get(position) {
            Some(Some(label)) => label.clone(),
            _ => format!("#{}", position),
        }
    }

    pub fn leaves(&self) -> impl Iterator<Item = &MergeNode> {
        self.nodes.iter().filter(|node| node.is_leaf())
    }

    /// Node ids in depth-first pre-order, siblings in first-seen order
    pub fn preorder(&self) -> Vec<NodeId> {
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut pending: Vec<NodeId> = self.roots.iter().rev().copied().collect();

        while let Some(id) = pending.pop() {
            order.push(id);
            if let Some(node) = self.node(id) {
                pending.extend(node.children.iter().rev().copied());
            }
        }

        order
    }

    /// Check the forest invariants.
    ///
    /// Every node must be reachable from exactly one root along exactly one
    /// path, siblings must have distinct identities, and thread counts must
    /// agree with the recorded thread positions.
    pub fn validate(&self) -> Result<(), GraphError> {
        let violation = |msg: String| Err(GraphError::InvariantViolation(msg));

        for (index, node) in self.nodes.iter().enumerate() {
            if node.id.index() != index {
                return violation(format!("node at slot {} carries id {}", index, node.id));
            }
            if node.thread_count == 0 {
                return violation(format!("node {} has no threads", node.id));
            }
            if node.thread_count != node.threads.len() {
                return violation(format!(
                    "node {} counts {} threads but lists {}",
                    node.id,
                    node.thread_count,
                    node.threads.len()
                ));
            }
            if let Some(&position) = node.threads.iter().find(|&&t| t >= self.stack_count()) {
                return violation(format!(
                    "node {} references stack {} of {}",
                    node.id,
                    position,
                    self.stack_count()
                ));
            }
            let mut positions = HashSet::with_capacity(node.threads.len());
            if let Some(&position) = node.threads.iter().find(|&&t| !positions.insert(t)) {
                return violation(format!(
                    "node {} lists stack {} more than once",
                    node.id, position
                ));
            }
        }

        self.check_siblings(&self.roots, "roots")?;

        let root_threads: usize = self
            .roots
            .iter()
            .filter_map(|&id| self.node(id))
            .map(|node| node.thread_count)
            .sum();
        if root_threads != self.stack_count() {
            return violation(format!(
                "roots account for {} threads, graph holds {} stacks",
                root_threads,
                self.stack_count()
            ));
        }

        let mut seen = vec![false; self.nodes.len()];
        let mut pending: Vec<(NodeId, Option<NodeId>)> =
            self.roots.iter().map(|&id| (id, None)).collect();

        while let Some((id, parent)) = pending.pop() {
            let Some(node) = self.node(id) else {
                return violation(format!("dangling node id {}", id));
            };
            if seen[id.index()] {
                return violation(format!("node {} is reachable more than once", id));
            }
            seen[id.index()] = true;

            match parent.and_then(|p| self.node(p)) {
                Some(parent) => {
                    if node.depth != parent.depth + 1 {
                        return violation(format!(
                            "node {} at depth {} under parent at depth {}",
                            id, node.depth, parent.depth
                        ));
                    }
                    if node.thread_count > parent.thread_count {
                        return violation(format!(
                            "node {} has more threads than its parent {}",
                            id, parent.id
                        ));
                    }
                }
                None if node.depth != 0 => {
                    return violation(format!("root {} at depth {}", id, node.depth));
                }
                None => {}
            }

            self.check_siblings(&node.children, &format!("children of {}", id))?;
            pending.extend(node.children.iter().map(|&child| (child, Some(id))));
        }

        if let Some(index) = seen.iter().position(|visited| !visited) {
            return violation(format!("node {} is unreachable from any root", index));
        }

        Ok(())
    }

    fn check_siblings(&self, ids: &[NodeId], what: &str) -> Result<(), GraphError> {
        let mut keys = HashSet::with_capacity(ids.len());
        for &id in ids {
            let node = self
                .node(id)
                .ok_or_else(|| GraphError::InvariantViolation(format!("dangling node id {}", id)))?;
            if !keys.insert(node.key()) {
                return Err(GraphError::InvariantViolation(format!(
                    "duplicate call site '{}' among {}",
                    node.frame.function, what
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(
        id: usize,
        name: &str,
        depth: usize,
        children: Vec<usize>,
        threads: Vec<usize>,
    ) -> MergeNode {
        MergeNode {
            id: NodeId::new(id),
            frame: Frame::named(name),
            depth,
            children: children.into_iter().map(NodeId::new).collect(),
            thread_count: threads.len(),
            threads,
            positional: false,
        }
    }

    fn labels(n: usize) -> Vec<Option<String>> {
        vec![None; n]
    }

    #[test]
    fn test_valid_forest() {
        let graph = Graph::from_parts(
            IdentityPolicy::Location,
            vec![NodeId::new(0)],
            vec![
                node(0, "main", 0, vec![1, 2], vec![0, 1]),
                node(1, "a", 1, vec![], vec![0]),
                node(2, "b", 1, vec![], vec![1]),
            ],
            labels(2),
        );

        assert!(graph.validate().is_ok());
        assert_eq!(graph.preorder(), vec![NodeId::new(0), NodeId::new(1), NodeId::new(2)]);
        assert_eq!(graph.leaves().count(), 2);
    }

    #[test]
    fn test_empty_graph_is_valid() {
        assert!(Graph::empty(IdentityPolicy::Location).validate().is_ok());
    }

    #[test]
    fn test_cycle_is_rejected() {
        let graph = Graph::from_parts(
            IdentityPolicy::Location,
            vec![NodeId::new(0)],
            vec![
                node(0, "main", 0, vec![1], vec![0]),
                node(1, "a", 1, vec![0], vec![0]),
            ],
            labels(1),
        );

        assert!(matches!(graph.validate(), Err(GraphError::InvariantViolation(_))));
    }

    #[test]
    fn test_duplicate_siblings_are_rejected() {
        let graph = Graph::from_parts(
            IdentityPolicy::Location,
            vec![NodeId::new(0)],
            vec![
                node(0, "main", 0, vec![1, 2], vec![0, 1]),
                node(1, "a", 1, vec![], vec![0]),
                node(2, "a", 1, vec![], vec![1]),
            ],
            labels(2),
        );

        let err = graph.validate().unwrap_err();
        assert!(err.to_string().contains("duplicate call site 'a'"));
    }

    #[test]
    fn test_repeated_thread_position_is_rejected() {
        let graph = Graph::from_parts(
            IdentityPolicy::Location,
            vec![NodeId::new(0)],
            vec![node(0, "main", 0, vec![], vec![0, 0])],
            labels(2),
        );

        let err = graph.validate().unwrap_err();
        assert!(err.to_string().contains("lists stack 0 more than once"));
    }

    #[test]
    fn test_dangling_child_is_rejected() {
        let graph = Graph::from_parts(
            IdentityPolicy::Location,
            vec![NodeId::new(0)],
            vec![node(0, "main", 0, vec![5], vec![0])],
            labels(1),
        );

        assert!(graph.validate().is_err());
    }

    #[test]
    fn test_unreachable_node_is_rejected() {
        let graph = Graph::from_parts(
            IdentityPolicy::Location,
            vec![NodeId::new(0)],
            vec![node(0, "main", 0, vec![], vec![0]), node(1, "orphan", 1, vec![], vec![0])],
            labels(1),
        );

        assert!(graph.validate().is_err());
    }

    #[test]
    fn test_thread_label_fallback() {
        let graph = Graph::from_parts(
            IdentityPolicy::Location,
            vec![],
            vec![],
            vec![Some("worker-1".to_string()), None],
        );

        assert_eq!(graph.thread_label(0), "worker-1");
        assert_eq!(graph.thread_label(1), "#1");
    }
}
