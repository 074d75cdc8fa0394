//! Merge per-thread stacks into a single call graph.
//!
//! Each stack is walked from its outermost frame towards the innermost one.
//! At every level the current node's children are looked up by identity
//! key; a match is descended into, a miss creates a new child. Every node
//! visited by a stack gets that stack's position recorded exactly once.
//!
//! Example (innermost first):
//!   [helper, main] + [other, main]  ->  main(2) -> { helper(1), other(1) }

use crate::model::{Frame, FrameKey, Graph, IdentityPolicy, MergeNode, NodeId, Stack};
use crate::utils::config::DEFAULT_DEPTH_LIMIT;
use log::debug;
use std::collections::HashMap;

/// Merge configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeConfig {
    pub identity: IdentityPolicy,

    /// Only the outermost `depth_limit` frames are merged (0 = all)
    pub depth_limit: usize,
}

impl Default for MergeConfig {
    fn default() -> Self {
        Self {
            identity: IdentityPolicy::default(),
            depth_limit: DEFAULT_DEPTH_LIMIT,
        }
    }
}

impl MergeConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_identity(mut self, identity: IdentityPolicy) -> Self {
        self.identity = identity;
        self
    }

    pub fn with_depth_limit(mut self, depth_limit: usize) -> Self {
        self.depth_limit = depth_limit;
        self
    }
}

/// Caller-owned merge engine.
///
/// Holds no state between calls; every `merge` builds a fresh graph.
#[derive(Debug, Clone, Default)]
pub struct MergeEngine {
    config: MergeConfig,
}

impl MergeEngine {
    pub fn new(config: MergeConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &MergeConfig {
        &self.config
    }

    /// Merge stacks (each innermost-first) into a forest.
    ///
    /// Empty stacks are skipped and do not get a thread position, so a
    /// graph built with or without them is identical.
    pub fn merge(&self, stacks: &[Stack]) -> Graph {
        let mut builder = GraphBuilder::new(self.config.identity);
        let mut skipped = 0;

        for stack in stacks {
            if stack.is_empty() {
                skipped += 1;
                continue;
            }
            builder.add_stack(stack, self.config.depth_limit);
        }

        let graph = builder.finish();

        debug!(
            "Merged {} stacks ({} empty skipped) into {} nodes under {} roots",
            graph.stack_count(),
            skipped,
            graph.len(),
            graph.roots().len()
        );

        graph
    }
}

/// Merge with the default configuration
pub fn merge(stacks: &[Stack]) -> Graph {
    MergeEngine::default().merge(stacks)
}

/// Arena under construction plus per-level identity tables
struct GraphBuilder {
    identity: IdentityPolicy,
    nodes: Vec<MergeNode>,
    roots: Vec<NodeId>,
    root_index: HashMap<FrameKey, NodeId>,
    child_index: Vec<HashMap<FrameKey, NodeId>>,
    thread_labels: Vec<Option<String>>,
}

impl GraphBuilder {
    fn new(identity: IdentityPolicy) -> Self {
        Self {
            identity,
            nodes: Vec::new(),
            roots: Vec::new(),
            root_index: HashMap::new(),
            child_index: Vec::new(),
            thread_labels: Vec::new(),
        }
    }

    fn add_stack(&mut self, stack: &Stack, depth_limit: usize) {
        let position = self.thread_labels.len();
        self.thread_labels.push(stack.thread.clone());

        let take = if depth_limit > 0 {
            depth_limit.min(stack.frames.len())
        } else {
            stack.frames.len()
        };

        let mut current: Option<NodeId> = None;

        // frames[last] is the thread entry; walk towards frames[0]
        let walk = stack.frames.iter().enumerate().rev().take(take);
        for (depth, (index, frame)) in walk.enumerate() {
            let id = self.find_or_create(current, frame, depth, index == 0);

            let node = &mut self.nodes[id.index()];
            node.thread_count += 1;
            node.threads.push(position);

            current = Some(id);
        }
    }

    fn find_or_create(
        &mut self,
        parent: Option<NodeId>,
        frame: &Frame,
        depth: usize,
        is_innermost: bool,
    ) -> NodeId {
        let positional = self.identity.is_positional(is_innermost);
        let key = self.identity.key(frame, is_innermost);

        if let Some(&id) = self.index(parent).get(&key) {
            return id;
        }
        if self.identity == IdentityPolicy::LeafLine {
            if let Some(id) = self.resolve_same_line(parent, frame, positional) {
                return id;
            }
        }

        let id = self.push_node(frame, depth, positional);
        self.index_mut(parent).insert(key, id);
        match parent {
            Some(parent) => self.nodes[parent.index()].children.push(id),
            None => self.roots.push(id),
        }
        id
    }

    /// `LeafLine`: a thread paused on a line and a thread calling out of
    /// that same line share one node.
    fn resolve_same_line(
        &mut self,
        parent: Option<NodeId>,
        frame: &Frame,
        positional: bool,
    ) -> Option<NodeId> {
        if positional {
            let id = *self.index(parent).get(&FrameKey::new(frame, false))?;
            let existing = &self.nodes[id.index()].frame;
            (existing.row == frame.row && existing.column == frame.column).then_some(id)
        } else {
            // the paused leaf becomes the interior node, keyed by location
            let id = self.index_mut(parent).remove(&FrameKey::new(frame, true))?;
            self.nodes[id.index()].positional = false;
            self.index_mut(parent).insert(FrameKey::new(frame, false), id);
            Some(id)
        }
    }

    fn index(&self, parent: Option<NodeId>) -> &HashMap<FrameKey, NodeId> {
        match parent {
            Some(parent) => &self.child_index[parent.index()],
            None => &self.root_index,
        }
    }

    fn index_mut(&mut self, parent: Option<NodeId>) -> &mut HashMap<FrameKey, NodeId> {
        match parent {
            Some(parent) => &mut self.child_index[parent.index()],
            None => &mut self.root_index,
        }
    }

    fn push_node(&mut self, frame: &Frame, depth: usize, positional: bool) -> NodeId {
        let id = NodeId::new(self.nodes.len());
        self.nodes.push(MergeNode {
            id,
            frame: frame.clone(),
            depth,
            children: Vec::new(),
            thread_count: 0,
            threads: Vec::new(),
            positional,
        });
        self.child_index.push(HashMap::new());
        id
    }

    fn finish(self) -> Graph {
        Graph::from_parts(self.identity, self.roots, self.nodes, self.thread_labels)
    }
}
