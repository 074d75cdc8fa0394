//! Plain-text tree view of a merged graph, for terminals and logs.

use crate::model::{Graph, NodeId};
use crate::utils::error::GraphError;

/// Render the graph as an indented tree, two spaces per level.
///
/// Subtrees below `max_depth` are replaced with a single
/// `... (max depth exceeded)` line.
pub fn generate_text_tree(graph: &Graph, max_depth: usize) -> Result<String, GraphError> {
    graph.validate()?;

    let mut lines = Vec::new();
    for &root in graph.roots() {
        write_subtree(graph, root, max_depth, &mut lines);
    }

    if lines.is_empty() {
        lines.push("(no stacks)".to_string());
    }

    Ok(lines.join("\n"))
}

fn write_subtree(graph: &Graph, id: NodeId, max_depth: usize, lines: &mut Vec<String>) {
    let Some(node) = graph.node(id) else {
        return;
    };
    let indent = "  ".repeat(node.depth);

    if node.depth > max_depth {
        lines.push(format!("{}... (max depth exceeded)", indent));
        return;
    }

    let threads = if node.thread_count > 1 {
        format!(" [{} threads]", node.thread_count)
    } else {
        String::new()
    };
    lines.push(format!("{}{}{}", indent, node.frame, threads));

    for &child in &node.children {
        write_subtree(graph, child, max_depth, lines);
    }
}
