//! Table layout: call chains collapsed into one box per segment.
//!
//! A segment starts at a root or at a child of a branch point and follows
//! single-child links as long as the thread count stays the same. Each
//! segment becomes one HTML-table node with a "N Threads" header and one
//! row per frame, innermost frame on top.

use super::escape::escape_html;
use crate::model::{Graph, MergeNode, NodeId};

/// One collapsed call chain, outermost node first
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub head: NodeId,
    pub nodes: Vec<NodeId>,
    pub thread_count: usize,
}

/// Split a (validated) graph into segments and the links between them
pub fn build_segments(graph: &Graph) -> (Vec<Segment>, Vec<(NodeId, NodeId)>) {
    let mut segments = Vec::new();
    let mut links = Vec::new();
    let mut pending: Vec<NodeId> = graph.roots().iter().rev().copied().collect();

    while let Some(head) = pending.pop() {
        let Some(first) = graph.node(head) else {
            continue;
        };

        let mut nodes = vec![head];
        let mut tail = first;
        while let [only] = tail.children.as_slice() {
            match graph.node(*only) {
                Some(next) if next.thread_count == first.thread_count => {
                    nodes.push(*only);
                    tail = next;
                }
                _ => break,
            }
        }

        for &child in &tail.children {
            links.push((head, child));
        }
        pending.extend(tail.children.iter().rev().copied());

        segments.push(Segment {
            head,
            nodes,
            thread_count: first.thread_count,
        });
    }

    (segments, links)
}

pub(crate) fn write_tables(out: &mut String, graph: &Graph) {
    let (segments, links) = build_segments(graph);

    for segment in &segments {
        out.push('\n');
        out.push_str(&format!("  seg{} [label=<\n", segment.head));
        write_table(out, graph, segment);
        out.push_str("  >];\n");
    }

    if !links.is_empty() {
        out.push('\n');
    }
    for (from, to) in links {
        out.push_str(&format!(
            "  seg{} -> seg{} [arrowsize=2, minlen=2];\n",
            from, to
        ));
    }
}

fn write_table(out: &mut String, graph: &Graph, segment: &Segment) {
    out.push_str(
        "    <table BORDER=\"1\" CELLBORDER=\"1\" CELLPADDING=\"6\" CELLSPACING=\"0\" STYLE=\"ROUNDED\">\n",
    );
    out.push_str(&format!(
        "      <tr><td COLSPAN=\"3\" BORDER=\"0\"><B>{}</B></td></tr>\n",
        threads_header(segment.thread_count)
    ));

    for node in segment.nodes.iter().rev().filter_map(|&id| graph.node(id)) {
        write_row(out, node);
    }

    out.push_str("    </table>\n");
}

fn write_row(out: &mut String, node: &MergeNode) {
    let location = if node.frame.filename.is_empty() {
        String::new()
    } else {
        escape_html(&node.frame.location())
    };

    out.push_str(&format!(
        "      <tr><td SIDES=\"T\">{}</td><td SIDES=\"LT\">{}</td><td SIDES=\"LT\">{}</td></tr>\n",
        node.depth,
        escape_html(&node.frame.function),
        location
    ));
}

fn threads_header(count: usize) -> String {
    if count == 1 {
        "1 Thread".to_string()
    } else {
        format!("{} Threads", count)
    }
}
