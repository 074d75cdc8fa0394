//! DOT generation for merged graphs.
//!
//! Two layouts are supported:
//! - `Nodes`: one DOT node per merge node, one edge per caller/callee pair
//! - `Tables`: single-thread-count call chains collapsed into HTML tables,
//!   the way IDE "Parallel Stacks" windows draw them
//!
//! Edges always point from caller to callee. The graph is validated before
//! anything is written, so a malformed graph never yields partial output.

use super::escape::escape_dot;
use super::tables::write_tables;
use crate::model::{Graph, MergeNode};
use crate::utils::config::DOT_GRAPH_NAME;
use crate::utils::error::GraphError;
use log::{debug, info};
use std::fmt;
use std::str::FromStr;

/// Only this many thread labels are listed in a node tooltip
const MAX_TOOLTIP_THREADS: usize = 16;

/// Layout of the emitted graph
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DotStyle {
    #[default]
    Nodes,
    Tables,
}

impl FromStr for DotStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "nodes" => Ok(Self::Nodes),
            "tables" => Ok(Self::Tables),
            other => Err(format!("unknown style '{}' (expected nodes or tables)", other)),
        }
    }
}

/// DOT `rankdir`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RankDir {
    TopBottom,
    /// Entry points at the bottom, current frames on top
    #[default]
    BottomTop,
    LeftRight,
    RightLeft,
}

impl RankDir {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TopBottom => "TB",
            Self::BottomTop => "BT",
            Self::LeftRight => "LR",
            Self::RightLeft => "RL",
        }
    }
}

impl fmt::Display for RankDir {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RankDir {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "TB" => Ok(Self::TopBottom),
            "BT" => Ok(Self::BottomTop),
            "LR" => Ok(Self::LeftRight),
            "RL" => Ok(Self::RightLeft),
            other => Err(format!("unknown rankdir '{}' (expected TB, BT, LR or RL)", other)),
        }
    }
}

/// DOT output configuration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DotConfig {
    pub title: Option<String>,
    pub rankdir: RankDir,
    pub style: DotStyle,
}

impl DotConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_rankdir(mut self, rankdir: RankDir) -> Self {
        self.rankdir = rankdir;
        self
    }

    pub fn with_style(mut self, style: DotStyle) -> Self {
        self.style = style;
        self
    }
}

/// Serialize a graph to DOT with the default configuration
pub fn serialize(graph: &Graph) -> Result<String, GraphError> {
    generate_dot(graph, None)
}

/// Generate DOT text from a merged graph
pub fn generate_dot(graph: &Graph, config: Option<&DotConfig>) -> Result<String, GraphError> {
    graph.validate()?;

    let config = config.cloned().unwrap_or_default();
    debug!(
        "Generating {:?} DOT for {} nodes ({} stacks)",
        config.style,
        graph.len(),
        graph.stack_count()
    );

    let mut dot = String::new();
    write_header(&mut dot, &config);

    match config.style {
        DotStyle::Nodes => write_nodes(&mut dot, graph),
        DotStyle::Tables => write_tables(&mut dot, graph),
    }

    dot.push_str("}\n");

    info!("DOT generated successfully ({} bytes)", dot.len());
    Ok(dot)
}

fn write_header(out: &mut String, config: &DotConfig) {
    out.push_str(&format!("digraph {} {{\n", DOT_GRAPH_NAME));
    out.push_str(&format!("  rankdir={};\n", config.rankdir));

    if let Some(title) = &config.title {
        out.push_str(&format!("  label=\"{}\";\n", escape_dot(title)));
        out.push_str("  labelloc=t;\n");
    }

    match config.style {
        DotStyle::Nodes => {
            out.push_str("  node [shape=box, style=rounded, fontname=\"Helvetica\"];\n")
        }
        DotStyle::Tables => out.push_str("  node [shape=plaintext, fontname=\"Helvetica\"];\n"),
    }
}

fn write_nodes(out: &mut String, graph: &Graph) {
    if graph.is_empty() {
        return;
    }

    out.push('\n');
    for node in graph.nodes() {
        out.push_str(&format!(
            "  n{} [label=\"{}\", tooltip=\"{}\"];\n",
            node.id,
            node_label(node),
            escape_dot(&thread_tooltip(graph, node))
        ));
    }

    out.push('\n');
    for node in graph.nodes() {
        for child in &node.children {
            out.push_str(&format!("  n{} -> n{};\n", node.id, child));
        }
    }
}

/// `function\nfilename\n(N threads)`, already escaped.
///
/// Nodes keyed on their line show it after the filename.
pub fn node_label(node: &MergeNode) -> String {
    let mut label = escape_dot(&node.frame.function);
    if !node.frame.filename.is_empty() {
        label.push_str("\\n");
        label.push_str(&escape_dot(&node.frame.filename));
        if node.positional {
            label.push_str(&format!(":{}", node.frame.row));
        }
    } else if node.positional {
        label.push_str(&format!("\\nline {}", node.frame.row));
    }
    if node.thread_count > 1 {
        label.push_str(&format!("\\n({} threads)", node.thread_count));
    }
    label
}

/// Raw (unescaped) list of the threads passing through a node
pub fn thread_tooltip(graph: &Graph, node: &MergeNode) -> String {
    let mut names: Vec<String> = node
        .threads
        .iter()
        .take(MAX_TOOLTIP_THREADS)
        .map(|&position| graph.thread_label(position))
        .collect();
    if node.threads.len() > MAX_TOOLTIP_THREADS {
        names.push(format!("... {} more", node.threads.len() - MAX_TOOLTIP_THREADS));
    }
    format!("threads: {}", names.join(", "))
}
