use crate::output::read_graph;
use crate::utils::config::SCHEMA_VERSION;
use anyhow::{Context, Result};
use std::path::Path;

/// Validate a graph JSON file, including the graph invariants
pub fn validate_graph_file(file_path: &Path) -> Result<()> {
    println!("Validating graph: {}", file_path.display());

    let document = read_graph(file_path)
        .with_context(|| format!("Failed to read graph {}", file_path.display()))?;

    document
        .graph
        .validate()
        .context("Graph structure is invalid")?;

    if document.version != SCHEMA_VERSION {
        log::warn!(
            "Schema version {} differs from current {}",
            document.version,
            SCHEMA_VERSION
        );
    }

    println!("✓ Valid graph JSON");
    println!("  Version: {}", document.version);
    println!("  Generated: {}", document.generated_at);
    println!("  Identity: {}", document.graph.identity());
    println!("  Stacks: {}", document.graph.stack_count());
    println!("  Nodes: {}", document.graph.len());
    println!("  Roots: {}", document.graph.roots().len());

    Ok(())
}

/// Display schema information
pub fn display_schema(show_details: bool) {
    println!("Parallel Stacks Graph Schema");
    println!("Current Version: {}", SCHEMA_VERSION);
    println!();

    if show_details {
        println!("Schema Structure:");
        println!("  version: string          - Schema version (e.g., '1.0.0')");
        println!("  generated_at: string     - ISO 8601 timestamp");
        println!("  stats: object            - Graph statistics");
        println!("    stack_count: number    - Non-empty stacks merged");
        println!("    node_count: number     - Merge nodes");
        println!("    root_count: number     - Distinct entry points");
        println!("    leaf_count: number     - Distinct innermost frames");
        println!("    branch_points: number  - Nodes with several callees");
        println!("    max_depth: number      - Deepest node depth");
        println!("  graph: object            - Merged graph");
        println!("    identity: string       - location | leaf-line | exact");
        println!("    roots: array           - Root node ids, first-seen order");
        println!("    nodes: array           - Nodes indexed by id");
        println!("      id: number           - Node id");
        println!("      frame: object        - function, filename, row, column");
        println!("      depth: number        - Distance from the root");
        println!("      children: array      - Child node ids");
        println!("      thread_count: number - Stacks through this node");
        println!("      threads: array       - Stack positions through this node");
        println!("    thread_labels: array   - Thread label per stack (or null)");
    } else {
        println!("Use --show for detailed schema information");
    }
}

/// Display version information
pub fn display_version() {
    println!("Parallel Stacks v{}", env!("CARGO_PKG_VERSION"));
    println!("Graph Schema: v{}", SCHEMA_VERSION);
    println!();
    println!("Merges per-thread call stacks into a Graphviz DOT graph.");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::merger::merge;
    use crate::output::{write_graph, GraphDocument};
    use crate::parser::parse_inline;

    #[test]
    fn test_validate_graph_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("graph.json");
        let document = GraphDocument::new(merge(&parse_inline("b, a; c, a")));
        write_graph(&document, &path).unwrap();

        assert!(validate_graph_file(&path).is_ok());
    }

    #[test]
    fn test_validate_graph_file_not_json() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("graph.json");
        std::fs::write(&path, "digraph {}").unwrap();

        assert!(validate_graph_file(&path).is_err());
    }
}
