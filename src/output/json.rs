//! JSON graph document writer.
//!
//! A merged graph is saved together with its statistics so that it can be
//! rendered again later (`parallel-stacks render`) without re-parsing the
//! debugger output.

use crate::merger::{calculate_stats, GraphStats};
use crate::model::Graph;
use crate::utils::config::SCHEMA_VERSION;
use crate::utils::error::OutputError;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

/// On-disk form of a merged graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphDocument {
    /// Schema version
    pub version: String,

    /// ISO 8601 timestamp of when the document was written
    pub generated_at: String,

    /// Summary numbers, informational only
    pub stats: GraphStats,

    /// The merged graph itself
    pub graph: Graph,
}

impl GraphDocument {
    /// Wrap a graph, stamping it with the current schema version and time
    pub fn new(graph: Graph) -> Self {
        Self {
            version: SCHEMA_VERSION.to_string(),
            generated_at: chrono::Utc::now().to_rfc3339(),
            stats: calculate_stats(&graph),
            graph,
        }
    }
}

/// Write a graph document to a JSON file
///
/// **Public** - main entry point for JSON output
///
/// # Arguments
/// * `document` - Graph document to write
/// * `output_path` - Path to output JSON file
///
/// # Errors
/// * `OutputError::WriteFailed` - I/O error during write
/// * `OutputError::SerializationFailed` - JSON serialization error
/// * `OutputError::InvalidPath` - Path cannot be created or is invalid
pub fn write_graph(
    document: &GraphDocument,
    output_path: impl AsRef<Path>,
) -> Result<(), OutputError> {
    let output_path = output_path.as_ref();

    info!("Writing graph to: {}", output_path.display());

    validate_output_path(output_path)?;
    create_parent_dirs(output_path)?;

    let file = File::create(output_path).map_err(OutputError::WriteFailed)?;
    let writer = BufWriter::new(file);

    serde_json::to_writer_pretty(writer, document).map_err(OutputError::SerializationFailed)?;

    info!(
        "Graph written successfully ({} bytes)",
        calculate_file_size(output_path)
    );

    Ok(())
}

/// Read a graph document from a JSON file
///
/// The graph is not validated here; callers that serialize it get the
/// invariant check from the serializer.
///
/// # Errors
/// * `OutputError::WriteFailed` - File read error (reusing WriteFailed for I/O)
/// * `OutputError::SerializationFailed` - JSON parse error
pub fn read_graph(input_path: impl AsRef<Path>) -> Result<GraphDocument, OutputError> {
    let input_path = input_path.as_ref();

    debug!("Reading graph from: {}", input_path.display());

    let file = File::open(input_path).map_err(OutputError::WriteFailed)?;
    let document: GraphDocument =
        serde_json::from_reader(file).map_err(OutputError::SerializationFailed)?;

    debug!(
        "Graph loaded: version {}, {} nodes",
        document.version,
        document.graph.len()
    );

    Ok(document)
}

/// Validate that output path is writable
///
/// **Public (crate)** - shared with the DOT writer
pub(crate) fn validate_output_path(path: &Path) -> Result<(), OutputError> {
    if path.as_os_str().is_empty() {
        return Err(OutputError::InvalidPath("Path is empty".to_string()));
    }

    if path.is_dir() {
        return Err(OutputError::InvalidPath(format!(
            "Path is a directory: {}",
            path.display()
        )));
    }

    Ok(())
}

pub(crate) fn create_parent_dirs(path: &Path) -> Result<(), OutputError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            debug!("Creating parent directories: {}", parent.display());
            std::fs::create_dir_all(parent).map_err(|e| {
                OutputError::InvalidPath(format!(
                    "Cannot create directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }
    }
    Ok(())
}

fn calculate_file_size(path: &Path) -> u64 {
    std::fs::metadata(path).map(|m| m.len()).unwrap_or(0)
}
