//! DOT output writer.
//!
//! Writes serialized graphs to files for an external Graphviz renderer.

use super::json::{create_parent_dirs, validate_output_path};
use crate::utils::error::OutputError;
use log::{debug, info};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Write DOT text to a file
///
/// **Public** - main entry point for DOT output
///
/// # Arguments
/// * `dot_content` - DOT string from the serializer
/// * `output_path` - Path to output `.dot` / `.gv` file
///
/// # Errors
/// * `OutputError::WriteFailed` - I/O error during write
/// * `OutputError::InvalidPath` - Path is invalid
pub fn write_dot(dot_content: &str, output_path: impl AsRef<Path>) -> Result<(), OutputError> {
    let output_path = output_path.as_ref();

    info!("Writing DOT to: {}", output_path.display());

    validate_dot_path(output_path)?;
    create_parent_dirs(output_path)?;

    let file = File::create(output_path).map_err(OutputError::WriteFailed)?;
    let mut writer = BufWriter::new(file);

    writer
        .write_all(dot_content.as_bytes())
        .map_err(OutputError::WriteFailed)?;
    writer.flush().map_err(OutputError::WriteFailed)?;

    let file_size = dot_content.len();
    info!(
        "DOT written successfully ({} bytes, {:.2} KB)",
        file_size,
        file_size as f64 / 1024.0
    );

    Ok(())
}

fn validate_dot_path(path: &Path) -> Result<(), OutputError> {
    validate_output_path(path)?;

    if let Some(ext) = path.extension() {
        if ext != "dot" && ext != "gv" {
            debug!(
                "Warning: File does not have a .dot or .gv extension: {}",
                path.display()
            );
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOT: &str = "digraph parallel_stacks {\n}\n";

    #[test]
    fn test_write_dot() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("stacks.dot");

        write_dot(DOT, &path).unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), DOT);
    }

    #[test]
    fn test_write_dot_creates_parent_dirs() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("out/graphs/stacks.gv");

        write_dot(DOT, &path).unwrap();

        assert!(path.exists());
    }

    #[test]
    fn test_write_dot_rejects_directory() {
        let temp_dir = tempfile::tempdir().unwrap();
        let result = write_dot(DOT, temp_dir.path());
        assert!(matches!(result, Err(OutputError::InvalidPath(_))));
    }

    #[test]
    fn test_write_dot_rejects_empty_path() {
        assert!(write_dot(DOT, "").is_err());
    }
}
