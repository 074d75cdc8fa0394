//! Merge and render command implementations.
//!
//! The merge command:
//! 1. Reads stacks from the chosen input
//! 2. Merges them into a graph
//! 3. Serializes the graph to DOT
//! 4. Writes output files

use super::models::{InputSource, MergeArgs, RenderArgs};
use crate::dot::{generate_dot, generate_text_tree};
use crate::merger::{calculate_stats, MergeEngine};
use crate::model::{Graph, Stack};
use crate::output::{read_graph, write_dot, write_graph, GraphDocument};
use crate::parser::{parse_gdb_backtrace, parse_inline, parse_inline_frames, parse_stacks_json};
use crate::utils::config::DEFAULT_MAX_TREE_DEPTH;
use anyhow::{Context, Result};
use log::{debug, info};
use std::path::Path;
use std::time::Instant;

/// Execute the merge command
///
/// **Public** - main entry point called from main.rs
///
/// # Errors
/// * Unreadable or malformed input
/// * Graph invariant violations (never expected from a fresh merge)
/// * File write errors
pub fn execute_merge(args: MergeArgs) -> Result<()> {
    let start_time = Instant::now();

    info!("Starting merge of {}", args.input.describe());

    // Step 1: Read stacks
    info!("Step 1/4: Reading stacks...");
    let stacks = load_stacks(&args.input).context("Failed to read stacks")?;
    let total_frames: usize = stacks.iter().map(Stack::len).sum();

    debug!("Read {} stacks ({} frames)", stacks.len(), total_frames);

    // Step 2: Merge
    let engine = MergeEngine::new(args.merge_config.clone());
    info!(
        "Step 2/4: Merging stacks (identity: {}, depth limit: {})...",
        engine.config().identity,
        engine.config().depth_limit
    );
    let graph = engine.merge(&stacks);

    let stats = calculate_stats(&graph);
    info!("Graph: {}", stats.summary());
    debug!("Merged away {:.1}% of frames", stats.compression(total_frames));

    // Step 3: Serialize
    info!("Step 3/4: Generating DOT...");
    let dot = generate_dot(&graph, Some(&args.dot_config)).context("Failed to generate DOT")?;

    // Step 4: Write outputs
    info!("Step 4/4: Writing output...");
    emit_dot(&dot, args.output_dot.as_deref())?;

    if let Some(json_path) = &args.output_json {
        write_graph(&GraphDocument::new(graph.clone()), json_path)
            .context("Failed to write graph JSON")?;

        info!("✓ Graph written to: {}", json_path.display());
    }

    if args.print_summary {
        let summary = format_summary(&graph, &stats.summary())?;
        // Keep stdout clean for piping DOT into `dot`
        if args.output_dot.is_some() {
            println!("{}", summary);
        } else {
            eprintln!("{}", summary);
        }
    }

    let elapsed = start_time.elapsed();
    info!("Merge completed in {:.2}s", elapsed.as_secs_f64());

    Ok(())
}

/// Execute the render command: JSON graph document to DOT
pub fn execute_render(args: RenderArgs) -> Result<()> {
    info!("Rendering graph: {}", args.graph.display());

    let document = read_graph(&args.graph)
        .with_context(|| format!("Failed to read graph {}", args.graph.display()))?;

    let dot = generate_dot(&document.graph, Some(&args.dot_config))
        .context("Failed to generate DOT")?;

    emit_dot(&dot, args.output_dot.as_deref())
}

/// Read stacks from an input source
///
/// **Public** - also used by tests and library callers
pub fn load_stacks(source: &InputSource) -> Result<Vec<Stack>> {
    let stacks = match source {
        InputSource::Inline { text, frames: false } => parse_inline(text),
        InputSource::Inline { text, frames: true } => {
            parse_inline_frames(text).context("Invalid inline frame list")?
        }
        InputSource::Json(path) => {
            let text = read_input(path)?;
            parse_stacks_json(&text)
                .with_context(|| format!("Invalid stack JSON in {}", path.display()))?
        }
        InputSource::Gdb(path) => {
            let text = read_input(path)?;
            parse_gdb_backtrace(&text)
                .with_context(|| format!("Invalid gdb backtrace in {}", path.display()))?
        }
    };

    Ok(stacks)
}

/// Validate merge arguments
///
/// **Public** - can be called before execute_merge for early validation
pub fn validate_args(args: &MergeArgs) -> Result<()> {
    match &args.input {
        InputSource::Inline { text, .. } => {
            if text.trim().is_empty() {
                anyhow::bail!("--stacks cannot be empty");
            }
        }
        InputSource::Json(path) | InputSource::Gdb(path) => {
            if !path.is_file() {
                anyhow::bail!("Input file not found: {}", path.display());
            }
        }
    }

    if let (Some(dot), Some(json)) = (&args.output_dot, &args.output_json) {
        if dot == json {
            anyhow::bail!("--output and --json must be different files");
        }
    }

    Ok(())
}

fn read_input(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

fn emit_dot(dot: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            write_dot(dot, path).context("Failed to write DOT")?;
            info!("✓ DOT written to: {}", path.display());
        }
        None => print!("{}", dot),
    }
    Ok(())
}

fn format_summary(graph: &Graph, stats_line: &str) -> Result<String> {
    let mut out = String::new();

    out.push_str(&format!("\n{}\n", "=".repeat(80)));
    out.push_str("PARALLEL STACKS SUMMARY\n");
    out.push_str(&format!("{}\n", "=".repeat(80)));
    out.push_str(&format!("{}\n\n", stats_line));
    out.push_str(&generate_text_tree(graph, DEFAULT_MAX_TREE_DEPTH)?);
    out.push_str(&"=".repeat(80));

    Ok(out)
}
