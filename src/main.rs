//! Parallel Stacks CLI
//!
//! Merges per-thread call stacks into a single graph and writes it as
//! Graphviz DOT, ready for `dot -Tsvg`.

use anyhow::Result;
use clap::{Parser, Subcommand};
use env_logger::Env;
use std::path::PathBuf;

use parallel_stacks::commands::{
    display_schema, display_version, execute_merge, execute_render, validate_args,
    validate_graph_file, InputSource, MergeArgs, RenderArgs,
};
use parallel_stacks::dot::{DotConfig, DotStyle, RankDir};
use parallel_stacks::merger::MergeConfig;
use parallel_stacks::model::IdentityPolicy;

/// Parallel Stacks - merge thread call stacks into one graph
#[derive(Parser, Debug)]
#[command(name = "parallel-stacks")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Merge stacks and emit DOT
    Merge {
        /// Inline stacks: ';' between stacks, ',' between frames, innermost first
        #[arg(short, long)]
        stacks: Option<String>,

        /// Treat --stacks tokens as function:filename:row:column
        #[arg(long)]
        frames: bool,

        /// JSON stack file
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// gdb `thread apply all bt` output file
        #[arg(long)]
        gdb: Option<PathBuf>,

        /// Output path for DOT (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Also save the merged graph as JSON
        #[arg(long)]
        json: Option<PathBuf>,

        /// Frame identity: location, leaf-line or exact
        #[arg(long, default_value = "location")]
        identity: IdentityPolicy,

        /// Merge only the outermost N frames of each stack (0 = all)
        #[arg(long, default_value = "0")]
        depth_limit: usize,

        /// Graph layout: nodes or tables
        #[arg(long, default_value = "nodes")]
        style: DotStyle,

        /// Graphviz rankdir: TB, BT, LR or RL
        #[arg(long, default_value = "BT")]
        rankdir: RankDir,

        /// Graph title
        #[arg(long)]
        title: Option<String>,

        /// Print text summary
        #[arg(long)]
        summary: bool,
    },

    /// Render a saved graph JSON to DOT
    Render {
        /// Path to graph JSON file
        #[arg(short, long)]
        graph: PathBuf,

        /// Output path for DOT (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Graph layout: nodes or tables
        #[arg(long, default_value = "nodes")]
        style: DotStyle,

        /// Graphviz rankdir: TB, BT, LR or RL
        #[arg(long, default_value = "BT")]
        rankdir: RankDir,

        /// Graph title
        #[arg(long)]
        title: Option<String>,
    },

    /// Validate a graph JSON file
    Validate {
        /// Path to graph JSON file
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Display schema information
    Schema {
        /// Show full schema details
        #[arg(long)]
        show: bool,
    },

    /// Display version information
    Version,
}

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    // Execute command
    match cli.command {
        Commands::Merge {
            stacks,
            frames,
            input,
            gdb,
            output,
            json,
            identity,
            depth_limit,
            style,
            rankdir,
            title,
            summary,
        } => {
            let args = MergeArgs {
                input: InputSource::from_flags(stacks, frames, input, gdb)?,
                output_dot: output,
                output_json: json,
                merge_config: MergeConfig::new()
                    .with_identity(identity)
                    .with_depth_limit(depth_limit),
                dot_config: dot_config(style, rankdir, title),
                print_summary: summary,
            };

            // Validate args first
            validate_args(&args)?;

            execute_merge(args)?;
        }

        Commands::Render {
            graph,
            output,
            style,
            rankdir,
            title,
        } => {
            execute_render(RenderArgs {
                graph,
                output_dot: output,
                dot_config: dot_config(style, rankdir, title),
            })?;
        }

        Commands::Validate { file } => {
            validate_graph_file(&file)?;
        }

        Commands::Schema { show } => {
            display_schema(show);
        }

        Commands::Version => {
            display_version();
        }
    }

    Ok(())
}

fn dot_config(style: DotStyle, rankdir: RankDir, title: Option<String>) -> DotConfig {
    let config = DotConfig::new().with_style(style).with_rankdir(rankdir);
    match title {
        Some(title) => config.with_title(title),
        None => config,
    }
}
