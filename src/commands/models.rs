use crate::dot::DotConfig;
use crate::merger::MergeConfig;
use anyhow::Result;
use std::path::PathBuf;

/// Where the stacks of a `merge` come from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSource {
    /// `--stacks "f,e,d; c,b,a"`; `frames` switches tokens to `func:file:row:col`
    Inline { text: String, frames: bool },

    /// JSON stack document
    Json(PathBuf),

    /// gdb `thread apply all bt` dump
    Gdb(PathBuf),
}

impl InputSource {
    /// Pick the single input the user asked for
    pub fn from_flags(
        stacks: Option<String>,
        frames: bool,
        input: Option<PathBuf>,
        gdb: Option<PathBuf>,
    ) -> Result<Self> {
        match (stacks, input, gdb) {
            (Some(text), None, None) => Ok(Self::Inline { text, frames }),
            (None, Some(path), None) if !frames => Ok(Self::Json(path)),
            (None, None, Some(path)) if !frames => Ok(Self::Gdb(path)),
            (None, None, None) => anyhow::bail!("One of --stacks, --input or --gdb is required"),
            (None, _, _) if frames => anyhow::bail!("--frames only applies to --stacks"),
            _ => anyhow::bail!("--stacks, --input and --gdb are mutually exclusive"),
        }
    }

    pub fn describe(&self) -> String {
        match self {
            Self::Inline { frames: false, .. } => "inline stack list".to_string(),
            Self::Inline { frames: true, .. } => "inline frame list".to_string(),
            Self::Json(path) => format!("JSON stacks {}", path.display()),
            Self::Gdb(path) => format!("gdb backtrace {}", path.display()),
        }
    }
}

/// Arguments for the merge command
///
/// **Public** - used by main.rs to construct from CLI args
#[derive(Debug, Clone)]
pub struct MergeArgs {
    /// Stack input
    pub input: InputSource,

    /// Output path for DOT (stdout when absent)
    pub output_dot: Option<PathBuf>,

    /// Output path for the JSON graph document (optional)
    pub output_json: Option<PathBuf>,

    /// Merge configuration
    pub merge_config: MergeConfig,

    /// DOT configuration
    pub dot_config: DotConfig,

    /// Print text summary
    pub print_summary: bool,
}

impl Default for MergeArgs {
    fn default() -> Self {
        Self {
            input: InputSource::Inline {
                text: String::new(),
                frames: false,
            },
            output_dot: None,
            output_json: None,
            merge_config: MergeConfig::default(),
            dot_config: DotConfig::default(),
            print_summary: false,
        }
    }
}

/// Arguments for the render command
#[derive(Debug, Clone)]
pub struct RenderArgs {
    /// JSON graph document written by `merge --json`
    pub graph: PathBuf,

    /// Output path for DOT (stdout when absent)
    pub output_dot: Option<PathBuf>,

    /// DOT configuration
    pub dot_config: DotConfig,
}
