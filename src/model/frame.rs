//! Frame and stack value types.
//!
//! These are the transient inputs of a merge: one `Stack` per thread,
//! ordered from the innermost (current) frame at index 0 to the outermost
//! (entry) frame at the last index.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One call-stack entry
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Frame {
    /// Function name as reported by the debugger
    #[serde(default)]
    pub function: String,

    /// Source file (or any identifier the debugger uses for it)
    #[serde(default)]
    pub filename: String,

    /// Line number, 0 when unknown
    #[serde(default)]
    pub row: u32,

    /// Column number, 0 when unknown
    #[serde(default)]
    pub column: u32,
}

impl Frame {
    pub fn new(
        function: impl Into<String>,
        filename: impl Into<String>,
        row: u32,
        column: u32,
    ) -> Self {
        Self {
            function: function.into(),
            filename: filename.into(),
            row,
            column,
        }
    }

    /// Frame that only knows its function name
    pub fn named(function: impl Into<String>) -> Self {
        Self {
            function: function.into(),
            ..Default::default()
        }
    }

    /// `file:row:column` as shown in the table view
    pub fn location(&self) -> String {
        format!("{}:{}:{}", self.filename, self.row, self.column)
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.filename.is_empty() {
            write!(f, "{}", self.function)
        } else {
            write!(f, "{} ({})", self.function, self.location())
        }
    }
}

/// One thread's call stack, innermost frame first
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stack {
    /// Optional thread label (thread id, task name, ...)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thread: Option<String>,

    /// Frames from innermost to outermost
    #[serde(default)]
    pub frames: Vec<Frame>,
}

impl Stack {
    pub fn new(frames: Vec<Frame>) -> Self {
        Self {
            thread: None,
            frames,
        }
    }

    pub fn with_thread(mut self, thread: impl Into<String>) -> Self {
        self.thread = Some(thread.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// The frame the thread is currently executing
    pub fn innermost(&self) -> Option<&Frame> {
        self.frames.first()
    }

    /// The thread entry point
    pub fn outermost(&self) -> Option<&Frame> {
        self.frames.last()
    }
}

impl From<Vec<Frame>> for Stack {
    fn from(frames: Vec<Frame>) -> Self {
        Self::new(frames)
    }
}
