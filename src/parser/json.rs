//! JSON stack documents.
//!
//! Accepted shapes:
//! - `[[frame, ...], ...]`
//! - `[{"thread": "1", "frames": [frame, ...]}, ...]`
//! - either of the above under a `stacks` / `threads` / `result` key
//!
//! Frames follow the debug-adapter `StackFrame` naming as well as our own
//! (`name` or `function`, `source.path` or `filename`, `line` or `row`).
//! Missing fields become empty / zero and negative numbers clamp to zero.

use crate::model::{Frame, Stack};
use crate::utils::config::STACKS_FIELD_NAMES;
use crate::utils::error::ParseError;
use log::debug;
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize)]
struct RawFrame {
    #[serde(default, alias = "name")]
    function: Option<String>,

    #[serde(default, alias = "file")]
    filename: Option<String>,

    #[serde(default)]
    source: Option<RawSource>,

    #[serde(default, alias = "line")]
    row: Option<i64>,

    #[serde(default)]
    column: Option<i64>,
}

/// Debug-adapter `Source` object
#[derive(Debug, Deserialize)]
struct RawSource {
    #[serde(default)]
    path: Option<String>,

    #[serde(default)]
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawStack {
    Frames(Vec<RawFrame>),
    Thread {
        #[serde(default, alias = "id")]
        thread: Option<serde_json::Value>,

        #[serde(alias = "stackFrames")]
        frames: Vec<RawFrame>,
    },
}

/// Parse stacks from JSON text
pub fn parse_stacks_json(text: &str) -> Result<Vec<Stack>, ParseError> {
    let value: serde_json::Value = serde_json::from_str(text)?;
    stacks_from_value(&value)
}

/// Parse stacks from an already-decoded JSON value
pub fn stacks_from_value(value: &serde_json::Value) -> Result<Vec<Stack>, ParseError> {
    let list = find_stack_list(value)?;
    let raw: Vec<RawStack> = serde_json::from_value(list.clone())?;

    let stacks: Vec<Stack> = raw.into_iter().map(RawStack::into_stack).collect();
    debug!("Parsed {} stacks from JSON", stacks.len());

    Ok(stacks)
}

fn find_stack_list(value: &serde_json::Value) -> Result<&serde_json::Value, ParseError> {
    match value {
        serde_json::Value::Array(_) => Ok(value),
        serde_json::Value::Object(obj) => STACKS_FIELD_NAMES
            .iter()
            .filter_map(|name| obj.get(*name))
            .find(|candidate| candidate.is_array())
            .ok_or_else(|| {
                ParseError::InvalidFormat(format!(
                    "object has no stack list (looked for: {})",
                    STACKS_FIELD_NAMES.join(", ")
                ))
            }),
        _ => Err(ParseError::InvalidFormat(
            "expected an array of stacks or an object holding one".to_string(),
        )),
    }
}

impl RawStack {
    fn into_stack(self) -> Stack {
        match self {
            RawStack::Frames(frames) => {
                Stack::new(frames.into_iter().map(RawFrame::into_frame).collect())
            }
            RawStack::Thread { thread, frames } => {
                let stack = Stack::new(frames.into_iter().map(RawFrame::into_frame).collect());
                match thread.and_then(thread_label) {
                    Some(label) => stack.with_thread(label),
                    None => stack,
                }
            }
        }
    }
}

impl RawFrame {
    fn into_frame(self) -> Frame {
        let filename = self
            .filename
            .or_else(|| self.source.and_then(RawSource::display_name))
            .unwrap_or_default();

        Frame {
            function: self.function.unwrap_or_default(),
            filename,
            row: clamp_coordinate(self.row),
            column: clamp_coordinate(self.column),
        }
    }
}

impl RawSource {
    /// File name of `path`, falling back to `name`
    fn display_name(self) -> Option<String> {
        self.path
            .as_deref()
            .and_then(|path| Path::new(path).file_name())
            .map(|name| name.to_string_lossy().into_owned())
            .or(self.name)
    }
}

fn thread_label(value: serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::Null => None,
        serde_json::Value::String(s) => Some(s),
        other => Some(other.to_string()),
    }
}

fn clamp_coordinate(value: Option<i64>) -> u32 {
    value.unwrap_or(0).clamp(0, u32::MAX as i64) as u32
}
