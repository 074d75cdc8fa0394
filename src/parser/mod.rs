//! Stack input parsing.
//!
//! This module turns debugger output into `Stack`s:
//! - Inline `a,b,c; d,e` lists (names or `func:file:row:col` frames)
//! - JSON stack documents (including debug-adapter `StackFrame`s)
//! - gdb `thread apply all bt` dumps

pub mod gdb;
pub mod inline;
pub mod json;

// Re-export main functions
pub use gdb::parse_gdb_backtrace;
pub use inline::{parse_inline, parse_inline_frames};
pub use json::{parse_stacks_json, stacks_from_value};
