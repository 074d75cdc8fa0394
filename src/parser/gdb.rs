//! gdb `thread apply all bt` output.
//!
//! ```text
//! Thread 2 (Thread 0x7f3e5ffff640 (LWP 13554) "worker"):
//! #0  0x00007f3e6a891d61 in __futex_abstimed_wait_common () from /lib/libc.so.6
//! #1  worker_loop (q=0x5555) at src/worker.c:42
//! #2  0x0000555555555a1c in main () at src/main.c:17
//!
//! Thread 1 (Thread 0x7f3e6a7a8740 (LWP 13552) "app"):
//! ...
//! ```
//!
//! Frames are listed innermost first, which is already stack order.

use crate::model::{Frame, Stack};
use crate::utils::error::ParseError;
use log::{debug, warn};
use regex::Regex;
use std::sync::OnceLock;

fn frame_regex() -> &'static Regex {
    static FRAME_RE: OnceLock<Regex> = OnceLock::new();
    FRAME_RE.get_or_init(|| {
        Regex::new(concat!(
            r"^#(?P<level>\d+)\s+(?:(?P<address>0x[0-9a-fA-F]+) in )?",
            r"(?P<function>.+?) \((?P<args>.*)\)",
            r"(?: (?:at|from) (?P<location>.+))?$",
        ))
        .expect("valid regex")
    })
}

/// `#1  <signal handler called>` and other frames gdb synthesizes
fn pseudo_frame_regex() -> &'static Regex {
    static PSEUDO_RE: OnceLock<Regex> = OnceLock::new();
    PSEUDO_RE.get_or_init(|| {
        Regex::new(r"^#\d+\s+(?:0x[0-9a-fA-F]+ in )?(?P<function><[^>]+>)$").expect("valid regex")
    })
}

/// Parse a full gdb backtrace dump into one stack per thread
pub fn parse_gdb_backtrace(text: &str) -> Result<Vec<Stack>, ParseError> {
    let mut stacks = Vec::new();
    let mut current: Option<Stack> = None;

    for (line_no, line) in text.lines().enumerate() {
        let line = line.trim_end();

        if let Some(rest) = line.strip_prefix("Thread ") {
            stacks.extend(current.take());
            let id = rest.split_whitespace().next().unwrap_or_default();
            current = Some(Stack::default().with_thread(id));
            continue;
        }

        if current.is_none() {
            // gdb banner, "[New LWP ...]" and friends
            continue;
        }

        if line.is_empty() {
            stacks.extend(current.take());
            continue;
        }

        if line.starts_with("Backtrace stopped") {
            warn!("gdb line {}: {}", line_no + 1, line);
            continue;
        }

        let frame = parse_frame_line(line).ok_or_else(|| {
            ParseError::InvalidFormat(format!("gdb line {}: '{}'", line_no + 1, line))
        })?;
        if let Some(stack) = current.as_mut() {
            stack.frames.push(frame);
        }
    }

    stacks.extend(current.take());

    debug!("Parsed {} threads from gdb output", stacks.len());
    Ok(stacks)
}

fn parse_frame_line(line: &str) -> Option<Frame> {
    if let Some(caps) = pseudo_frame_regex().captures(line) {
        return Some(Frame::named(&caps["function"]));
    }

    let caps = frame_regex().captures(line)?;

    let function = caps.name("function")?.as_str().trim();
    let (filename, row) = caps
        .name("location")
        .map(|m| split_location(m.as_str().trim()))
        .unwrap_or_default();

    Some(Frame::new(function, filename, row, 0))
}

/// `src/main.c:17` -> (`src/main.c`, 17); shared objects carry no line
fn split_location(location: &str) -> (String, u32) {
    match location.rsplit_once(':') {
        Some((file, line)) if !file.is_empty() => match line.parse::<u32>() {
            Ok(row) => (file.to_string(), row),
            Err(_) => (location.to_string(), 0),
        },
        _ => (location.to_string(), 0),
    }
}
