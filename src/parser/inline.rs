//! Inline stack lists typed on the command line.
//!
//! Stacks are separated by `;` and frames by `,`, innermost frame first:
//!
//! ```text
//! f, e, d, c, b, a; f, e, g, c, b, a
//! ```
//!
//! In frame mode each token is `function[:filename[:row[:column]]]`.
//! Function names that themselves contain `:` cannot be expressed here;
//! use a JSON stack file for those.

use crate::model::{Frame, Stack};
use crate::utils::error::ParseError;
use log::debug;

/// Parse a list of bare function names
pub fn parse_inline(input: &str) -> Vec<Stack> {
    let stacks: Vec<Stack> = split_stacks(input)
        .map(|tokens| Stack::new(tokens.map(Frame::named).collect()))
        .filter(|stack| !stack.is_empty())
        .collect();

    debug!("Parsed {} inline stacks", stacks.len());
    stacks
}

/// Parse a list of `function:filename:row:column` tokens
pub fn parse_inline_frames(input: &str) -> Result<Vec<Stack>, ParseError> {
    let mut stacks = Vec::new();

    for tokens in split_stacks(input) {
        let frames = tokens.map(parse_frame_token).collect::<Result<Vec<_>, _>>()?;
        if !frames.is_empty() {
            stacks.push(Stack::new(frames));
        }
    }

    debug!("Parsed {} inline frame stacks", stacks.len());
    Ok(stacks)
}

fn split_stacks<'a>(input: &'a str) -> impl Iterator<Item = impl Iterator<Item = &'a str>> + 'a {
    input
        .split(';')
        .map(str::trim)
        .filter(|stack| !stack.is_empty())
        .map(|stack| stack.split(',').map(str::trim).filter(|token| !token.is_empty()))
}

fn parse_frame_token(token: &str) -> Result<Frame, ParseError> {
    let mut parts = token.splitn(4, ':').map(str::trim);

    let function = parts.next().unwrap_or_default();
    if function.is_empty() {
        return Err(ParseError::InvalidFormat(format!(
            "frame token has an empty function: '{}'",
            token
        )));
    }

    let filename = parts.next().unwrap_or_default();
    let row = parse_coordinate(parts.next(), "row", token)?;
    let column = parse_coordinate(parts.next(), "column", token)?;

    Ok(Frame::new(function, filename, row, column))
}

/// Missing or empty means 0; negative values clamp to 0
fn parse_coordinate(value: Option<&str>, what: &str, token: &str) -> Result<u32, ParseError> {
    match value {
        None | Some("") => Ok(0),
        Some(text) => text
            .parse::<i64>()
            .map(|n| n.clamp(0, u32::MAX as i64) as u32)
            .map_err(|_| {
                ParseError::InvalidFormat(format!("{} is not an integer in '{}'", what, token))
            }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_inline() {
        let stacks = parse_inline(" f, e ,d ; c,, b ;; ");

        assert_eq!(stacks.len(), 2);
        let names: Vec<&str> = stacks[1].frames.iter().map(|f| f.function.as_str()).collect();
        assert_eq!(names, vec!["c", "b"]);
    }

    #[test]
    fn test_parse_inline_frames() {
        let stacks = parse_inline_frames("helper:a.c:20:4, main:a.c:10; worker:w.c, main").unwrap();

        assert_eq!(
            stacks[0].frames,
            vec![Frame::new("helper", "a.c", 20, 4), Frame::new("main", "a.c", 10, 0)]
        );
        assert_eq!(
            stacks[1].frames,
            vec![Frame::new("worker", "w.c", 0, 0), Frame::named("main")]
        );
    }

    #[test]
    fn test_negative_coordinates_clamp() {
        let stacks = parse_inline_frames("f:a.c:-3:-1").unwrap();
        assert_eq!(stacks[0].frames[0], Frame::new("f", "a.c", 0, 0));
    }

    #[test]
    fn test_empty_function_is_rejected() {
        let err = parse_inline_frames(":a.c:1").unwrap_err();
        assert!(err.to_string().contains("empty function"));
    }

    #[test]
    fn test_bad_row_is_rejected() {
        assert!(parse_inline_frames("f:a.c:ten").is_err());
        assert!(parse_inline_frames("f:a.c:1:x").is_err());
    }

    #[test]
    fn test_empty_input() {
        assert!(parse_inline("").is_empty());
        assert!(parse_inline_frames("  ;  ").unwrap().is_empty());
    }
}
