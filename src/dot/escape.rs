//! Escaping of untrusted frame text for DOT output.
//!
//! Function names and filenames come straight from the debugger and may
//! contain quotes, backslashes, newlines or markup characters.

/// Escape text for a double-quoted DOT string.
///
/// Newlines become the DOT `\n` line break; other control characters
/// are replaced with a space. Non-ASCII text is kept as-is (DOT is UTF-8).
pub fn escape_dot(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => {}
            c if c.is_control() => out.push(' '),
            c => out.push(c),
        }
    }
    out
}

/// Escape text for an HTML-like DOT label (`label=<...>`)
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c if c.is_control() => out.push(' '),
            c => out.push(c),
        }
    }
    out
}
