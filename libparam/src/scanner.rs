//! Phase 1: Scanner
//!
//! The scanner picks declaration lines out of a PARAM file. A line is a
//! declaration when it splits on whitespace into at least four tokens and the
//! first token is the `PARAM` marker. Every other line (blank, comment,
//! truncated, misspelled) is skipped without a diagnostic.

use tracing::trace;

/// Marker token that opens a declaration line.
pub const MARKER: &str = "PARAM";

/// A single declaration line after the scanning phase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    /// Parameter name (second token).
    pub name: String,
    /// Declared type tag (third token), e.g. `int` or `list[float]`.
    pub type_tag: String,
    /// Remaining tokens rejoined with single spaces.
    pub raw_value: String,
    /// Zero-based line number for error reporting.
    pub line_num: usize,
}

/// Scan one line. Returns `None` when the line is not a declaration.
pub fn scan_line(line: &str, line_num: usize) -> Option<Declaration> {
    let mut tokens = line.split_whitespace();

    if tokens.next() != Some(MARKER) {
        trace!(line = line_num + 1, "skipping non-declaration line");
        return None;
    }

    let (name, type_tag) = match (tokens.next(), tokens.next()) {
        (Some(name), Some(type_tag)) => (name, type_tag),
        _ => {
            trace!(line = line_num + 1, "skipping truncated declaration");
            return None;
        }
    };

    let value_tokens: Vec<&str> = tokens.collect();
    if value_tokens.is_empty() {
        trace!(line = line_num + 1, "skipping declaration without value");
        return None;
    }

    Some(Declaration {
        name: name.to_string(),
        type_tag: type_tag.to_string(),
        raw_value: value_tokens.join(" "),
        line_num,
    })
}

/// Lines of a `\n`-terminated chunk, where a bare `\r` also ends a line.
pub(crate) fn split_bare_cr(chunk: &str) -> std::str::Split<'_, char> {
    chunk.split('\r')
}

/// Scan source text into its declarations, in file order.
pub fn scan(source: &str) -> Vec<Declaration> {
    source
        .lines()
        .flat_map(split_bare_cr)
        .enumerate()
        .filter_map(|(line_num, line)| scan_line(line, line_num))
        .collect()
}
