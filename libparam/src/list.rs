//! Nested list parser.
//!
//! A list is any text that starts with `[` and ends with `]`. The first and
//! last characters are removed and the body is split on commas that sit at
//! nesting depth zero; every piece is parsed again, so pieces may be lists
//! themselves. Anything that is not a list goes to [`convert_type`].
//!
//! The parser never fails. Pieces are not trimmed, so `[a, b]` yields `"a"`
//! and `" b"` (numeric pieces still convert, since numeric literals ignore
//! surrounding whitespace). The outer brackets are stripped without checking
//! that they pair with each other, and a trailing piece is always emitted,
//! which makes `[]` a one-element list holding the empty string.

use std::collections::HashMap;
use std::vec;

use crate::convert::convert_type;
use crate::Value;

/// Parse a list literal, or convert a scalar token.
///
/// Nesting depth is bounded only by memory: the text is indexed once and
/// nested lists are built with an explicit stack of open frames.
pub fn parse_list(text: &str) -> Value {
    if !is_list(text) {
        return convert_type(text);
    }

    let index = CommaIndex::new(text);
    let mut open: Vec<Frame> = Vec::new();
    let mut current = Frame::new(&index, 0, text.len());

    loop {
        match current.pieces.next() {
            Some((start, end)) => {
                let piece = &text[start..end];
                if is_list(piece) {
                    let child = Frame::new(&index, start, end);
                    open.push(std::mem::replace(&mut current, child));
                } else {
                    current.items.push(convert_type(piece));
                }
            }
            None => {
                let list = Value::List(current.items);
                match open.pop() {
                    Some(parent) => {
                        current = parent;
                        current.items.push(list);
                    }
                    None => return list,
                }
            }
        }
    }
}

fn is_list(text: &str) -> bool {
    text.starts_with('[') && text.ends_with(']')
}

/// A list literal being built: the pieces of its body still to parse and the
/// values parsed so far.
struct Frame {
    pieces: vec::IntoIter<(usize, usize)>,
    items: Vec<Value>,
}

impl Frame {
    /// Open the list literal at `start..end`, dropping its outer characters.
    fn new(index: &CommaIndex, start: usize, end: usize) -> Self {
        let pieces = index.split_top_level(start + 1, end - 1);
        Frame {
            items: Vec::with_capacity(pieces.len()),
            pieces: pieces.into_iter(),
        }
    }
}

/// Bracket depth and comma positions of the whole text, computed in one pass.
///
/// Depth inside any slice is the difference of two prefix depths, so a comma
/// sits at depth zero of the slice starting at `start` exactly when its prefix
/// depth equals the prefix depth at `start`.
struct CommaIndex {
    /// Signed depth before each byte, plus one entry for the end.
    depth: Vec<isize>,
    /// Comma byte offsets grouped by the depth before them, ascending.
    commas: HashMap<isize, Vec<usize>>,
}

impl CommaIndex {
    fn new(text: &str) -> Self {
        let mut depth = Vec::with_capacity(text.len() + 1);
        let mut commas: HashMap<isize, Vec<usize>> = HashMap::new();
        let mut level: isize = 0;

        for (i, byte) in text.bytes().enumerate() {
            depth.push(level);
            match byte {
                b'[' => level += 1,
                b']' => level -= 1,
                b',' => commas.entry(level).or_default().push(i),
                _ => {}
            }
        }
        depth.push(level);

        CommaIndex { depth, commas }
    }

    /// Split `start..end` on the commas at its depth zero. Always returns at
    /// least one piece; the last one runs from the final comma to `end`.
    fn split_top_level(&self, start: usize, end: usize) -> Vec<(usize, usize)> {
        let mut pieces = Vec::new();
        let mut piece_start = start;

        if let Some(positions) = self.commas.get(&self.depth[start]) {
            let first = positions.partition_point(|&p| p < start);
            for &comma in positions[first..].iter().take_while(|&&p| p < end) {
                pieces.push((piece_start, comma));
                piece_start = comma + 1;
            }
        }

        pieces.push((piece_start, end));
        pieces
    }
}
