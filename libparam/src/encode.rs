//! Encode a parameter table back to PARAM text.
//!
//! Declarations are written in name order, one per line, with the type tag
//! taken from the value. Text that does not survive a reload (an empty or
//! all-space string, runs of whitespace, list elements holding commas or
//! brackets) is written as-is.

use crate::scanner::MARKER;
use crate::value::sorted;
use crate::ParameterTable;

/// Render a parameter table as PARAM declarations.
pub fn format_parameters(table: &ParameterTable) -> String {
    let mut out = String::new();
    for (name, value) in sorted(table) {
        out.push_str(&format!("{} {} {} {}\n", MARKER, name, value.type_tag(), value));
    }
    out
}
