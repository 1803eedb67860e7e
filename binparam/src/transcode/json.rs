//! JSON transcoding: render a parameter table as a JSON object.
//!
//! Keys are sorted. Integers that do not fit in 64 bits become decimal
//! strings, and non-finite floats become `null`.

use libparam::{sorted, ParameterTable};

/// Encode a parameter table as pretty-printed JSON.
pub fn encode(table: &ParameterTable) -> Result<String, String> {
    serde_json::to_string_pretty(&sorted(table)).map_err(|e| format!("JSON encode error: {}", e))
}
