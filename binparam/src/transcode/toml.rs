//! TOML transcoding: render a parameter table as a TOML document.
//!
//! Mapping from PARAM to TOML:
//!   - Value::Bool    -> TOML boolean
//!   - Value::Integer -> TOML integer (if fits in i64, otherwise error)
//!   - Value::Float   -> TOML float (nan and inf included)
//!   - Value::String  -> TOML string
//!   - Value::List    -> TOML array (nested lists become nested arrays)
//!
//! Each parameter becomes a top-level key, in name order.

use libparam::{sorted, ParameterTable, Value};
use num_traits::ToPrimitive;
use toml_edit::DocumentMut;

/// Encode a parameter table as a TOML string.
pub fn encode(table: &ParameterTable) -> Result<String, String> {
    let mut doc = DocumentMut::new();
    for (name, value) in sorted(table) {
        doc[name] = toml_edit::Item::Value(value_to_toml(value)?);
    }
    Ok(doc.to_string())
}

fn value_to_toml(value: &Value) -> Result<toml_edit::Value, String> {
    match value {
        Value::Bool(b) => Ok(toml_edit::Value::Boolean(toml_edit::Formatted::new(*b))),
        Value::Integer(n) => {
            let i = n
                .to_i64()
                .ok_or_else(|| format!("Integer {} too large for TOML (i64)", n))?;
            Ok(toml_edit::Value::Integer(toml_edit::Formatted::new(i)))
        }
        Value::Float(f) => Ok(toml_edit::Value::Float(toml_edit::Formatted::new(*f))),
        Value::String(s) => Ok(toml_edit::Value::String(toml_edit::Formatted::new(
            s.clone(),
        ))),
        Value::List(items) => {
            let mut arr = toml_edit::Array::new();
            for item in items {
                arr.push(value_to_toml(item)?);
            }
            Ok(toml_edit::Value::Array(arr))
        }
    }
}
