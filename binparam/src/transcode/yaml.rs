//! YAML transcoding: render a parameter table as a YAML mapping.
//!
//! Mapping from PARAM to YAML:
//!   - Value::Bool    -> YAML bool
//!   - Value::Integer -> YAML integer (as a string if it does not fit in i64/u64)
//!   - Value::Float   -> YAML float (including .nan, .inf, -.inf)
//!   - Value::String  -> YAML string
//!   - Value::List    -> YAML sequence
//!
//! The table itself becomes a mapping with keys in name order.

use libparam::{sorted, ParameterTable, Value};
use num_traits::ToPrimitive;

/// Encode a parameter table as a YAML string.
pub fn encode(table: &ParameterTable) -> Result<String, String> {
    let mut map = serde_yaml::Mapping::new();
    for (name, value) in sorted(table) {
        map.insert(
            serde_yaml::Value::String(name.to_string()),
            value_to_yaml(value),
        );
    }
    serde_yaml::to_string(&serde_yaml::Value::Mapping(map))
        .map_err(|e| format!("YAML encode error: {}", e))
}

fn value_to_yaml(value: &Value) -> serde_yaml::Value {
    match value {
        Value::Bool(b) => serde_yaml::Value::Bool(*b),
        Value::Integer(n) => {
            // Try to fit in i64 first, then u64
            if let Some(i) = n.to_i64() {
                serde_yaml::Value::Number(serde_yaml::Number::from(i))
            } else if let Some(u) = n.to_u64() {
                serde_yaml::Value::Number(serde_yaml::Number::from(u))
            } else {
                serde_yaml::Value::String(n.to_string())
            }
        }
        Value::Float(f) => serde_yaml::Value::Number(serde_yaml::Number::from(*f)),
        Value::String(s) => serde_yaml::Value::String(s.clone()),
        Value::List(items) => serde_yaml::Value::Sequence(items.iter().map(value_to_yaml).collect()),
    }
}
