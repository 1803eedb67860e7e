//! Result documents.
//!
//! A run saves its results as `result.json`. Binary payloads are wrapped in
//! [`ResultValue::Bytes`] and written as standard, padded base64 text
//! wherever they appear: alone, in arrays, in objects, or deeper.

use base64::prelude::*;
use num_bigint::BigInt;
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::error::WorkspaceError;
use crate::value::serialize_integer;
use crate::workspace::make_file;
use crate::{ParameterTable, Value};

/// Name of the file written by [`save_results`].
pub const RESULT_FILE_NAME: &str = "result.json";

/// A value in a result document.
#[derive(Clone, Debug, PartialEq)]
pub enum ResultValue {
    Null,
    Bool(bool),
    Integer(BigInt),
    Float(f64),
    String(String),
    /// Binary payload, written as base64 text.
    Bytes(Vec<u8>),
    Array(Vec<ResultValue>),
    Object(BTreeMap<String, ResultValue>),
}

impl ResultValue {
    /// Build an object from name/value pairs.
    pub fn object<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<ResultValue>,
    {
        ResultValue::Object(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl Serialize for ResultValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ResultValue::Null => serializer.serialize_unit(),
            ResultValue::Bool(b) => serializer.serialize_bool(*b),
            ResultValue::Integer(n) => serialize_integer(n, serializer),
            ResultValue::Float(f) => serializer.serialize_f64(*f),
            ResultValue::String(s) => serializer.serialize_str(s),
            ResultValue::Bytes(b) => serializer.serialize_str(&BASE64_STANDARD.encode(b)),
            ResultValue::Array(items) => serializer.collect_seq(items),
            ResultValue::Object(entries) => serializer.collect_map(entries),
        }
    }
}

impl From<Value> for ResultValue {
    fn from(mut value: Value) -> Self {
        match &mut value {
            Value::Bool(b) => ResultValue::Bool(*b),
            Value::Integer(n) => ResultValue::Integer(std::mem::take(n)),
            Value::Float(f) => ResultValue::Float(*f),
            Value::String(s) => ResultValue::String(std::mem::take(s)),
            Value::List(items) => ResultValue::Array(
                std::mem::take(items)
                    .into_iter()
                    .map(ResultValue::from)
                    .collect(),
            ),
        }
    }
}

impl From<ParameterTable> for ResultValue {
    fn from(table: ParameterTable) -> Self {
        ResultValue::object(table)
    }
}

impl From<bool> for ResultValue {
    fn from(b: bool) -> Self {
        ResultValue::Bool(b)
    }
}

impl From<i64> for ResultValue {
    fn from(n: i64) -> Self {
        ResultValue::Integer(BigInt::from(n))
    }
}

impl From<f64> for ResultValue {
    fn from(f: f64) -> Self {
        ResultValue::Float(f)
    }
}

impl From<String> for ResultValue {
    fn from(s: String) -> Self {
        ResultValue::String(s)
    }
}

impl From<&str> for ResultValue {
    fn from(s: &str) -> Self {
        ResultValue::String(s.to_string())
    }
}

impl From<Vec<u8>> for ResultValue {
    fn from(b: Vec<u8>) -> Self {
        ResultValue::Bytes(b)
    }
}

impl From<Vec<ResultValue>> for ResultValue {
    fn from(items: Vec<ResultValue>) -> Self {
        ResultValue::Array(items)
    }
}

/// Write `data` as JSON to `at/result.json`, creating `at` when missing.
/// Returns the path of the written file.
pub fn save_results<T>(at: &Path, data: &T) -> Result<PathBuf, WorkspaceError>
where
    T: Serialize + ?Sized,
{
    let path = make_file(RESULT_FILE_NAME, None, Some(at))?;
    let file = File::create(&path).map_err(WorkspaceError::io(&path))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer(&mut writer, data)?;
    writer.flush().map_err(WorkspaceError::io(&path))?;
    info!(path = %path.display(), "saved results");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn to_json(value: &ResultValue) -> String {
        serde_json::to_string(value).unwrap()
    }

    #[test]
    fn test_bytes_as_base64() {
        assert_eq!(to_json(&ResultValue::Bytes(b"hello".to_vec())), r#""aGVsbG8=""#);
        assert_eq!(to_json(&ResultValue::Bytes(Vec::new())), r#""""#);
    }

    #[test]
    fn test_array_of_bytes() {
        let value = ResultValue::Array(vec![
            ResultValue::Bytes(vec![0xca, 0xfe]),
            ResultValue::Bytes(vec![0xff]),
        ]);
        assert_eq!(to_json(&value), r#"["yv4=","/w=="]"#);
    }

    #[test]
    fn test_object_of_bytes_and_arrays() {
        let value = ResultValue::object([
            ("image", ResultValue::Bytes(vec![1, 2, 3])),
            (
                "frames",
                ResultValue::Array(vec![
                    ResultValue::Bytes(vec![4]),
                    ResultValue::Bytes(vec![5, 6]),
                ]),
            ),
        ]);
        assert_eq!(to_json(&value), r#"{"frames":["BA==","BQY="],"image":"AQID"}"#);
    }

    #[test]
    fn test_mixed_collection_keeps_other_values() {
        let value = ResultValue::Array(vec![
            ResultValue::Bytes(vec![0]),
            "text".into(),
            3.into(),
            ResultValue::Null,
        ]);
        assert_eq!(to_json(&value), r#"["AA==","text",3,null]"#);
    }

    #[test]
    fn test_from_parameter_table() {
        let mut table = ParameterTable::new();
        table.insert("b".to_string(), Value::List(vec![1.into(), "x".into()]));
        table.insert("a".to_string(), Value::from(0.5));
        assert_eq!(to_json(&table.into()), r#"{"a":0.5,"b":[1,"x"]}"#);
    }

    #[test]
    fn test_save_results_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let at = dir.path().join("results").join("run-1");
        let data = ResultValue::object([("payload", ResultValue::Bytes(b"ok".to_vec()))]);

        let path = save_results(&at, &data).unwrap();

        assert_eq!(path, at.join(RESULT_FILE_NAME));
        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written, r#"{"payload":"b2s="}"#);
    }

    #[test]
    fn test_save_results_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        save_results(dir.path(), &ResultValue::from("first, and longer")).unwrap();
        let path = save_results(dir.path(), &ResultValue::from(1)).unwrap();
        assert_eq!(std::fs::read_to_string(path).unwrap(), "1");
    }

    #[test]
    fn test_save_results_keeps_big_integer_a_number() {
        let dir = tempfile::tempdir().unwrap();
        let table = crate::parse_parameters("PARAM seed int 340282366920938463463374607431768211456\n", None)
            .unwrap();
        let path = save_results(dir.path(), &ResultValue::from(table)).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written, r#"{"seed":340282366920938463463374607431768211456}"#);
        let back: serde_json::Value = serde_json::from_str(&written).unwrap();
        assert!(back["seed"].is_number());
    }
}
