//! PARAM value representation.

use num_bigint::BigInt;
use num_traits::ToPrimitive;
use serde::ser::Error as _;
use serde::{Serialize, Serializer};
use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// Mapping from parameter name to value. The last declaration of a name wins.
pub type ParameterTable = HashMap<String, Value>;

/// A parameter value.
#[derive(Clone, PartialEq)]
pub enum Value {
    /// Boolean value, only produced by a `bool` declaration.
    Bool(bool),
    /// Arbitrary-precision integer.
    Integer(BigInt),
    /// 64-bit floating-point number.
    Float(f64),
    /// UTF-8 string.
    String(String),
    /// Ordered, possibly heterogeneous, sequence of values.
    List(Vec<Value>),
}

impl Value {
    /// Returns the boolean value if this is a `Bool`.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns a reference to the integer if this is an `Integer`.
    pub fn as_integer(&self) -> Option<&BigInt> {
        match self {
            Value::Integer(n) => Some(n),
            _ => None,
        }
    }

    /// Returns the integer as `i64` if this is an `Integer` that fits.
    pub fn as_i64(&self) -> Option<i64> {
        self.as_integer().and_then(ToPrimitive::to_i64)
    }

    /// Returns the float value if this is a `Float`.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Returns a reference to the string if this is a `String`.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns a reference to the elements if this is a `List`.
    pub fn as_list(&self) -> Option<&Vec<Value>> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    /// Number of list levels: 0 for a scalar, 1 for a flat list.
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut pending = vec![(self, 0)];
        while let Some((value, level)) = pending.pop() {
            if let Value::List(items) = value {
                deepest = deepest.max(level + 1);
                pending.extend(items.iter().map(|item| (item, level + 1)));
            }
        }
        deepest
    }

    /// Name of the declared type that reproduces this value.
    pub fn type_tag(&self) -> &'static str {
        match self {
            Value::Bool(_) => "bool",
            Value::Integer(_) => "int",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::List(_) => "list",
        }
    }
}

/// Render a float so that it always reads back as a float: it keeps a `.`
/// and spells the non-finite values `inf`, `-inf` and `nan`.
pub(crate) fn format_float(f: f64) -> String {
    if f.is_nan() {
        "nan".to_string()
    } else if f.is_infinite() {
        if f > 0.0 {
            "inf".to_string()
        } else {
            "-inf".to_string()
        }
    } else {
        let s = format!("{}", f);
        if s.contains('.') || s.contains('e') {
            s
        } else {
            format!("{}.0", s)
        }
    }
}

fn fmt_scalar(value: &Value, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match value {
        Value::Bool(b) => write!(f, "{}", b),
        Value::Integer(n) => write!(f, "{}", n),
        Value::Float(n) => f.write_str(&format_float(*n)),
        Value::String(s) => f.write_str(s),
        Value::List(_) => f.write_str("[]"),
    }
}

/// Canonical PARAM text for the value: lists print as `[a,b,[c]]` with no
/// spaces, scalars print bare. Nested lists are walked with an explicit
/// stack, so any depth the parser accepts can be printed.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Value::List(items) = self else {
            return fmt_scalar(self, f);
        };

        f.write_str("[")?;
        let mut open = vec![items.iter().peekable()];
        while let Some(level) = open.last_mut() {
            match level.next() {
                Some(item) => {
                    let last = level.peek().is_none();
                    match item {
                        Value::List(inner) => {
                            f.write_str("[")?;
                            open.push(inner.iter().peekable());
                            continue;
                        }
                        scalar => fmt_scalar(scalar, f)?,
                    }
                    if !last {
                        f.write_str(",")?;
                    }
                }
                None => {
                    open.pop();
                    f.write_str("]")?;
                    if open.last_mut().is_some_and(|parent| parent.peek().is_some()) {
                        f.write_str(",")?;
                    }
                }
            }
        }
        Ok(())
    }
}

/// Drops nested lists iteratively so that dropping a deeply nested value
/// cannot exhaust the stack.
impl Drop for Value {
    fn drop(&mut self) {
        let Value::List(items) = self else { return };
        if !items.iter().any(|item| matches!(item, Value::List(_))) {
            return;
        }
        let mut pending = std::mem::take(items);
        while let Some(mut item) = pending.pop() {
            if let Value::List(inner) = &mut item {
                pending.append(inner);
            }
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(b) => write!(f, "{}", b),
            Value::Integer(n) => write!(f, "{}", n),
            Value::Float(n) => f.write_str(&format_float(*n)),
            Value::String(s) => write!(f, "{:?}", s),
            Value::List(items) => f.debug_list().entries(items).finish(),
        }
    }
}

/// Serialize an integer as a JSON number of any size. Integers beyond 64 bits
/// keep all their digits through serde_json's arbitrary precision numbers.
pub(crate) fn serialize_integer<S: Serializer>(n: &BigInt, serializer: S) -> Result<S::Ok, S::Error> {
    if let Some(i) = n.to_i64() {
        serializer.serialize_i64(i)
    } else if let Some(u) = n.to_u64() {
        serializer.serialize_u64(u)
    } else {
        let number: serde_json::Number = n.to_string().parse().map_err(S::Error::custom)?;
        number.serialize(serializer)
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Integer(n) => serialize_integer(n, serializer),
            Value::Float(f) => serializer.serialize_f64(*f),
            Value::String(s) => serializer.serialize_str(s),
            Value::List(items) => serializer.collect_seq(items),
        }
    }
}

/// Borrow a parameter table as a name-ordered map, for deterministic output.
pub fn sorted(table: &ParameterTable) -> BTreeMap<&str, &Value> {
    table.iter().map(|(k, v)| (k.as_str(), v)).collect()
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<BigInt> for Value {
    fn from(n: BigInt) -> Self {
        Value::Integer(n)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Integer(BigInt::from(n))
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::List(items)
    }
}
