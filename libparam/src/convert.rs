//! Scalar conversion and declared types.
//!
//! Numeric literals follow one grammar everywhere: surrounding whitespace is
//! ignored, a sign is optional, and a single `_` may separate two digits.
//! Floats also accept exponents, `.5` and `5.` forms, and `inf`, `infinity`
//! and `nan` in any case.

use num_bigint::BigInt;
use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use crate::Value;

/// The type tag of a declaration, which selects the conversion path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeclaredType {
    /// `int`: integer literal, failure aborts the load.
    Int,
    /// `float`: float literal, failure aborts the load.
    Float,
    /// `bool`: `true` in any case, everything else is false.
    Bool,
    /// Any tag starting with `list`; the suffix (e.g. `[int]`) is kept
    /// but never checked.
    List(String),
    /// Any other tag (`string` included): the raw value verbatim.
    Text(String),
}

impl DeclaredType {
    /// Classify a type tag.
    pub fn from_tag(tag: &str) -> Self {
        if let Some(suffix) = tag.strip_prefix("list") {
            return DeclaredType::List(suffix.to_string());
        }
        match tag {
            "int" => DeclaredType::Int,
            "float" => DeclaredType::Float,
            "bool" => DeclaredType::Bool,
            other => DeclaredType::Text(other.to_string()),
        }
    }
}

impl fmt::Display for DeclaredType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeclaredType::Int => f.write_str("int"),
            DeclaredType::Float => f.write_str("float"),
            DeclaredType::Bool => f.write_str("bool"),
            DeclaredType::List(suffix) => write!(f, "list{}", suffix),
            DeclaredType::Text(tag) => f.write_str(tag),
        }
    }
}

/// Coerce a token to its most specific scalar: float when it contains a `.`,
/// integer otherwise, and the token itself when the numeric parse fails.
///
/// There is no bool inference here: `"true"` stays a string.
pub fn convert_type(text: &str) -> Value {
    let converted = if text.contains('.') {
        parse_float_literal(text).map(Value::Float)
    } else {
        parse_int_literal(text).map(Value::Integer)
    };
    converted.unwrap_or_else(|| Value::String(text.to_string()))
}

/// Parse an integer literal.
pub fn parse_int_literal(text: &str) -> Option<BigInt> {
    let digits = strip_digit_separators(text.trim())?;
    let (negative, unsigned) = match digits.as_bytes().first() {
        Some(b'-') => (true, &digits[1..]),
        Some(b'+') => (false, &digits[1..]),
        _ => (false, &digits[..]),
    };
    if unsigned.is_empty() || !unsigned.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let magnitude = BigInt::from_str(unsigned).ok()?;
    Some(if negative { -magnitude } else { magnitude })
}

/// Parse a float literal.
pub fn parse_float_literal(text: &str) -> Option<f64> {
    let digits = strip_digit_separators(text.trim())?;
    f64::from_str(&digits).ok()
}

/// `true` when the text is `true` in any case.
pub fn parse_bool_literal(text: &str) -> bool {
    text.to_lowercase() == "true"
}

/// Remove `_` digit separators. Returns `None` when an underscore is not
/// surrounded by ASCII digits.
fn strip_digit_separators(text: &str) -> Option<Cow<'_, str>> {
    if !text.contains('_') {
        return Some(Cow::Borrowed(text));
    }
    let bytes = text.as_bytes();
    for (i, &b) in bytes.iter().enumerate() {
        if b != b'_' {
            continue;
        }
        let before = i.checked_sub(1).map(|j| bytes[j]);
        let after = bytes.get(i + 1).copied();
        match (before, after) {
            (Some(x), Some(y)) if x.is_ascii_digit() && y.is_ascii_digit() => {}
            _ => return None,
        }
    }
    Some(Cow::Owned(text.replace('_', "")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_declared_type_tags() {
        assert_eq!(DeclaredType::from_tag("int"), DeclaredType::Int);
        assert_eq!(DeclaredType::from_tag("float"), DeclaredType::Float);
        assert_eq!(DeclaredType::from_tag("bool"), DeclaredType::Bool);
        assert_eq!(DeclaredType::from_tag("list"), DeclaredType::List(String::new()));
        assert_eq!(
            DeclaredType::from_tag("list[int]"),
            DeclaredType::List("[int]".to_string())
        );
        assert_eq!(
            DeclaredType::from_tag("listing"),
            DeclaredType::List("ing".to_string())
        );
        assert_eq!(
            DeclaredType::from_tag("string"),
            DeclaredType::Text("string".to_string())
        );
        assert_eq!(
            DeclaredType::from_tag("Int"),
            DeclaredType::Text("Int".to_string())
        );
    }

    #[test]
    fn test_declared_type_display_round_trips_tag() {
        for tag in ["int", "float", "bool", "list[float]", "path"] {
            assert_eq!(DeclaredType::from_tag(tag).to_string(), tag);
        }
    }

    #[test]
    fn test_convert_integers() {
        assert_eq!(convert_type("42"), Value::from(42));
        assert_eq!(convert_type("-7"), Value::from(-7));
        assert_eq!(convert_type("+3"), Value::from(3));
        assert_eq!(convert_type("007"), Value::from(7));
        assert_eq!(convert_type("1_000"), Value::from(1000));
        assert_eq!(convert_type(" 2"), Value::from(2));
    }

    #[test]
    fn test_convert_big_integer() {
        let value = convert_type("123456789012345678901234567890");
        let expected: BigInt = "123456789012345678901234567890".parse().unwrap();
        assert_eq!(value.as_integer(), Some(&expected));
    }

    #[test]
    fn test_convert_floats() {
        assert_eq!(convert_type("0.5"), Value::from(0.5));
        assert_eq!(convert_type(".5"), Value::from(0.5));
        assert_eq!(convert_type("5."), Value::from(5.0));
        assert_eq!(convert_type("-1.5e3"), Value::from(-1500.0));
        assert_eq!(convert_type("1_000.25"), Value::from(1000.25));
    }

    #[test]
    fn test_dot_selects_float_path() {
        // No dot: integer attempt only, so exponents and specials stay strings.
        assert_eq!(convert_type("1e5"), Value::from("1e5"));
        assert_eq!(convert_type("inf"), Value::from("inf"));
    }

    #[test]
    fn test_fallback_to_string() {
        assert_eq!(convert_type("1.2.3"), Value::from("1.2.3"));
        assert_eq!(convert_type("abc.def"), Value::from("abc.def"));
        assert_eq!(convert_type("abc"), Value::from("abc"));
        assert_eq!(convert_type(""), Value::from(""));
        assert_eq!(convert_type("1__0"), Value::from("1__0"));
        assert_eq!(convert_type("_1"), Value::from("_1"));
        assert_eq!(convert_type("1_"), Value::from("1_"));
        assert_eq!(convert_type("-"), Value::from("-"));
    }

    #[test]
    fn test_no_bool_inference() {
        assert_eq!(convert_type("true"), Value::from("true"));
        assert_eq!(convert_type("False"), Value::from("False"));
    }

    #[test]
    fn test_convert_is_idempotent_through_text() {
        for token in ["0", "42", "-7", "007", "1_000", "0.5", "-0.0", "3.", ".25", "2.5e-3"] {
            let once = convert_type(token);
            let twice = convert_type(&once.to_string());
            assert_eq!(once, twice, "token {:?}", token);
        }
    }

    #[test]
    fn test_float_literal_specials() {
        assert_eq!(parse_float_literal("inf"), Some(f64::INFINITY));
        assert_eq!(parse_float_literal("-Infinity"), Some(f64::NEG_INFINITY));
        assert!(parse_float_literal("NaN").unwrap().is_nan());
        assert_eq!(parse_float_literal("1e5"), Some(100000.0));
        assert_eq!(parse_float_literal(" 2.5 "), Some(2.5));
        assert_eq!(parse_float_literal("abc"), None);
        assert_eq!(parse_float_literal(""), None);
    }

    #[test]
    fn test_int_literal_rejects_non_digits() {
        assert_eq!(parse_int_literal("1.0"), None);
        assert_eq!(parse_int_literal("0x10"), None);
        assert_eq!(parse_int_literal("+-1"), None);
        assert_eq!(parse_int_literal("seven"), None);
        assert_eq!(parse_int_literal("7 8"), None);
    }

    #[test]
    fn test_bool_literal() {
        assert!(parse_bool_literal("true"));
        assert!(parse_bool_literal("True"));
        assert!(parse_bool_literal("TRUE"));
        assert!(!parse_bool_literal("yes"));
        assert!(!parse_bool_literal("1"));
        assert!(!parse_bool_literal("false"));
        assert!(!parse_bool_literal(""));
        assert!(!parse_bool_literal("true false"));
    }
}
