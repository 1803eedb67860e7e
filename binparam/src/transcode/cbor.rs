//! CBOR transcoding: render a parameter table as CBOR binary data.
//!
//! Mapping from PARAM to CBOR:
//!   - Value::Bool    -> CBOR bool (simple values 20/21)
//!   - Value::Integer -> CBOR integer (smallest encoding that fits)
//!   - Value::Float   -> CBOR float64 (always 9 bytes, never downgraded)
//!   - Value::String  -> CBOR text string (determinate length)
//!   - Value::List    -> CBOR array (determinate length)
//!
//! The table itself is a determinate-length map with text keys in name
//! order. Integers outside -2^64..2^64-1 produce an error rather than using
//! bignum tags.

use ciborium::value::Value as CborValue;
use libparam::{sorted, ParameterTable, Value};
use num_bigint::{BigInt, Sign};
use num_traits::ToPrimitive;

// ---------------------------------------------------------------------------
// Encode (PARAM -> CBOR)
//
// Written by hand rather than through ciborium's Value type, because
// ciborium downgrades float64 to float16/float32 whenever the value fits.
// ---------------------------------------------------------------------------

/// Encode a parameter table as CBOR bytes.
pub fn encode(table: &ParameterTable) -> Result<Vec<u8>, String> {
    let entries = sorted(table);
    let mut buf = Vec::new();
    write_type_and_length(&mut buf, 5, entries.len() as u64); // major 5 = map
    for (name, value) in entries {
        write_text(&mut buf, name);
        write_value(&mut buf, value)?;
    }
    Ok(buf)
}

fn write_value(buf: &mut Vec<u8>, value: &Value) -> Result<(), String> {
    match value {
        Value::Bool(b) => buf.push(if *b { 0xf5 } else { 0xf4 }),
        Value::Integer(n) => write_integer(buf, n)?,
        Value::Float(f) => {
            // major 7, info 27
            buf.push(0xfb);
            buf.extend_from_slice(&f.to_be_bytes());
        }
        Value::String(s) => write_text(buf, s),
        Value::List(items) => {
            write_type_and_length(buf, 4, items.len() as u64); // major 4 = array
            for item in items {
                write_value(buf, item)?;
            }
        }
    }
    Ok(())
}

fn write_text(buf: &mut Vec<u8>, s: &str) {
    write_type_and_length(buf, 3, s.len() as u64); // major 3 = text string
    buf.extend_from_slice(s.as_bytes());
}

/// Write a CBOR major type with its argument in the shortest form: inline
/// for 0-23, then 1, 2, 4 or 8 following bytes.
fn write_type_and_length(buf: &mut Vec<u8>, major: u8, val: u64) {
    let high = major << 5;
    match val {
        0..=23 => buf.push(high | val as u8),
        24..=0xff => {
            buf.push(high | 24);
            buf.push(val as u8);
        }
        0x100..=0xffff => {
            buf.push(high | 25);
            buf.extend_from_slice(&(val as u16).to_be_bytes());
        }
        0x10000..=0xffff_ffff => {
            buf.push(high | 26);
            buf.extend_from_slice(&(val as u32).to_be_bytes());
        }
        _ => {
            buf.push(high | 27);
            buf.extend_from_slice(&val.to_be_bytes());
        }
    }
}

/// Major 0 carries n for n >= 0; major 1 carries -1 - n for n < 0.
fn write_integer(buf: &mut Vec<u8>, n: &BigInt) -> Result<(), String> {
    let (major, arg) = if n.sign() == Sign::Minus {
        (1, (-n) - BigInt::from(1))
    } else {
        (0, n.clone())
    };
    let val = arg.to_u64().ok_or_else(|| {
        format!(
            "integer {} exceeds CBOR's native integer range (-2^64 to 2^64-1)",
            n
        )
    })?;
    write_type_and_length(buf, major, val);
    Ok(())
}

// ---------------------------------------------------------------------------
// Diagnostic Notation (CBOR -> human-readable text, RFC 8949 §8)
// ---------------------------------------------------------------------------

/// Render CBOR bytes as diagnostic notation, read back from the wire bytes.
pub fn diagnostic(input: &[u8]) -> Result<String, String> {
    let cbor_value: CborValue =
        ciborium::de::from_reader(input).map_err(|e| format!("CBOR decode error: {}", e))?;
    let mut out = String::new();
    diag_value(&mut out, &cbor_value, 0);
    out.push('\n');
    Ok(out)
}

fn diag_value(out: &mut String, val: &CborValue, indent: usize) {
    match val {
        CborValue::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        CborValue::Integer(i) => {
            let n: i128 = (*i).into();
            out.push_str(&n.to_string());
        }
        CborValue::Float(f) => diag_float(out, *f),
        CborValue::Text(s) => diag_text(out, s),
        CborValue::Array(items) => diag_array(out, items, indent),
        CborValue::Map(pairs) => diag_map(out, pairs, indent),
        // `encode` never writes null, byte strings or tags.
        other => out.push_str(&format!("<?unexpected {:?}>", other)),
    }
}

fn diag_float(out: &mut String, f: f64) {
    if f.is_nan() {
        out.push_str("NaN");
    } else if f.is_infinite() {
        out.push_str(if f > 0.0 { "Infinity" } else { "-Infinity" });
    } else {
        let s = format!("{:?}", f);
        out.push_str(&s);
    }
}

fn diag_text(out: &mut String, s: &str) {
    out.push('"');
    for ch in s.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
}

fn pad(out: &mut String, indent: usize) {
    out.push_str(&" ".repeat(indent));
}

fn diag_array(out: &mut String, items: &[CborValue], indent: usize) {
    if items.is_empty() {
        out.push_str("[]");
        return;
    }
    // Short arrays of scalars stay on one line.
    if items.len() <= 5 && items.iter().all(is_scalar) {
        out.push('[');
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            diag_value(out, item, indent);
        }
        out.push(']');
        return;
    }
    out.push_str("[\n");
    for (i, item) in items.iter().enumerate() {
        pad(out, indent + 2);
        diag_value(out, item, indent + 2);
        if i + 1 < items.len() {
            out.push(',');
        }
        out.push('\n');
    }
    pad(out, indent);
    out.push(']');
}

fn diag_map(out: &mut String, pairs: &[(CborValue, CborValue)], indent: usize) {
    if pairs.is_empty() {
        out.push_str("{}");
        return;
    }
    out.push_str("{\n");
    for (i, (k, v)) in pairs.iter().enumerate() {
        pad(out, indent + 2);
        diag_value(out, k, indent + 2);
        out.push_str(": ");
        diag_value(out, v, indent + 2);
        if i + 1 < pairs.len() {
            out.push(',');
        }
        out.push('\n');
    }
    pad(out, indent);
    out.push('}');
}

fn is_scalar(val: &CborValue) -> bool {
    !matches!(val, CborValue::Array(_) | CborValue::Map(_))
}
