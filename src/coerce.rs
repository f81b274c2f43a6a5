//! Converts raw text-protocol values into the scalar kind of their column.

use crate::catalog::{Category, TypeCatalog};
use crate::row::Row;
use crate::value::Value;

/// Coerce every non-null column of `row` that the catalog knows about.
///
/// Columns missing from the catalog are left untouched.
pub fn coerce_row(row: &mut Row, catalog: &TypeCatalog) {
    for (column, value) in row.iter_mut() {
        if value.is_null() {
            continue;
        }
        if let Some(category) = catalog.category(column) {
            let raw = std::mem::take(value);
            *value = coerce_value(category, raw);
        }
    }
}

/// Coerce a single value. `Null` passes through unchanged.
pub fn coerce_value(category: Category, value: Value) -> Value {
    if value.is_null() {
        return value;
    }
    match category {
        Category::Boolean => Value::Bool(truthy(&value)),
        Category::Integer => to_integer(value),
        Category::Float => Value::Float(to_float(&value)),
        Category::String => to_string(value),
    }
}

/// Bit-field truthiness: false for the empty value, `"0"`, or only NUL bytes.
fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Int(v) => *v != 0,
        Value::UInt(v) => *v != 0,
        Value::Float(v) => *v != 0.0,
        Value::Str(s) => bytes_truthy(s.as_bytes()),
        Value::Bytes(b) => bytes_truthy(b),
    }
}

fn bytes_truthy(bytes: &[u8]) -> bool {
    bytes != b"0" && bytes.iter().any(|&b| b != 0)
}

fn to_integer(value: Value) -> Value {
    match value {
        Value::Bool(b) => Value::Int(i64::from(b)),
        v @ (Value::Int(_) | Value::UInt(_)) => v,
        Value::Float(f) => Value::Int(f.trunc() as i64),
        Value::Str(s) => parse_integer(&s),
        Value::Bytes(b) => parse_integer(&String::from_utf8_lossy(&b)),
        Value::Null => Value::Null,
    }
}

fn to_float(value: &Value) -> f64 {
    match value {
        Value::Null => 0.0,
        Value::Bool(b) => f64::from(u8::from(*b)),
        Value::Int(v) => *v as f64,
        Value::UInt(v) => *v as f64,
        Value::Float(f) => *f,
        Value::Str(s) => parse_float(s),
        Value::Bytes(b) => parse_float(&String::from_utf8_lossy(b)),
    }
}

fn to_string(value: Value) -> Value {
    match value {
        v @ (Value::Str(_) | Value::Bytes(_) | Value::Null) => v,
        other => Value::Str(other.to_text().into_owned()),
    }
}

/// Integer parse: `i64`, then `u64`, then the leading numeric prefix truncated, else 0.
pub(crate) fn parse_integer(s: &str) -> Value {
    if let Ok(v) = s.parse::<i64>() {
        return Value::Int(v);
    }
    if let Ok(v) = s.parse::<u64>() {
        return Value::UInt(v);
    }
    let prefix = numeric_prefix(s.trim_start());
    if prefix.is_empty() {
        return Value::Int(0);
    }
    if let Ok(v) = prefix.parse::<i64>() {
        return Value::Int(v);
    }
    if let Ok(v) = prefix.parse::<u64>() {
        return Value::UInt(v);
    }
    // saturating cast for out-of-range or fractional prefixes
    Value::Int(prefix.parse::<f64>().map_or(0, |f| f.trunc() as i64))
}

/// Float parse of the leading numeric prefix, else 0.0.
pub(crate) fn parse_float(s: &str) -> f64 {
    numeric_prefix(s.trim_start()).parse().unwrap_or(0.0)
}

/// The longest prefix of `s` shaped like `[+-]?digits[.digits][(e|E)[+-]?digits]`
/// with at least one mantissa digit; empty when there is none.
fn numeric_prefix(s: &str) -> &str {
    let bytes = s.as_bytes();
    let mut end = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }
    let int_start = end;
    while bytes.get(end).is_some_and(u8::is_ascii_digit) {
        end += 1;
    }
    let mut digits = end - int_start;
    if bytes.get(end) == Some(&b'.') {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while bytes.get(frac_end).is_some_and(u8::is_ascii_digit) {
            frac_end += 1;
        }
        digits += frac_end - frac_start;
        if digits > 0 {
            end = frac_end;
        }
    }
    if digits == 0 {
        return "";
    }
    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+' | b'-')) {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while bytes.get(exp_end).is_some_and(u8::is_ascii_digit) {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }
    &s[..end]
}
