//! Owned scalar values carried by rows, and the key type used by
//! pair/group/transpose maps.

use std::borrow::Cow;
use std::fmt;

use serde::{Serialize, Serializer};
use simdutf8::basic::from_utf8;

/// A single column value.
///
/// Text-protocol drivers deliver everything as [`Value::Str`] (or
/// [`Value::Bytes`] for binary columns and invalid UTF-8); the coercer turns
/// those into `Bool`/`Int`/`Float` according to the column's category.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    /// BIGINT UNSIGNED values that do not fit `i64`
    UInt(u64),
    Float(f64),
    Str(String),
    Bytes(Vec<u8>),
}

impl Value {
    /// Build a value from raw text-protocol bytes.
    ///
    /// Valid UTF-8 becomes `Str`, anything else stays `Bytes`.
    pub fn from_text(bytes: &[u8]) -> Self {
        match from_utf8(bytes) {
            Ok(s) => Value::Str(s.to_string()),
            Err(_) => Value::Bytes(bytes.to_vec()),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Str(s) => Some(s.as_bytes()),
            Value::Bytes(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(v) => Some(*v),
            Value::UInt(v) => i64::try_from(*v).ok(),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(v) => Some(*v),
            _ => None,
        }
    }

    /// Render the value the way a text protocol would have sent it.
    ///
    /// `Null` renders as the empty string and booleans as `1`/`0`.
    pub fn to_text(&self) -> Cow<'_, str> {
        match self {
            Value::Null => Cow::Borrowed(""),
            Value::Bool(true) => Cow::Borrowed("1"),
            Value::Bool(false) => Cow::Borrowed("0"),
            Value::Int(v) => Cow::Owned(v.to_string()),
            Value::UInt(v) => Cow::Owned(v.to_string()),
            Value::Float(v) => Cow::Owned(v.to_string()),
            Value::Str(s) => Cow::Borrowed(s),
            Value::Bytes(b) => String::from_utf8_lossy(b),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text())
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_none(),
            Value::Bool(v) => serializer.serialize_bool(*v),
            Value::Int(v) => serializer.serialize_i64(*v),
            Value::UInt(v) => serializer.serialize_u64(*v),
            Value::Float(v) => serializer.serialize_f64(*v),
            Value::Str(s) => serializer.serialize_str(s),
            Value::Bytes(b) => serializer.serialize_str(&String::from_utf8_lossy(b)),
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(i64::from(v))
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<u64> for Value {
    fn from(v: u64) -> Self {
        match i64::try_from(v) {
            Ok(v) => Value::Int(v),
            Err(_) => Value::UInt(v),
        }
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Str(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Str(v)
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Value::Bytes(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

/// Key of the maps built by `fetch_pairs`, `fetch_groups` and friends.
///
/// Values are keyed like an associative array keys them: canonical decimal
/// strings collapse to integers, so `"7"` and `7` address the same entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Key {
    Int(i64),
    Str(String),
}

impl Key {
    fn from_string(s: String) -> Self {
        match canonical_int(&s) {
            Some(v) => Key::Int(v),
            None => Key::Str(s),
        }
    }
}

/// `Some` only for strings an associative array would store as an integer key:
/// optional `-`, no leading zeros, no whitespace, in `i64` range.
fn canonical_int(s: &str) -> Option<i64> {
    let digits = s.strip_prefix('-').unwrap_or(s);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if digits.len() > 1 && digits.starts_with('0') {
        return None;
    }
    if s == "-0" {
        return None;
    }
    s.parse().ok()
}

impl From<&Value> for Key {
    fn from(value: &Value) -> Self {
        match value {
            Value::Null => Key::Str(String::new()),
            Value::Bool(b) => Key::Int(i64::from(*b)),
            Value::Int(v) => Key::Int(*v),
            Value::UInt(v) => match i64::try_from(*v) {
                Ok(v) => Key::Int(v),
                Err(_) => Key::Str(v.to_string()),
            },
            Value::Float(v) => Key::Int(v.trunc() as i64),
            Value::Str(s) => Key::from_string(s.clone()),
            Value::Bytes(b) => Key::from_string(String::from_utf8_lossy(b).into_owned()),
        }
    }
}

impl From<i64> for Key {
    fn from(v: i64) -> Self {
        Key::Int(v)
    }
}

impl From<&str> for Key {
    fn from(v: &str) -> Self {
        Key::from_string(v.to_string())
    }
}

impl From<String> for Key {
    fn from(v: String) -> Self {
        Key::from_string(v)
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Int(v) => write!(f, "{}", v),
            Key::Str(s) => f.write_str(s),
        }
    }
}

impl Serialize for Key {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Key::Int(v) => serializer.serialize_i64(*v),
            Key::Str(s) => serializer.serialize_str(s),
        }
    }
}
