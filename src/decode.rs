//! Conversion of owned [`Value`]s into Rust field types.

use crate::coerce::parse_float;
use crate::error::{Error, Result};
use crate::value::Value;

/// Types a column value can be assigned to.
///
/// Each method handles one [`Value`] variant. The defaults reject the
/// conversion, so an implementation only overrides what it accepts.
pub trait FromValue: Sized {
    fn from_null() -> Result<Self> {
        Err(Error::BadUsageError(format!(
            "Cannot decode NULL to {}",
            std::any::type_name::<Self>()
        )))
    }

    fn from_bool(_v: bool) -> Result<Self> {
        Err(Error::BadUsageError(format!(
            "Cannot decode boolean to {}",
            std::any::type_name::<Self>()
        )))
    }

    fn from_i64(_v: i64) -> Result<Self> {
        Err(Error::BadUsageError(format!(
            "Cannot decode integer to {}",
            std::any::type_name::<Self>()
        )))
    }

    fn from_u64(_v: u64) -> Result<Self> {
        Err(Error::BadUsageError(format!(
            "Cannot decode unsigned integer to {}",
            std::any::type_name::<Self>()
        )))
    }

    fn from_f64(_v: f64) -> Result<Self> {
        Err(Error::BadUsageError(format!(
            "Cannot decode float to {}",
            std::any::type_name::<Self>()
        )))
    }

    fn from_string(_v: String) -> Result<Self> {
        Err(Error::BadUsageError(format!(
            "Cannot decode string to {}",
            std::any::type_name::<Self>()
        )))
    }

    /// Defaults to the string path when the bytes are valid UTF-8
    fn from_bytes(v: Vec<u8>) -> Result<Self> {
        match String::from_utf8(v) {
            Ok(s) => Self::from_string(s),
            Err(_) => Err(Error::BadUsageError(format!(
                "Cannot decode bytes to {}",
                std::any::type_name::<Self>()
            ))),
        }
    }

    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Null => Self::from_null(),
            Value::Bool(v) => Self::from_bool(v),
            Value::Int(v) => Self::from_i64(v),
            Value::UInt(v) => Self::from_u64(v),
            Value::Float(v) => Self::from_f64(v),
            Value::Str(v) => Self::from_string(v),
            Value::Bytes(v) => Self::from_bytes(v),
        }
    }
}

fn out_of_range<T>(v: impl std::fmt::Display) -> Error {
    Error::BadUsageError(format!(
        "Value {} is out of range for {}",
        v,
        std::any::type_name::<T>()
    ))
}

macro_rules! impl_from_value_int {
    ($($t:ty),+) => {
        $(
            impl FromValue for $t {
                fn from_bool(v: bool) -> Result<Self> {
                    Ok(<$t>::from(u8::from(v)))
                }

                fn from_i64(v: i64) -> Result<Self> {
                    <$t>::try_from(v).map_err(|_| out_of_range::<$t>(v))
                }

                fn from_u64(v: u64) -> Result<Self> {
                    <$t>::try_from(v).map_err(|_| out_of_range::<$t>(v))
                }

                fn from_string(v: String) -> Result<Self> {
                    v.trim().parse().map_err(|e| {
                        Error::BadUsageError(format!(
                            "Cannot decode '{}' to {}: {}",
                            v,
                            stringify!($t),
                            e
                        ))
                    })
                }
            }
        )+
    };
}

impl_from_value_int!(i16, i32, i64, u8, u16, u32, u64, usize, isize);

impl FromValue for i8 {
    fn from_bool(v: bool) -> Result<Self> {
        Ok(i8::from(v))
    }

    fn from_i64(v: i64) -> Result<Self> {
        i8::try_from(v).map_err(|_| out_of_range::<i8>(v))
    }

    fn from_u64(v: u64) -> Result<Self> {
        i8::try_from(v).map_err(|_| out_of_range::<i8>(v))
    }

    fn from_string(v: String) -> Result<Self> {
        v.trim()
            .parse()
            .map_err(|e| Error::BadUsageError(format!("Cannot decode '{}' to i8: {}", v, e)))
    }
}

impl FromValue for f64 {
    fn from_i64(v: i64) -> Result<Self> {
        Ok(v as f64)
    }

    fn from_u64(v: u64) -> Result<Self> {
        Ok(v as f64)
    }

    fn from_f64(v: f64) -> Result<Self> {
        Ok(v)
    }

    fn from_string(v: String) -> Result<Self> {
        Ok(parse_float(&v))
    }
}

impl FromValue for f32 {
    fn from_i64(v: i64) -> Result<Self> {
        Ok(v as f32)
    }

    fn from_u64(v: u64) -> Result<Self> {
        Ok(v as f32)
    }

    fn from_f64(v: f64) -> Result<Self> {
        Ok(v as f32)
    }

    fn from_string(v: String) -> Result<Self> {
        Ok(parse_float(&v) as f32)
    }
}

impl FromValue for bool {
    fn from_bool(v: bool) -> Result<Self> {
        Ok(v)
    }

    fn from_i64(v: i64) -> Result<Self> {
        Ok(v != 0)
    }

    fn from_u64(v: u64) -> Result<Self> {
        Ok(v != 0)
    }

    fn from_string(v: String) -> Result<Self> {
        Ok(!v.is_empty() && v != "0")
    }

    fn from_bytes(v: Vec<u8>) -> Result<Self> {
        Ok(v.as_slice() != b"0" && v.iter().any(|&b| b != 0))
    }
}

impl FromValue for String {
    fn from_bool(v: bool) -> Result<Self> {
        Ok(Value::Bool(v).to_text().into_owned())
    }

    fn from_i64(v: i64) -> Result<Self> {
        Ok(v.to_string())
    }

    fn from_u64(v: u64) -> Result<Self> {
        Ok(v.to_string())
    }

    fn from_f64(v: f64) -> Result<Self> {
        Ok(v.to_string())
    }

    fn from_string(v: String) -> Result<Self> {
        Ok(v)
    }

    fn from_bytes(v: Vec<u8>) -> Result<Self> {
        String::from_utf8(v).map_err(|e| {
            Error::BadUsageError(format!("Cannot decode bytes to String: {}", e))
        })
    }
}

impl FromValue for Vec<u8> {
    fn from_string(v: String) -> Result<Self> {
        Ok(v.into_bytes())
    }

    fn from_bytes(v: Vec<u8>) -> Result<Self> {
        Ok(v)
    }
}

impl FromValue for Value {
    fn from_value(value: Value) -> Result<Self> {
        Ok(value)
    }
}

impl<T: FromValue> FromValue for Option<T> {
    fn from_null() -> Result<Self> {
        Ok(None)
    }

    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Null => Ok(None),
            other => T::from_value(other).map(Some),
        }
    }
}
