//! Binary-protocol value layouts, decoded into owned [`Value`]s.

use crate::catalog::Category;
use crate::coerce::coerce_value;
use crate::col::FieldInfo;
use crate::constant::ColumnType;
use crate::error::{Error, Result};
use crate::protocol::primitive::*;
use crate::value::Value;
use zerocopy::byteorder::little_endian::{U16 as U16LE, U32 as U32LE};
use zerocopy::{FromBytes, Immutable, KnownLayout};

/// Parse one binary-protocol value of `field`, returning it with the remaining bytes.
///
/// Temporal values are rendered as their SQL text form. DECIMAL and BIT
/// columns come out already coerced, so binary rows never need a coercion pass.
pub fn parse_binary_value<'a>(field: &FieldInfo, data: &'a [u8]) -> Result<(Value, &'a [u8])> {
    let unsigned = field.is_unsigned();
    let Some(column_type) = field.column_type else {
        let (bytes, rest) = read_string_lenenc(data)?;
        return Ok((text_or_bytes(field, bytes), rest));
    };

    match column_type {
        ColumnType::MYSQL_TYPE_NULL => Ok((Value::Null, data)),

        ColumnType::MYSQL_TYPE_TINY => {
            let (v, rest) = read_int_1(data)?;
            let value = if unsigned {
                Value::Int(i64::from(v))
            } else {
                Value::Int(i64::from(v as i8))
            };
            Ok((value, rest))
        }

        ColumnType::MYSQL_TYPE_SHORT | ColumnType::MYSQL_TYPE_YEAR => {
            let (v, rest) = read_int_2(data)?;
            let value = if unsigned || column_type == ColumnType::MYSQL_TYPE_YEAR {
                Value::Int(i64::from(v))
            } else {
                Value::Int(i64::from(v as i16))
            };
            Ok((value, rest))
        }

        ColumnType::MYSQL_TYPE_INT24 | ColumnType::MYSQL_TYPE_LONG => {
            let (v, rest) = read_int_4(data)?;
            let value = if unsigned {
                Value::Int(i64::from(v))
            } else {
                Value::Int(i64::from(v as i32))
            };
            Ok((value, rest))
        }

        ColumnType::MYSQL_TYPE_LONGLONG => {
            let (v, rest) = read_int_8(data)?;
            let value = if unsigned {
                Value::from(v)
            } else {
                Value::Int(v as i64)
            };
            Ok((value, rest))
        }

        ColumnType::MYSQL_TYPE_FLOAT => {
            let (v, rest) = read_int_4(data)?;
            Ok((Value::Float(f64::from(f32::from_bits(v))), rest))
        }

        ColumnType::MYSQL_TYPE_DOUBLE => {
            let (v, rest) = read_int_8(data)?;
            Ok((Value::Float(f64::from_bits(v)), rest))
        }

        ColumnType::MYSQL_TYPE_DATE
        | ColumnType::MYSQL_TYPE_NEWDATE
        | ColumnType::MYSQL_TYPE_DATETIME
        | ColumnType::MYSQL_TYPE_DATETIME2
        | ColumnType::MYSQL_TYPE_TIMESTAMP
        | ColumnType::MYSQL_TYPE_TIMESTAMP2 => {
            let date_only = matches!(
                column_type,
                ColumnType::MYSQL_TYPE_DATE | ColumnType::MYSQL_TYPE_NEWDATE
            );
            let (len, rest) = read_int_1(data)?;
            let (body, rest) = read_string_fix(rest, usize::from(len))?;
            Ok((Value::Str(format_timestamp(body, date_only)?), rest))
        }

        ColumnType::MYSQL_TYPE_TIME | ColumnType::MYSQL_TYPE_TIME2 => {
            let (len, rest) = read_int_1(data)?;
            let (body, rest) = read_string_fix(rest, usize::from(len))?;
            Ok((Value::Str(format_time(body)?), rest))
        }

        ColumnType::MYSQL_TYPE_DECIMAL | ColumnType::MYSQL_TYPE_NEWDECIMAL => {
            let (bytes, rest) = read_string_lenenc(data)?;
            Ok((coerce_value(Category::Float, Value::from_text(bytes)), rest))
        }

        ColumnType::MYSQL_TYPE_BIT => {
            let (bytes, rest) = read_string_lenenc(data)?;
            Ok((coerce_value(Category::Boolean, Value::Bytes(bytes.to_vec())), rest))
        }

        ColumnType::MYSQL_TYPE_VARCHAR
        | ColumnType::MYSQL_TYPE_VAR_STRING
        | ColumnType::MYSQL_TYPE_STRING
        | ColumnType::MYSQL_TYPE_BLOB
        | ColumnType::MYSQL_TYPE_TINY_BLOB
        | ColumnType::MYSQL_TYPE_MEDIUM_BLOB
        | ColumnType::MYSQL_TYPE_LONG_BLOB
        | ColumnType::MYSQL_TYPE_GEOMETRY
        | ColumnType::MYSQL_TYPE_JSON
        | ColumnType::MYSQL_TYPE_ENUM
        | ColumnType::MYSQL_TYPE_SET
        | ColumnType::MYSQL_TYPE_TYPED_ARRAY => {
            let (bytes, rest) = read_string_lenenc(data)?;
            Ok((text_or_bytes(field, bytes), rest))
        }
    }
}

/// Binary-charset columns stay raw, everything else is validated as UTF-8.
pub(crate) fn text_or_bytes(field: &FieldInfo, bytes: &[u8]) -> Value {
    if field.is_binary() {
        Value::Bytes(bytes.to_vec())
    } else {
        Value::from_text(bytes)
    }
}

fn format_timestamp(body: &[u8], date_only: bool) -> Result<String> {
    let zero_time = if date_only { "" } else { " 00:00:00" };
    match body.len() {
        0 => Ok(format!("0000-00-00{}", zero_time)),
        4 => {
            let ts = Timestamp4::ref_from_bytes(body).map_err(|_| Error::InvalidPacket)?;
            Ok(format!(
                "{:04}-{:02}-{:02}{}",
                ts.year(),
                ts.month,
                ts.day,
                zero_time
            ))
        }
        7 => {
            let ts = Timestamp7::ref_from_bytes(body).map_err(|_| Error::InvalidPacket)?;
            let date = format!("{:04}-{:02}-{:02}", ts.year(), ts.month, ts.day);
            if date_only {
                return Ok(date);
            }
            Ok(format!(
                "{} {:02}:{:02}:{:02}",
                date, ts.hour, ts.minute, ts.second
            ))
        }
        11 => {
            let ts = Timestamp11::ref_from_bytes(body).map_err(|_| Error::InvalidPacket)?;
            let date = format!("{:04}-{:02}-{:02}", ts.year(), ts.month, ts.day);
            if date_only {
                return Ok(date);
            }
            Ok(format!(
                "{} {:02}:{:02}:{:02}.{:06}",
                date,
                ts.hour,
                ts.minute,
                ts.second,
                ts.microsecond()
            ))
        }
        _ => Err(Error::InvalidPacket),
    }
}

fn format_time(body: &[u8]) -> Result<String> {
    match body.len() {
        0 => Ok("00:00:00".to_string()),
        8 => {
            let t = Time8::ref_from_bytes(body).map_err(|_| Error::InvalidPacket)?;
            Ok(format!(
                "{}{:02}:{:02}:{:02}",
                if t.is_negative() { "-" } else { "" },
                t.hours(),
                t.minute,
                t.second
            ))
        }
        12 => {
            let t = Time12::ref_from_bytes(body).map_err(|_| Error::InvalidPacket)?;
            Ok(format!(
                "{}{:02}:{:02}:{:02}.{:06}",
                if t.is_negative() { "-" } else { "" },
                t.hours(),
                t.minute,
                t.second,
                t.microsecond()
            ))
        }
        _ => Err(Error::InvalidPacket),
    }
}

// ============================================================================
// Temporal Types
// ============================================================================

/// DATE/DATETIME/TIMESTAMP - 4 bytes (date only)
#[repr(C, packed)]
#[derive(Debug, Clone, Copy, FromBytes, KnownLayout, Immutable)]
pub struct Timestamp4 {
    pub year: U16LE,
    pub month: u8,
    pub day: u8,
}

impl Timestamp4 {
    pub fn year(&self) -> u16 {
        self.year.get()
    }
}

/// DATE/DATETIME/TIMESTAMP - 7 bytes (without microseconds)
#[repr(C, packed)]
#[derive(Debug, Clone, Copy, FromBytes, KnownLayout, Immutable)]
pub struct Timestamp7 {
    pub year: U16LE,
    pub month: u8,
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
}

impl Timestamp7 {
    pub fn year(&self) -> u16 {
        self.year.get()
    }
}

/// DATE/DATETIME/TIMESTAMP - 11 bytes (with microseconds)
#[repr(C, packed)]
#[derive(Debug, Clone, Copy, FromBytes, KnownLayout, Immutable)]
pub struct Timestamp11 {
    pub year: U16LE,
    pub month: u8,
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
    pub microsecond: U32LE,
}

impl Timestamp11 {
    pub fn year(&self) -> u16 {
        self.year.get()
    }

    pub fn microsecond(&self) -> u32 {
        self.microsecond.get()
    }
}

/// TIME - 8 bytes
#[repr(C, packed)]
#[derive(Debug, Clone, Copy, FromBytes, KnownLayout, Immutable)]
pub struct Time8 {
    pub is_negative: u8,
    pub days: U32LE,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
}

impl Time8 {
    pub fn is_negative(&self) -> bool {
        self.is_negative != 0
    }

    /// Days folded into the hour count, as `TIME` renders them
    pub fn hours(&self) -> u64 {
        u64::from(self.days.get()) * 24 + u64::from(self.hour)
    }
}

/// TIME - 12 bytes (with microseconds)
#[repr(C, packed)]
#[derive(Debug, Clone, Copy, FromBytes, KnownLayout, Immutable)]
pub struct Time12 {
    pub is_negative: u8,
    pub days: U32LE,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
    pub microsecond: U32LE,
}

impl Time12 {
    pub fn is_negative(&self) -> bool {
        self.is_negative != 0
    }

    pub fn hours(&self) -> u64 {
        u64::from(self.days.get()) * 24 + u64::from(self.hour)
    }

    pub fn microsecond(&self) -> u32 {
        self.microsecond.get()
    }
}

// ============================================================================
// NULL Bitmap
// ============================================================================

/// NULL bitmap of a binary result-set row.
///
/// Bit `idx + 2` is set when column `idx` is NULL; the first two bits are reserved.
#[derive(Debug, Clone, Copy)]
pub struct NullBitmap<'a> {
    bitmap: &'a [u8],
}

impl<'a> NullBitmap<'a> {
    const OFFSET: usize = 2;

    pub fn for_result_set(bitmap: &'a [u8]) -> Self {
        Self { bitmap }
    }

    /// Bitmap length in bytes for `num_columns` columns
    pub fn len_for(num_columns: usize) -> usize {
        (num_columns + Self::OFFSET).div_ceil(8)
    }

    pub fn is_null(&self, idx: usize) -> bool {
        let bit_pos = idx + Self::OFFSET;
        self.bitmap
            .get(bit_pos >> 3)
            .is_some_and(|byte| byte & (1 << (bit_pos & 7)) != 0)
    }

    /// Encode the bitmap for a row whose NULL columns are flagged in `nulls`.
    pub fn encode(nulls: impl IntoIterator<Item = bool>, num_columns: usize) -> Vec<u8> {
        let mut out = vec![0u8; Self::len_for(num_columns)];
        for (idx, is_null) in nulls.into_iter().enumerate() {
            if is_null {
                let bit_pos = idx + Self::OFFSET;
                if let Some(byte) = out.get_mut(bit_pos >> 3) {
                    *byte |= 1 << (bit_pos & 7);
                }
            }
        }
        out
    }
}
