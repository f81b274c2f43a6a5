use crate::col::FieldInfo;
use crate::constant::ColumnType;
use crate::error::{Error, Result};
use crate::protocol::primitive::*;
use crate::protocol::value::{NullBitmap, parse_binary_value, text_or_bytes};
use crate::value::Value;

/// Header byte of every binary result-set row
const BINARY_ROW_HEADER: u8 = 0x00;

/// Decode a text-protocol row packet: one length-encoded string per column, `0xFB` for NULL.
pub fn decode_text_row(payload: &[u8], fields: &[FieldInfo]) -> Result<Vec<Value>> {
    let mut values = Vec::with_capacity(fields.len());
    let mut data = payload;
    for field in fields {
        let (raw, rest) = read_string_lenenc_nullable(data)?;
        values.push(raw.map_or(Value::Null, |bytes| text_or_bytes(field, bytes)));
        data = rest;
    }
    if !data.is_empty() {
        return Err(Error::InvalidPacket);
    }
    Ok(values)
}

/// Decode a binary-protocol row packet: header, NULL bitmap, then the non-null values.
pub fn decode_binary_row(payload: &[u8], fields: &[FieldInfo]) -> Result<Vec<Value>> {
    let (header, data) = read_int_1(payload)?;
    if header != BINARY_ROW_HEADER {
        return Err(Error::InvalidPacket);
    }
    let (bitmap, mut data) = read_string_fix(data, NullBitmap::len_for(fields.len()))?;
    let null_bitmap = NullBitmap::for_result_set(bitmap);

    let mut values = Vec::with_capacity(fields.len());
    for (idx, field) in fields.iter().enumerate() {
        if null_bitmap.is_null(idx) {
            values.push(Value::Null);
            continue;
        }
        let (value, rest) = parse_binary_value(field, data)?;
        values.push(value);
        data = rest;
    }
    Ok(values)
}

/// Encode a text-protocol row. Values are written in their text form.
pub fn write_text_row(out: &mut Vec<u8>, values: &[Value]) {
    for value in values {
        match value {
            Value::Null => out.push(LENENC_NULL),
            Value::Bytes(b) => write_bytes_lenenc(out, b),
            other => write_string_lenenc(out, &other.to_text()),
        }
    }
}

/// Encode a binary-protocol row for `fields`.
///
/// Temporal columns take their pre-encoded layout as `Value::Bytes`
/// (length byte excluded); every other column takes the matching scalar.
pub fn write_binary_row(out: &mut Vec<u8>, fields: &[FieldInfo], values: &[Value]) -> Result<()> {
    if fields.len() != values.len() {
        return Err(Error::BadUsageError(format!(
            "{} values for {} columns",
            values.len(),
            fields.len()
        )));
    }
    out.push(BINARY_ROW_HEADER);
    out.extend(NullBitmap::encode(
        values.iter().map(Value::is_null),
        fields.len(),
    ));
    for (field, value) in fields.iter().zip(values) {
        if value.is_null() {
            continue;
        }
        write_binary_value(out, field, value)?;
    }
    Ok(())
}

fn write_binary_value(out: &mut Vec<u8>, field: &FieldInfo, value: &Value) -> Result<()> {
    let mismatch = || {
        Error::BadUsageError(format!(
            "Cannot encode {:?} as {:?} for column {}",
            value, field.column_type, field.name
        ))
    };
    let int = || match value {
        Value::Int(v) => Ok(*v as u64),
        Value::UInt(v) => Ok(*v),
        Value::Bool(b) => Ok(u64::from(*b)),
        _ => Err(mismatch()),
    };

    match field.column_type {
        Some(ColumnType::MYSQL_TYPE_NULL) => {}
        Some(ColumnType::MYSQL_TYPE_TINY) => write_int_1(out, int()? as u8),
        Some(ColumnType::MYSQL_TYPE_SHORT | ColumnType::MYSQL_TYPE_YEAR) => {
            write_int_2(out, int()? as u16)
        }
        Some(ColumnType::MYSQL_TYPE_INT24 | ColumnType::MYSQL_TYPE_LONG) => {
            write_int_4(out, int()? as u32)
        }
        Some(ColumnType::MYSQL_TYPE_LONGLONG) => write_int_8(out, int()?),
        Some(ColumnType::MYSQL_TYPE_FLOAT) => {
            let v = value.as_f64().ok_or_else(mismatch)?;
            write_int_4(out, (v as f32).to_bits());
        }
        Some(ColumnType::MYSQL_TYPE_DOUBLE) => {
            let v = value.as_f64().ok_or_else(mismatch)?;
            write_int_8(out, v.to_bits());
        }
        Some(
            ColumnType::MYSQL_TYPE_DATE
            | ColumnType::MYSQL_TYPE_NEWDATE
            | ColumnType::MYSQL_TYPE_DATETIME
            | ColumnType::MYSQL_TYPE_DATETIME2
            | ColumnType::MYSQL_TYPE_TIMESTAMP
            | ColumnType::MYSQL_TYPE_TIMESTAMP2
            | ColumnType::MYSQL_TYPE_TIME
            | ColumnType::MYSQL_TYPE_TIME2,
        ) => {
            let Value::Bytes(layout) = value else {
                return Err(mismatch());
            };
            let len = u8::try_from(layout.len()).map_err(|_| mismatch())?;
            write_int_1(out, len);
            out.extend_from_slice(layout);
        }
        _ => match value {
            Value::Bytes(b) => write_bytes_lenenc(out, b),
            other => write_string_lenenc(out, &other.to_text()),
        },
    }
    Ok(())
}
