use crate::col::FieldInfo;
use crate::constant::{ColumnFlags, ColumnType};
use crate::error::{Error, Result};
use crate::protocol::primitive::*;
use zerocopy::byteorder::little_endian::{U16 as U16LE, U32 as U32LE};
use zerocopy::{FromBytes, Immutable, KnownLayout};

/// Length of the fixed tail that follows the six strings of a column definition
const TAIL_LEN: u64 = 0x0c;

/// Fixed-size tail of Column Definition packet (12 bytes)
#[repr(C, packed)]
#[derive(Debug, Clone, Copy, FromBytes, KnownLayout, Immutable)]
pub struct ColumnDefinitionTail {
    charset: U16LE,
    column_length: U32LE,
    column_type: u8,
    flags: U16LE,
    decimals: u8,
    reserved: U16LE,
}

impl ColumnDefinitionTail {
    pub fn charset(&self) -> u16 {
        self.charset.get()
    }

    pub fn column_length(&self) -> u32 {
        self.column_length.get()
    }

    /// `None` for type codes this crate does not know
    pub fn column_type(&self) -> Option<ColumnType> {
        ColumnType::from_u8(self.column_type)
    }

    /// Unknown bits are dropped
    pub fn flags(&self) -> ColumnFlags {
        ColumnFlags::from_bits_truncate(self.flags.get())
    }

    pub fn decimals(&self) -> u8 {
        self.decimals
    }
}

fn lossy(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

/// Parse the payload of a column definition packet into owned field metadata.
pub fn parse_column_definition(payload: &[u8]) -> Result<FieldInfo> {
    let (_catalog, data) = read_string_lenenc(payload)?;
    let (schema, data) = read_string_lenenc(data)?;
    let (table, data) = read_string_lenenc(data)?;
    let (org_table, data) = read_string_lenenc(data)?;
    let (name, data) = read_string_lenenc(data)?;
    let (org_name, data) = read_string_lenenc(data)?;

    let (tail_len, data) = read_int_lenenc(data)?;
    if tail_len != TAIL_LEN {
        return Err(Error::InvalidPacket);
    }
    let (tail, _) = read_string_fix(data, TAIL_LEN as usize)?;
    let tail = ColumnDefinitionTail::ref_from_bytes(tail).map_err(|_| Error::InvalidPacket)?;

    Ok(FieldInfo {
        name: lossy(name),
        org_name: lossy(org_name),
        table: lossy(table),
        org_table: lossy(org_table),
        schema: lossy(schema),
        charset: tail.charset(),
        length: tail.column_length(),
        column_type: tail.column_type(),
        flags: tail.flags(),
        decimals: tail.decimals(),
    })
}

/// Encode `field` as a column definition payload.
///
/// Unknown column types are written as `MYSQL_TYPE_NULL`.
pub fn write_column_definition(out: &mut Vec<u8>, field: &FieldInfo) {
    write_string_lenenc(out, "def");
    write_string_lenenc(out, &field.schema);
    write_string_lenenc(out, &field.table);
    write_string_lenenc(out, &field.org_table);
    write_string_lenenc(out, &field.name);
    write_string_lenenc(out, &field.org_name);
    write_int_lenenc(out, TAIL_LEN);
    write_int_2(out, field.charset);
    write_int_4(out, field.length);
    write_int_1(
        out,
        field
            .column_type
            .map_or(ColumnType::MYSQL_TYPE_NULL as u8, |t| t as u8),
    );
    write_int_2(out, field.flags.bits());
    write_int_1(out, field.decimals);
    write_int_2(out, 0);
}
