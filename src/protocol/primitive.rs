use crate::error::{Error, Result};
use zerocopy::FromBytes;
use zerocopy::byteorder::little_endian::{U16 as U16LE, U32 as U32LE, U64 as U64LE};

/// First byte of a length-encoded field that stands for SQL NULL in text rows
pub const LENENC_NULL: u8 = 0xFB;

/// Read 1-byte integer
pub fn read_int_1(data: &[u8]) -> Result<(u8, &[u8])> {
    let (&first, rest) = data.split_first().ok_or(Error::UnexpectedEof)?;
    Ok((first, rest))
}

/// Read 2-byte little-endian integer
pub fn read_int_2(data: &[u8]) -> Result<(u16, &[u8])> {
    let (head, rest) = data.split_at_checked(2).ok_or(Error::UnexpectedEof)?;
    let value = U16LE::ref_from_bytes(head)
        .map_err(|_| Error::InvalidPacket)?
        .get();
    Ok((value, rest))
}

/// Read 3-byte little-endian integer
pub fn read_int_3(data: &[u8]) -> Result<(u32, &[u8])> {
    let (head, rest) = data.split_at_checked(3).ok_or(Error::UnexpectedEof)?;
    let value = u32::from_le_bytes([head[0], head[1], head[2], 0]);
    Ok((value, rest))
}

/// Read 4-byte little-endian integer
pub fn read_int_4(data: &[u8]) -> Result<(u32, &[u8])> {
    let (head, rest) = data.split_at_checked(4).ok_or(Error::UnexpectedEof)?;
    let value = U32LE::ref_from_bytes(head)
        .map_err(|_| Error::InvalidPacket)?
        .get();
    Ok((value, rest))
}

/// Read 8-byte little-endian integer
pub fn read_int_8(data: &[u8]) -> Result<(u64, &[u8])> {
    let (head, rest) = data.split_at_checked(8).ok_or(Error::UnexpectedEof)?;
    let value = U64LE::ref_from_bytes(head)
        .map_err(|_| Error::InvalidPacket)?
        .get();
    Ok((value, rest))
}

/// Read length-encoded integer
pub fn read_int_lenenc(data: &[u8]) -> Result<(u64, &[u8])> {
    let (marker, rest) = read_int_1(data)?;
    match marker {
        0xFC => read_int_2(rest).map(|(v, rest)| (u64::from(v), rest)),
        0xFD => read_int_3(rest).map(|(v, rest)| (u64::from(v), rest)),
        0xFE => read_int_8(rest),
        // 0xFB is NULL and 0xFF an error header; neither is a valid length
        0xFB | 0xFF => Err(Error::InvalidPacket),
        v => Ok((u64::from(v), rest)),
    }
}

/// Read fixed-length string
pub fn read_string_fix(data: &[u8], len: usize) -> Result<(&[u8], &[u8])> {
    data.split_at_checked(len).ok_or(Error::UnexpectedEof)
}

/// Read length-encoded string
pub fn read_string_lenenc(data: &[u8]) -> Result<(&[u8], &[u8])> {
    let (len, rest) = read_int_lenenc(data)?;
    let len = usize::try_from(len).map_err(|_| Error::InvalidPacket)?;
    read_string_fix(rest, len)
}

/// Read a length-encoded string of a text row, where `0xFB` encodes NULL
pub fn read_string_lenenc_nullable(data: &[u8]) -> Result<(Option<&[u8]>, &[u8])> {
    match data.first() {
        Some(&LENENC_NULL) => Ok((None, &data[1..])),
        Some(_) => read_string_lenenc(data).map(|(s, rest)| (Some(s), rest)),
        None => Err(Error::UnexpectedEof),
    }
}

/// Write 1-byte integer
pub fn write_int_1(out: &mut Vec<u8>, value: u8) {
    out.push(value);
}

/// Write 2-byte little-endian integer
pub fn write_int_2(out: &mut Vec<u8>, value: u16) {
    out.extend_from_slice(&value.to_le_bytes());
}

/// Write 3-byte little-endian integer
pub fn write_int_3(out: &mut Vec<u8>, value: u32) {
    out.extend_from_slice(&value.to_le_bytes()[..3]);
}

/// Write 4-byte little-endian integer
pub fn write_int_4(out: &mut Vec<u8>, value: u32) {
    out.extend_from_slice(&value.to_le_bytes());
}

/// Write 8-byte little-endian integer
pub fn write_int_8(out: &mut Vec<u8>, value: u64) {
    out.extend_from_slice(&value.to_le_bytes());
}

/// Write length-encoded integer
pub fn write_int_lenenc(out: &mut Vec<u8>, value: u64) {
    if value < 251 {
        out.push(value as u8);
    } else if value < (1 << 16) {
        out.push(0xFC);
        write_int_2(out, value as u16);
    } else if value < (1 << 24) {
        out.push(0xFD);
        write_int_3(out, value as u32);
    } else {
        out.push(0xFE);
        write_int_8(out, value);
    }
}

/// Write length-encoded string
pub fn write_string_lenenc(out: &mut Vec<u8>, s: &str) {
    write_bytes_lenenc(out, s.as_bytes());
}

/// Write length-encoded bytes
pub fn write_bytes_lenenc(out: &mut Vec<u8>, data: &[u8]) {
    write_int_lenenc(out, data.len() as u64);
    out.extend_from_slice(data);
}
