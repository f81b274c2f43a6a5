/// Charset number MySQL reports for binary (non-text) columns
pub const BINARY_CHARSET: u16 = 63;

bitflags::bitflags! {
    /// Column definition flags
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ColumnFlags: u16 {
        const NOT_NULL_FLAG = 0x0001;
        const PRI_KEY_FLAG = 0x0002;
        const UNIQUE_KEY_FLAG = 0x0004;
        const MULTIPLE_KEY_FLAG = 0x0008;
        const BLOB_FLAG = 0x0010;
        const UNSIGNED_FLAG = 0x0020;
        const ZEROFILL_FLAG = 0x0040;
        const BINARY_FLAG = 0x0080;
        const ENUM_FLAG = 0x0100;
        const AUTO_INCREMENT_FLAG = 0x0200;
        const TIMESTAMP_FLAG = 0x0400;
        const SET_FLAG = 0x0800;
        const NO_DEFAULT_VALUE_FLAG = 0x1000;
        const ON_UPDATE_NOW_FLAG = 0x2000;
        const PART_KEY_FLAG = 0x4000;
        const NUM_FLAG = 0x8000;
    }
}

/// MySQL column types
#[allow(non_camel_case_types)]
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnType {
    MYSQL_TYPE_DECIMAL = 0x00,
    MYSQL_TYPE_TINY = 0x01,
    MYSQL_TYPE_SHORT = 0x02,
    MYSQL_TYPE_LONG = 0x03,
    MYSQL_TYPE_FLOAT = 0x04,
    MYSQL_TYPE_DOUBLE = 0x05,
    MYSQL_TYPE_NULL = 0x06,
    MYSQL_TYPE_TIMESTAMP = 0x07,
    MYSQL_TYPE_LONGLONG = 0x08,
    MYSQL_TYPE_INT24 = 0x09,
    MYSQL_TYPE_DATE = 0x0a,
    MYSQL_TYPE_TIME = 0x0b,
    MYSQL_TYPE_DATETIME = 0x0c,
    MYSQL_TYPE_YEAR = 0x0d,
    MYSQL_TYPE_NEWDATE = 0x0e,
    MYSQL_TYPE_VARCHAR = 0x0f,
    MYSQL_TYPE_BIT = 0x10,
    MYSQL_TYPE_TIMESTAMP2 = 0x11,
    MYSQL_TYPE_DATETIME2 = 0x12,
    MYSQL_TYPE_TIME2 = 0x13,
    MYSQL_TYPE_TYPED_ARRAY = 0x14,
    MYSQL_TYPE_JSON = 0xf5,
    MYSQL_TYPE_NEWDECIMAL = 0xf6,
    MYSQL_TYPE_ENUM = 0xf7,
    MYSQL_TYPE_SET = 0xf8,
    MYSQL_TYPE_TINY_BLOB = 0xf9,
    MYSQL_TYPE_MEDIUM_BLOB = 0xfa,
    MYSQL_TYPE_LONG_BLOB = 0xfb,
    MYSQL_TYPE_BLOB = 0xfc,
    MYSQL_TYPE_VAR_STRING = 0xfd,
    MYSQL_TYPE_STRING = 0xfe,
    MYSQL_TYPE_GEOMETRY = 0xff,
}

impl ColumnType {
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0x00 => Some(Self::MYSQL_TYPE_DECIMAL),
            0x01 => Some(Self::MYSQL_TYPE_TINY),
            0x02 => Some(Self::MYSQL_TYPE_SHORT),
            0x03 => Some(Self::MYSQL_TYPE_LONG),
            0x04 => Some(Self::MYSQL_TYPE_FLOAT),
            0x05 => Some(Self::MYSQL_TYPE_DOUBLE),
            0x06 => Some(Self::MYSQL_TYPE_NULL),
            0x07 => Some(Self::MYSQL_TYPE_TIMESTAMP),
            0x08 => Some(Self::MYSQL_TYPE_LONGLONG),
            0x09 => Some(Self::MYSQL_TYPE_INT24),
            0x0a => Some(Self::MYSQL_TYPE_DATE),
            0x0b => Some(Self::MYSQL_TYPE_TIME),
            0x0c => Some(Self::MYSQL_TYPE_DATETIME),
            0x0d => Some(Self::MYSQL_TYPE_YEAR),
            0x0e => Some(Self::MYSQL_TYPE_NEWDATE),
            0x0f => Some(Self::MYSQL_TYPE_VARCHAR),
            0x10 => Some(Self::MYSQL_TYPE_BIT),
            0x11 => Some(Self::MYSQL_TYPE_TIMESTAMP2),
            0x12 => Some(Self::MYSQL_TYPE_DATETIME2),
            0x13 => Some(Self::MYSQL_TYPE_TIME2),
            0x14 => Some(Self::MYSQL_TYPE_TYPED_ARRAY),
            0xf5 => Some(Self::MYSQL_TYPE_JSON),
            0xf6 => Some(Self::MYSQL_TYPE_NEWDECIMAL),
            0xf7 => Some(Self::MYSQL_TYPE_ENUM),
            0xf8 => Some(Self::MYSQL_TYPE_SET),
            0xf9 => Some(Self::MYSQL_TYPE_TINY_BLOB),
            0xfa => Some(Self::MYSQL_TYPE_MEDIUM_BLOB),
            0xfb => Some(Self::MYSQL_TYPE_LONG_BLOB),
            0xfc => Some(Self::MYSQL_TYPE_BLOB),
            0xfd => Some(Self::MYSQL_TYPE_VAR_STRING),
            0xfe => Some(Self::MYSQL_TYPE_STRING),
            0xff => Some(Self::MYSQL_TYPE_GEOMETRY),
            _ => None,
        }
    }

    /// Resolve the short type name reported by statement drivers
    /// (`"LONG"`, `"NEWDECIMAL"`, `"VAR_STRING"`, ...).
    ///
    /// The `MYSQL_TYPE_` prefix is optional and the lookup is case-insensitive.
    pub fn from_native_name(name: &str) -> Option<Self> {
        let upper = name.trim().to_ascii_uppercase();
        let short = upper.strip_prefix("MYSQL_TYPE_").unwrap_or(&upper);
        match short {
            "DECIMAL" => Some(Self::MYSQL_TYPE_DECIMAL),
            "TINY" => Some(Self::MYSQL_TYPE_TINY),
            "SHORT" => Some(Self::MYSQL_TYPE_SHORT),
            "LONG" => Some(Self::MYSQL_TYPE_LONG),
            "FLOAT" => Some(Self::MYSQL_TYPE_FLOAT),
            "DOUBLE" => Some(Self::MYSQL_TYPE_DOUBLE),
            "NULL" => Some(Self::MYSQL_TYPE_NULL),
            "TIMESTAMP" => Some(Self::MYSQL_TYPE_TIMESTAMP),
            "LONGLONG" => Some(Self::MYSQL_TYPE_LONGLONG),
            "INT24" => Some(Self::MYSQL_TYPE_INT24),
            "DATE" => Some(Self::MYSQL_TYPE_DATE),
            "TIME" => Some(Self::MYSQL_TYPE_TIME),
            "DATETIME" => Some(Self::MYSQL_TYPE_DATETIME),
            "YEAR" => Some(Self::MYSQL_TYPE_YEAR),
            "NEWDATE" => Some(Self::MYSQL_TYPE_NEWDATE),
            "VARCHAR" => Some(Self::MYSQL_TYPE_VARCHAR),
            "BIT" => Some(Self::MYSQL_TYPE_BIT),
            "JSON" => Some(Self::MYSQL_TYPE_JSON),
            "NEWDECIMAL" => Some(Self::MYSQL_TYPE_NEWDECIMAL),
            "ENUM" => Some(Self::MYSQL_TYPE_ENUM),
            "SET" => Some(Self::MYSQL_TYPE_SET),
            "TINY_BLOB" => Some(Self::MYSQL_TYPE_TINY_BLOB),
            "MEDIUM_BLOB" => Some(Self::MYSQL_TYPE_MEDIUM_BLOB),
            "LONG_BLOB" => Some(Self::MYSQL_TYPE_LONG_BLOB),
            "BLOB" => Some(Self::MYSQL_TYPE_BLOB),
            "VAR_STRING" => Some(Self::MYSQL_TYPE_VAR_STRING),
            "STRING" => Some(Self::MYSQL_TYPE_STRING),
            "GEOMETRY" => Some(Self::MYSQL_TYPE_GEOMETRY),
            _ => None,
        }
    }
}
