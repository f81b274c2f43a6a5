use serde::{Serialize, Serializer};

use crate::constant::{BINARY_CHARSET, ColumnFlags, ColumnType};
use crate::row::Row;
use crate::value::Value;

/// Metadata of one result column
#[derive(Debug, Clone, PartialEq)]
pub struct FieldInfo {
    pub name: String,
    pub org_name: String,
    pub table: String,
    pub org_table: String,
    pub schema: String,
    pub charset: u16,
    pub length: u32,
    /// `None` when the driver reported a type this crate does not know
    pub column_type: Option<ColumnType>,
    pub flags: ColumnFlags,
    pub decimals: u8,
}

impl FieldInfo {
    pub fn new(name: impl Into<String>, column_type: Option<ColumnType>) -> Self {
        let name = name.into();
        Self {
            org_name: name.clone(),
            name,
            table: String::new(),
            org_table: String::new(),
            schema: String::new(),
            charset: 0,
            length: 0,
            column_type,
            flags: ColumnFlags::empty(),
            decimals: 0,
        }
    }

    pub fn with_flags(mut self, flags: ColumnFlags) -> Self {
        self.flags = flags;
        self
    }

    pub fn with_charset(mut self, charset: u16) -> Self {
        self.charset = charset;
        self
    }

    pub fn with_table(mut self, table: impl Into<String>) -> Self {
        self.table = table.into();
        self.org_table = self.table.clone();
        self
    }

    pub fn is_binary(&self) -> bool {
        self.charset == BINARY_CHARSET
    }

    pub fn is_unsigned(&self) -> bool {
        self.flags.contains(ColumnFlags::UNSIGNED_FLAG)
    }

    /// The field as a plain mapping, keyed like the classic field-info object.
    pub fn to_row(&self) -> Row {
        let mut row = Row::with_capacity(10);
        row.insert("name".to_string(), Value::from(self.name.as_str()));
        row.insert("orgname".to_string(), Value::from(self.org_name.as_str()));
        row.insert("table".to_string(), Value::from(self.table.as_str()));
        row.insert("orgtable".to_string(), Value::from(self.org_table.as_str()));
        row.insert("db".to_string(), Value::from(self.schema.as_str()));
        row.insert("charsetnr".to_string(), Value::Int(i64::from(self.charset)));
        row.insert("length".to_string(), Value::Int(i64::from(self.length)));
        row.insert(
            "type".to_string(),
            self.column_type
                .map_or(Value::Null, |t| Value::Int(i64::from(t as u8))),
        );
        row.insert("flags".to_string(), Value::Int(i64::from(self.flags.bits())));
        row.insert("decimals".to_string(), Value::Int(i64::from(self.decimals)));
        row
    }
}

impl Serialize for FieldInfo {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_row().serialize(serializer)
    }
}
