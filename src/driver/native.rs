use tracing::debug;

use crate::col::FieldInfo;
use crate::driver::Driver;
use crate::error::{Error, Result};
use crate::protocol::{
    decode_binary_row, decode_text_row, parse_column_definition, write_binary_row,
    write_column_definition, write_text_row,
};
use crate::row::Row;
use crate::value::Value;

/// Row packet layout of a stored result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RowFormat {
    /// Length-encoded strings, as returned by `COM_QUERY`
    Text,
    /// NULL bitmap plus typed values, as returned by `COM_STMT_EXECUTE`
    Binary,
}

/// A fully buffered result set: raw column-definition and row packet payloads.
#[derive(Debug, Clone)]
pub struct StoredResult {
    format: RowFormat,
    columns: Vec<Vec<u8>>,
    rows: Vec<Vec<u8>>,
}

impl StoredResult {
    pub fn from_packets(format: RowFormat, columns: Vec<Vec<u8>>, rows: Vec<Vec<u8>>) -> Self {
        Self {
            format,
            columns,
            rows,
        }
    }

    /// Encode `fields` and `rows` into packets of the given format.
    pub fn build(format: RowFormat, fields: &[FieldInfo], rows: &[Vec<Value>]) -> Result<Self> {
        let columns = fields
            .iter()
            .map(|field| {
                let mut buf = Vec::new();
                write_column_definition(&mut buf, field);
                buf
            })
            .collect();
        let rows = rows
            .iter()
            .map(|values| {
                let mut buf = Vec::new();
                match format {
                    RowFormat::Text => {
                        if values.len() != fields.len() {
                            return Err(Error::BadUsageError(format!(
                                "{} values for {} columns",
                                values.len(),
                                fields.len()
                            )));
                        }
                        write_text_row(&mut buf, values);
                    }
                    RowFormat::Binary => write_binary_row(&mut buf, fields, values)?,
                }
                Ok(buf)
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::from_packets(format, columns, rows))
    }

    pub fn format(&self) -> RowFormat {
        self.format
    }

    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }
}

/// Driver over a [`StoredResult`] with true random access by row index.
#[derive(Debug)]
pub struct NativeDriver {
    format: RowFormat,
    fields: Vec<FieldInfo>,
    rows: Vec<Vec<u8>>,
    num_rows: usize,
    cursor: usize,
    released: bool,
}

impl NativeDriver {
    /// Parse the column definitions of `stored`.
    ///
    /// A result without columns or with a malformed definition is rejected.
    pub fn new(stored: StoredResult) -> Result<Self> {
        if stored.columns.is_empty() {
            return Err(Error::UnsupportedHandle(
                "stored result carries no result set".to_string(),
            ));
        }
        let fields = stored
            .columns
            .iter()
            .enumerate()
            .map(|(idx, payload)| {
                parse_column_definition(payload).map_err(|e| {
                    Error::UnsupportedHandle(format!("malformed column definition #{}: {}", idx, e))
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            format: stored.format,
            fields,
            num_rows: stored.rows.len(),
            rows: stored.rows,
            cursor: 0,
            released: false,
        })
    }

    pub fn fields(&self) -> &[FieldInfo] {
        &self.fields
    }

    fn decode(&self, payload: &[u8]) -> Result<Row> {
        let values = match self.format {
            RowFormat::Text => decode_text_row(payload, &self.fields)?,
            RowFormat::Binary => decode_binary_row(payload, &self.fields)?,
        };
        Ok(self
            .fields
            .iter()
            .map(|f| f.name.clone())
            .zip(values)
            .collect())
    }
}

impl Driver for NativeDriver {
    fn next_row(&mut self) -> Result<Option<Row>> {
        if self.released {
            return Ok(None);
        }
        let Some(payload) = self.rows.get(self.cursor) else {
            return Ok(None);
        };
        let row = self.decode(payload)?;
        self.cursor += 1;
        Ok(Some(row))
    }

    fn field_metadata(&self) -> Option<Vec<FieldInfo>> {
        (!self.released).then(|| self.fields.clone())
    }

    fn seek(&mut self, row: usize) -> Result<bool> {
        if self.released || row >= self.rows.len() {
            return Ok(false);
        }
        self.cursor = row;
        Ok(true)
    }

    fn row_count(&self) -> usize {
        self.num_rows
    }

    fn natively_typed(&self) -> bool {
        self.format == RowFormat::Binary
    }

    fn release(&mut self) {
        if self.released {
            return;
        }
        debug!(rows = self.num_rows, "releasing stored result");
        self.released = true;
        self.rows = Vec::new();
        self.cursor = 0;
    }

    fn is_released(&self) -> bool {
        self.released
    }
}
