use tracing::{debug, warn};

use crate::col::FieldInfo;
use crate::constant::{ColumnFlags, ColumnType};
use crate::driver::Driver;
use crate::error::{Error, Result};
use crate::row::Row;

/// Per-column metadata reported by a prepared statement
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColumnMeta {
    pub name: String,
    /// Short native type name such as `"LONG"` or `"VAR_STRING"`; `None` when unreported
    pub native_type: Option<String>,
    pub table: String,
    pub len: Option<u32>,
    pub precision: u8,
    /// Flag names such as `"not_null"` or `"primary_key"`
    pub flags: Vec<String>,
}

impl ColumnMeta {
    pub fn new(name: impl Into<String>, native_type: Option<&str>) -> Self {
        Self {
            name: name.into(),
            native_type: native_type.map(str::to_string),
            ..Default::default()
        }
    }

    fn flag_bits(&self) -> ColumnFlags {
        self.flags
            .iter()
            .filter_map(|flag| match flag.as_str() {
                "not_null" => Some(ColumnFlags::NOT_NULL_FLAG),
                "primary_key" => Some(ColumnFlags::PRI_KEY_FLAG),
                "unique_key" => Some(ColumnFlags::UNIQUE_KEY_FLAG),
                "multiple_key" => Some(ColumnFlags::MULTIPLE_KEY_FLAG),
                "blob" => Some(ColumnFlags::BLOB_FLAG),
                "unsigned" => Some(ColumnFlags::UNSIGNED_FLAG),
                "zerofill" => Some(ColumnFlags::ZEROFILL_FLAG),
                "binary" => Some(ColumnFlags::BINARY_FLAG),
                "auto_increment" => Some(ColumnFlags::AUTO_INCREMENT_FLAG),
                _ => None,
            })
            .fold(ColumnFlags::empty(), |acc, f| acc | f)
    }

    pub fn to_field_info(&self) -> FieldInfo {
        let column_type = self
            .native_type
            .as_deref()
            .and_then(ColumnType::from_native_name);
        let mut field = FieldInfo::new(self.name.as_str(), column_type)
            .with_table(self.table.as_str())
            .with_flags(self.flag_bits());
        field.length = self.len.unwrap_or(0);
        field.decimals = self.precision;
        field
    }
}

/// An executed, forward-only prepared statement
pub trait Statement: Send {
    /// Number of rows the statement reports
    fn row_count(&self) -> usize;

    fn column_count(&self) -> usize;

    /// `None` when the statement cannot describe column `index`
    fn column_meta(&self, index: usize) -> Option<ColumnMeta>;

    /// Next row as a column-name mapping, `Ok(None)` at end of data
    fn fetch_assoc(&mut self) -> Result<Option<Row>>;

    /// Discard any pending rows
    fn close_cursor(&mut self) {}
}

/// Driver over a [`Statement`], emulating random access on a forward-only cursor.
///
/// With buffering enabled every pulled row is kept, so backward seeks are
/// served from memory. Without it, only forward seeks succeed.
pub struct StatementDriver {
    stmt: Box<dyn Statement>,
    num_rows: usize,
    buffered: bool,
    buffer: Vec<Row>,
    /// rows consumed from `stmt` so far
    pulled: usize,
    /// index of the row the next `next_row` yields
    position: usize,
    released: bool,
}

impl StatementDriver {
    pub fn new(stmt: Box<dyn Statement>, buffered: bool) -> Result<Self> {
        if stmt.column_count() == 0 {
            return Err(Error::UnsupportedHandle(
                "statement carries no result set".to_string(),
            ));
        }
        Ok(Self {
            num_rows: stmt.row_count(),
            stmt,
            buffered,
            buffer: Vec::new(),
            pulled: 0,
            position: 0,
            released: false,
        })
    }

    fn pull(&mut self) -> Result<Option<Row>> {
        let row = self.stmt.fetch_assoc()?;
        if let Some(row) = &row {
            self.pulled += 1;
            if self.buffered {
                self.buffer.push(row.clone());
            }
        }
        Ok(row)
    }
}

impl Driver for StatementDriver {
    fn next_row(&mut self) -> Result<Option<Row>> {
        if self.released {
            return Ok(None);
        }
        if self.position < self.pulled {
            // only reachable when buffered
            let row = self.buffer.get(self.position).cloned();
            if row.is_some() {
                self.position += 1;
            }
            return Ok(row);
        }
        let row = self.pull()?;
        if row.is_some() {
            self.position += 1;
        }
        Ok(row)
    }

    /// Columns the statement cannot describe are reported under their index
    /// with no type, so they fall into the string category. `None` only when
    /// no column can be described.
    fn field_metadata(&self) -> Option<Vec<FieldInfo>> {
        if self.released {
            return None;
        }
        let described: Vec<_> = (0..self.stmt.column_count())
            .map(|idx| self.stmt.column_meta(idx))
            .collect();
        if described.iter().all(Option::is_none) {
            return None;
        }
        Some(
            described
                .into_iter()
                .enumerate()
                .map(|(idx, meta)| match meta {
                    Some(meta) => meta.to_field_info(),
                    None => FieldInfo::new(idx.to_string(), None),
                })
                .collect(),
        )
    }

    fn seek(&mut self, row: usize) -> Result<bool> {
        if self.released || row >= self.num_rows {
            return Ok(false);
        }
        if row < self.pulled {
            if self.buffered {
                self.position = row;
                return Ok(true);
            }
            warn!(
                row,
                pulled = self.pulled,
                "cannot seek backwards on an unbuffered statement"
            );
            return Ok(false);
        }
        while self.pulled < row {
            if self.pull()?.is_none() {
                warn!(row, pulled = self.pulled, "statement ended before seek target");
                return Ok(false);
            }
        }
        self.position = row;
        Ok(true)
    }

    fn row_count(&self) -> usize {
        self.num_rows
    }

    fn natively_typed(&self) -> bool {
        false
    }

    fn release(&mut self) {
        if self.released {
            return;
        }
        debug!(rows = self.num_rows, pulled = self.pulled, "closing statement cursor");
        self.stmt.close_cursor();
        self.buffer = Vec::new();
        self.released = true;
    }

    fn is_released(&self) -> bool {
        self.released
    }
}
