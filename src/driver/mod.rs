//! Uniform access to the two supported result handles.

pub mod native;
pub mod statement;

use std::any::Any;

use crate::col::FieldInfo;
use crate::error::{Error, Result};
use crate::opts::Opts;
use crate::row::Row;

pub use native::{NativeDriver, RowFormat, StoredResult};
pub use statement::{ColumnMeta, Statement, StatementDriver};

/// A result handle the cursor can read rows from
pub trait Driver: Send {
    /// Advance by one row. `Ok(None)` at end of data.
    fn next_row(&mut self) -> Result<Option<Row>>;

    /// `None` when the driver cannot describe its columns
    fn field_metadata(&self) -> Option<Vec<FieldInfo>>;

    /// On `Ok(true)` the next `next_row` yields row `row`.
    ///
    /// `Ok(false)` means the row cannot be reached; `Err` is a driver failure
    /// met while moving there.
    fn seek(&mut self, row: usize) -> Result<bool>;

    fn row_count(&self) -> usize;

    /// Rows already carry typed scalars and need no coercion
    fn natively_typed(&self) -> bool;

    /// Idempotent
    fn release(&mut self);

    fn is_released(&self) -> bool;
}

/// An executed result handle, before it is bound to a cursor
pub enum DriverHandle {
    Native(StoredResult),
    Statement(Box<dyn Statement>),
}

impl DriverHandle {
    /// Bind the handle to its driver variant.
    pub fn open(self, opts: &Opts) -> Result<Box<dyn Driver>> {
        Ok(match self {
            DriverHandle::Native(stored) => Box::new(NativeDriver::new(stored)?),
            DriverHandle::Statement(stmt) => {
                Box::new(StatementDriver::new(stmt, opts.buffer_statement_rows)?)
            }
        })
    }

    /// Identify an opaque handle. Anything but a [`StoredResult`], a
    /// `Box<dyn Statement>` or a `DriverHandle` is rejected.
    pub fn from_any(handle: Box<dyn Any + Send>) -> Result<Self> {
        let handle = match handle.downcast::<DriverHandle>() {
            Ok(handle) => return Ok(*handle),
            Err(handle) => handle,
        };
        let handle = match handle.downcast::<StoredResult>() {
            Ok(stored) => return Ok(DriverHandle::Native(*stored)),
            Err(handle) => handle,
        };
        match handle.downcast::<Box<dyn Statement>>() {
            Ok(stmt) => Ok(DriverHandle::Statement(*stmt)),
            Err(_) => Err(Error::UnsupportedHandle(
                "expected a stored result or a prepared statement".to_string(),
            )),
        }
    }
}

impl From<StoredResult> for DriverHandle {
    fn from(stored: StoredResult) -> Self {
        DriverHandle::Native(stored)
    }
}

impl From<Box<dyn Statement>> for DriverHandle {
    fn from(stmt: Box<dyn Statement>) -> Self {
        DriverHandle::Statement(stmt)
    }
}
