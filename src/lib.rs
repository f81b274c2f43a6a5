mod accessor;
pub mod catalog;
pub mod coerce;
pub mod col;
pub mod constant;
pub mod cursor;
pub mod decode;
pub mod driver;
pub mod error;
pub mod handler;
pub mod object;
mod opts;
pub mod protocol;
pub mod record;
pub mod row;
pub mod value;

pub use cursor::{Fetched, FetchedAll, Iter, ResultSet, RowMapper, Yield};
pub use driver::{ColumnMeta, Driver, DriverHandle, RowFormat, Statement, StoredResult};
pub use error::{Error, Result};
pub use object::{Object, SetField, Target};
pub use opts::{Opts, Representation};
pub use record::{Record, RecordList};
pub use row::Row;
pub use value::{Key, Value};

#[cfg(feature = "derive")]
pub mod r#macro {
    pub use zero_cursor_derive::SetField;
}
