use indexmap::IndexMap;

use crate::value::Value;

/// One fetched row: column name to value, in result-set column order.
///
/// Column names are unique within a row; a later duplicate column in the
/// driver's output overwrites the earlier one, as an associative fetch does.
pub type Row = IndexMap<String, Value>;
