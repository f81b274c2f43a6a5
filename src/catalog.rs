//! Column-name to coercion-category lookup, built once per cursor.

use indexmap::IndexMap;

use crate::col::FieldInfo;
use crate::constant::ColumnType;

/// The scalar kind a column's values are coerced into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Boolean,
    Integer,
    Float,
    String,
}

impl Category {
    /// Category of a native column type; unknown types are strings.
    pub fn of(column_type: Option<ColumnType>) -> Self {
        use ColumnType::*;
        match column_type {
            Some(MYSQL_TYPE_BIT) => Category::Boolean,
            Some(
                MYSQL_TYPE_TINY | MYSQL_TYPE_SHORT | MYSQL_TYPE_LONG | MYSQL_TYPE_LONGLONG
                | MYSQL_TYPE_INT24,
            ) => Category::Integer,
            Some(
                MYSQL_TYPE_DOUBLE | MYSQL_TYPE_DECIMAL | MYSQL_TYPE_NEWDECIMAL | MYSQL_TYPE_FLOAT,
            ) => Category::Float,
            _ => Category::String,
        }
    }
}

/// Field metadata of a result set together with the derived category per column.
#[derive(Debug, Clone, Default)]
pub struct TypeCatalog {
    fields: Vec<FieldInfo>,
    type_map: IndexMap<String, Category>,
}

impl TypeCatalog {
    pub fn new(fields: Vec<FieldInfo>) -> Self {
        let type_map = fields
            .iter()
            .map(|f| (f.name.clone(), Category::of(f.column_type)))
            .collect();
        Self { fields, type_map }
    }

    pub fn fields(&self) -> &[FieldInfo] {
        &self.fields
    }

    pub fn type_map(&self) -> &IndexMap<String, Category> {
        &self.type_map
    }

    pub fn category(&self, column: &str) -> Option<Category> {
        self.type_map.get(column).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
