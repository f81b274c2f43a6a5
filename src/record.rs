//! The managed-mapping representation: a row wrapped with collection helpers.

use std::ops::Deref;

use serde::Serialize;

use crate::row::Row;
use crate::value::Value;

/// A row wrapped in a small collection API.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(transparent)]
pub struct Record {
    inner: Row,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a record from `(column, value)` pairs.
    pub fn create<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        pairs
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect()
    }

    /// The same entries in reverse column order.
    pub fn reverse(mut self) -> Self {
        self.inner.reverse();
        self
    }

    /// Value of `column`, or `default` when it is missing or null.
    pub fn get_or<'a>(&'a self, column: &str, default: &'a Value) -> &'a Value {
        match self.inner.get(column) {
            Some(value) if !value.is_null() => value,
            _ => default,
        }
    }

    pub fn set(&mut self, column: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.inner.insert(column.into(), value.into())
    }

    pub fn as_row(&self) -> &Row {
        &self.inner
    }

    pub fn into_row(self) -> Row {
        self.inner
    }

    pub fn to_json(&self) -> crate::error::Result<String> {
        Ok(serde_json::to_string(&self.inner)?)
    }
}

impl Deref for Record {
    type Target = Row;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl From<Row> for Record {
    fn from(inner: Row) -> Self {
        Self { inner }
    }
}

impl FromIterator<(String, Value)> for Record {
    fn from_iter<T: IntoIterator<Item = (String, Value)>>(iter: T) -> Self {
        Self {
            inner: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for Record {
    type Item = (String, Value);
    type IntoIter = indexmap::map::IntoIter<String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.inner.into_iter()
    }
}

/// A fully materialized list of [`Record`]s.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(transparent)]
pub struct RecordList {
    records: Vec<Record>,
}

impl RecordList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reverse(mut self) -> Self {
        self.records.reverse();
        self
    }

    pub fn push(&mut self, record: Record) {
        self.records.push(record);
    }

    /// Every present value of `column`, in row order.
    pub fn column<'a>(&'a self, column: &'a str) -> impl Iterator<Item = &'a Value> + 'a {
        self.records.iter().filter_map(move |r| r.get(column))
    }

    pub fn into_vec(self) -> Vec<Record> {
        self.records
    }

    pub fn into_rows(self) -> Vec<Row> {
        self.records.into_iter().map(Record::into_row).collect()
    }
}

impl Deref for RecordList {
    type Target = [Record];

    fn deref(&self) -> &Self::Target {
        &self.records
    }
}

impl From<Vec<Record>> for RecordList {
    fn from(records: Vec<Record>) -> Self {
        Self { records }
    }
}

impl FromIterator<Record> for RecordList {
    fn from_iter<T: IntoIterator<Item = Record>>(iter: T) -> Self {
        Self {
            records: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for RecordList {
    type Item = Record;
    type IntoIter = std::vec::IntoIter<Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.into_iter()
    }
}

impl<'a> IntoIterator for &'a RecordList {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_and_reverse() {
        let record = Record::create([("id", Value::Int(1)), ("name", Value::from("a"))]);
        let keys: Vec<_> = record.keys().cloned().collect();
        assert_eq!(keys, vec!["id", "name"]);

        let reversed = record.reverse();
        let keys: Vec<_> = reversed.keys().cloned().collect();
        assert_eq!(keys, vec!["name", "id"]);
    }

    #[test]
    fn get_or_skips_nulls() {
        let record = Record::create([("a", Value::Null), ("b", Value::Int(2))]);
        let fallback = Value::from("x");
        assert_eq!(record.get_or("a", &fallback), &fallback);
        assert_eq!(record.get_or("b", &fallback), &Value::Int(2));
        assert_eq!(record.get_or("c", &fallback), &fallback);
    }

    #[test]
    fn list_column_and_reverse() {
        let list: RecordList = vec![
            Record::create([("v", 1i64)]),
            Record::create([("w", 2i64)]),
            Record::create([("v", 3i64)]),
        ]
        .into();
        let values: Vec<_> = list.column("v").cloned().collect();
        assert_eq!(values, vec![Value::Int(1), Value::Int(3)]);

        let reversed = list.reverse();
        assert_eq!(reversed[0].get("v"), Some(&Value::Int(3)));
        assert_eq!(reversed.len(), 3);
    }
}
