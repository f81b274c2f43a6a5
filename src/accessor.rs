//! Derived views over a [`ResultSet`]: pairs, groups, transpose, columns, slices.
//!
//! The scanning accessors restore the logical position when they finish, even
//! on error. The materializing ones (`fetch_array_pair`, `fetch_column`,
//! `fetch_all_column`, `json`) read every row from row 0 like `fetch_all_array`.
//! Either kind fails with `Error::Fetch` on a non-empty result it cannot rewind.

use std::collections::BTreeMap;

use indexmap::IndexMap;

use crate::cursor::ResultSet;
use crate::error::Result;
use crate::row::Row;
use crate::value::{Key, Value};

impl ResultSet {
    /// Visit every row (mapper applied), then move back to the saved logical position.
    fn scan(&mut self, mut visit: impl FnMut(usize, Row)) -> Result<()> {
        let saved = self.key();
        let result = self.read_range(0, self.num_rows(), |idx, row| visit(idx, row));
        self.rewind(saved);
        result
    }

    /// Read rows `start..end` in order, mapper applied.
    fn read_range(
        &mut self,
        start: usize,
        end: usize,
        mut visit: impl FnMut(usize, Row),
    ) -> Result<()> {
        if start >= end || !self.seek_required(start)? {
            return Ok(());
        }
        for idx in start..end {
            match self.fetch_callable(None)? {
                Some(row) => visit(idx, row),
                None => break,
            }
        }
        Ok(())
    }

    /// `key` column to `column` column. Later rows overwrite earlier ones.
    pub fn fetch_pairs(&mut self, key: &str, column: &str) -> Result<IndexMap<Key, Value>> {
        let mut pairs = IndexMap::new();
        self.scan(|_, mut row| {
            let Some(k) = row.get(key).map(Key::from) else {
                return;
            };
            if let Some(v) = row.swap_remove(column) {
                pairs.insert(k, v);
            }
        })?;
        Ok(pairs)
    }

    /// `key` column to the whole row.
    pub fn fetch_pairs_rows(&mut self, key: &str) -> Result<IndexMap<Key, Row>> {
        let mut pairs = IndexMap::new();
        self.scan(|_, row| {
            if let Some(k) = row.get(key).map(Key::from) {
                pairs.insert(k, row);
            }
        })?;
        Ok(pairs)
    }

    /// Values of `column`, grouped by the `group` column.
    pub fn fetch_groups(&mut self, group: &str, column: &str) -> Result<IndexMap<Key, Vec<Value>>> {
        let mut groups: IndexMap<Key, Vec<Value>> = IndexMap::new();
        self.scan(|_, mut row| {
            let Some(g) = row.get(group).map(Key::from) else {
                return;
            };
            if let Some(v) = row.swap_remove(column) {
                groups.entry(g).or_default().push(v);
            }
        })?;
        Ok(groups)
    }

    /// Whole rows, grouped by the `group` column.
    pub fn fetch_groups_rows(&mut self, group: &str) -> Result<IndexMap<Key, Vec<Row>>> {
        let mut groups: IndexMap<Key, Vec<Row>> = IndexMap::new();
        self.scan(|_, row| {
            if let Some(g) = row.get(group).map(Key::from) {
                groups.entry(g).or_default().push(row);
            }
        })?;
        Ok(groups)
    }

    /// Column name to the column's values, in row order.
    pub fn fetch_transpose(&mut self) -> Result<IndexMap<String, Vec<Value>>> {
        let mut columns: IndexMap<String, Vec<Value>> = IndexMap::new();
        self.scan(|_, row| {
            for (name, value) in row {
                columns.entry(name).or_default().push(value);
            }
        })?;
        Ok(columns)
    }

    /// Like [`fetch_transpose`](Self::fetch_transpose), with each column's values
    /// keyed by the `key` column. Falls back to row indexes when `key` yields nothing.
    pub fn fetch_transpose_by(
        &mut self,
        key: &str,
    ) -> Result<IndexMap<String, IndexMap<Key, Value>>> {
        let keys: Vec<Key> = self
            .fetch_all_column(key, false)?
            .iter()
            .map(Key::from)
            .collect();
        let mut columns: IndexMap<String, IndexMap<Key, Value>> = IndexMap::new();
        self.scan(|idx, row| {
            let k = if keys.is_empty() {
                Some(Key::Int(idx as i64))
            } else {
                keys.get(idx).cloned()
            };
            let Some(k) = k else {
                return;
            };
            for (name, value) in row {
                columns.entry(name).or_default().insert(k.clone(), value);
            }
        })?;
        Ok(columns)
    }

    fn peek(&mut self, row: usize) -> Result<Option<Row>> {
        let saved = self.key();
        let result = match self.seek_required(row) {
            Ok(true) => self.fetch_callable(None),
            Ok(false) => Ok(None),
            Err(e) => Err(e),
        };
        self.rewind(saved);
        result
    }

    /// Row 0, leaving the logical position untouched. `None` on an empty result.
    pub fn first(&mut self) -> Result<Option<Row>> {
        if self.is_empty() {
            return Ok(None);
        }
        self.peek(0)
    }

    pub fn last(&mut self) -> Result<Option<Row>> {
        if self.is_empty() {
            return Ok(None);
        }
        self.peek(self.num_rows() - 1)
    }

    fn peek_column(&mut self, row: usize, column: &str) -> Result<Option<Value>> {
        let saved = self.key();
        let result = match self.seek_required(row) {
            Ok(true) => self.fetch_callable_column(None, column),
            Ok(false) => Ok(None),
            Err(e) => Err(e),
        };
        self.rewind(saved);
        result
    }

    pub fn first_column(&mut self, column: &str) -> Result<Option<Value>> {
        if self.is_empty() {
            return Ok(None);
        }
        self.peek_column(0, column)
    }

    pub fn last_column(&mut self, column: &str) -> Result<Option<Value>> {
        if self.is_empty() {
            return Ok(None);
        }
        self.peek_column(self.num_rows() - 1, column)
    }

    /// Start index of a slice. Negative offsets count from the end, clamped to 0.
    fn slice_start(&self, offset: isize) -> usize {
        if offset >= 0 {
            return offset.unsigned_abs();
        }
        self.num_rows().saturating_sub(offset.unsigned_abs())
    }

    fn slice_rows(&mut self, offset: isize, length: Option<usize>) -> Result<Vec<(usize, Row)>> {
        let start = self.slice_start(offset);
        let end = match length {
            Some(length) => start.saturating_add(length).min(self.num_rows()),
            None => self.num_rows(),
        };
        let saved = self.key();
        let mut out = Vec::with_capacity(end.saturating_sub(start));
        let result = self.read_range(start, end, |idx, row| out.push((idx, row)));
        self.rewind(saved);
        result.map(|()| out)
    }

    /// Up to `length` rows starting at `offset`.
    pub fn slice(&mut self, offset: isize, length: Option<usize>) -> Result<Vec<Row>> {
        Ok(self
            .slice_rows(offset, length)?
            .into_iter()
            .map(|(_, row)| row)
            .collect())
    }

    /// Like [`slice`](Self::slice), keyed by row index.
    pub fn slice_indexed(
        &mut self,
        offset: isize,
        length: Option<usize>,
    ) -> Result<BTreeMap<usize, Row>> {
        Ok(self.slice_rows(offset, length)?.into_iter().collect())
    }

    /// `key` column to `value` column over every row, from row 0.
    pub fn fetch_array_pair(&mut self, key: &str, value: &str) -> Result<IndexMap<Key, Value>> {
        let mut pairs = IndexMap::new();
        for mut row in self.fetch_all_array()? {
            let Some(k) = row.get(key).map(Key::from) else {
                continue;
            };
            if let Some(v) = row.swap_remove(value) {
                pairs.insert(k, v);
            }
        }
        Ok(pairs)
    }

    /// The last value of `column`.
    ///
    /// With `skip_nulls`, rows where the column is missing or NULL are passed
    /// over; without it, only the last row is looked at.
    pub fn fetch_column(&mut self, column: &str, skip_nulls: bool) -> Result<Option<Value>> {
        let rows = self.fetch_all_array()?;
        for mut row in rows.into_iter().rev() {
            match row.swap_remove(column) {
                Some(value) if skip_nulls && value.is_null() => continue,
                Some(value) => return Ok(Some(value)),
                None if skip_nulls => continue,
                None => break,
            }
        }
        Ok(None)
    }

    /// Every value of `column`, in row order.
    ///
    /// With `skip_nulls`, missing and NULL values are passed over; without it,
    /// collection stops at the first row lacking the column.
    pub fn fetch_all_column(&mut self, column: &str, skip_nulls: bool) -> Result<Vec<Value>> {
        let mut values = Vec::new();
        for mut row in self.fetch_all_array()? {
            match row.swap_remove(column) {
                Some(value) if skip_nulls && value.is_null() => {}
                Some(value) => values.push(value),
                None if skip_nulls => {}
                None => break,
            }
        }
        Ok(values)
    }

    /// Every row as a JSON array of objects. Binary values are rendered lossily.
    #[tracing::instrument(skip_all, fields(sql = %self.sql(), rows = self.num_rows()))]
    pub fn json(&mut self) -> Result<String> {
        let rows = self.fetch_all_array()?;
        Ok(serde_json::to_string(&rows)?)
    }
}
