//! The result cursor: positional access, representation fetches and lifecycle.

use std::cell::OnceCell;
use std::fmt;

use tracing::{debug, warn};

use crate::catalog::TypeCatalog;
use crate::coerce::coerce_row;
use crate::col::FieldInfo;
use crate::driver::{Driver, DriverHandle};
use crate::error::{Error, Result};
use crate::object::{Object, SetField, Target};
use crate::opts::{Opts, Representation};
use crate::record::{Record, RecordList};
use crate::row::Row;
use crate::value::Value;

/// Transform applied to rows read through the positional surface
pub type RowMapper = Box<dyn Fn(Row) -> Row + Send>;

/// A seekable, type-coercing view over an executed query's rows.
///
/// Two positions are tracked. `key()` is the logical position used by the
/// positional surface (`current`, `next`, `iter`); the driver position is
/// where representation fetches (`fetch_*`) read the next row from.
pub struct ResultSet {
    sql: String,
    driver: Box<dyn Driver>,
    num_rows: usize,
    current_row: usize,
    default_representation: Representation,
    coerce_types: bool,
    mapper: Option<RowMapper>,
    catalog: OnceCell<Option<TypeCatalog>>,
}

impl ResultSet {
    pub fn new(sql: impl Into<String>, handle: impl Into<DriverHandle>) -> Result<Self> {
        Self::with_opts(sql, handle, Opts::default())
    }

    pub fn with_opts(
        sql: impl Into<String>,
        handle: impl Into<DriverHandle>,
        opts: Opts,
    ) -> Result<Self> {
        let driver = handle.into().open(&opts)?;
        Ok(Self::from_driver(sql, driver, opts))
    }

    /// Wrap an already opened driver, such as a custom [`Driver`] implementation.
    pub fn from_driver(sql: impl Into<String>, driver: Box<dyn Driver>, opts: Opts) -> Self {
        Self {
            sql: sql.into(),
            num_rows: driver.row_count(),
            driver,
            current_row: 0,
            default_representation: opts.default_representation,
            coerce_types: opts.coerce_types,
            mapper: None,
            catalog: OnceCell::new(),
        }
    }

    // ─── Row Pipeline ────────────────────────────────────────────────

    fn catalog(&self) -> Option<&TypeCatalog> {
        self.catalog
            .get_or_init(|| {
                let catalog = self.driver.field_metadata().map(TypeCatalog::new);
                debug!(
                    sql = %self.sql,
                    columns = catalog.as_ref().map_or(0, |c| c.fields().len()),
                    "built type catalog"
                );
                catalog
            })
            .as_ref()
    }

    fn coerce(&self, row: &mut Row) {
        if !self.coerce_types || self.driver.natively_typed() {
            return;
        }
        if let Some(catalog) = self.catalog() {
            coerce_row(row, catalog);
        }
    }

    /// Next coerced row at the driver position, without the mapper.
    pub(crate) fn next_coerced(&mut self) -> Result<Option<Row>> {
        let row = self
            .driver
            .next_row()
            .map_err(|e| Error::fetch(&self.sql, e))?;
        Ok(row.map(|mut row| {
            self.coerce(&mut row);
            row
        }))
    }

    fn fetch_raw(&mut self, reset: bool) -> Result<Option<Row>> {
        if reset {
            self.rewind_driver()?;
        }
        self.next_coerced()
    }

    fn try_seek(&mut self, row: usize) -> Result<bool> {
        if row >= self.num_rows {
            return Ok(false);
        }
        self.driver
            .seek(row)
            .map_err(|e| Error::fetch(&self.sql, e))
    }

    /// Seek to a row that must be reachable.
    ///
    /// `Ok(false)` only when `row` is out of range or the driver is released;
    /// an in-range row the driver cannot reach is `Error::NotSeekable`.
    pub(crate) fn seek_required(&mut self, row: usize) -> Result<bool> {
        if row >= self.num_rows || self.driver.is_released() {
            return Ok(false);
        }
        if self.try_seek(row)? {
            Ok(true)
        } else {
            Err(Error::fetch(&self.sql, Error::NotSeekable(row)))
        }
    }

    fn rewind_driver(&mut self) -> Result<()> {
        self.seek_required(0).map(|_| ())
    }

    fn apply_mapper(&self, row: Row) -> Row {
        match &self.mapper {
            Some(mapper) => mapper(row),
            None => row,
        }
    }

    /// Coerced row `row` (or the next one) without the mapper.
    pub(crate) fn fetch_unmapped(&mut self, row: Option<usize>) -> Result<Option<Row>> {
        if self.is_empty() {
            return Ok(None);
        }
        if let Some(row) = row
            && !self.try_seek(row)?
        {
            return Ok(None);
        }
        self.next_coerced()
    }

    // ─── Positional Surface ──────────────────────────────────────────

    pub fn len(&self) -> usize {
        self.num_rows
    }

    pub fn num_rows(&self) -> usize {
        self.num_rows
    }

    pub fn is_empty(&self) -> bool {
        self.num_rows == 0
    }

    /// Logical position, in `0..=len()`
    pub fn key(&self) -> usize {
        self.current_row
    }

    pub fn valid(&self) -> bool {
        self.current_row < self.num_rows
    }

    /// Advance the logical position by one, stopping at `len()`.
    pub fn next(&mut self) {
        if self.current_row < self.num_rows {
            self.current_row += 1;
        }
    }

    /// Move the driver so the next fetch yields row `row`. The logical position is untouched.
    ///
    /// A driver failure while moving is logged and reported as `false`; the
    /// fetch operations surface it as `Error::Fetch` instead.
    pub fn seek(&mut self, row: usize) -> bool {
        match self.try_seek(row) {
            Ok(moved) => moved,
            Err(e) => {
                warn!(row, error = %e, "seek failed");
                false
            }
        }
    }

    /// Seek and, on success, move the logical position to `row`.
    pub fn rewind(&mut self, row: usize) -> bool {
        if self.seek(row) {
            self.current_row = row;
            true
        } else {
            false
        }
    }

    /// The row at the logical position.
    pub fn current(&mut self) -> Result<Option<Row>> {
        self.fetch_callable(Some(self.current_row))
    }

    /// Row `row` (or the next one at the driver position), with the mapper applied.
    pub fn fetch_callable(&mut self, row: Option<usize>) -> Result<Option<Row>> {
        Ok(self
            .fetch_unmapped(row)?
            .map(|row| self.apply_mapper(row)))
    }

    /// One column of row `row`. `None` when the column is absent or NULL.
    pub fn fetch_callable_column(
        &mut self,
        row: Option<usize>,
        column: &str,
    ) -> Result<Option<Value>> {
        Ok(self
            .fetch_unmapped(row)?
            .and_then(|mut row| row.swap_remove(column))
            .filter(|value| !value.is_null()))
    }

    /// Bounds-checked random access.
    pub fn get(&mut self, index: usize) -> Result<Row> {
        if !self.contains(index) || !self.seek_required(index)? {
            return Err(Error::OutOfBounds(index));
        }
        self.fetch_callable(None)?
            .ok_or(Error::OutOfBounds(index))
    }

    pub fn contains(&self, index: usize) -> bool {
        index < self.num_rows
    }

    /// Iterate `(index, row)` pairs from row 0, moving the logical position along.
    pub fn iter(&mut self) -> Iter<'_> {
        Iter {
            rs: self,
            started: false,
            done: false,
        }
    }

    // ─── Representation Fetches ──────────────────────────────────────

    /// Next row in the default representation.
    pub fn fetch(&mut self, reset: bool) -> Result<Fetched<'_>> {
        Ok(match self.default_representation {
            Representation::Structured => Fetched::Object(self.fetch_object(reset)?),
            Representation::Mapping => Fetched::Array(self.fetch_array(reset)?),
            Representation::ManagedMapping => Fetched::Arrayy(self.fetch_arrayy(reset)?),
            Representation::LazySequence => Fetched::Yield(self.fetch_yield(Target::Default, reset)),
        })
    }

    /// Next row as a plain mapping; empty past the end.
    pub fn fetch_array(&mut self, reset: bool) -> Result<Row> {
        Ok(self.fetch_raw(reset)?.unwrap_or_default())
    }

    /// Next row as a [`Record`]; empty past the end.
    pub fn fetch_arrayy(&mut self, reset: bool) -> Result<Record> {
        Ok(self.fetch_raw(reset)?.map(Record::from).unwrap_or_default())
    }

    pub fn fetch_object(&mut self, reset: bool) -> Result<Option<Object>> {
        self.fetch_object_as(Target::Default, reset)
    }

    /// Next row written into a fresh instance made by `target`.
    pub fn fetch_object_as<T>(&mut self, target: Target<T>, reset: bool) -> Result<Option<T>>
    where
        T: SetField + Default + Clone,
    {
        self.fetch_raw(reset)?
            .map(|row| target.build(row))
            .transpose()
    }

    /// Lazily yield at most one structured row.
    pub fn fetch_yield<T>(&mut self, target: Target<T>, reset: bool) -> Yield<'_, T> {
        Yield {
            rs: self,
            target,
            mode: YieldMode::One { reset },
        }
    }

    /// Every row in the default representation.
    pub fn fetch_all(&mut self) -> Result<FetchedAll<'_>> {
        Ok(match self.default_representation {
            Representation::Structured => FetchedAll::Objects(self.fetch_all_object()?),
            Representation::Mapping => FetchedAll::Arrays(self.fetch_all_array()?),
            Representation::ManagedMapping => FetchedAll::Arrayy(self.fetch_all_arrayy()?),
            Representation::LazySequence => {
                FetchedAll::Yield(self.fetch_all_yield(Target::Default))
            }
        })
    }

    fn collect_all<T>(&mut self, mut f: impl FnMut(Row) -> Result<T>) -> Result<Vec<T>> {
        let mut out = Vec::with_capacity(self.num_rows);
        if self.is_empty() {
            return Ok(out);
        }
        self.rewind_driver()?;
        while let Some(row) = self.next_coerced()? {
            out.push(f(row)?);
        }
        Ok(out)
    }

    /// Every row as a plain mapping, from row 0. Leaves the driver exhausted.
    #[tracing::instrument(skip_all, fields(sql = %self.sql, rows = self.num_rows))]
    pub fn fetch_all_array(&mut self) -> Result<Vec<Row>> {
        self.collect_all(Ok)
    }

    #[tracing::instrument(skip_all, fields(sql = %self.sql, rows = self.num_rows))]
    pub fn fetch_all_arrayy(&mut self) -> Result<RecordList> {
        self.collect_all(|row| Ok(Record::from(row)))
            .map(RecordList::from)
    }

    pub fn fetch_all_object(&mut self) -> Result<Vec<Object>> {
        self.fetch_all_object_as(Target::Default)
    }

    #[tracing::instrument(skip_all, fields(sql = %self.sql, rows = self.num_rows))]
    pub fn fetch_all_object_as<T>(&mut self, target: Target<T>) -> Result<Vec<T>>
    where
        T: SetField + Default + Clone,
    {
        self.collect_all(|row| target.build(row))
    }

    /// Lazily yield structured rows from the current driver position to the end.
    ///
    /// Does not reset: call [`reset`](Self::reset) first for a full pass.
    pub fn fetch_all_yield<T>(&mut self, target: Target<T>) -> Yield<'_, T> {
        Yield {
            rs: self,
            target,
            mode: YieldMode::All,
        }
    }

    // ─── Housekeeping ────────────────────────────────────────────────

    /// Seek the driver back to row 0. The logical position is untouched.
    ///
    /// A result that can no longer rewind is left where it is and logged;
    /// the next `fetch_*(true)` or `fetch_all*` reports it as an error.
    pub fn reset(&mut self) -> &mut Self {
        if let Err(e) = self.rewind_driver() {
            warn!(sql = %self.sql, error = %e, "reset failed");
        }
        self
    }

    /// Release the driver handle. Safe to call more than once.
    pub fn release(&mut self) {
        if self.driver.is_released() {
            return;
        }
        debug!(sql = %self.sql, "releasing result set");
        self.driver.release();
    }

    pub fn is_released(&self) -> bool {
        self.driver.is_released()
    }

    pub fn default_representation(&self) -> Representation {
        self.default_representation
    }

    pub fn set_default_representation(&mut self, representation: Representation) -> &mut Self {
        self.default_representation = representation;
        self
    }

    /// Install a transform for rows read through the positional surface.
    pub fn map(&mut self, mapper: impl Fn(Row) -> Row + Send + 'static) -> &mut Self {
        self.mapper = Some(Box::new(mapper));
        self
    }

    pub fn clear_mapper(&mut self) -> &mut Self {
        self.mapper = None;
        self
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }

    /// Column metadata; empty when the driver cannot describe its columns
    /// or has been released.
    pub fn fetch_fields(&self) -> Vec<FieldInfo> {
        if self.is_released() {
            return Vec::new();
        }
        self.catalog()
            .map(|c| c.fields().to_vec())
            .unwrap_or_default()
    }

    pub fn fetch_fields_as_maps(&self) -> Vec<Row> {
        if self.is_released() {
            return Vec::new();
        }
        self.catalog()
            .map(|c| c.fields().iter().map(FieldInfo::to_row).collect())
            .unwrap_or_default()
    }

    pub fn driver(&self) -> &dyn Driver {
        self.driver.as_ref()
    }
}

impl Drop for ResultSet {
    fn drop(&mut self) {
        self.release();
    }
}

impl fmt::Display for ResultSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.num_rows)
    }
}

impl fmt::Debug for ResultSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResultSet")
            .field("sql", &self.sql)
            .field("num_rows", &self.num_rows)
            .field("current_row", &self.current_row)
            .field("default_representation", &self.default_representation)
            .field("released", &self.driver.is_released())
            .finish_non_exhaustive()
    }
}

/// Output of [`ResultSet::fetch`]
#[derive(Debug)]
pub enum Fetched<'a> {
    Object(Option<Object>),
    Array(Row),
    Arrayy(Record),
    Yield(Yield<'a, Object>),
}

/// Output of [`ResultSet::fetch_all`]
#[derive(Debug)]
pub enum FetchedAll<'a> {
    Objects(Vec<Object>),
    Arrays(Vec<Row>),
    Arrayy(RecordList),
    Yield(Yield<'a, Object>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum YieldMode {
    One { reset: bool },
    All,
    Done,
}

/// A lazy, single-pass sequence of structured rows
pub struct Yield<'a, T> {
    rs: &'a mut ResultSet,
    target: Target<T>,
    mode: YieldMode,
}

impl<T: SetField + Default + Clone> Iterator for Yield<'_, T> {
    type Item = Result<T>;

    fn next(&mut self) -> Option<Self::Item> {
        let fetched = match self.mode {
            YieldMode::Done => return None,
            YieldMode::One { reset } => {
                self.mode = YieldMode::Done;
                self.rs.fetch_raw(reset)
            }
            YieldMode::All => self.rs.fetch_raw(false),
        };
        match fetched {
            Ok(Some(row)) => Some(self.target.build(row)),
            Ok(None) => {
                self.mode = YieldMode::Done;
                None
            }
            Err(e) => {
                self.mode = YieldMode::Done;
                Some(Err(e))
            }
        }
    }
}

impl<T> fmt::Debug for Yield<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Yield")
            .field("sql", &self.rs.sql)
            .field("mode", &self.mode)
            .finish_non_exhaustive()
    }
}

/// Iterator over `(index, row)` returned by [`ResultSet::iter`]
pub struct Iter<'a> {
    rs: &'a mut ResultSet,
    started: bool,
    done: bool,
}

impl Iterator for Iter<'_> {
    type Item = Result<(usize, Row)>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        if !self.started {
            self.started = true;
            match self.rs.seek_required(0) {
                Ok(true) => self.rs.current_row = 0,
                Ok(false) => {
                    self.done = true;
                    return None;
                }
                Err(e) => {
                    self.done = true;
                    return Some(Err(e));
                }
            }
        }
        if !self.rs.valid() {
            self.done = true;
            return None;
        }
        let key = self.rs.key();
        match self.rs.current() {
            Ok(Some(row)) => {
                self.rs.next();
                Some(Ok((key, row)))
            }
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}
