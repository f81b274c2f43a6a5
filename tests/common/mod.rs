#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use zero_cursor::col::FieldInfo;
use zero_cursor::constant::{BINARY_CHARSET, ColumnType};
use zero_cursor::error::{Error, Result};
use zero_cursor::{ColumnMeta, Row, RowFormat, Statement, StoredResult, Value};

/// Route tracing output through the test harness. Safe to call from every test.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();
}

pub fn row<const N: usize>(pairs: [(&str, Value); N]) -> Row {
    pairs
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect()
}

/// `users(id INT, name VARCHAR, score DOUBLE, active BIT)` with three rows, text protocol.
pub fn users_fields() -> Vec<FieldInfo> {
    vec![
        FieldInfo::new("id", Some(ColumnType::MYSQL_TYPE_LONG)),
        FieldInfo::new("name", Some(ColumnType::MYSQL_TYPE_VAR_STRING)),
        FieldInfo::new("score", Some(ColumnType::MYSQL_TYPE_DOUBLE)),
        FieldInfo::new("active", Some(ColumnType::MYSQL_TYPE_BIT)).with_charset(BINARY_CHARSET),
    ]
}

pub fn users_text() -> StoredResult {
    let rows = vec![
        vec![
            Value::from("1"),
            Value::from("a"),
            Value::from("1.5"),
            Value::Bytes(vec![1]),
        ],
        vec![
            Value::from("2"),
            Value::from("b"),
            Value::Null,
            Value::Bytes(vec![0]),
        ],
        vec![
            Value::from("3"),
            Value::from("c"),
            Value::from("-2"),
            Value::Bytes(vec![1]),
        ],
    ];
    StoredResult::build(RowFormat::Text, &users_fields(), &rows).unwrap()
}

/// Same data as [`users_text`], binary protocol.
pub fn users_binary() -> StoredResult {
    let rows = vec![
        vec![
            Value::Int(1),
            Value::from("a"),
            Value::Float(1.5),
            Value::Bytes(vec![1]),
        ],
        vec![
            Value::Int(2),
            Value::from("b"),
            Value::Null,
            Value::Bytes(vec![0]),
        ],
        vec![
            Value::Int(3),
            Value::from("c"),
            Value::Float(-2.0),
            Value::Bytes(vec![1]),
        ],
    ];
    StoredResult::build(RowFormat::Binary, &users_fields(), &rows).unwrap()
}

/// The coerced rows both `users_*` results decode to.
pub fn users_rows() -> Vec<Row> {
    vec![
        row([
            ("id", Value::Int(1)),
            ("name", Value::from("a")),
            ("score", Value::Float(1.5)),
            ("active", Value::Bool(true)),
        ]),
        row([
            ("id", Value::Int(2)),
            ("name", Value::from("b")),
            ("score", Value::Null),
            ("active", Value::Bool(false)),
        ]),
        row([
            ("id", Value::Int(3)),
            ("name", Value::from("c")),
            ("score", Value::Float(-2.0)),
            ("active", Value::Bool(true)),
        ]),
    ]
}

pub fn empty_text() -> StoredResult {
    StoredResult::build(RowFormat::Text, &users_fields(), &[]).unwrap()
}

/// Text-protocol result with `columns` as VAR_STRING/LONG columns and raw string cells.
pub fn text_result(fields: Vec<FieldInfo>, rows: Vec<Vec<Value>>) -> StoredResult {
    StoredResult::build(RowFormat::Text, &fields, &rows).unwrap()
}

/// Observable state of a [`MemoryStatement`] after it was moved into a cursor
#[derive(Debug, Default)]
pub struct StatementLog {
    pub fetches: usize,
    pub closed: usize,
}

/// A forward-only in-memory statement
pub struct MemoryStatement {
    columns: Vec<ColumnMeta>,
    rows: Vec<Row>,
    next: usize,
    fail_at: Option<usize>,
    undescribed: Vec<usize>,
    log: Arc<Mutex<StatementLog>>,
}

impl MemoryStatement {
    pub fn new(columns: Vec<ColumnMeta>, rows: Vec<Row>) -> Self {
        Self {
            columns,
            rows,
            next: 0,
            fail_at: None,
            undescribed: Vec::new(),
            log: Arc::default(),
        }
    }

    /// Fail with a driver error when row `idx` is fetched.
    pub fn fail_at(mut self, idx: usize) -> Self {
        self.fail_at = Some(idx);
        self
    }

    /// Report no metadata for column `idx`.
    pub fn undescribed(mut self, idx: usize) -> Self {
        self.undescribed.push(idx);
        self
    }

    pub fn log(&self) -> Arc<Mutex<StatementLog>> {
        Arc::clone(&self.log)
    }

    pub fn boxed(self) -> Box<dyn Statement> {
        Box::new(self)
    }
}

impl Statement for MemoryStatement {
    fn row_count(&self) -> usize {
        self.rows.len()
    }

    fn column_count(&self) -> usize {
        self.columns.len()
    }

    fn column_meta(&self, index: usize) -> Option<ColumnMeta> {
        if self.undescribed.contains(&index) {
            return None;
        }
        self.columns.get(index).cloned()
    }

    fn fetch_assoc(&mut self) -> Result<Option<Row>> {
        self.log.lock().unwrap().fetches += 1;
        if self.fail_at == Some(self.next) {
            return Err(Error::Driver(format!("lost connection at row {}", self.next)));
        }
        let row = self.rows.get(self.next).cloned();
        if row.is_some() {
            self.next += 1;
        }
        Ok(row)
    }

    fn close_cursor(&mut self) {
        self.log.lock().unwrap().closed += 1;
    }
}

/// Statement over `(id LONG, name VAR_STRING, price NEWDECIMAL, flag BIT)` with raw string cells.
pub fn products_statement() -> MemoryStatement {
    let columns = vec![
        ColumnMeta::new("id", Some("LONG")),
        ColumnMeta::new("name", Some("VAR_STRING")),
        ColumnMeta::new("price", Some("NEWDECIMAL")),
        ColumnMeta::new("flag", Some("BIT")),
    ];
    let rows = vec![
        row([
            ("id", Value::from("10")),
            ("name", Value::from("pen")),
            ("price", Value::from("1.25")),
            ("flag", Value::from("1")),
        ]),
        row([
            ("id", Value::from("11")),
            ("name", Value::from("ink")),
            ("price", Value::from("7")),
            ("flag", Value::from("0")),
        ]),
        row([
            ("id", Value::from("12")),
            ("name", Value::from("pad")),
            ("price", Value::Null),
            ("flag", Value::from("")),
        ]),
    ];
    MemoryStatement::new(columns, rows)
}
