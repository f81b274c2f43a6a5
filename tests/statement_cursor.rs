//! Cursor behaviour over forward-only prepared statements.

mod common;

use common::*;
use pretty_assertions::assert_eq;
use zero_cursor::constant::ColumnType;
use zero_cursor::{ColumnMeta, Error, Opts, ResultSet, Value};

const SQL: &str = "SELECT id, name, price, flag FROM products";

fn unbuffered() -> Opts {
    Opts::try_from("buffer_statement_rows=false").unwrap()
}

#[test]
fn coerces_through_native_type_names() {
    let mut rs = ResultSet::new(SQL, products_statement().boxed()).unwrap();
    assert_eq!(rs.len(), 3);
    let rows = rs.fetch_all_array().unwrap();
    assert_eq!(
        rows[0],
        row([
            ("id", Value::Int(10)),
            ("name", Value::from("pen")),
            ("price", Value::Float(1.25)),
            ("flag", Value::Bool(true)),
        ])
    );
    assert_eq!(rows[1]["price"], Value::Float(7.0));
    assert_eq!(rows[1]["flag"], Value::Bool(false));
    assert_eq!(rows[2]["price"], Value::Null);
    assert_eq!(rows[2]["flag"], Value::Bool(false));
}

#[test]
fn unknown_native_type_is_left_alone() {
    let stmt = MemoryStatement::new(
        vec![
            ColumnMeta::new("geo", Some("POINTCLOUD")),
            ColumnMeta::new("n", None),
        ],
        vec![row([("geo", Value::from("12")), ("n", Value::from("3"))])],
    );
    let mut rs = ResultSet::new("SELECT geo, n FROM shapes", stmt.boxed()).unwrap();
    let fetched = rs.fetch_array(false).unwrap();
    assert_eq!(fetched["geo"], Value::from("12"));
    assert_eq!(fetched["n"], Value::from("3"));
    assert_eq!(rs.fetch_fields()[0].column_type, None);
}

#[test]
fn buffered_statement_seeks_both_ways() {
    let stmt = products_statement();
    let log = stmt.log();
    let mut rs = ResultSet::new(SQL, stmt.boxed()).unwrap();

    assert!(rs.seek(2));
    assert_eq!(rs.fetch_array(false).unwrap()["id"], Value::Int(12));
    assert!(rs.seek(0));
    assert_eq!(rs.fetch_array(false).unwrap()["id"], Value::Int(10));
    assert_eq!(rs.get(1).unwrap()["name"], Value::from("ink"));
    assert_eq!(log.lock().unwrap().fetches, 3);

    // repeated full passes are served from the buffer
    assert_eq!(rs.fetch_all_array().unwrap().len(), 3);
    assert_eq!(rs.fetch_all_array().unwrap().len(), 3);
}

#[test]
fn unbuffered_statement_only_moves_forward() {
    init_tracing();
    let stmt = products_statement();
    let log = stmt.log();
    let mut rs = ResultSet::with_opts(SQL, stmt.boxed(), unbuffered()).unwrap();

    assert!(rs.seek(1));
    assert_eq!(rs.fetch_array(false).unwrap()["id"], Value::Int(11));
    assert!(!rs.seek(0));
    assert_eq!(rs.fetch_array(false).unwrap()["id"], Value::Int(12));
    assert!(rs.fetch_array(false).unwrap().is_empty());
    assert_eq!(log.lock().unwrap().fetches, 4);

    // a second full pass would need to rewind
    assert!(matches!(rs.fetch_all_array(), Err(e) if not_seekable(&e, 0)));
    assert!(matches!(rs.get(0), Err(e) if not_seekable(&e, 0)));
}

fn not_seekable(err: &Error, row: usize) -> bool {
    matches!(err, Error::Fetch { source, .. } if matches!(**source, Error::NotSeekable(r) if r == row))
}

fn driver_failure(err: &Error) -> bool {
    matches!(err, Error::Fetch { source, .. } if matches!(**source, Error::Driver(_)))
}

#[test]
fn unbuffered_partial_read_refuses_bulk_fetch() {
    init_tracing();
    let mut rs =
        ResultSet::with_opts(SQL, products_statement().boxed(), unbuffered()).unwrap();
    assert_eq!(rs.fetch_array(false).unwrap()["id"], Value::Int(10));

    assert!(matches!(rs.fetch_all_array(), Err(e) if not_seekable(&e, 0)));
    assert!(matches!(rs.fetch_all_object(), Err(e) if not_seekable(&e, 0)));
    assert!(matches!(rs.json(), Err(e) if not_seekable(&e, 0)));
    assert!(matches!(rs.fetch_column("id", false), Err(e) if not_seekable(&e, 0)));
    assert!(matches!(rs.fetch_array_pair("id", "name"), Err(e) if not_seekable(&e, 0)));
    assert!(matches!(rs.fetch_pairs("id", "name"), Err(e) if not_seekable(&e, 0)));
    assert!(matches!(rs.fetch_array(true), Err(e) if not_seekable(&e, 0)));
    assert!(matches!(rs.iter().next(), Some(Err(e)) if not_seekable(&e, 0)));

    // forward reads still work
    assert_eq!(rs.fetch_array(false).unwrap()["id"], Value::Int(11));
}

#[test]
fn unbuffered_single_pass_is_complete() {
    let mut rs =
        ResultSet::with_opts(SQL, products_statement().boxed(), unbuffered()).unwrap();
    let ids = rs.fetch_all_column("id", false).unwrap();
    assert_eq!(ids, vec![Value::Int(10), Value::Int(11), Value::Int(12)]);
}

#[test]
fn driver_error_is_wrapped_with_sql() {
    let stmt = products_statement().fail_at(1);
    let mut rs = ResultSet::new(SQL, stmt.boxed()).unwrap();
    assert_eq!(rs.fetch_array(false).unwrap()["id"], Value::Int(10));
    match rs.fetch_array(false) {
        Err(Error::Fetch { sql, source }) => {
            assert_eq!(sql, SQL);
            assert!(matches!(*source, Error::Driver(_)));
        }
        other => panic!("unexpected {:?}", other),
    }
    assert!(matches!(rs.fetch_all_array(), Err(Error::Fetch { .. })));
}

#[test]
fn seek_past_failure_reports_false() {
    init_tracing();
    let stmt = products_statement().fail_at(1);
    let mut rs = ResultSet::new(SQL, stmt.boxed()).unwrap();
    assert!(!rs.seek(2));
    assert!(!rs.rewind(2));
    assert_eq!(rs.key(), 0);
}

#[test]
fn seek_failure_surfaces_through_positional_reads() {
    init_tracing();
    let stmt = products_statement().fail_at(1);
    let mut rs = ResultSet::new(SQL, stmt.boxed()).unwrap();

    assert!(matches!(rs.last(), Err(e) if driver_failure(&e)));
    assert!(matches!(rs.get(2), Err(e) if driver_failure(&e)));
    assert!(matches!(rs.fetch_callable(Some(2)), Err(e) if driver_failure(&e)));
    assert!(matches!(rs.last_column("id"), Err(e) if driver_failure(&e)));
    assert!(matches!(rs.slice(-1, None), Err(e) if driver_failure(&e)));
    assert_eq!(rs.key(), 0);
    // rows before the failure are still readable
    assert_eq!(rs.first().unwrap().unwrap()["id"], Value::Int(10));
}

#[test]
fn undescribed_column_does_not_disable_coercion() {
    let stmt = MemoryStatement::new(
        vec![ColumnMeta::new("id", Some("LONG")), ColumnMeta::new("note", None)],
        vec![row([("id", Value::from("7")), ("note", Value::from("8"))])],
    )
    .undescribed(1);
    let mut rs = ResultSet::new("SELECT id, note FROM t", stmt.boxed()).unwrap();

    let fetched = rs.fetch_array(false).unwrap();
    assert_eq!(fetched["id"], Value::Int(7));
    assert_eq!(fetched["note"], Value::from("8"));

    let fields = rs.fetch_fields();
    assert_eq!(fields.len(), 2);
    assert_eq!(fields[0].column_type, Some(ColumnType::MYSQL_TYPE_LONG));
    assert_eq!(fields[1].column_type, None);
}

#[test]
fn fully_undescribed_statement_passes_rows_through() {
    let stmt = MemoryStatement::new(
        vec![ColumnMeta::new("id", Some("LONG"))],
        vec![row([("id", Value::from("7"))])],
    )
    .undescribed(0);
    let mut rs = ResultSet::new("SELECT id FROM t", stmt.boxed()).unwrap();
    assert_eq!(rs.fetch_array(false).unwrap()["id"], Value::from("7"));
    assert!(rs.fetch_fields().is_empty());
}

#[test]
fn release_closes_cursor_once() {
    init_tracing();
    let stmt = products_statement();
    let log = stmt.log();
    {
        let mut rs = ResultSet::new(SQL, stmt.boxed()).unwrap();
        rs.fetch_array(false).unwrap();
        rs.release();
        rs.release();
        assert!(rs.is_released());
        assert!(rs.fetch_array(false).unwrap().is_empty());
        // the catalog was built before release; it is not reported after
        assert!(rs.fetch_fields().is_empty());
        assert!(rs.fetch_fields_as_maps().is_empty());
    }
    assert_eq!(log.lock().unwrap().closed, 1);
}

#[test]
fn drop_releases() {
    let stmt = products_statement();
    let log = stmt.log();
    drop(ResultSet::new(SQL, stmt.boxed()).unwrap());
    assert_eq!(log.lock().unwrap().closed, 1);
}

#[test]
fn zero_columns_is_unsupported() {
    let stmt = MemoryStatement::new(vec![], vec![]);
    assert!(matches!(
        ResultSet::new("UPDATE t SET a = 1", stmt.boxed()),
        Err(Error::UnsupportedHandle(_))
    ));
}

#[test]
fn metadata_from_column_meta() {
    let mut id = ColumnMeta::new("id", Some("LONGLONG"));
    id.table = "products".to_string();
    id.flags = vec!["not_null".to_string(), "unsigned".to_string()];
    let stmt = MemoryStatement::new(vec![id], vec![row([("id", Value::from("5"))])]);
    let mut rs = ResultSet::new("SELECT id FROM products", stmt.boxed()).unwrap();

    let fields = rs.fetch_fields();
    assert_eq!(fields[0].column_type, Some(ColumnType::MYSQL_TYPE_LONGLONG));
    assert_eq!(fields[0].table, "products");
    assert!(fields[0].is_unsigned());
    assert_eq!(rs.fetch_array(false).unwrap()["id"], Value::Int(5));
}
