//! Tests for the SetField derive macro.
//!
//! Run with: cargo test --features derive --test derive

#![allow(dead_code)]

mod common;

use std::cell::Cell;
use std::rc::Rc;

use common::*;
use pretty_assertions::assert_eq;
use zero_cursor::col::FieldInfo;
use zero_cursor::constant::ColumnType;
use zero_cursor::r#macro::SetField;
use zero_cursor::{Error, ResultSet, Target, Value};

// ============================================================================
// Struct definitions
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, SetField)]
struct User {
    id: i64,
    name: String,
    score: Option<f64>,
    active: bool,
}

#[derive(Debug, Clone, Default, PartialEq, SetField)]
struct UserId {
    id: u32,
}

#[derive(Debug, Clone, Default, PartialEq, SetField)]
#[set_field(strict)]
struct StrictUser {
    id: i64,
    name: String,
}

#[derive(Debug, Clone, Default, PartialEq, SetField)]
#[set_field(strict)]
struct StrictUserWithEmail {
    id: i64,
    name: String,
    score: Option<f64>,
    active: bool,
    email: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, SetField)]
struct Tagged {
    id: i64,
    tag: String,
}

#[derive(Debug, Clone, Default, PartialEq, SetField)]
struct Keyword {
    r#type: String,
    r#match: i32,
}

#[derive(Debug, Clone, Default, PartialEq, SetField)]
struct WrongType {
    name: i64,
}

fn users() -> ResultSet {
    ResultSet::new("SELECT id, name, score, active FROM users", users_text()).unwrap()
}

// ============================================================================
// Tests
// ============================================================================

#[test]
fn derive_all_rows() {
    let mut rs = users();
    let users: Vec<User> = rs.fetch_all_object_as(Target::Default).unwrap();
    assert_eq!(
        users,
        vec![
            User {
                id: 1,
                name: "a".to_string(),
                score: Some(1.5),
                active: true,
            },
            User {
                id: 2,
                name: "b".to_string(),
                score: None,
                active: false,
            },
            User {
                id: 3,
                name: "c".to_string(),
                score: Some(-2.0),
                active: true,
            },
        ]
    );
}

#[test]
fn derive_from_binary_rows() {
    let mut rs = ResultSet::new("SELECT * FROM users", users_binary()).unwrap();
    let user: Option<User> = rs.fetch_object_as(Target::Default, false).unwrap();
    assert_eq!(user.map(|u| u.active), Some(true));
}

#[test]
fn non_strict_ignores_extra_columns() {
    let mut rs = users();
    let ids: Vec<UserId> = rs.fetch_all_object_as(Target::Default).unwrap();
    assert_eq!(ids, vec![UserId { id: 1 }, UserId { id: 2 }, UserId { id: 3 }]);
}

#[test]
fn strict_rejects_unknown_column() {
    let mut rs = users();
    let err = rs
        .fetch_object_as(Target::<StrictUser>::Default, false)
        .unwrap_err();
    assert!(matches!(err, Error::UnknownColumn(ref c) if c == "score"));
}

#[test]
fn strict_rejects_missing_column() {
    let mut rs = users();
    let err = rs
        .fetch_object_as(Target::<StrictUserWithEmail>::Default, false)
        .unwrap_err();
    assert!(matches!(err, Error::MissingColumn("email")));
}

#[test]
fn template_fields_survive() {
    let fields = vec![FieldInfo::new("id", Some(ColumnType::MYSQL_TYPE_LONG))];
    let rows = vec![vec![Value::from("7")], vec![Value::from("8")]];
    let mut rs = ResultSet::new("SELECT id FROM t", text_result(fields, rows)).unwrap();

    let template = Tagged {
        id: 0,
        tag: "import".to_string(),
    };
    let tagged = rs
        .fetch_all_object_as(Target::Template(template.clone()))
        .unwrap();
    assert_eq!(
        tagged,
        vec![
            Tagged {
                id: 7,
                tag: "import".to_string(),
            },
            Tagged {
                id: 8,
                tag: "import".to_string(),
            },
        ]
    );
    // the template itself is never written to
    assert_eq!(template.id, 0);
}

#[test]
fn factory_builds_one_instance_per_row() {
    let calls = Rc::new(Cell::new(0));
    let counter = Rc::clone(&calls);
    let target = Target::factory(move || {
        counter.set(counter.get() + 1);
        Tagged {
            id: -1,
            tag: format!("batch-{}", counter.get()),
        }
    });

    let mut rs = users();
    let tagged = rs.fetch_all_object_as(target).unwrap();
    assert_eq!(calls.get(), 3);
    assert_eq!(tagged[2].id, 3);
    assert_eq!(tagged[2].tag, "batch-3");
}

#[test]
fn yield_with_derived_target() {
    let mut rs = users();
    let names: Vec<String> = rs
        .fetch_all_yield(Target::<User>::Default)
        .map(|u| u.map(|u| u.name))
        .collect::<Result<_, _>>()
        .unwrap();
    assert_eq!(names, vec!["a", "b", "c"]);

    let single: Vec<User> = rs
        .fetch_yield(Target::Default, true)
        .collect::<Result<_, _>>()
        .unwrap();
    assert_eq!(single.len(), 1);
    assert_eq!(single[0].id, 1);
}

#[test]
fn raw_identifiers_use_plain_column_names() {
    let fields = vec![
        FieldInfo::new("type", Some(ColumnType::MYSQL_TYPE_VAR_STRING)),
        FieldInfo::new("match", Some(ColumnType::MYSQL_TYPE_LONG)),
    ];
    let rows = vec![vec![Value::from("fuzzy"), Value::from("3")]];
    let mut rs = ResultSet::new("SELECT `type`, `match` FROM k", text_result(fields, rows)).unwrap();
    let keyword: Option<Keyword> = rs.fetch_object_as(Target::Default, false).unwrap();
    assert_eq!(
        keyword,
        Some(Keyword {
            r#type: "fuzzy".to_string(),
            r#match: 3,
        })
    );
}

#[test]
fn decode_failure_is_reported() {
    let mut rs = users();
    let err = rs
        .fetch_object_as(Target::<WrongType>::Default, false)
        .unwrap_err();
    assert!(matches!(err, Error::BadUsageError(_)));
}

#[test]
fn past_the_end_is_none() {
    let mut rs = ResultSet::new("SELECT * FROM users", empty_text()).unwrap();
    let user: Option<User> = rs.fetch_object_as(Target::Default, false).unwrap();
    assert_eq!(user, None);
}
