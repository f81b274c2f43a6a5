//! Structured-record output: the plain [`Object`] and user types populated through [`SetField`].

use std::fmt;
use std::ops::Deref;

use serde::Serialize;

use crate::error::Result;
use crate::row::Row;
use crate::value::Value;

/// A type a row can be written into, one column at a time.
///
/// Implement it by hand or with `#[derive(SetField)]`.
pub trait SetField {
    fn set_field(&mut self, name: &str, value: Value) -> Result<()>;

    /// Assign every column of `row`, in column order.
    fn populate(&mut self, row: Row) -> Result<()> {
        for (name, value) in row {
            self.set_field(&name, value)?;
        }
        Ok(())
    }
}

/// The default structured record: a bag of named values.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(transparent)]
pub struct Object {
    fields: Row,
}

impl Object {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn into_row(self) -> Row {
        self.fields
    }
}

impl SetField for Object {
    fn set_field(&mut self, name: &str, value: Value) -> Result<()> {
        self.fields.insert(name.to_string(), value);
        Ok(())
    }

    fn populate(&mut self, row: Row) -> Result<()> {
        if self.fields.is_empty() {
            self.fields = row;
        } else {
            self.fields.extend(row);
        }
        Ok(())
    }
}

impl Deref for Object {
    type Target = Row;

    fn deref(&self) -> &Self::Target {
        &self.fields
    }
}

impl From<Row> for Object {
    fn from(fields: Row) -> Self {
        Self { fields }
    }
}

/// How a structured record is created before a row is written into it
pub enum Target<T> {
    /// `T::default()`
    Default,
    /// A clone of the given instance
    Template(T),
    /// A constructor, typically a closure capturing constructor arguments
    Factory(Box<dyn Fn() -> T>),
}

impl<T> Target<T> {
    pub fn factory(f: impl Fn() -> T + 'static) -> Self {
        Target::Factory(Box::new(f))
    }
}

impl<T: SetField + Default + Clone> Target<T> {
    pub fn instantiate(&self) -> T {
        match self {
            Target::Default => T::default(),
            Target::Template(template) => template.clone(),
            Target::Factory(factory) => factory(),
        }
    }

    /// A fresh instance populated from `row`.
    pub fn build(&self, row: Row) -> Result<T> {
        let mut instance = self.instantiate();
        instance.populate(row)?;
        Ok(instance)
    }
}

impl<T> Default for Target<T> {
    fn default() -> Self {
        Target::Default
    }
}

impl<T: fmt::Debug> fmt::Debug for Target<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::Default => f.write_str("Default"),
            Target::Template(t) => f.debug_tuple("Template").field(t).finish(),
            Target::Factory(_) => f.write_str("Factory(..)"),
        }
    }
}
