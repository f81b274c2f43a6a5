//! Decoding of the MySQL column-definition and row packets a stored result is made of.

pub mod column_definition;
pub mod primitive;
pub mod row;
pub mod value;

pub use column_definition::{parse_column_definition, write_column_definition};
pub use row::{decode_binary_row, decode_text_row, write_binary_row, write_text_row};
pub use value::NullBitmap;
