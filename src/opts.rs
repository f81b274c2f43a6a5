use std::fmt;
use std::str::FromStr;

use smart_default::SmartDefault;

use crate::error::Error;

/// Output shape used by [`ResultSet::fetch`](crate::ResultSet::fetch) and
/// [`ResultSet::fetch_all`](crate::ResultSet::fetch_all).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Representation {
    /// A populated structured record ([`Object`](crate::Object) by default)
    #[default]
    Structured,
    /// A plain column-name to value mapping
    Mapping,
    /// A [`Record`](crate::Record)
    ManagedMapping,
    /// A lazy sequence of structured records
    LazySequence,
}

impl FromStr for Representation {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "object" | "structured" => Ok(Self::Structured),
            "array" | "mapping" => Ok(Self::Mapping),
            "arrayy" | "managed_mapping" => Ok(Self::ManagedMapping),
            "yield" | "lazy_sequence" => Ok(Self::LazySequence),
            other => Err(Error::BadConfigError(format!(
                "Unknown representation '{}', expected one of object, array, arrayy, yield",
                other
            ))),
        }
    }
}

impl fmt::Display for Representation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Structured => "object",
            Self::Mapping => "array",
            Self::ManagedMapping => "arrayy",
            Self::LazySequence => "yield",
        })
    }
}

/// Cursor configuration
///
/// ```rs
/// let mut opts = Opts::default();
/// opts.coerce_types = false;
///
/// let opts = Opts::try_from("representation=array&buffer_statement_rows=false")?;
/// ```
#[derive(Debug, Clone, SmartDefault)]
pub struct Opts {
    /// Shape returned by `fetch()` and `fetch_all()`
    pub default_representation: Representation,

    /// Convert text values into booleans, integers and floats by column type
    #[default = true]
    pub coerce_types: bool,

    /// Keep rows pulled from a forward-only statement so it can seek backwards
    #[default = true]
    pub buffer_statement_rows: bool,
}

fn parse_bool(key: &str, value: &str) -> Result<bool, Error> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(Error::BadConfigError(format!(
            "Invalid boolean '{}' for '{}'",
            other, key
        ))),
    }
}

impl TryFrom<&str> for Opts {
    type Error = Error;

    /// Parse `key=value` pairs separated by `&` or `;`.
    fn try_from(s: &str) -> Result<Self, Self::Error> {
        let mut opts = Self::default();
        for pair in s.split(['&', ';']).map(str::trim).filter(|p| !p.is_empty()) {
            let (key, value) = pair.split_once('=').ok_or_else(|| {
                Error::BadConfigError(format!("Expected key=value, got '{}'", pair))
            })?;
            match key.trim() {
                "representation" | "default_representation" => {
                    opts.default_representation = value.parse()?;
                }
                "coerce_types" => opts.coerce_types = parse_bool(key, value)?,
                "buffer_statement_rows" => opts.buffer_statement_rows = parse_bool(key, value)?,
                other => {
                    return Err(Error::BadConfigError(format!(
                        "Unknown option '{}'",
                        other
                    )));
                }
            }
        }
        Ok(opts)
    }
}
