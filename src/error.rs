use thiserror::Error;

pub use color_eyre::eyre::eyre;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Unsupported result handle: {0}")]
    UnsupportedHandle(String),

    #[error("Fetch failed for `{sql}`: {source}")]
    Fetch {
        sql: String,
        #[source]
        source: Box<Error>,
    },

    #[error("Undefined offset ({0})")]
    OutOfBounds(usize),

    #[error("Cannot reach row {0}: the result can no longer seek there")]
    NotSeekable(usize),

    #[error("Driver error: {0}")]
    Driver(String),

    #[error("Invalid packet")]
    InvalidPacket,

    #[error("Unexpected end of packet")]
    UnexpectedEof,

    #[error("Bad config error: {0}")]
    BadConfigError(String),

    #[error("Bad usage error: {0}")]
    BadUsageError(String),

    #[error("Unknown column: {0}")]
    UnknownColumn(String),

    #[error("Missing column: {0}")]
    MissingColumn(&'static str),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Library bug: {0}")]
    LibraryBug(color_eyre::Report),
}

impl Error {
    /// Attach the query text to a driver or decoding failure.
    pub fn fetch(sql: &str, source: Error) -> Self {
        match source {
            already @ Error::Fetch { .. } => already,
            source => Error::Fetch {
                sql: sql.to_string(),
                source: Box::new(source),
            },
        }
    }
}

impl From<std::convert::Infallible> for Error {
    fn from(err: std::convert::Infallible) -> Self {
        match err {}
    }
}

pub type Result<T> = std::result::Result<T, Error>;
