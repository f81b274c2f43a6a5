use crate::driver::native::{RowFormat, StoredResult};
use crate::error::{Error, Result, eyre};

/// Event callbacks for a result set streamed packet by packet
pub trait ResultSetHandler {
    fn resultset_start(&mut self, num_columns: usize) -> Result<()>;
    fn col(&mut self, payload: &[u8]) -> Result<()>;
    fn row(&mut self, payload: &[u8]) -> Result<()>;
    fn resultset_end(&mut self) -> Result<()>;
}

/// A handler that buffers every column and row packet into a [`StoredResult`]
#[derive(Debug)]
pub struct StoreHandler {
    format: RowFormat,
    num_columns: Option<usize>,
    columns: Vec<Vec<u8>>,
    rows: Vec<Vec<u8>>,
    finished: bool,
}

impl StoreHandler {
    pub fn new(format: RowFormat) -> Self {
        Self {
            format,
            num_columns: None,
            columns: Vec::new(),
            rows: Vec::new(),
            finished: false,
        }
    }

    /// The collected result. Fails unless the result set was fully received.
    pub fn into_stored(self) -> Result<StoredResult> {
        if !self.finished {
            return Err(Error::UnexpectedEof);
        }
        Ok(StoredResult::from_packets(
            self.format,
            self.columns,
            self.rows,
        ))
    }
}

impl ResultSetHandler for StoreHandler {
    fn resultset_start(&mut self, num_columns: usize) -> Result<()> {
        if self.num_columns.is_some() {
            return Err(Error::LibraryBug(eyre!(
                "resultset_start called twice on StoreHandler"
            )));
        }
        self.num_columns = Some(num_columns);
        self.columns.reserve_exact(num_columns);
        Ok(())
    }

    fn col(&mut self, payload: &[u8]) -> Result<()> {
        match self.num_columns {
            Some(n) if self.columns.len() < n => {
                self.columns.push(payload.to_vec());
                Ok(())
            }
            _ => Err(Error::InvalidPacket),
        }
    }

    fn row(&mut self, payload: &[u8]) -> Result<()> {
        match self.num_columns {
            Some(n) if self.columns.len() == n && !self.finished => {
                self.rows.push(payload.to_vec());
                Ok(())
            }
            _ => Err(Error::InvalidPacket),
        }
    }

    fn resultset_end(&mut self) -> Result<()> {
        match self.num_columns {
            Some(n) if self.columns.len() == n => {
                self.finished = true;
                Ok(())
            }
            _ => Err(Error::InvalidPacket),
        }
    }
}
