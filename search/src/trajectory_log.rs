//! Per-trajectory CSV log of `(energy, size)` pairs.
//!
//! The file is opened in append mode and a header line is written every time
//! it is opened, so repeated runs against the same path leave several
//! sections in one file. Readers skip repeated headers.

use std::fs::OpenOptions;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::SearchError;

pub const LOG_HEADER: &str = "energy,size";

/// One logged move proposal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LogRecord {
    /// Energy of the state the move started from.
    pub energy: f64,
    /// Core size before the move.
    pub size: usize,
}

/// Line-oriented log writer. Must be [`closed`](TrajectoryLog::close) by its
/// owner to guarantee the tail is flushed.
pub struct TrajectoryLog {
    out: Box<dyn Write + Send>,
    records: u64,
}

impl std::fmt::Debug for TrajectoryLog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrajectoryLog")
            .field("records", &self.records)
            .finish_non_exhaustive()
    }
}

fn log_error(err: &std::io::Error) -> SearchError {
    SearchError::Log {
        detail: err.to_string(),
    }
}

impl TrajectoryLog {
    /// Open `path` for appending and write the header.
    ///
    /// # Errors
    ///
    /// [`SearchError::Log`] if the file cannot be opened or written.
    pub fn create(path: &Path) -> Result<Self, SearchError> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| SearchError::Log {
                detail: format!("{}: {e}", path.display()),
            })?;
        Self::from_writer(BufWriter::new(file))
    }

    /// Log into any writer (tests use an in-memory buffer).
    ///
    /// # Errors
    ///
    /// [`SearchError::Log`] if the header cannot be written.
    pub fn from_writer(out: impl Write + Send + 'static) -> Result<Self, SearchError> {
        let mut out: Box<dyn Write + Send> = Box::new(out);
        writeln!(out, "{LOG_HEADER}").map_err(|e| log_error(&e))?;
        Ok(Self { out, records: 0 })
    }

    /// # Errors
    ///
    /// [`SearchError::Log`] on write failure.
    pub fn append(&mut self, energy: f64, size: usize) -> Result<(), SearchError> {
        writeln!(self.out, "{energy},{size}").map_err(|e| log_error(&e))?;
        self.records += 1;
        Ok(())
    }

    #[must_use]
    pub fn records(&self) -> u64 {
        self.records
    }

    /// Flush and release the writer, returning the number of records written.
    ///
    /// # Errors
    ///
    /// [`SearchError::Log`] if the flush fails.
    pub fn close(mut self) -> Result<u64, SearchError> {
        self.out.flush().map_err(|e| log_error(&e))?;
        Ok(self.records)
    }
}

/// Read every record of a log file.
///
/// # Errors
///
/// [`SearchError::Log`] if the file cannot be read or a line is malformed.
pub fn read_trajectory_log(path: &Path) -> Result<Vec<LogRecord>, SearchError> {
    let text = std::fs::read_to_string(path).map_err(|e| SearchError::Log {
        detail: format!("{}: {e}", path.display()),
    })?;
    text.lines()
        .enumerate()
        .filter(|(_, line)| *line != LOG_HEADER && !line.trim().is_empty())
        .map(|(index, line)| {
            parse_line(line).ok_or_else(|| SearchError::Log {
                detail: format!("{}:{}: malformed record {line:?}", path.display(), index + 1),
            })
        })
        .collect()
}

fn parse_line(line: &str) -> Option<LogRecord> {
    let (energy, size) = line.split_once(',')?;
    Some(LogRecord {
        energy: energy.trim().parse().ok()?,
        size: size.trim().parse().ok()?,
    })
}
