use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::errors::{ScanError, ScanResult};
use crate::results::ScanMatch;

/// Appends results to a destination file, one `<password> <score>` per line.
///
/// The file is created if missing and never truncated, so repeated scans into the same
/// destination accumulate. Buffered output is flushed by [`ResultSink::finish`], or on
/// drop if the sink is abandoned early.
#[derive(Debug)]
pub struct ResultSink {
    writer: BufWriter<File>,
    path: PathBuf,
    lines_written: usize,
}

impl ResultSink {
    /// Opens `path` for appending, creating it if needed
    pub fn open(path: &Path) -> ScanResult<Self> {
        let file = OpenOptions::new()
            .append(true)
            .create(true)
            .open(path)
            .map_err(|e| ScanError::from_open(e, path))?;

        Ok(Self {
            writer: BufWriter::new(file),
            path: path.to_path_buf(),
            lines_written: 0,
        })
    }

    /// Writes a single result line, with the password bytes exactly as read
    pub fn write_match(&mut self, result: &ScanMatch) -> ScanResult<()> {
        // Build the whole line first so it reaches the writer in one piece
        let mut line = Vec::with_capacity(result.password.len() + 24);
        line.extend_from_slice(&result.password);
        writeln!(line, " {}", result.score)?;
        self.writer.write_all(&line)?;
        self.lines_written += 1;
        Ok(())
    }

    /// Writes every result, in the order given
    pub fn write_all(&mut self, results: &[ScanMatch]) -> ScanResult<()> {
        for result in results {
            self.write_match(result)?;
        }
        Ok(())
    }

    /// Flushes and closes the destination, returning the number of lines written
    pub fn finish(mut self) -> ScanResult<usize> {
        self.writer.flush()?;
        debug!(
            "Wrote {} results to {}",
            self.lines_written,
            self.path.display()
        );
        Ok(self.lines_written)
    }
}

/// Appends `results` to the file at `path`
pub fn write_results(path: &Path, results: &[ScanMatch]) -> ScanResult<usize> {
    let mut sink = ResultSink::open(path)?;
    sink.write_all(results)?;
    sink.finish()
}
