use std::fs::File;
use std::io::{BufRead, BufReader};
use std::mem;
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

use crate::config::EncodingMode;
use crate::errors::{ScanError, ScanResult};
use crate::metrics::ScanMetrics;

const BUFFER_CAPACITY: usize = 65536;
const LINE_CAPACITY: usize = 64;

/// Lazily reads a corpus one password per line.
///
/// Lines are yielded as raw bytes without their terminator; a `\r` before the `\n` is
/// dropped too. Bytes are never rewritten, so two distinct lines stay distinct even when
/// neither is valid UTF-8. The file is opened up front, so a missing corpus fails before
/// anything else happens. Once a read error has been yielded the source is exhausted.
#[derive(Debug)]
pub struct LineSource {
    reader: BufReader<File>,
    path: PathBuf,
    encoding_mode: EncodingMode,
    metrics: ScanMetrics,
    buf: Vec<u8>,
    line_number: u64,
    done: bool,
}

impl LineSource {
    /// Opens the corpus at `path` for reading
    pub fn open(path: &Path, encoding_mode: EncodingMode) -> ScanResult<Self> {
        let file = File::open(path).map_err(|e| ScanError::from_open(e, path))?;
        debug!("Opened corpus: {}", path.display());

        Ok(Self {
            reader: BufReader::with_capacity(BUFFER_CAPACITY, file),
            path: path.to_path_buf(),
            encoding_mode,
            metrics: ScanMetrics::new(),
            buf: Vec::with_capacity(LINE_CAPACITY),
            line_number: 0,
            done: false,
        })
    }

    /// Reports lossy lines into shared scan metrics
    pub fn with_metrics(mut self, metrics: ScanMetrics) -> Self {
        self.metrics = metrics;
        self
    }

    /// Number of lines yielded so far
    pub fn line_number(&self) -> u64 {
        self.line_number
    }

    fn check_encoding(&self, bytes: Vec<u8>) -> ScanResult<Vec<u8>> {
        match String::from_utf8(bytes) {
            Ok(line) => Ok(line.into_bytes()),
            Err(e) => match self.encoding_mode {
                EncodingMode::FailFast => {
                    Err(ScanError::encoding_error(&self.path, self.line_number, e))
                }
                EncodingMode::Lossy => {
                    trace!(
                        "Invalid UTF-8 at line {} of {} will be scored lossily",
                        self.line_number,
                        self.path.display()
                    );
                    self.metrics.record_lossy_line();
                    Ok(e.into_bytes())
                }
            },
        }
    }
}

impl Iterator for LineSource {
    type Item = ScanResult<Vec<u8>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        self.buf.clear();
        match self.reader.read_until(b'\n', &mut self.buf) {
            Ok(0) => {
                self.done = true;
                None
            }
            Ok(_) => {
                self.line_number += 1;
                strip_line_ending(&mut self.buf);
                let bytes = mem::replace(&mut self.buf, Vec::with_capacity(LINE_CAPACITY));
                let line = self.check_encoding(bytes);
                if line.is_err() {
                    self.done = true;
                }
                Some(line)
            }
            Err(e) => {
                self.done = true;
                Some(Err(ScanError::read_error(
                    &self.path,
                    self.line_number + 1,
                    e,
                )))
            }
        }
    }
}

fn strip_line_ending(buf: &mut Vec<u8>) {
    if buf.last() == Some(&b'\n') {
        buf.pop();
        if buf.last() == Some(&b'\r') {
            buf.pop();
        }
    } else if buf.last() == Some(&b'\r') {
        // Unterminated final line
        buf.pop();
    }
}
