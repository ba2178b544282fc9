/// Error types for password similarity scans.
///
/// Every failure a scan can hit is fatal to that scan: the corpus cannot be read, the
/// destination cannot be written, or a worker died. Nothing is retried inside the library;
/// callers receive a `ScanError` and decide how to report it.
///
/// ```rust,ignore
/// match passwordsim::scan(&config) {
///     Ok(output) => println!("{} similar passwords found", output.matches.len()),
///     Err(ScanError::FileNotFound(path)) => eprintln!("no such dataset: {}", path.display()),
///     Err(e) => eprintln!("Error: {}", e),
/// }
/// ```
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type for scan operations
pub type ScanResult<T> = Result<T, ScanError>;

/// Errors that can occur while scanning a corpus or writing results
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),
    #[error("Invalid UTF-8 in {path} at line {line}")]
    EncodingError {
        path: PathBuf,
        line: u64,
        source: std::string::FromUtf8Error,
    },
    #[error("Scan worker {0} panicked")]
    WorkerPanicked(usize),
    #[error("Failed to read {path} at line {line}")]
    ReadError {
        path: PathBuf,
        line: u64,
        source: io::Error,
    },
    #[error(transparent)]
    IoError(#[from] io::Error),
}

impl ScanError {
    pub fn file_not_found(path: impl Into<PathBuf>) -> Self {
        Self::FileNotFound(path.into())
    }

    pub fn permission_denied(path: impl Into<PathBuf>) -> Self {
        Self::PermissionDenied(path.into())
    }

    pub fn encoding_error(
        path: impl Into<PathBuf>,
        line: u64,
        source: std::string::FromUtf8Error,
    ) -> Self {
        Self::EncodingError {
            path: path.into(),
            line,
            source,
        }
    }

    pub fn read_error(path: impl Into<PathBuf>, line: u64, source: io::Error) -> Self {
        Self::ReadError {
            path: path.into(),
            line,
            source,
        }
    }

    /// Maps an error from opening `path` onto the matching variant
    pub fn from_open(err: io::Error, path: &Path) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound => Self::file_not_found(path),
            io::ErrorKind::PermissionDenied => Self::permission_denied(path),
            _ => Self::IoError(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_error_creation() {
        let path = Path::new("passwords.txt");
        let err = ScanError::file_not_found(path);
        assert!(matches!(err, ScanError::FileNotFound(_)));

        let err = ScanError::permission_denied(path);
        assert!(matches!(err, ScanError::PermissionDenied(_)));

        let err = ScanError::read_error(path, 4, io::Error::from(io::ErrorKind::Interrupted));
        assert!(matches!(err, ScanError::ReadError { line: 4, .. }));

        let err = ScanError::WorkerPanicked(3);
        assert!(matches!(err, ScanError::WorkerPanicked(3)));
    }

    #[test]
    fn test_error_messages() {
        let err = ScanError::file_not_found("passwords.txt");
        assert_eq!(err.to_string(), "File not found: passwords.txt");

        let err = ScanError::read_error("leak.txt", 12, io::Error::new(io::ErrorKind::Other, "disk gone"));
        assert_eq!(err.to_string(), "Failed to read leak.txt at line 12");
        assert_eq!(
            std::error::Error::source(&err).map(|e| e.to_string()),
            Some("disk gone".to_string())
        );

        let err = ScanError::WorkerPanicked(2);
        assert_eq!(err.to_string(), "Scan worker 2 panicked");

        let source = String::from_utf8(vec![0xff, 0xfe]).unwrap_err();
        let err = ScanError::encoding_error("leak.txt", 7, source);
        assert_eq!(err.to_string(), "Invalid UTF-8 in leak.txt at line 7");
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_from_open_maps_error_kinds() {
        let path = Path::new("missing.txt");

        let err = ScanError::from_open(io::Error::from(io::ErrorKind::NotFound), path);
        assert!(matches!(err, ScanError::FileNotFound(p) if p == path));

        let err = ScanError::from_open(io::Error::from(io::ErrorKind::PermissionDenied), path);
        assert!(matches!(err, ScanError::PermissionDenied(p) if p == path));

        let err = ScanError::from_open(io::Error::from(io::ErrorKind::InvalidInput), path);
        assert!(matches!(err, ScanError::IoError(_)));
    }
}
