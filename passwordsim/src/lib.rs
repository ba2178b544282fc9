//! Search any passwords dataset for passwords similar to a given password.
//!
//! Similarity is the Damerau-Levenshtein distance normalised by the longer string's
//! length. Matches at or below a threshold are deduplicated, sorted by score and then
//! password, and appended to an output file.

pub mod config;
pub mod distance;
pub mod errors;
pub mod metrics;
pub mod results;
pub mod scan;
pub mod sink;

pub use self::config::{EncodingMode, ScanConfig, Threshold};
pub use errors::{ScanError, ScanResult};
pub use results::{MatchSet, ScanMatch, ScanOutput};
pub use scan::{check_passwords, find_similar, find_similar_in, scan, scan_source, LineSource};
