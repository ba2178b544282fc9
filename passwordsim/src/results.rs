/// Scan result types.
///
/// Workers insert into a [`MatchSet`] concurrently and in no particular order. Once every
/// worker has finished, the set is drained into a `Vec<ScanMatch>` whose order depends only
/// on the set's contents: ascending score, then ascending byte-wise password.
use dashmap::DashMap;
use rayon::prelude::*;
use std::borrow::Cow;
use std::cmp::Ordering;
use std::fmt;

use crate::config::Threshold;
use crate::metrics::ScanStats;

/// A corpus entry that scored within the threshold
#[derive(Debug, Clone, PartialEq)]
pub struct ScanMatch {
    /// The candidate password, byte for byte as read from the corpus
    pub password: Vec<u8>,
    /// Normalised Damerau-Levenshtein distance to the target
    pub score: f64,
}

impl ScanMatch {
    pub fn new(password: impl Into<Vec<u8>>, score: f64) -> Self {
        Self {
            password: password.into(),
            score,
        }
    }

    /// The password as text, with invalid UTF-8 replaced
    pub fn password_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.password)
    }

    /// Result order: lower scores first, ties broken by password bytes
    pub fn cmp_rank(&self, other: &Self) -> Ordering {
        self.score
            .total_cmp(&other.score)
            .then_with(|| self.password.cmp(&other.password))
    }
}

/// Renders `<password> <score>` with the score in its shortest round-trip form.
///
/// Invalid UTF-8 is replaced here; the result sink writes the raw bytes instead.
impl fmt::Display for ScanMatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.password_lossy(), self.score)
    }
}

/// Deduplicated matches, safe for concurrent insertion.
///
/// Keyed by the exact password bytes. Inserting the same password twice leaves one entry, and
/// since identical passwords always score identically the write order never matters.
#[derive(Debug, Default)]
pub struct MatchSet {
    entries: DashMap<Vec<u8>, f64>,
}

impl MatchSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or overwrites the score for `password`
    pub fn insert(&self, password: Vec<u8>, score: f64) {
        self.entries.insert(password, score);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, password: impl AsRef<[u8]>) -> Option<f64> {
        self.entries
            .get(password.as_ref())
            .map(|entry| *entry.value())
    }

    /// Drains the set into result order
    pub fn into_sorted(self) -> Vec<ScanMatch> {
        let mut matches: Vec<ScanMatch> = self
            .entries
            .into_iter()
            .map(|(password, score)| ScanMatch { password, score })
            .collect();
        sort_matches(&mut matches);
        matches
    }
}

/// Sorts matches into result order.
///
/// Passwords are unique within a set, so the order is total and an unstable sort is
/// deterministic.
pub fn sort_matches(matches: &mut [ScanMatch]) {
    matches.par_sort_unstable_by(ScanMatch::cmp_rank);
}

/// Everything a finished scan produced
#[derive(Debug, Clone)]
pub struct ScanOutput {
    /// Matches in result order
    pub matches: Vec<ScanMatch>,
    /// The threshold actually applied, after clamping
    pub threshold: Threshold,
    /// Counters collected during the scan
    pub stats: ScanStats,
}

impl ScanOutput {
    pub fn len(&self) -> usize {
        self.matches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }
}
