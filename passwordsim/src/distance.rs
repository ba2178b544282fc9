//! Damerau-Levenshtein edit distance.
//!
//! This is the unrestricted variant: a transposed pair may take part in later edits, so
//! `"ca"` → `"abc"` costs 2 (transpose, then insert) rather than the 3 that the optimal
//! string alignment variant reports. Strings are compared as sequences of `char`, and
//! lengths used for normalisation are counted the same way.

use std::collections::HashMap;

/// Initial scratch size; most passwords are no longer than this.
pub const ESTIMATED_MAX_PASSWORD_LENGTH: usize = 64;

/// Reusable distance calculator.
///
/// Owns its DP matrix and character buffers so that scoring millions of lines does not
/// allocate per line. Not shared between threads: each scan worker builds its own.
#[derive(Debug, Clone)]
pub struct DamerauLevenshtein {
    matrix: Vec<usize>,
    last_row: HashMap<char, usize>,
    source: Vec<char>,
    target: Vec<char>,
}

impl Default for DamerauLevenshtein {
    fn default() -> Self {
        Self::new()
    }
}

impl DamerauLevenshtein {
    pub fn new() -> Self {
        Self::with_capacity(ESTIMATED_MAX_PASSWORD_LENGTH)
    }

    /// Creates a calculator with scratch space for strings up to `max_len` chars.
    /// Longer inputs still work; the buffers grow as needed.
    pub fn with_capacity(max_len: usize) -> Self {
        let side = max_len + 2;
        Self {
            matrix: Vec::with_capacity(side * side),
            last_row: HashMap::with_capacity(max_len),
            source: Vec::with_capacity(max_len),
            target: Vec::with_capacity(max_len),
        }
    }

    /// Minimum number of insertions, deletions, substitutions and adjacent
    /// transpositions needed to turn `a` into `b`
    pub fn distance(&mut self, a: &str, b: &str) -> usize {
        self.source.clear();
        self.source.extend(a.chars());
        self.target.clear();
        self.target.extend(b.chars());
        compute(
            &self.source,
            &self.target,
            &mut self.matrix,
            &mut self.last_row,
        )
    }

    /// Distance divided by the longer string's length, in `[0.0, 1.0]`.
    ///
    /// Two empty strings are identical and score `0.0`.
    pub fn normalized_score(&mut self, candidate: &str, target: &str) -> f64 {
        let distance = self.distance(candidate, target);
        let longest = self.source.len().max(self.target.len());
        if longest == 0 {
            return 0.0;
        }
        distance as f64 / longest as f64
    }
}

/// One-off distance using a fresh calculator
pub fn distance(a: &str, b: &str) -> usize {
    DamerauLevenshtein::default().distance(a, b)
}

/// One-off normalised score using a fresh calculator
pub fn normalized_score(candidate: &str, target: &str) -> f64 {
    DamerauLevenshtein::default().normalized_score(candidate, target)
}

fn compute(
    a: &[char],
    b: &[char],
    matrix: &mut Vec<usize>,
    last_row: &mut HashMap<char, usize>,
) -> usize {
    let (n, m) = (a.len(), b.len());
    if n == 0 {
        return m;
    }
    if m == 0 {
        return n;
    }

    // Row 0 and column 0 hold a sentinel larger than any real distance; the DP proper
    // lives at offset (1, 1).
    let width = m + 2;
    let sentinel = n + m;
    let at = |i: usize, j: usize| i * width + j;

    matrix.clear();
    matrix.resize((n + 2) * width, 0);
    last_row.clear();

    matrix[at(0, 0)] = sentinel;
    for i in 0..=n {
        matrix[at(i + 1, 0)] = sentinel;
        matrix[at(i + 1, 1)] = i;
    }
    for j in 0..=m {
        matrix[at(0, j + 1)] = sentinel;
        matrix[at(1, j + 1)] = j;
    }

    for i in 1..=n {
        // Last column in this row where a[i - 1] matched
        let mut last_match_col = 0;
        for j in 1..=m {
            let i1 = last_row.get(&b[j - 1]).copied().unwrap_or(0);
            let j1 = last_match_col;
            let cost = if a[i - 1] == b[j - 1] {
                last_match_col = j;
                0
            } else {
                1
            };

            let substitution = matrix[at(i, j)] + cost;
            let insertion = matrix[at(i + 1, j)] + 1;
            let deletion = matrix[at(i, j + 1)] + 1;
            let transposition = matrix[at(i1, j1)] + (i - i1 - 1) + 1 + (j - j1 - 1);

            matrix[at(i + 1, j + 1)] = substitution
                .min(insertion)
                .min(deletion)
                .min(transposition);
        }
        last_row.insert(a[i - 1], i);
    }

    matrix[at(n + 1, m + 1)]
}
