//! Approximate matching of city names
//!
//! Used to offer "did you mean" suggestions when a typed city name is not
//! found verbatim in the city catalog.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;
use tracing::debug;

use crate::InspoError;

/// Similarity a catalog entry needs before it is offered as a suggestion
pub const DEFAULT_SIMILARITY_THRESHOLD: f64 = 0.65;

/// Validated similarity threshold in the range [0, 1]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimilarityThreshold(f64);

impl SimilarityThreshold {
    /// Create a new threshold, rejecting values outside [0, 1] and NaN
    pub fn new(value: f64) -> Result<Self, InspoError> {
        if !(0.0..=1.0).contains(&value) {
            return Err(InspoError::InvalidThreshold(format!(
                "threshold must be between 0 and 1, got {}",
                value
            )));
        }

        Ok(Self(value))
    }

    pub fn value(&self) -> f64 {
        self.0
    }
}

impl Default for SimilarityThreshold {
    fn default() -> Self {
        Self(DEFAULT_SIMILARITY_THRESHOLD)
    }
}

impl FromStr for SimilarityThreshold {
    type Err = InspoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s.trim().parse::<f64>().map_err(|_| {
            InspoError::InvalidThreshold(format!("not a number: {}", s))
        })?;
        Self::new(value)
    }
}

impl fmt::Display for SimilarityThreshold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Levenshtein distance between two strings, counted in chars.
///
/// Insertions, deletions and substitutions all cost 1.
pub fn edit_distance(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    // table[i][j] = distance between the first i chars of a and first j chars of b
    let mut table = vec![vec![0usize; b.len() + 1]; a.len() + 1];
    for (i, row) in table.iter_mut().enumerate() {
        row[0] = i;
    }
    for (j, cell) in table[0].iter_mut().enumerate() {
        *cell = j;
    }

    for i in 1..=a.len() {
        for j in 1..=b.len() {
            table[i][j] = if a[i - 1] == b[j - 1] {
                table[i - 1][j - 1]
            } else {
                1 + table[i - 1][j - 1].min(table[i - 1][j]).min(table[i][j - 1])
            };
        }
    }

    table[a.len()][b.len()]
}

/// Normalized closeness score in [0, 1]: `1 - distance / longest length`.
///
/// Two empty strings are identical and score 1.
pub fn similarity(a: &str, b: &str) -> f64 {
    let longest = a.chars().count().max(b.chars().count());
    if longest == 0 {
        return 1.0;
    }

    1.0 - edit_distance(a, b) as f64 / longest as f64
}

/// Return every candidate whose similarity to `query` meets `threshold`.
///
/// Candidates keep their iteration order and are returned at most once.
pub fn suggest<I>(query: &str, candidates: I, threshold: f64) -> Vec<String>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    let mut seen = HashSet::new();
    let mut suggestions = Vec::new();
    let mut scanned = 0usize;

    for candidate in candidates {
        scanned += 1;
        let candidate = candidate.as_ref();
        if similarity(query, candidate) >= threshold && seen.insert(candidate.to_string()) {
            suggestions.push(candidate.to_string());
        }
    }

    debug!(
        query = query,
        threshold = threshold,
        scanned = scanned,
        matched = suggestions.len(),
        "Computed city suggestions"
    );

    suggestions
}
