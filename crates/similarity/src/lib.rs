//! Similarity scorers used by the match selector.
//!
//! Two independent signals: cosine similarity over embedding vectors and
//! Jaccard overlap over normalized word sets. Both are pure functions;
//! the selector decides how the two are prioritized.

use std::collections::HashSet;

use thiserror::Error;

/// Errors surfaced by the similarity scorers.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SimilarityError {
    /// The two vectors cannot be compared. This indicates a data
    /// integrity problem in the catalog, not a transient fault.
    #[error("embedding length mismatch: {left} vs {right}")]
    LengthMismatch { left: usize, right: usize },
}

/// Cosine similarity between two equal-length vectors, in [-1, 1].
///
/// Returns `0.0` (never NaN) when either vector has zero norm.
pub fn cosine(a: &[f32], b: &[f32]) -> Result<f32, SimilarityError> {
    if a.len() != b.len() {
        return Err(SimilarityError::LengthMismatch {
            left: a.len(),
            right: b.len(),
        });
    }

    let mut dot = 0.0f32;
    let mut norm_a = 0.0f32;
    let mut norm_b = 0.0f32;
    for (x, y) in a.iter().zip(b) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return Ok(0.0);
    }
    Ok(dot / (norm_a.sqrt() * norm_b.sqrt()))
}

/// Jaccard overlap between the normalized word sets of two strings,
/// in [0, 1].
///
/// Both sets empty ⇒ `1.0`; exactly one empty ⇒ `0.0`. Duplicated words
/// are ignored (set semantics), so the score is order-independent.
pub fn text_overlap(s1: &str, s2: &str) -> f32 {
    let a = word_set(s1);
    let b = word_set(s2);

    match (a.is_empty(), b.is_empty()) {
        (true, true) => 1.0,
        (true, false) | (false, true) => 0.0,
        (false, false) => {
            let intersection = a.intersection(&b).count();
            let union = a.union(&b).count();
            intersection as f32 / union as f32
        }
    }
}

/// Lowercase, strip everything that is not alphanumeric or whitespace,
/// and split on whitespace into a word set.
fn word_set(s: &str) -> HashSet<String> {
    s.to_lowercase()
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c.is_whitespace() {
                c
            } else {
                ' '
            }
        })
        .collect::<String>()
        .split_whitespace()
        .map(str::to_owned)
        .collect()
}
