//! Qaafia (rhyme word) records and ravi pattern derivation.

use crate::vector::Vector;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A dictionary word with its alternative ravi suffixes and an optional embedding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RhymeWord {
    pub word: String,
    #[serde(default)]
    pub ravi1: String,
    #[serde(default)]
    pub ravi2: String,
    #[serde(default)]
    pub ravi3: String,
    /// Populated offline; words without one are skipped when ranking.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub embedding: Option<Vector>,
}

impl RhymeWord {
    #[must_use]
    pub fn new(word: impl Into<String>, ravi: [&str; 3]) -> Self {
        Self {
            word: word.into(),
            ravi1: ravi[0].to_string(),
            ravi2: ravi[1].to_string(),
            ravi3: ravi[2].to_string(),
            embedding: None,
        }
    }

    #[inline]
    #[must_use]
    pub fn with_embedding(mut self, embedding: Vector) -> Self {
        self.embedding = Some(embedding);
        self
    }

    #[inline]
    pub fn ravi_fields(&self) -> [&str; 3] {
        [&self.ravi1, &self.ravi2, &self.ravi3]
    }

    /// Suffix field selected by pattern length (1-based), as the legacy lookup does.
    pub fn ravi_field(&self, len: usize) -> Option<&str> {
        match len {
            1 => Some(&self.ravi1),
            2 => Some(&self.ravi2),
            3 => Some(&self.ravi3),
            _ => None,
        }
    }
}

/// Longest common trailing character sequence of `a` and `b`, sliced from `a`.
///
/// Characters are compared as Unicode scalar values, so multi-byte scripts work.
/// Returns `""` when the last characters already differ or either input is empty.
pub fn common_suffix<'a>(a: &'a str, b: &str) -> &'a str {
    let matched = a
        .chars()
        .rev()
        .zip(b.chars().rev())
        .take_while(|(x, y)| x == y)
        .count();

    if matched == 0 {
        return "";
    }

    match a.char_indices().rev().nth(matched - 1) {
        Some((start, _)) => &a[start..],
        None => a,
    }
}

/// A derived, non-empty ravi pattern used as a case-insensitive "ends with" key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RaviPattern {
    pattern: String,
    folded: String,
}

impl RaviPattern {
    /// Wrap an explicit pattern. Returns `None` for an empty pattern.
    pub fn new(pattern: impl Into<String>) -> Option<Self> {
        let pattern = pattern.into();
        if pattern.is_empty() {
            return None;
        }
        let folded = pattern.to_lowercase();
        Some(Self { pattern, folded })
    }

    /// Derive the pattern shared by two exemplar words.
    pub fn derive(first: &str, second: &str) -> Option<Self> {
        Self::new(common_suffix(first, second))
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.pattern
    }

    /// Length in characters
    #[inline]
    pub fn char_len(&self) -> usize {
        self.pattern.chars().count()
    }

    /// Case-insensitive literal suffix test
    #[inline]
    pub fn is_suffix_of(&self, field: &str) -> bool {
        field.to_lowercase().ends_with(&self.folded)
    }

    /// Case-insensitive literal equality
    #[inline]
    pub fn equals(&self, field: &str) -> bool {
        field.to_lowercase() == self.folded
    }
}

impl fmt::Display for RaviPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.pattern)
    }
}

/// A ranked rhyme candidate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordMatch {
    pub word: String,
    pub score: f64,
}
