//! Qaafia search: ravi pattern → suffix candidates → cosine rerank against the first word.

use crate::embedder::Embedder;
use crate::rerank::{Reranker, DEFAULT_MAX_MATCHES};
use ahash::AHashSet;
use harfzaar_core::{
    Error, RaviFieldFilter, RaviPattern, RaviSuffixFilter, Result, RhymeWord, WordMatch, WordStore,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

/// Longest pattern the direct lookup accepts, one per stored ravi field
pub const MAX_LOOKUP_PATTERN_LEN: usize = 3;

#[derive(Debug, Clone)]
pub struct RhymeSearchConfig {
    pub max_matches: usize,
}

impl Default for RhymeSearchConfig {
    fn default() -> Self {
        Self {
            max_matches: DEFAULT_MAX_MATCHES,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RhymeResults {
    #[serde(rename = "raviPattern")]
    pub pattern: String,
    pub matches: Vec<WordMatch>,
}

pub struct RhymeSearch {
    embedder: Arc<dyn Embedder>,
    words: Arc<dyn WordStore>,
    reranker: Reranker,
}

impl RhymeSearch {
    pub fn new(embedder: Arc<dyn Embedder>, words: Arc<dyn WordStore>) -> Self {
        Self {
            embedder,
            words,
            reranker: Reranker::default(),
        }
    }

    #[must_use]
    pub fn with_config(mut self, config: RhymeSearchConfig) -> Self {
        self.reranker = Reranker::new(config.max_matches);
        self
    }

    /// Rank dictionary words sharing the ravi pattern of `first` and `second`
    /// by similarity to `first`.
    pub fn search(&self, first: &str, second: &str) -> Result<RhymeResults> {
        let (first, second) = (first.trim(), second.trim());
        if first.is_empty() || second.is_empty() {
            return Err(Error::InvalidInput(
                "Both Qaafia words are required".to_string(),
            ));
        }

        let pattern = RaviPattern::derive(first, second).ok_or_else(|| Error::NoCommonSuffix {
            first: first.to_string(),
            second: second.to_string(),
        })?;

        let candidates = self
            .words
            .find_words(&RaviSuffixFilter::new(pattern.clone()))
            .map_err(Error::into_internal)?;
        debug!("Pattern '{}' matched {} words", pattern, candidates.len());

        if candidates.is_empty() {
            return Err(Error::NoMatches(pattern.to_string()));
        }

        let (rankable, unembedded): (Vec<RhymeWord>, Vec<RhymeWord>) = candidates
            .into_iter()
            .partition(|word| word.embedding.is_some());
        if !unembedded.is_empty() {
            debug!("{} candidates have no embedding and are not ranked", unembedded.len());
        }
        if rankable.is_empty() {
            return Err(Error::NoMatches(pattern.to_string()));
        }

        let query = self.embedder.embed(first).map_err(Error::into_internal)?;
        let matches = self.reranker.rerank(&query, &rankable);

        Ok(RhymeResults {
            pattern: pattern.to_string(),
            matches,
        })
    }

    /// Words whose ravi field of the pattern's length equals the pattern, in store order.
    pub fn lookup_pattern(&self, pattern: &str) -> Result<Vec<String>> {
        let pattern = RaviPattern::new(pattern.trim())
            .ok_or_else(|| Error::InvalidInput("Enter the Ravi Pattern".to_string()))?;
        if pattern.char_len() > MAX_LOOKUP_PATTERN_LEN {
            return Err(Error::InvalidInput(
                "Your Ravi Pattern is too large to be used".to_string(),
            ));
        }

        let words = self
            .words
            .find_words(&RaviFieldFilter::new(pattern.clone()))
            .map_err(Error::into_internal)?;

        let mut seen = AHashSet::new();
        let found: Vec<String> = words
            .into_iter()
            .map(|w| w.word)
            .filter(|w| seen.insert(w.clone()))
            .take(self.reranker.max_matches())
            .collect();

        if found.is_empty() {
            return Err(Error::NoMatches(pattern.to_string()));
        }
        Ok(found)
    }
}
