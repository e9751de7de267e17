//! Cosine reranker for qaafia candidates
//!
//! Scores each candidate's stored embedding against the query embedding,
//! collapses repeated words, orders by score, and projects the best ones to
//! [`WordMatch`].

use ahash::AHashMap;
use harfzaar_core::{RhymeWord, Vector, WordMatch};
use ordered_float::OrderedFloat;
use rayon::prelude::*;
use std::cmp::Reverse;

/// Default number of matches returned
pub const DEFAULT_MAX_MATCHES: usize = 9;

/// A scored candidate
#[derive(Debug, Clone)]
pub struct RankedResult {
    pub word: String,
    pub score: f32,
    /// Position of the candidate in store order
    pub position: usize,
}

#[derive(Debug, Clone)]
pub struct Reranker {
    max_matches: usize,
}

impl Default for Reranker {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_MATCHES)
    }
}

impl Reranker {
    pub fn new(max_matches: usize) -> Self {
        Self { max_matches }
    }

    pub fn max_matches(&self) -> usize {
        self.max_matches
    }

    /// Score every candidate that carries an embedding, best first.
    ///
    /// A word listed more than once keeps its first store position and the score of
    /// its last occurrence. Equal scores keep store order. Candidates without an
    /// embedding are skipped.
    pub fn rank(&self, query: &Vector, candidates: &[RhymeWord]) -> Vec<RankedResult> {
        let scored: Vec<RankedResult> = candidates
            .par_iter()
            .enumerate()
            .filter_map(|(position, candidate)| {
                let embedding = candidate.embedding.as_ref()?;
                Some(RankedResult {
                    word: candidate.word.clone(),
                    score: embedding.cosine_similarity(query),
                    position,
                })
            })
            .collect();

        let mut slots: AHashMap<String, usize> = AHashMap::with_capacity(scored.len());
        let mut results: Vec<RankedResult> = Vec::with_capacity(scored.len());
        for ranked in scored {
            match slots.get(&ranked.word) {
                Some(&slot) => results[slot].score = ranked.score,
                None => {
                    slots.insert(ranked.word.clone(), results.len());
                    results.push(ranked);
                }
            }
        }

        // Stable sort, so ties stay in store order
        results.sort_by_key(|r| Reverse(OrderedFloat(r.score)));
        results
    }

    /// Rank and keep the top `max_matches` with rounded scores.
    pub fn rerank(&self, query: &Vector, candidates: &[RhymeWord]) -> Vec<WordMatch> {
        self.rank(query, candidates)
            .into_iter()
            .take(self.max_matches)
            .map(|r| WordMatch {
                word: r.word,
                score: round_score(r.score),
            })
            .collect()
    }
}

/// Round to 6 decimal digits
pub fn round_score(score: f32) -> f64 {
    (f64::from(score) * 1e6).round() / 1e6
}

#[cfg(test)]
mod tests {
    use super::*;

    fn word(name: &str, embedding: Option<Vec<f32>>) -> RhymeWord {
        let w = RhymeWord::new(name, ["d", "ed", "ged"]);
        match embedding {
            Some(e) => w.with_embedding(Vector::new(e)),
            None => w,
        }
    }

    #[test]
    fn test_rank_orders_by_cosine() {
        let query = Vector::new(vec![1.0, 0.0]);
        let candidates = vec![
            word("orthogonal", Some(vec![0.0, 1.0])),
            word("same", Some(vec![2.0, 0.0])),
            word("close", Some(vec![1.0, 0.2])),
        ];
        let ranked = Reranker::default().rank(&query, &candidates);
        let words: Vec<&str> = ranked.iter().map(|r| r.word.as_str()).collect();
        assert_eq!(words, vec!["same", "close", "orthogonal"]);
        assert!((ranked[0].score - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_ties_keep_store_order() {
        let query = Vector::new(vec![1.0, 1.0]);
        let candidates = vec![
            word("first", Some(vec![1.0, 0.0])),
            word("second", Some(vec![0.0, 1.0])),
            word("third", Some(vec![1.0, 0.0])),
        ];
        let ranked = Reranker::default().rank(&query, &candidates);
        let positions: Vec<usize> = ranked.iter().map(|r| r.position).collect();
        assert_eq!(positions, vec![0, 1, 2]);
    }

    #[test]
    fn test_missing_and_zero_embeddings() {
        let query = Vector::new(vec![1.0, 0.0]);
        let candidates = vec![
            word("no-embedding", None),
            word("zero", Some(vec![0.0, 0.0])),
            word("good", Some(vec![1.0, 0.0])),
        ];
        let matches = Reranker::default().rerank(&query, &candidates);
        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0].word, "good");
        assert_eq!(matches[1].word, "zero");
        assert_eq!(matches[1].score, 0.0);
    }

    #[test]
    fn test_rerank_limits_and_dedups() {
        let query = Vector::new(vec![1.0, 0.0, 0.0]);
        let mut candidates: Vec<RhymeWord> = (0..20)
            .map(|i| word(&format!("w{}", i), Some(vec![1.0, i as f32 * 0.1, 0.0])))
            .collect();
        candidates.insert(0, word("w3", Some(vec![0.0, 0.0, 1.0])));

        let matches = Reranker::default().rerank(&query, &candidates);
        assert_eq!(matches.len(), DEFAULT_MAX_MATCHES);
        assert!(matches.windows(2).all(|w| w[0].score >= w[1].score));

        let w3: Vec<&WordMatch> = matches.iter().filter(|m| m.word == "w3").collect();
        assert_eq!(w3.len(), 1);
        assert!(w3[0].score > 0.9);
    }

    #[test]
    fn test_repeated_word_takes_last_score() {
        let query = Vector::new(vec![1.0, 0.0]);
        let candidates = vec![
            word("dil", Some(vec![1.0, 0.0])),
            word("mil", Some(vec![1.0, 1.0])),
            word("dil", Some(vec![0.0, 1.0])),
        ];

        let matches = Reranker::default().rerank(&query, &candidates);
        let got: Vec<(&str, f64)> = matches.iter().map(|m| (m.word.as_str(), m.score)).collect();
        assert_eq!(got, vec![("mil", 0.707107), ("dil", 0.0)]);
    }

    #[test]
    fn test_repeated_word_keeps_first_position() {
        let query = Vector::new(vec![1.0, 0.0]);
        let candidates = vec![
            word("dil", Some(vec![0.0, 1.0])),
            word("mil", Some(vec![0.0, 1.0])),
            word("dil", Some(vec![0.0, 2.0])),
        ];

        let ranked = Reranker::default().rank(&query, &candidates);
        let got: Vec<(&str, usize)> = ranked.iter().map(|r| (r.word.as_str(), r.position)).collect();
        assert_eq!(got, vec![("dil", 0), ("mil", 1)]);
    }

    #[test]
    fn test_round_score() {
        assert_eq!(round_score(0.123_456_78), 0.123457);
        assert_eq!(round_score(1.0), 1.0);
        assert_eq!(round_score(-0.5), -0.5);
    }
}
