//! Text embedders
//!
//! The search pipelines only need `embed(text) -> Vector`. Two implementations ship:
//! [`HashEmbedder`], a deterministic local embedder built from hashed character
//! trigrams and words, and [`crate::RemoteEmbedder`] for a model served over HTTP.

use ahash::RandomState;
use harfzaar_core::{Result, Vector};
use std::collections::HashSet;

/// Default dimension, matching the MiniLM sentence-transformer family
pub const DEFAULT_EMBEDDING_DIM: usize = 384;

/// Anything that can turn text into a fixed-length vector
pub trait Embedder: Send + Sync {
    fn embed(&self, text: &str) -> Result<Vector>;

    /// Length of every vector this embedder produces
    fn dimension(&self) -> usize;

    fn model_name(&self) -> &str;
}

/// Deterministic hashing embedder.
///
/// Texts sharing trigrams and words land close together, which is enough for
/// local runs and tests without a model server.
#[derive(Debug, Clone)]
pub struct HashEmbedder {
    dim: usize,
    hasher: RandomState,
}

impl HashEmbedder {
    pub fn new(dim: usize) -> Self {
        Self {
            dim: dim.max(1),
            hasher: RandomState::with_seeds(
                0x6861_7266_7a61_6172,
                0x7161_6166_6961_0001,
                0x7261_7669_0000_0002,
                0x6768_617a_616c_0003,
            ),
        }
    }

    fn slot(&self, token: &str) -> usize {
        (self.hasher.hash_one(token) as usize) % self.dim
    }
}

impl Default for HashEmbedder {
    fn default() -> Self {
        Self::new(DEFAULT_EMBEDDING_DIM)
    }
}

impl Embedder for HashEmbedder {
    fn embed(&self, text: &str) -> Result<Vector> {
        let mut components = vec![0.0f32; self.dim];
        let normalized = text.to_lowercase();

        for trigram in generate_trigrams(&normalized) {
            components[self.slot(&trigram)] += 1.0;
        }

        // Words contribute more than trigrams
        for word in normalized.split_whitespace() {
            components[self.slot(word)] += 2.0;
        }

        let mut vector = Vector::new(components);
        vector.normalize();
        Ok(vector)
    }

    fn dimension(&self) -> usize {
        self.dim
    }

    fn model_name(&self) -> &str {
        "hash-trigram"
    }
}

/// Character trigrams of `s` padded with two spaces on each side
fn generate_trigrams(s: &str) -> HashSet<String> {
    let padded = format!("  {}  ", s);
    let chars: Vec<char> = padded.chars().collect();

    chars.windows(3).map(|w| w.iter().collect::<String>()).collect()
}
