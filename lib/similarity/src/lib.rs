//! # Harfzaar Similarity
//!
//! Embedding, reranking and the two retrieval pipelines built on `harfzaar-core`.
//!
//! ## Features
//!
//! - **Embedders**: a deterministic hashing embedder and an HTTP model client
//! - **Cosine reranking**: stable, parallel scoring of qaafia candidates
//! - **Poem search**: nearest neighbors over poem embeddings, unique by title
//! - **Qaafia search**: ravi pattern derivation, suffix filtering, reranking
//! - **Index building**: offline embedding of stored poems into a [`harfzaar_core::PoemIndex`]
//!
//! ## Example
//!
//! ```rust
//! use harfzaar_core::{MemoryStore, RhymeWord};
//! use harfzaar_similarity::{Embedder, HashEmbedder, RhymeSearch};
//! use std::sync::Arc;
//!
//! let embedder = Arc::new(HashEmbedder::new(64));
//! let words = MemoryStore::new().with_words([
//!     RhymeWord::new("arranged", ["d", "ed", "anged"])
//!         .with_embedding(embedder.embed("arranged").unwrap()),
//! ]);
//!
//! let search = RhymeSearch::new(embedder, Arc::new(words));
//! let results = search.search("changed", "ranged").unwrap();
//! assert_eq!(results.pattern, "anged");
//! assert_eq!(results.matches[0].word, "arranged");
//! ```
//!
//! ## Architecture
//!
//! ```text
//! query ──> Embedder ──> NearestNeighbors ──> PoemStore ──> dedup by title
//!
//! (w1, w2) ──> RaviPattern ──> WordStore ──> Embedder(w1) ──> Reranker ──> top N
//! ```

pub mod embedder;
pub mod remote;
pub mod rerank;
pub mod poem_search;
pub mod rhyme_search;
pub mod indexing;

pub use embedder::{Embedder, HashEmbedder, DEFAULT_EMBEDDING_DIM};
pub use remote::RemoteEmbedder;
pub use rerank::{round_score, RankedResult, Reranker, DEFAULT_MAX_MATCHES};
pub use poem_search::{PoemSearch, PoemSearchConfig, Resolution};
pub use indexing::build_poem_index;
pub use rhyme_search::{RhymeResults, RhymeSearch, RhymeSearchConfig, MAX_LOOKUP_PATTERN_LEN};
