//! # Harfzaar
//!
//! Semantic poem search and qaafia (rhyme) suggestions for Urdu poetry.
//!
//! Two read-only retrieval pipelines sit behind a small HTTP API:
//!
//! - **Poem search**: embeds a free-text query, finds the nearest poem embeddings
//!   and returns up to five poems with distinct titles.
//! - **Qaafia search**: derives the ravi pattern (common suffix) of two words,
//!   selects dictionary words whose ravi fields end with it and ranks them by cosine
//!   similarity to the first word.
//!
//! ## Quick Start
//!
//! ### As a Server
//!
//! ```bash
//! harfzaar import --data-dir ./data --poems ghazals.json --words qaafia_words.json
//! harfzaar index --data-dir ./data --embed-words
//! harfzaar serve --data-dir ./data --http-port 5000
//! ```
//!
//! ### As a Library
//!
//! ```rust
//! use harfzaar::prelude::*;
//! use std::sync::Arc;
//!
//! let embedder = Arc::new(HashEmbedder::new(32));
//! let poems = vec![Poem::new("1", "Judaai", "hijr ki raat")];
//! let index = PoemIndex::from_entries(
//!     32,
//!     poems.iter().map(|p| (p.id.clone(), embedder.embed(&p.embedding_text()).unwrap())),
//! )
//! .unwrap();
//! let store = Arc::new(MemoryStore::new().with_poems(poems));
//!
//! let search = PoemSearch::new(embedder, Arc::new(index), store);
//! let results = search.search("hijr").unwrap();
//! assert_eq!(results[0].title, "Judaai");
//! ```
//!
//! ## Crate Structure
//!
//! - `harfzaar-core` - Data model, suffix derivation, filters, flat index, store traits
//! - `harfzaar-similarity` - Embedders, reranking, the two search pipelines
//! - `harfzaar-storage` - LMDB store, index artifact, JSON import
//! - `harfzaar-api` - REST endpoints

// Re-export core types
pub use harfzaar_core::{
    common_suffix, Error, Filter, FlatL2Index, KeywordFilter, MemoryStore, NearestNeighbors,
    Poem, PoemId, PoemIndex, PoemMatch, PoemStore, RaviFieldFilter, RaviPattern,
    RaviSuffixFilter, Result, RhymeWord, Vector, WordMatch, WordStore,
};

// Re-export pipelines
pub use harfzaar_similarity::{
    Embedder, HashEmbedder, PoemSearch, PoemSearchConfig, RemoteEmbedder, Reranker,
    RhymeResults, RhymeSearch, RhymeSearchConfig,
};

// Re-export storage
pub use harfzaar_storage::{LmdbStore, StorageManager};

// Re-export API
pub use harfzaar_api::{AppState, RestApi, ServerConfig};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        common_suffix, Embedder, Error, HashEmbedder, MemoryStore, NearestNeighbors, Poem,
        PoemId, PoemIndex, PoemMatch, PoemSearch, PoemStore, RaviPattern, Result, RhymeSearch,
        RhymeWord, StorageManager, Vector, WordStore,
    };
}
