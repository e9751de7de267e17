//! # Harfzaar Core
//!
//! Core library for Harfzaar poem and qaafia search.
//!
//! This crate provides the data model and the pieces with algorithmic content
//! that the search pipelines are assembled from:
//!
//! - [`Vector`] - Dense embedding with cosine and L2 operations
//! - [`Poem`], [`PoemId`] - Ghazal documents as stored by the authoring side
//! - [`RhymeWord`], [`RaviPattern`], [`common_suffix`] - Qaafia words and ravi derivation
//! - [`FlatL2Index`], [`PoemIndex`] - Exact nearest-neighbor search over poem embeddings
//! - [`PoemStore`], [`WordStore`], [`NearestNeighbors`] - Collaborator capabilities
//! - [`MemoryStore`] - In-memory document store
//!
//! ## Example
//!
//! ```rust
//! use harfzaar_core::{common_suffix, RaviPattern, RhymeWord, RaviSuffixFilter, Filter};
//!
//! assert_eq!(common_suffix("changed", "ranged"), "anged");
//!
//! let pattern = RaviPattern::derive("changed", "ranged").unwrap();
//! let filter = RaviSuffixFilter::new(pattern);
//! assert!(filter.matches(&RhymeWord::new("exchanged", ["d", "ed", "ANGED"])));
//! ```

pub mod vector;
pub mod error;
pub mod poem;
pub mod rhyme;
pub mod filter;
pub mod index;
pub mod store;

pub use vector::Vector;
pub use error::{Error, Result};
pub use poem::{Poem, PoemId, PoemMatch};
pub use rhyme::{common_suffix, RaviPattern, RhymeWord, WordMatch};
pub use filter::{Filter, KeywordFilter, MatchAll, RaviFieldFilter, RaviSuffixFilter};
pub use index::{FlatL2Index, PoemIndex, SENTINEL};
pub use store::{MemoryStore, NearestNeighbors, PoemStore, WordStore};
