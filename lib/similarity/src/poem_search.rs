//! Semantic poem search: embed → nearest neighbors → resolve → dedup by title.

use crate::embedder::Embedder;
use ahash::AHashSet;
use harfzaar_core::{
    Error, KeywordFilter, NearestNeighbors, Poem, PoemId, PoemMatch, PoemStore, Result,
};
use std::sync::Arc;
use tracing::{debug, warn};

#[derive(Debug, Clone)]
pub struct PoemSearchConfig {
    /// Neighbors requested from the index; over-fetched to survive title dedup
    pub fetch_k: usize,
    /// Unique poems returned by semantic search
    pub max_results: usize,
    /// Unique poems returned by keyword search
    pub keyword_limit: usize,
}

impl Default for PoemSearchConfig {
    fn default() -> Self {
        Self {
            fetch_k: 10,
            max_results: 5,
            keyword_limit: 10,
        }
    }
}

/// Outcome of resolving one neighbor to its stored poem
#[derive(Debug)]
pub enum Resolution {
    Found(Poem),
    Missing(PoemId),
    Failed(PoemId, Error),
}

impl Resolution {
    /// Keep found poems, log and drop the rest.
    fn into_found(self) -> Option<Poem> {
        match self {
            Resolution::Found(poem) => Some(poem),
            Resolution::Missing(id) => {
                debug!("Poem {} is indexed but not in the store, skipping", id);
                None
            }
            Resolution::Failed(id, e) => {
                warn!("Error retrieving poem {}: {}", id, e);
                None
            }
        }
    }
}

pub struct PoemSearch {
    embedder: Arc<dyn Embedder>,
    index: Arc<dyn NearestNeighbors>,
    store: Arc<dyn PoemStore>,
    config: PoemSearchConfig,
}

impl PoemSearch {
    pub fn new(
        embedder: Arc<dyn Embedder>,
        index: Arc<dyn NearestNeighbors>,
        store: Arc<dyn PoemStore>,
    ) -> Self {
        Self {
            embedder,
            index,
            store,
            config: PoemSearchConfig::default(),
        }
    }

    #[must_use]
    pub fn with_config(mut self, config: PoemSearchConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &PoemSearchConfig {
        &self.config
    }

    /// Number of poems the index can return
    pub fn indexed(&self) -> usize {
        self.index.len()
    }

    /// The most similar unique poems for `query`, nearest first.
    ///
    /// Store lookups stop once `max_results` unique titles are accepted.
    pub fn search(&self, query: &str) -> Result<Vec<PoemMatch>> {
        let query = query.trim();
        if query.is_empty() {
            return Err(Error::InvalidInput("Query cannot be empty".to_string()));
        }

        let vector = self.embedder.embed(query).map_err(Error::into_internal)?;
        let neighbors = self
            .index
            .nearest(&vector, self.config.fetch_k)
            .map_err(Error::into_internal)?;
        debug!("Index returned {} neighbors for query", neighbors.len());

        let mut seen_titles = AHashSet::new();
        let mut results = Vec::with_capacity(self.config.max_results);
        if self.config.max_results == 0 {
            return Ok(results);
        }

        let found = neighbors
            .into_iter()
            .map(|id| self.resolve(id))
            .filter_map(Resolution::into_found);

        for poem in found {
            if seen_titles.insert(poem.title.clone()) {
                results.push(PoemMatch::from(poem));
                if results.len() >= self.config.max_results {
                    break;
                }
            }
        }

        Ok(results)
    }

    /// Case-insensitive substring search over titles and bodies, unique by title.
    /// A blank query matches nothing.
    pub fn keyword_search(&self, query: &str) -> Result<Vec<PoemMatch>> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }

        let poems = self
            .store
            .find_poems(&KeywordFilter::new(query))
            .map_err(Error::into_internal)?;

        let mut seen_titles = AHashSet::new();
        Ok(poems
            .into_iter()
            .filter(|poem| seen_titles.insert(poem.title.clone()))
            .take(self.config.keyword_limit)
            .map(PoemMatch::from)
            .collect())
    }

    fn resolve(&self, id: PoemId) -> Resolution {
        match self.store.get_poem(&id) {
            Ok(Some(poem)) => Resolution::Found(poem),
            Ok(None) => Resolution::Missing(id),
            Err(e) => Resolution::Failed(id, e),
        }
    }
}
