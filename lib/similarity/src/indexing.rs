//! Offline construction of the poem index from stored documents.

use crate::embedder::Embedder;
use harfzaar_core::{MatchAll, PoemIndex, PoemStore, Result};
use rayon::prelude::*;
use tracing::{debug, info};

/// Embed every stored poem's [`embedding_text`](harfzaar_core::Poem::embedding_text)
/// and index the vectors in store order.
///
/// Any embedding failure aborts the build.
pub fn build_poem_index(embedder: &dyn Embedder, store: &dyn PoemStore) -> Result<PoemIndex> {
    let poems = store.find_poems(&MatchAll)?;
    debug!("Embedding {} poems with {}", poems.len(), embedder.model_name());

    let entries = poems
        .par_iter()
        .map(|poem| Ok((poem.id.clone(), embedder.embed(&poem.embedding_text())?)))
        .collect::<Result<Vec<_>>>()?;

    let index = PoemIndex::from_entries(embedder.dimension(), entries)?;
    info!(
        "Built poem index: {} vectors of dimension {}",
        index.ids().len(),
        index.dim()
    );
    Ok(index)
}
