// Poem index artifact: the vectors and their parallel poem ids, bincode-encoded
use anyhow::{Context, Result};
use atomicwrites::{AllowOverwrite, AtomicFile};
use harfzaar_core::{FlatL2Index, PoemId, PoemIndex};
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::Path;

pub const INDEX_FILENAME: &str = "poem_index.bin";

/// On-disk form of a [`PoemIndex`]. `ids[i]` names the poem whose vector is row `i`.
#[derive(Debug, Serialize, Deserialize)]
pub struct IndexArtifact {
    pub dim: usize,
    pub ids: Vec<String>,
    pub vectors: Vec<Vec<f32>>,
}

impl IndexArtifact {
    pub fn from_index(index: &PoemIndex) -> Self {
        Self {
            dim: index.dim(),
            ids: index.ids().iter().map(|id| id.as_str().to_string()).collect(),
            vectors: index.raw().rows().map(|row| row.to_vec()).collect(),
        }
    }

    /// Rebuild the index, rejecting artifacts whose ids and vectors disagree.
    pub fn into_index(self) -> harfzaar_core::Result<PoemIndex> {
        let index = FlatL2Index::from_rows(self.dim, self.vectors)?;
        PoemIndex::new(index, self.ids.into_iter().map(PoemId::from).collect())
    }
}

pub fn save_index<P: AsRef<Path>>(path: P, index: &PoemIndex) -> Result<()> {
    let data = bincode::serialize(&IndexArtifact::from_index(index))
        .map_err(|e| anyhow::anyhow!("Serialization error: {}", e))?;

    AtomicFile::new(path.as_ref(), AllowOverwrite)
        .write(|f| f.write_all(&data))
        .with_context(|| format!("writing index artifact {:?}", path.as_ref()))?;
    Ok(())
}

pub fn load_index<P: AsRef<Path>>(path: P) -> Result<PoemIndex> {
    let data = std::fs::read(path.as_ref())
        .with_context(|| format!("reading index artifact {:?}", path.as_ref()))?;
    let artifact: IndexArtifact = bincode::deserialize(&data)
        .map_err(|e| anyhow::anyhow!("Deserialization error: {}", e))?;
    Ok(artifact.into_index()?)
}
