use crate::lmdb_storage::LmdbStore;
use crate::persistence::{load_index, INDEX_FILENAME};
use harfzaar_core::{Error, FlatL2Index, NearestNeighbors, PoemIndex, Result};
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

/// Opens the data directory: the LMDB document store and the poem index artifact.
pub struct StorageManager {
    store: Arc<LmdbStore>,
    index: Arc<PoemIndex>,
}

impl StorageManager {
    /// `embedding_dim` must match the artifact; a missing artifact yields an empty index.
    pub fn open<P: AsRef<Path>>(data_dir: P, embedding_dim: usize) -> Result<Self> {
        let data_dir = data_dir.as_ref();
        std::fs::create_dir_all(data_dir)?;

        let index_path = data_dir.join(INDEX_FILENAME);
        let index = if index_path.exists() {
            let index = load_index(&index_path).map_err(|e| Error::Storage(format!("{:#}", e)))?;
            if index.dim() != embedding_dim {
                return Err(Error::InvalidConfig(format!(
                    "index artifact has dimension {} but the embedder produces {}",
                    index.dim(),
                    embedding_dim
                )));
            }
            info!("Loaded poem index: {} vectors of dimension {}", index.len(), index.dim());
            index
        } else {
            warn!(
                "No index artifact at {:?}; poem search returns nothing until `harfzaar index` runs",
                index_path
            );
            PoemIndex::new(FlatL2Index::new(embedding_dim), Vec::new())?
        };

        let store = Arc::new(Self::open_store(data_dir)?);

        Ok(Self {
            store,
            index: Arc::new(index),
        })
    }

    /// Open only the document store, e.g. for imports
    pub fn open_store(data_dir: &Path) -> Result<LmdbStore> {
        LmdbStore::new(data_dir.join("lmdb")).map_err(|e| Error::Storage(e.to_string()))
    }

    #[inline]
    pub fn store(&self) -> Arc<LmdbStore> {
        self.store.clone()
    }

    #[inline]
    pub fn index(&self) -> Arc<PoemIndex> {
        self.index.clone()
    }
}
