// LMDB-backed document store for poems and qaafia words
use anyhow::Result;
use harfzaar_core::{Error, Filter, Poem, PoemId, PoemStore, RhymeWord, Vector, WordStore};
use heed::byteorder::BE;
use heed::types::{Bytes, Str, U64};
use heed::{Database, Env, EnvOpenOptions};
use std::path::Path;
use std::sync::Arc;
use tracing::warn;

const DB_POEMS: &str = "poems";
const DB_POEM_IDS: &str = "poem_ids";
const DB_WORDS: &str = "qaafia_words";

/// Default LMDB map size (10GB of address space, not disk)
pub const DEFAULT_MAP_SIZE: usize = 10 * 1024 * 1024 * 1024;

/// Poems and words are keyed by insertion sequence so scans follow import order.
/// `poem_ids` maps each poem id to its sequence.
pub struct LmdbStore {
    env: Arc<Env>,
    poems_db: Database<U64<BE>, Bytes>,
    poem_ids_db: Database<Str, U64<BE>>,
    words_db: Database<U64<BE>, Bytes>,
}

impl LmdbStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::with_map_size(path, DEFAULT_MAP_SIZE)
    }

    pub fn with_map_size<P: AsRef<Path>>(path: P, map_size: usize) -> Result<Self> {
        std::fs::create_dir_all(&path)?;

        let env = Arc::new(unsafe {
            EnvOpenOptions::new()
                .map_size(map_size)
                .max_dbs(4)
                .open(path)?
        });

        let mut wtxn = env.write_txn()?;
        let poems_db = env.create_database(&mut wtxn, Some(DB_POEMS))?;
        let poem_ids_db = env.create_database(&mut wtxn, Some(DB_POEM_IDS))?;
        let words_db = env.create_database(&mut wtxn, Some(DB_WORDS))?;
        wtxn.commit()?;

        Ok(Self {
            env,
            poems_db,
            poem_ids_db,
            words_db,
        })
    }

    /// Insert or replace poems in one transaction.
    /// A replaced poem keeps the slot of its first import.
    pub fn put_poems<'a, I>(&self, poems: I) -> Result<usize>
    where
        I: IntoIterator<Item = &'a Poem>,
    {
        let mut wtxn = self.env.write_txn()?;
        let mut next = match self.poems_db.last(&wtxn)? {
            Some((seq, _)) => seq + 1,
            None => 0,
        };
        let mut written = 0;
        for poem in poems {
            let data = serde_json::to_vec(poem)?;
            let seq = match self.poem_ids_db.get(&wtxn, poem.id.as_str())? {
                Some(seq) => seq,
                None => {
                    let seq = next;
                    next += 1;
                    self.poem_ids_db.put(&mut wtxn, poem.id.as_str(), &seq)?;
                    seq
                }
            };
            self.poems_db.put(&mut wtxn, &seq, &data)?;
            written += 1;
        }
        wtxn.commit()?;
        Ok(written)
    }

    /// Append words after the current last entry, in one transaction
    pub fn append_words<'a, I>(&self, words: I) -> Result<usize>
    where
        I: IntoIterator<Item = &'a RhymeWord>,
    {
        let mut wtxn = self.env.write_txn()?;
        let mut next = match self.words_db.last(&wtxn)? {
            Some((seq, _)) => seq + 1,
            None => 0,
        };
        let mut written = 0;
        for word in words {
            let data = serde_json::to_vec(word)?;
            self.words_db.put(&mut wtxn, &next, &data)?;
            next += 1;
            written += 1;
        }
        wtxn.commit()?;
        Ok(written)
    }

    /// Store `embed(word)` for every word that has no embedding yet.
    ///
    /// All embeddings are computed before the write transaction opens; a failed
    /// embedding leaves the store untouched.
    pub fn fill_word_embeddings<F>(&self, embed: F) -> Result<usize>
    where
        F: Fn(&str) -> harfzaar_core::Result<Vector>,
    {
        let pending: Vec<(u64, RhymeWord)> = {
            let rtxn = self.env.read_txn()?;
            let mut pending = Vec::new();
            for entry in self.words_db.iter(&rtxn)? {
                let (seq, data) = entry?;
                match serde_json::from_slice::<RhymeWord>(data) {
                    Ok(word) if word.embedding.is_none() => pending.push((seq, word)),
                    Ok(_) => {}
                    Err(e) => warn!("Skipping unreadable qaafia word #{}: {}", seq, e),
                }
            }
            pending
        };

        let mut embedded = Vec::with_capacity(pending.len());
        for (seq, word) in pending {
            let vector = embed(&word.word)?;
            embedded.push((seq, word.with_embedding(vector)));
        }

        let mut wtxn = self.env.write_txn()?;
        for (seq, word) in &embedded {
            self.words_db.put(&mut wtxn, seq, &serde_json::to_vec(word)?)?;
        }
        wtxn.commit()?;
        Ok(embedded.len())
    }

    fn read_poem(&self, id: &PoemId) -> Result<Option<Poem>> {
        let rtxn = self.env.read_txn()?;
        let Some(seq) = self.poem_ids_db.get(&rtxn, id.as_str())? else {
            return Ok(None);
        };
        match self.poems_db.get(&rtxn, &seq)? {
            Some(data) => Ok(Some(serde_json::from_slice(data)?)),
            None => Ok(None),
        }
    }

    fn scan_poems(&self, filter: &dyn Filter<Poem>) -> Result<Vec<Poem>> {
        let rtxn = self.env.read_txn()?;
        let mut found = Vec::new();
        for entry in self.poems_db.iter(&rtxn)? {
            let (seq, data) = entry?;
            match serde_json::from_slice::<Poem>(data) {
                Ok(poem) if filter.matches(&poem) => found.push(poem),
                Ok(_) => {}
                Err(e) => warn!("Skipping unreadable poem #{}: {}", seq, e),
            }
        }
        Ok(found)
    }

    fn scan_words(&self, filter: &dyn Filter<RhymeWord>) -> Result<Vec<RhymeWord>> {
        let rtxn = self.env.read_txn()?;
        let mut found = Vec::new();
        for entry in self.words_db.iter(&rtxn)? {
            let (seq, data) = entry?;
            match serde_json::from_slice::<RhymeWord>(data) {
                Ok(word) if filter.matches(&word) => found.push(word),
                Ok(_) => {}
                Err(e) => warn!("Skipping unreadable qaafia word #{}: {}", seq, e),
            }
        }
        Ok(found)
    }

    pub fn poem_len(&self) -> Result<usize> {
        let rtxn = self.env.read_txn()?;
        Ok(self.poems_db.len(&rtxn)? as usize)
    }

    pub fn word_len(&self) -> Result<usize> {
        let rtxn = self.env.read_txn()?;
        Ok(self.words_db.len(&rtxn)? as usize)
    }
}

fn storage_error(e: anyhow::Error) -> Error {
    Error::Storage(e.to_string())
}

impl PoemStore for LmdbStore {
    fn get_poem(&self, id: &PoemId) -> harfzaar_core::Result<Option<Poem>> {
        self.read_poem(id).map_err(storage_error)
    }

    fn find_poems(&self, filter: &dyn Filter<Poem>) -> harfzaar_core::Result<Vec<Poem>> {
        self.scan_poems(filter).map_err(storage_error)
    }

    fn poem_count(&self) -> harfzaar_core::Result<usize> {
        self.poem_len().map_err(storage_error)
    }
}

impl WordStore for LmdbStore {
    fn find_words(&self, filter: &dyn Filter<RhymeWord>) -> harfzaar_core::Result<Vec<RhymeWord>> {
        self.scan_words(filter).map_err(storage_error)
    }

    fn word_count(&self) -> harfzaar_core::Result<usize> {
        self.word_len().map_err(storage_error)
    }
}
