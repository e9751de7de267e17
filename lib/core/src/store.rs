use crate::filter::Filter;
use crate::poem::{Poem, PoemId};
use crate::rhyme::RhymeWord;
use crate::{Result, Vector};
use parking_lot::RwLock;
use std::collections::HashMap;

/// Read access to poem documents
pub trait PoemStore: Send + Sync {
    /// Fetch one poem by identifier; `Ok(None)` when it does not exist.
    fn get_poem(&self, id: &PoemId) -> Result<Option<Poem>>;

    /// All poems matching `filter`, in store order.
    fn find_poems(&self, filter: &dyn Filter<Poem>) -> Result<Vec<Poem>>;

    fn poem_count(&self) -> Result<usize>;
}

/// Read access to qaafia word documents
pub trait WordStore: Send + Sync {
    /// All words matching `filter`, in store order.
    fn find_words(&self, filter: &dyn Filter<RhymeWord>) -> Result<Vec<RhymeWord>>;

    fn word_count(&self) -> Result<usize>;
}

/// k-nearest poem lookup by embedding
pub trait NearestNeighbors: Send + Sync {
    /// Identifiers of the (at most) `k` closest poems, closest first.
    fn nearest(&self, query: &Vector, k: usize) -> Result<Vec<PoemId>>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// In-memory document store
#[derive(Default)]
pub struct MemoryStore {
    poems: RwLock<Vec<Poem>>,
    poem_slots: RwLock<HashMap<PoemId, usize>>,
    words: RwLock<Vec<RhymeWord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a poem, keeping its slot on replace.
    pub fn upsert_poem(&self, poem: Poem) {
        let mut poems = self.poems.write();
        let mut slots = self.poem_slots.write();
        match slots.get(&poem.id) {
            Some(&slot) => poems[slot] = poem,
            None => {
                slots.insert(poem.id.clone(), poems.len());
                poems.push(poem);
            }
        }
    }

    pub fn add_word(&self, word: RhymeWord) {
        self.words.write().push(word);
    }

    pub fn with_poems(self, poems: impl IntoIterator<Item = Poem>) -> Self {
        for poem in poems {
            self.upsert_poem(poem);
        }
        self
    }

    pub fn with_words(self, words: impl IntoIterator<Item = RhymeWord>) -> Self {
        self.words.write().extend(words);
        self
    }
}

impl PoemStore for MemoryStore {
    fn get_poem(&self, id: &PoemId) -> Result<Option<Poem>> {
        let slot = self.poem_slots.read().get(id).copied();
        Ok(slot.and_then(|slot| self.poems.read().get(slot).cloned()))
    }

    fn find_poems(&self, filter: &dyn Filter<Poem>) -> Result<Vec<Poem>> {
        Ok(self
            .poems
            .read()
            .iter()
            .filter(|poem| filter.matches(poem))
            .cloned()
            .collect())
    }

    fn poem_count(&self) -> Result<usize> {
        Ok(self.poems.read().len())
    }
}

impl WordStore for MemoryStore {
    fn find_words(&self, filter: &dyn Filter<RhymeWord>) -> Result<Vec<RhymeWord>> {
        Ok(self
            .words
            .read()
            .iter()
            .filter(|word| filter.matches(word))
            .cloned()
            .collect())
    }

    fn word_count(&self) -> Result<usize> {
        Ok(self.words.read().len())
    }
}
