// Bulk import of exported poem and qaafia documents (JSON array or one document per line)
use crate::lmdb_storage::LmdbStore;
use anyhow::{Context, Result};
use harfzaar_core::{Poem, RhymeWord};
use serde::de::DeserializeOwned;
use std::path::Path;
use tracing::info;

/// Parse a JSON array, or newline-delimited JSON when the text does not start with `[`.
pub fn parse_documents<T: DeserializeOwned>(text: &str) -> Result<Vec<T>> {
    if text.trim_start().starts_with('[') {
        return Ok(serde_json::from_str(text)?);
    }

    text.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(n, line)| {
            serde_json::from_str(line).with_context(|| format!("line {}", n + 1))
        })
        .collect()
}

pub fn read_documents<T: DeserializeOwned, P: AsRef<Path>>(path: P) -> Result<Vec<T>> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).with_context(|| format!("reading {:?}", path))?;
    parse_documents(&text).with_context(|| format!("parsing {:?}", path))
}

pub fn import_poems<P: AsRef<Path>>(store: &LmdbStore, path: P) -> Result<usize> {
    let poems: Vec<Poem> = read_documents(&path)?;
    let written = store.put_poems(&poems)?;
    info!("Imported {} poems from {:?}", written, path.as_ref());
    Ok(written)
}

pub fn import_words<P: AsRef<Path>>(store: &LmdbStore, path: P) -> Result<usize> {
    let words: Vec<RhymeWord> = read_documents(&path)?;
    let embedded = words.iter().filter(|w| w.embedding.is_some()).count();
    let written = store.append_words(&words)?;
    info!(
        "Imported {} qaafia words ({} with embeddings) from {:?}",
        written,
        embedded,
        path.as_ref()
    );
    Ok(written)
}
