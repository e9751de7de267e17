pub mod manager;
pub mod lmdb_storage;
pub mod persistence;
pub mod import;

pub use manager::StorageManager;
pub use lmdb_storage::LmdbStore;
pub use persistence::{load_index, save_index, IndexArtifact, INDEX_FILENAME};
pub use import::{import_poems, import_words, read_documents};
