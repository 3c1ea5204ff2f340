//! Vocabulary storage for Lexis.
//!
//! This module provides the vocabulary store together with the
//! file-based and in-memory persistence backends it writes through.

pub mod file;
pub mod memory;
pub mod store;
pub mod traits;

pub use file::JsonFilePersistence;
pub use memory::MemoryPersistence;
pub use store::{Items, LoadOutcome, VocabularyStore};
pub use traits::{LoadedItems, VocabularyPersistence};
