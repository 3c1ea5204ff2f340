//! File-based vocabulary persistence.
//!
//! The whole vocabulary lives in one pretty-printed JSON array. Writes go
//! to a sibling temp file which is synced and then renamed over the target,
//! so readers only ever observe a complete file.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::Local;

use crate::config::default_vocabulary_path;
use crate::core::{ItemRecord, VocabularyItem};
use crate::error::{LexisError, Result};
use crate::storage::traits::{LoadedItems, VocabularyPersistence};

/// JSON file persistence.
#[derive(Debug, Clone)]
pub struct JsonFilePersistence {
    /// The vocabulary file.
    path: PathBuf,
}

impl JsonFilePersistence {
    /// Persistence at the default location (`<lexis_home>/vocabulary.json`).
    pub fn new() -> Result<Self> {
        let path = default_vocabulary_path().ok_or_else(|| {
            LexisError::config("Could not determine vocabulary location (no home directory)")
        })?;
        Ok(Self::with_path(path))
    }

    /// Persistence at a custom path. The file need not exist yet.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The vocabulary file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Get the path for the temp file used during atomic writes.
    fn temp_path(&self) -> PathBuf {
        let name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "vocabulary.json".to_string());
        self.path.with_file_name(format!(".{}.tmp", name))
    }

    /// Write content atomically using temp file + rename.
    fn atomic_write(&self, content: &str) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            if !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| LexisError::storage(parent, e))?;
            }
        }

        let temp_path = self.temp_path();
        let written = (|| -> std::io::Result<()> {
            let mut file = fs::File::create(&temp_path)?;
            file.write_all(content.as_bytes())?;
            file.sync_all()
        })();

        if let Err(e) = written {
            let _ = fs::remove_file(&temp_path);
            return Err(LexisError::storage(&temp_path, e));
        }

        // Rename temp file to final path (atomic on POSIX)
        if let Err(e) = fs::rename(&temp_path, &self.path) {
            let _ = fs::remove_file(&temp_path);
            return Err(LexisError::storage(&self.path, e));
        }

        Ok(())
    }

    /// Copy an unparsable or partly invalid file aside so a later save
    /// cannot destroy it.
    fn preserve_corrupt(&self) -> Result<PathBuf> {
        let name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let stamp = Local::now().format("%Y%m%dT%H%M%S");
        let backup = self.path.with_file_name(format!("{}.corrupt-{}", name, stamp));
        fs::copy(&self.path, &backup).map_err(|e| LexisError::storage(&backup, e))?;
        Ok(backup)
    }

    /// Preserve the file and describe where it went.
    fn preserve_note(&self) -> String {
        match self.preserve_corrupt() {
            Ok(backup) => format!("original preserved at {}", backup.display()),
            Err(e) => format!("could not preserve original: {}", e),
        }
    }
}

impl VocabularyPersistence for JsonFilePersistence {
    fn load(&self) -> Result<Option<LoadedItems>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let bytes = fs::read(&self.path).map_err(|e| LexisError::storage(&self.path, e))?;

        // Invalid UTF-8 is a decode error here, not an I/O error.
        let records: Vec<serde_json::Value> = match serde_json::from_slice(&bytes) {
            Ok(records) => records,
            Err(parse_err) => {
                return Err(LexisError::serde(format!(
                    "{} is not a valid vocabulary file ({}); {}",
                    self.path.display(),
                    parse_err,
                    self.preserve_note()
                )));
            }
        };

        let mut loaded = LoadedItems::default();
        for (index, value) in records.into_iter().enumerate() {
            let item = serde_json::from_value::<ItemRecord>(value)
                .map_err(LexisError::from)
                .and_then(VocabularyItem::try_from);
            match item {
                Ok(item) => loaded.items.push(item),
                Err(e) => {
                    tracing::warn!(index, error = %e, "skipping invalid vocabulary record");
                    loaded.skipped.push(format!("record {}: {}", index, e));
                }
            }
        }

        // The next save drops skipped records; keep the file they came from.
        if !loaded.skipped.is_empty() {
            loaded.preserved = Some(self.preserve_note());
        }

        Ok(Some(loaded))
    }

    fn save(&self, items: &[&VocabularyItem]) -> Result<()> {
        let json = serde_json::to_string_pretty(items)?;
        self.atomic_write(&json)
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}
