//! Export command for Lexis.
//!
//! Writes the vocabulary as CSV for spreadsheets and other tools.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::VocabularyItem;
use crate::error::{LexisError, Result};
use crate::storage::{VocabularyPersistence, VocabularyStore};

/// CSV header row.
pub const CSV_HEADER: [&str; 6] = [
    "word",
    "definition",
    "example",
    "date_added",
    "tags",
    "repetition_number",
];

/// Options for the export command.
#[derive(Debug, Clone, Default)]
pub struct ExportOptions {
    /// Output as JSON.
    pub json: bool,
    /// Suppress output.
    pub quiet: bool,
}

/// Output format for the export command.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportOutput {
    /// Whether the file was written.
    pub success: bool,
    /// Destination file.
    pub path: String,
    /// Number of items exported.
    pub count: usize,
    /// Error message if the export failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ExportOutput {
    /// Create a successful output.
    pub fn success(path: &Path, count: usize) -> Self {
        Self {
            success: true,
            path: path.display().to_string(),
            count,
            error: None,
        }
    }

    /// Create a failed output.
    pub fn failure(path: &Path, error: impl Into<String>) -> Self {
        Self {
            success: false,
            path: path.display().to_string(),
            count: 0,
            error: Some(error.into()),
        }
    }
}

/// The export command implementation.
pub struct ExportCommand<'a, P: VocabularyPersistence> {
    store: &'a VocabularyStore<P>,
}

impl<'a, P: VocabularyPersistence> ExportCommand<'a, P> {
    /// Create a new export command.
    pub fn new(store: &'a VocabularyStore<P>) -> Self {
        Self { store }
    }

    /// Run the export command.
    pub fn run(&self, path: &Path, _options: &ExportOptions) -> ExportOutput {
        let mut items = self.store.all();
        if items.is_empty() {
            return ExportOutput::failure(path, "no vocabulary to export");
        }
        items.sort_by(|a, b| a.word().cmp(b.word()));

        match write_csv(path, &items) {
            Ok(()) => {
                tracing::info!(path = %path.display(), count = items.len(), "vocabulary exported");
                ExportOutput::success(path, items.len())
            }
            Err(e) => ExportOutput::failure(path, e.to_string()),
        }
    }

    /// Format output based on options.
    pub fn format_output(&self, output: &ExportOutput, options: &ExportOptions) -> String {
        if options.quiet {
            return String::new();
        }

        if options.json {
            return serde_json::to_string_pretty(output).unwrap_or_else(|_| "{}".to_string());
        }

        if output.success {
            format!("Exported {} item(s) to {}", output.count, output.path)
        } else {
            format!(
                "Export failed: {}",
                output.error.as_deref().unwrap_or("unknown error")
            )
        }
    }
}

/// Render items as CSV.
///
/// Text columns are always quoted; the repetition count is left bare.
pub fn to_csv(items: &[VocabularyItem]) -> Result<Vec<u8>> {
    let mut writer = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::NonNumeric)
        .from_writer(Vec::new());

    let csv_err = |e: csv::Error| LexisError::serde(format!("CSV encoding failed: {}", e));

    writer.write_record(CSV_HEADER).map_err(csv_err)?;
    for item in items {
        let date_added = item.date_added().format("%Y-%m-%d").to_string();
        let tags = item.tags().iter().cloned().collect::<Vec<_>>().join(";");
        let repetitions = item.repetition_number().to_string();
        writer
            .write_record([
                item.word(),
                item.definition(),
                item.example(),
                date_added.as_str(),
                tags.as_str(),
                repetitions.as_str(),
            ])
            .map_err(csv_err)?;
    }

    writer
        .into_inner()
        .map_err(|e| LexisError::serde(format!("CSV encoding failed: {}", e.error())))
}

fn write_csv(path: &Path, items: &[VocabularyItem]) -> Result<()> {
    let bytes = to_csv(items)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        if !parent.exists() {
            fs::create_dir_all(parent).map_err(|e| LexisError::storage(parent, e))?;
        }
    }

    fs::write(path, bytes).map_err(|e| LexisError::storage(path, e))
}
