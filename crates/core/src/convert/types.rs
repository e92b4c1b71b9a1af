use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::notebook::CellKind;

/// Per-kind cell tally.
///
/// `raw` is only tracked when converting from a notebook; notebooks built from Markdown
/// never contain raw cells, so the field is left out of their counts entirely.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellCounts {
    pub markdown: usize,
    pub code: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw: Option<usize>,
}

impl CellCounts {
    /// Counts for notebook input: all three kinds are reported, zero or not.
    pub fn with_raw() -> Self {
        CellCounts {
            markdown: 0,
            code: 0,
            raw: Some(0),
        }
    }

    pub fn increment(&mut self, kind: CellKind) {
        match kind {
            CellKind::Markdown => self.markdown += 1,
            CellKind::Code => self.code += 1,
            CellKind::Raw => *self.raw.get_or_insert(0) += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.markdown + self.code + self.raw.unwrap_or(0)
    }
}

/// Payload of a successful conversion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionSummary {
    pub output_path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cells_processed: Option<CellCounts>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cells_created: Option<CellCounts>,
    pub total_cells: usize,
}

impl ConversionSummary {
    /// Summary for a notebook → Markdown conversion.
    pub fn processed(output_path: &Path, counts: CellCounts) -> Self {
        ConversionSummary {
            output_path: output_path.display().to_string(),
            total_cells: counts.total(),
            cells_processed: Some(counts),
            cells_created: None,
        }
    }

    /// Summary for a Markdown → notebook conversion.
    pub fn created(output_path: &Path, counts: CellCounts) -> Self {
        ConversionSummary {
            output_path: output_path.display().to_string(),
            total_cells: counts.total(),
            cells_processed: None,
            cells_created: Some(counts),
        }
    }

    /// Whichever count block this summary carries.
    pub fn counts(&self) -> Option<&CellCounts> {
        self.cells_processed.as_ref().or(self.cells_created.as_ref())
    }
}

/// Outcome of a conversion operation, serialized with a `status` tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ConversionResult {
    Success(ConversionSummary),
    Error { message: String },
}

impl ConversionResult {
    pub fn error(message: impl Into<String>) -> Self {
        ConversionResult::Error {
            message: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ConversionResult::Success(_))
    }
}

/// Which way a conversion goes. Owns the file naming rules for each side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    NotebookToMarkdown,
    MarkdownToNotebook,
}

impl Direction {
    /// Accepted source extensions, lowercase and without the dot.
    pub fn source_extensions(&self) -> &'static [&'static str] {
        match self {
            Direction::NotebookToMarkdown => &["ipynb"],
            Direction::MarkdownToNotebook => &["md", "markdown"],
        }
    }

    pub fn output_extension(&self) -> &'static str {
        match self {
            Direction::NotebookToMarkdown => "md",
            Direction::MarkdownToNotebook => "ipynb",
        }
    }

    fn source_description(&self) -> &'static str {
        match self {
            Direction::NotebookToMarkdown => "a notebook file (.ipynb)",
            Direction::MarkdownToNotebook => "a Markdown file (.md or .markdown)",
        }
    }

    /// Check the source extension, case-insensitively.
    pub fn validate_extension(&self, source: &Path) -> Result<(), String> {
        let extension = source
            .extension()
            .map(|ext| ext.to_string_lossy().to_lowercase())
            .unwrap_or_default();

        if self.source_extensions().contains(&extension.as_str()) {
            return Ok(());
        }

        let got = if extension.is_empty() {
            "no extension".to_string()
        } else {
            format!(".{extension}")
        };

        Err(format!(
            "Source file must be {}, got: {got}",
            self.source_description()
        ))
    }

    /// `<output_dir>/<source stem>.<output extension>`
    pub fn output_path(&self, source: &Path, output_dir: &Path) -> PathBuf {
        let stem = source
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        output_dir.join(format!("{stem}.{}", self.output_extension()))
    }
}
