use nbmd_core::notebook::NotebookError;

/// Failures along a single conversion. Never leaves the conversion functions:
/// it is rendered into a `ConversionResult::Error` message.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Source file not found: {0}")]
    SourceNotFound(String),

    #[error("{0}")]
    InvalidExtension(String),

    #[error(transparent)]
    Notebook(#[from] NotebookError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
