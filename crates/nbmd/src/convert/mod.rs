mod output;

use crate::prelude::*;
use std::path::{Path, PathBuf};

use nbmd_core::convert::{
    markdown_to_notebook, notebook_to_markdown, ConversionResult, ConversionSummary, Direction,
};
use nbmd_core::notebook::{parse_notebook, serialize_notebook};

#[derive(Debug, clap::Parser)]
#[command(name = "convert")]
#[command(about = "Convert between notebooks (.ipynb) and Markdown (.md)")]
pub struct App {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, clap::Subcommand)]
pub enum Commands {
    /// Convert a Jupyter Notebook (.ipynb) to Markdown (.md). Outputs are excluded.
    #[clap(name = "notebook")]
    Notebook(ConvertOptions),

    /// Convert Markdown (.md, .markdown) to a Jupyter Notebook (.ipynb)
    #[clap(name = "markdown")]
    Markdown(ConvertOptions),
}

#[derive(Debug, clap::Args, Clone)]
pub struct ConvertOptions {
    /// Path to the file to convert
    pub source: String,

    /// Directory to save the converted file to (created if missing)
    #[arg(short, long, env = "NBMD_OUTPUT_DIR", default_value = ".")]
    pub output_dir: String,

    /// Output the conversion result as JSON
    #[arg(long)]
    pub json: bool,
}

pub async fn run(app: App, _global: crate::Global) -> Result<()> {
    let (options, direction) = match app.command {
        Commands::Notebook(options) => (options, Direction::NotebookToMarkdown),
        Commands::Markdown(options) => (options, Direction::MarkdownToNotebook),
    };

    // Conversions do blocking file I/O
    let result = tokio::task::spawn_blocking({
        let options = options.clone();
        move || convert(direction, &options.source, &options.output_dir)
    })
    .await?;

    if options.json {
        output::output_json(&result)?;
    } else if let ConversionResult::Success(summary) = &result {
        output::output_formatted(summary, direction)?;
    }

    match result {
        ConversionResult::Success(_) => Ok(()),
        ConversionResult::Error { message } => Err(eyre!(message)),
    }
}

/// Dispatch to the conversion matching `direction`.
pub fn convert(direction: Direction, source_path: &str, output_dir: &str) -> ConversionResult {
    match direction {
        Direction::NotebookToMarkdown => convert_notebook(source_path, output_dir),
        Direction::MarkdownToNotebook => convert_markdown(source_path, output_dir),
    }
}

/// Convert a `.ipynb` file to `<output_dir>/<stem>.md`.
///
/// Never fails: every error is reported through [`ConversionResult::Error`].
pub fn convert_notebook(source_path: &str, output_dir: &str) -> ConversionResult {
    match notebook_file_to_markdown(Path::new(source_path), Path::new(output_dir)) {
        Ok(summary) => {
            log::info!(
                "Conversion successful. Processed {} cells. File: {}",
                summary.total_cells,
                summary.output_path
            );
            ConversionResult::Success(summary)
        }
        Err(e) => {
            log::error!("Notebook conversion failed: {e}");
            ConversionResult::error(e.to_string())
        }
    }
}

/// Convert a `.md`/`.markdown` file to `<output_dir>/<stem>.ipynb`.
///
/// Never fails: every error is reported through [`ConversionResult::Error`].
pub fn convert_markdown(source_path: &str, output_dir: &str) -> ConversionResult {
    match markdown_file_to_notebook(Path::new(source_path), Path::new(output_dir)) {
        Ok(summary) => {
            log::info!(
                "Conversion successful. Created {} cells. File: {}",
                summary.total_cells,
                summary.output_path
            );
            ConversionResult::Success(summary)
        }
        Err(e) => {
            log::error!("Markdown conversion failed: {e}");
            ConversionResult::error(e.to_string())
        }
    }
}

fn notebook_file_to_markdown(source: &Path, output_dir: &Path) -> Result<ConversionSummary, Error> {
    let output_file = prepare(Direction::NotebookToMarkdown, source, output_dir)?;

    log::info!("Starting conversion of '{}' to Markdown...", file_name(source));

    let json = std::fs::read_to_string(source)?;
    let notebook = parse_notebook(&json)?;
    let markdown = notebook_to_markdown(&notebook.cells);

    std::fs::write(&output_file, &markdown.content)?;

    Ok(ConversionSummary::processed(&output_file, markdown.counts))
}

fn markdown_file_to_notebook(source: &Path, output_dir: &Path) -> Result<ConversionSummary, Error> {
    let output_file = prepare(Direction::MarkdownToNotebook, source, output_dir)?;

    log::info!("Starting conversion of '{}' to Jupyter Notebook...", file_name(source));

    let content = std::fs::read_to_string(source)?;
    let parsed = markdown_to_notebook(&content);
    let json = serialize_notebook(&parsed.notebook)?;

    std::fs::write(&output_file, json)?;

    Ok(ConversionSummary::created(&output_file, parsed.counts))
}

/// Validate the source, create the output directory, and return the output file path.
fn prepare(direction: Direction, source: &Path, output_dir: &Path) -> Result<PathBuf, Error> {
    if !source.is_file() {
        return Err(Error::SourceNotFound(source.display().to_string()));
    }

    direction
        .validate_extension(source)
        .map_err(Error::InvalidExtension)?;

    std::fs::create_dir_all(output_dir)?;

    Ok(direction.output_path(source, output_dir))
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}
