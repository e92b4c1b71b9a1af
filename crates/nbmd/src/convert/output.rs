use crate::prelude::{eprintln, println, *};
use colored::Colorize;
use std::io::IsTerminal;

use nbmd_core::convert::{ConversionResult, ConversionSummary, Direction};

pub fn output_json(result: &ConversionResult) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(result)?);
    Ok(())
}

/// Per-kind count table for a summary, if it carries counts.
pub fn counts_table(
    summary: &ConversionSummary,
    direction: Direction,
) -> Option<prettytable::Table> {
    let counts = summary.counts()?;
    let verb = match direction {
        Direction::NotebookToMarkdown => "Processed",
        Direction::MarkdownToNotebook => "Created",
    };

    let mut table = new_table();
    table.add_row(prettytable::row!["Cell Type", verb]);
    table.add_row(prettytable::row!["markdown", counts.markdown]);
    table.add_row(prettytable::row!["code", counts.code]);
    if let Some(raw) = counts.raw {
        table.add_row(prettytable::row!["raw", raw]);
    }

    Some(table)
}

pub fn output_formatted(summary: &ConversionSummary, direction: Direction) -> Result<()> {
    // Decorations only make sense on a terminal; when piped, print just the output path.
    if !std::io::stdout().is_terminal() {
        println!("{}", summary.output_path);
        return Ok(());
    }

    let heading = match direction {
        Direction::NotebookToMarkdown => "NOTEBOOK TO MARKDOWN",
        Direction::MarkdownToNotebook => "MARKDOWN TO NOTEBOOK",
    };

    eprintln!("\n{}", "=".repeat(80).bright_cyan());
    eprintln!("{}", heading.bright_cyan().bold());
    eprintln!("{}", "=".repeat(80).bright_cyan());

    eprintln!(
        "\n{}: {}",
        "Output".green(),
        summary.output_path.cyan().underline()
    );

    // The whole summary goes to stderr, table included
    if let Some(table) = counts_table(summary, direction) {
        eprintln!();
        table.print(&mut std::io::stderr())?;
    }

    eprintln!(
        "\n{}: {}",
        "Total Cells".green(),
        summary.total_cells.to_string().bright_yellow().bold()
    );
    eprintln!();

    Ok(())
}
