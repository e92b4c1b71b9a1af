use super::types::CellCounts;
use super::BOUNDARY_MARKER;
use crate::notebook::{Cell, CellKind};

/// Markdown rendered from a notebook, plus how many cells of each kind were seen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkdownDocument {
    pub content: String,
    pub counts: CellCounts,
}

/// Render notebook cells as a flat Markdown document.
///
/// Code cells become ```` ```python ```` fences and never need a boundary marker. A
/// markdown cell followed by another markdown cell, or a raw cell followed by markdown or
/// raw, gets a [`BOUNDARY_MARKER`] so the two can be told apart when parsing the text back.
/// Blank cells are counted but emit nothing. Outputs are dropped.
pub fn notebook_to_markdown(cells: &[Cell]) -> MarkdownDocument {
    let mut lines: Vec<&str> = Vec::new();
    let mut counts = CellCounts::with_raw();

    for (i, cell) in cells.iter().enumerate() {
        let kind = cell.kind();
        counts.increment(kind);

        let source = cell.source();
        if source.trim().is_empty() {
            continue;
        }

        let next = cells.get(i + 1).map(Cell::kind);

        match kind {
            CellKind::Code => {
                lines.push("```python");
                lines.push(source);
                lines.push("```");
            }
            CellKind::Markdown => {
                lines.push(source);
                if next == Some(CellKind::Markdown) {
                    push_boundary(&mut lines);
                }
            }
            CellKind::Raw => {
                lines.push(source);
                if matches!(next, Some(CellKind::Markdown | CellKind::Raw)) {
                    push_boundary(&mut lines);
                }
            }
        }

        lines.push("");
    }

    while lines.last().is_some_and(|line| line.trim().is_empty()) {
        lines.pop();
    }

    MarkdownDocument {
        content: lines.join("\n"),
        counts,
    }
}

fn push_boundary(lines: &mut Vec<&str>) {
    lines.push("");
    lines.push(BOUNDARY_MARKER);
}
