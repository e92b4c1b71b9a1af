//! Notebook ⇄ Markdown transforms.
//!
//! [`notebook_to_markdown`] and [`markdown_to_notebook`] are inverse up to the losses
//! inherent in the text form: outputs and execution counts are dropped, raw cells come
//! back as markdown, and every code cell comes back as Python unless its fence carried
//! another language tag.

pub mod to_markdown;
pub mod to_notebook;
pub mod types;

pub use to_markdown::{notebook_to_markdown, MarkdownDocument};
pub use to_notebook::{markdown_to_notebook, NotebookDocument};
pub use types::{CellCounts, ConversionResult, ConversionSummary, Direction};

/// Separates cells whose seam would otherwise be lost when rendered as plain text.
pub const BOUNDARY_MARKER: &str = "<!-- NOTEBOOK_CELL_BOUNDARY -->";

/// Language assumed for untagged fences and emitted for every code cell.
pub const DEFAULT_LANGUAGE: &str = "python";

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notebook::{Cell, CellKind};

    fn shape(cells: &[Cell]) -> Vec<(CellKind, String)> {
        cells
            .iter()
            .map(|cell| (cell.kind(), cell.source().trim().to_string()))
            .collect()
    }

    #[test]
    fn test_round_trip_preserves_kinds_and_text() {
        let cells = vec![
            Cell::markdown("# Analysis\n\nSome context."),
            Cell::code("import math\nprint(math.pi)\n"),
            Cell::markdown("## Results"),
            Cell::markdown("They look fine."),
            Cell::code("x = 1"),
            Cell::code("y = 2"),
            Cell::markdown("The end."),
        ];

        let markdown = notebook_to_markdown(&cells);
        let parsed = markdown_to_notebook(&markdown.content);

        assert_eq!(shape(&parsed.notebook.cells), shape(&cells));
    }

    #[test]
    fn test_boundary_round_trip() {
        let markdown = notebook_to_markdown(&[Cell::markdown("a"), Cell::markdown("b")]);
        assert!(markdown.content.contains(BOUNDARY_MARKER));

        let parsed = markdown_to_notebook(&markdown.content);
        assert_eq!(
            parsed.notebook.cells,
            vec![Cell::markdown("a"), Cell::markdown("b")]
        );
    }

    #[test]
    fn test_code_fence_separates_markdown_without_boundary() {
        let cells = vec![Cell::markdown("a"), Cell::code("x"), Cell::markdown("b")];
        let markdown = notebook_to_markdown(&cells);
        assert!(!markdown.content.contains(BOUNDARY_MARKER));

        let parsed = markdown_to_notebook(&markdown.content);
        assert_eq!(parsed.notebook.cells, cells);
    }

    #[test]
    fn test_intro_more_code_scenario() {
        let cells = vec![
            Cell::markdown("Intro"),
            Cell::markdown("More"),
            Cell::code("x=1"),
        ];
        let markdown = notebook_to_markdown(&cells);

        assert_eq!(markdown.content.matches(BOUNDARY_MARKER).count(), 1);
        assert_eq!(markdown.content.matches("```python").count(), 1);

        let parsed = markdown_to_notebook(&markdown.content);
        assert_eq!(parsed.notebook.cells, cells);
        assert_eq!(parsed.counts.markdown, 2);
        assert_eq!(parsed.counts.code, 1);
    }

    #[test]
    fn test_raw_cells_come_back_as_markdown() {
        let cells = vec![Cell::raw("raw one"), Cell::raw("raw two"), Cell::code("c")];
        let parsed = markdown_to_notebook(&notebook_to_markdown(&cells).content);
        assert_eq!(
            shape(&parsed.notebook.cells),
            vec![
                (CellKind::Markdown, "raw one".to_string()),
                (CellKind::Markdown, "raw two".to_string()),
                (CellKind::Code, "c".to_string()),
            ]
        );
    }

    #[test]
    fn test_round_trip_resets_outputs() {
        let cells = vec![Cell::Code {
            execution_count: Some(12),
            metadata: Default::default(),
            outputs: vec![serde_json::json!({"output_type": "execute_result"})],
            source: "1 + 1".into(),
        }];
        let parsed = markdown_to_notebook(&notebook_to_markdown(&cells).content);
        assert_eq!(parsed.notebook.cells, vec![Cell::code("1 + 1")]);
    }
}
