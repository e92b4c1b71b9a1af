use regex::Regex;
use std::sync::OnceLock;

use super::types::CellCounts;
use super::{BOUNDARY_MARKER, DEFAULT_LANGUAGE};
use crate::notebook::{Cell, Notebook};

/// Notebook parsed from Markdown, plus how many cells of each kind were created.
#[derive(Debug, Clone, PartialEq)]
pub struct NotebookDocument {
    pub notebook: Notebook,
    pub counts: CellCounts,
}

fn fence_regex() -> &'static Regex {
    static RE_FENCE: OnceLock<Regex> = OnceLock::new();
    RE_FENCE.get_or_init(|| Regex::new(r"(?s)```(\w+)?\s*\n(.*?)\n```").unwrap())
}

/// Parse a Markdown document into a notebook.
///
/// The text is first split on [`BOUNDARY_MARKER`]; each segment is then scanned for
/// fenced code blocks. Text between fences becomes markdown cells, fence bodies become
/// code cells. Fences tagged with a language other than Python keep their tag as a
/// `# Language: <tag>` first line. A document with no content yields a single empty
/// code cell.
///
/// Neither step validates structure: an unterminated fence stays part of the
/// surrounding markdown, and a marker inside a fence still splits the segment.
pub fn markdown_to_notebook(content: &str) -> NotebookDocument {
    let mut cells: Vec<Cell> = content
        .split(BOUNDARY_MARKER)
        .filter(|segment| !segment.trim().is_empty())
        .flat_map(segment_to_cells)
        .collect();

    if cells.is_empty() {
        cells.push(Cell::code(""));
    }

    let mut counts = CellCounts::default();
    for cell in &cells {
        counts.increment(cell.kind());
    }

    NotebookDocument {
        notebook: Notebook::new(cells),
        counts,
    }
}

/// Split one boundary-delimited segment into alternating markdown and code cells.
fn segment_to_cells(segment: &str) -> Vec<Cell> {
    let mut cells = Vec::new();
    let mut last_end = 0;

    for captures in fence_regex().captures_iter(segment) {
        let Some(fence) = captures.get(0) else {
            continue;
        };

        push_markdown(&mut cells, &segment[last_end..fence.start()]);

        let language = captures
            .get(1)
            .map(|m| m.as_str())
            .unwrap_or(DEFAULT_LANGUAGE);
        let code = captures.get(2).map(|m| m.as_str().trim()).unwrap_or("");

        if !code.is_empty() {
            cells.push(Cell::code(tag_language(language, code)));
        }

        last_end = fence.end();
    }

    push_markdown(&mut cells, &segment[last_end..]);

    cells
}

fn push_markdown(cells: &mut Vec<Cell>, text: &str) {
    let text = text.trim();
    if !text.is_empty() {
        cells.push(Cell::markdown(text));
    }
}

fn tag_language(language: &str, code: &str) -> String {
    if language.eq_ignore_ascii_case(DEFAULT_LANGUAGE) {
        code.to_string()
    } else {
        format!("# Language: {language}\n{code}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notebook::CellKind;

    fn sources(doc: &NotebookDocument) -> Vec<(CellKind, &str)> {
        doc.notebook
            .cells
            .iter()
            .map(|cell| (cell.kind(), cell.source()))
            .collect()
    }

    #[test]
    fn test_title_and_code_block() {
        let doc = markdown_to_notebook("# Title\n\n```python\nprint(1)\n```\n");
        assert_eq!(
            sources(&doc),
            vec![(CellKind::Markdown, "# Title"), (CellKind::Code, "print(1)")]
        );
        assert_eq!(doc.counts.markdown, 1);
        assert_eq!(doc.counts.code, 1);
        assert_eq!(doc.counts.raw, None);
        assert_eq!(doc.counts.total(), 2);
    }

    #[test]
    fn test_plain_text_is_single_markdown_cell() {
        let doc = markdown_to_notebook("\n\n# Just text\n\nSecond paragraph\n\n");
        assert_eq!(
            sources(&doc),
            vec![(CellKind::Markdown, "# Just text\n\nSecond paragraph")]
        );
    }

    #[test]
    fn test_boundary_splits_markdown_cells() {
        let doc = markdown_to_notebook("a\n\n<!-- NOTEBOOK_CELL_BOUNDARY -->\n\nb");
        assert_eq!(
            sources(&doc),
            vec![(CellKind::Markdown, "a"), (CellKind::Markdown, "b")]
        );
    }

    #[test]
    fn test_empty_segments_are_dropped() {
        let doc = markdown_to_notebook(
            "<!-- NOTEBOOK_CELL_BOUNDARY -->\n  \n<!-- NOTEBOOK_CELL_BOUNDARY -->a",
        );
        assert_eq!(sources(&doc), vec![(CellKind::Markdown, "a")]);
    }

    #[test]
    fn test_untagged_fence_defaults_to_python() {
        let doc = markdown_to_notebook("```\nx = 1\n```");
        assert_eq!(sources(&doc), vec![(CellKind::Code, "x = 1")]);
    }

    #[test]
    fn test_foreign_language_is_tagged() {
        let doc = markdown_to_notebook("```javascript\nconsole.log(1);\n```");
        assert_eq!(
            sources(&doc),
            vec![(CellKind::Code, "# Language: javascript\nconsole.log(1);")]
        );
    }

    #[test]
    fn test_python_tag_is_case_insensitive() {
        let doc = markdown_to_notebook("```Python\nx\n```");
        assert_eq!(sources(&doc), vec![(CellKind::Code, "x")]);
    }

    #[test]
    fn test_text_between_and_after_fences() {
        let doc = markdown_to_notebook(
            "intro\n```python\na\n```\nmiddle\n```bash\nls -la\n```\noutro\n",
        );
        assert_eq!(
            sources(&doc),
            vec![
                (CellKind::Markdown, "intro"),
                (CellKind::Code, "a"),
                (CellKind::Markdown, "middle"),
                (CellKind::Code, "# Language: bash\nls -la"),
                (CellKind::Markdown, "outro"),
            ]
        );
        assert_eq!(doc.counts.markdown, 3);
        assert_eq!(doc.counts.code, 2);
    }

    #[test]
    fn test_multiline_code_body_is_trimmed() {
        let doc = markdown_to_notebook("```python\n\ndef f():\n    return 1\n\n```");
        assert_eq!(
            sources(&doc),
            vec![(CellKind::Code, "def f():\n    return 1")]
        );
    }

    #[test]
    fn test_blank_fence_body_creates_no_cell() {
        let doc = markdown_to_notebook("before\n```python\n   \n```\nafter");
        assert_eq!(
            sources(&doc),
            vec![(CellKind::Markdown, "before"), (CellKind::Markdown, "after")]
        );
    }

    #[test]
    fn test_unterminated_fence_stays_markdown() {
        let text = "Some text\n```python\nx = 1\nno closing fence";
        let doc = markdown_to_notebook(text);
        assert_eq!(sources(&doc), vec![(CellKind::Markdown, text)]);
    }

    #[test]
    fn test_boundary_inside_fence_still_splits() {
        let doc = markdown_to_notebook(
            "```python\nx = 1\n<!-- NOTEBOOK_CELL_BOUNDARY -->\ny = 2\n```",
        );
        // Neither half has a closing fence of its own, so both degrade to markdown.
        assert_eq!(
            sources(&doc),
            vec![
                (CellKind::Markdown, "```python\nx = 1"),
                (CellKind::Markdown, "y = 2\n```"),
            ]
        );
    }

    #[test]
    fn test_whitespace_only_input_yields_one_empty_code_cell() {
        let doc = markdown_to_notebook("  \n\t\n");
        assert_eq!(sources(&doc), vec![(CellKind::Code, "")]);
        assert_eq!(doc.counts.code, 1);
        assert_eq!(doc.counts.markdown, 0);
    }

    #[test]
    fn test_only_boundaries_yields_one_empty_code_cell() {
        let doc = markdown_to_notebook("<!-- NOTEBOOK_CELL_BOUNDARY -->\n<!-- NOTEBOOK_CELL_BOUNDARY -->");
        assert_eq!(sources(&doc), vec![(CellKind::Code, "")]);
    }

    #[test]
    fn test_created_code_cells_are_fresh() {
        let doc = markdown_to_notebook("```python\nx\n```");
        match &doc.notebook.cells[0] {
            Cell::Code {
                execution_count,
                outputs,
                ..
            } => {
                assert!(execution_count.is_none());
                assert!(outputs.is_empty());
            }
            other => panic!("expected code cell, got {other:?}"),
        }
    }

    #[test]
    fn test_default_metadata_is_python3() {
        let doc = markdown_to_notebook("```rust\nfn main() {}\n```");
        let kernelspec = doc.notebook.metadata.kernelspec.as_ref().unwrap();
        assert_eq!(kernelspec.name, "python3");
        assert_eq!(kernelspec.display_name, "Python 3");
        let language_info = doc.notebook.metadata.language_info.as_ref().unwrap();
        assert_eq!(language_info.name, "python");
        assert_eq!(doc.notebook.nbformat, 4);
    }
}
