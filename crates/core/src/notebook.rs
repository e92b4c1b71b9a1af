use serde::de::{self, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use thiserror::Error;

/// Major format version written to every notebook this crate produces.
pub const NBFORMAT: i64 = 4;
/// Minor format version written to every notebook this crate produces.
pub const NBFORMAT_MINOR: i64 = 4;

#[derive(Error, Debug)]
pub enum NotebookError {
    #[error("Unsupported notebook version: {0}.{1}")]
    UnsupportedVersion(i64, i64),
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Kind of a notebook cell, without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CellKind {
    Markdown,
    Code,
    Raw,
}

impl CellKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CellKind::Markdown => "markdown",
            CellKind::Code => "code",
            CellKind::Raw => "raw",
        }
    }
}

impl std::fmt::Display for CellKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Cell text, normalized to a single string.
///
/// On disk nbformat allows either a string or a list of lines. Both are accepted when
/// reading; writing always produces the list form, one entry per line with its `\n` kept.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Source(pub String);

impl Source {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Source {
    fn from(s: &str) -> Self {
        Source(s.to_string())
    }
}

impl From<String> for Source {
    fn from(s: String) -> Self {
        Source(s)
    }
}

impl Serialize for Source {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.0.split_inclusive('\n'))
    }
}

impl<'de> Deserialize<'de> for Source {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct SourceVisitor;

        impl<'de> Visitor<'de> for SourceVisitor {
            type Value = Source;

            fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
                formatter.write_str("a string or an array of strings")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
                Ok(Source(v.to_string()))
            }

            fn visit_string<E: de::Error>(self, v: String) -> Result<Self::Value, E> {
                Ok(Source(v))
            }

            fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
                Ok(Source::default())
            }

            fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
                let mut text = String::new();
                while let Some(line) = seq.next_element::<String>()? {
                    text.push_str(&line);
                }
                Ok(Source(text))
            }
        }

        deserializer.deserialize_any(SourceVisitor)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "cell_type", rename_all = "lowercase")]
pub enum Cell {
    Markdown {
        #[serde(default)]
        metadata: Map<String, Value>,
        #[serde(default)]
        source: Source,
    },
    Code {
        #[serde(default)]
        execution_count: Option<i64>,
        #[serde(default)]
        metadata: Map<String, Value>,
        #[serde(default)]
        outputs: Vec<Value>,
        #[serde(default)]
        source: Source,
    },
    Raw {
        #[serde(default)]
        metadata: Map<String, Value>,
        #[serde(default)]
        source: Source,
    },
}

impl Cell {
    pub fn markdown(text: impl Into<String>) -> Self {
        Cell::Markdown {
            metadata: Map::new(),
            source: Source(text.into()),
        }
    }

    /// A fresh code cell: no outputs, never executed.
    pub fn code(text: impl Into<String>) -> Self {
        Cell::Code {
            execution_count: None,
            metadata: Map::new(),
            outputs: Vec::new(),
            source: Source(text.into()),
        }
    }

    pub fn raw(text: impl Into<String>) -> Self {
        Cell::Raw {
            metadata: Map::new(),
            source: Source(text.into()),
        }
    }

    pub fn kind(&self) -> CellKind {
        match self {
            Cell::Markdown { .. } => CellKind::Markdown,
            Cell::Code { .. } => CellKind::Code,
            Cell::Raw { .. } => CellKind::Raw,
        }
    }

    pub fn source(&self) -> &str {
        match self {
            Cell::Markdown { source, .. } | Cell::Code { source, .. } | Cell::Raw { source, .. } => {
                source.as_str()
            }
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KernelSpec {
    pub display_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LanguageInfo {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mimetype: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_extension: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NotebookMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kernelspec: Option<KernelSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language_info: Option<LanguageInfo>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl NotebookMetadata {
    /// Kernel and language descriptors for a plain Python 3 notebook.
    pub fn python3() -> Self {
        NotebookMetadata {
            kernelspec: Some(KernelSpec {
                display_name: "Python 3".to_string(),
                language: Some("python".to_string()),
                name: "python3".to_string(),
            }),
            language_info: Some(LanguageInfo {
                name: "python".to_string(),
                version: Some("3".to_string()),
                mimetype: Some("text/x-python".to_string()),
                file_extension: Some(".py".to_string()),
            }),
            extra: Map::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notebook {
    pub cells: Vec<Cell>,
    #[serde(default)]
    pub metadata: NotebookMetadata,
    pub nbformat: i64,
    #[serde(default)]
    pub nbformat_minor: i64,
}

impl Notebook {
    /// Build a v4 notebook around `cells` with the default Python 3 metadata.
    pub fn new(cells: Vec<Cell>) -> Self {
        Notebook {
            cells,
            metadata: NotebookMetadata::python3(),
            nbformat: NBFORMAT,
            nbformat_minor: NBFORMAT_MINOR,
        }
    }
}

/// Notebook as written by nbformat 3: cells are grouped into worksheets and headings are
/// a cell type of their own.
#[derive(Debug, Deserialize)]
struct NotebookV3 {
    #[serde(default)]
    metadata: NotebookMetadata,
    #[serde(default)]
    worksheets: Vec<WorksheetV3>,
}

#[derive(Debug, Deserialize)]
struct WorksheetV3 {
    #[serde(default)]
    cells: Vec<CellV3>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "cell_type", rename_all = "lowercase")]
enum CellV3 {
    Heading {
        #[serde(default = "default_heading_level")]
        level: usize,
        #[serde(default)]
        metadata: Map<String, Value>,
        #[serde(default)]
        source: Source,
    },
    Markdown {
        #[serde(default)]
        metadata: Map<String, Value>,
        #[serde(default)]
        source: Source,
    },
    Code {
        #[serde(default)]
        prompt_number: Option<i64>,
        #[serde(default)]
        metadata: Map<String, Value>,
        #[serde(default)]
        input: Source,
    },
    Raw {
        #[serde(default)]
        metadata: Map<String, Value>,
        #[serde(default)]
        source: Source,
    },
}

fn default_heading_level() -> usize {
    1
}

impl From<CellV3> for Cell {
    fn from(cell: CellV3) -> Self {
        match cell {
            CellV3::Heading {
                level,
                metadata,
                source,
            } => {
                let prefix = "#".repeat(level.max(1));
                let text = source.as_str().trim();
                let source = if text.is_empty() {
                    prefix
                } else {
                    format!("{prefix} {text}")
                };
                Cell::Markdown {
                    metadata,
                    source: Source(source),
                }
            }
            CellV3::Markdown { metadata, source } => Cell::Markdown { metadata, source },
            // v3 outputs use a different schema and never reach the Markdown form
            CellV3::Code {
                prompt_number,
                metadata,
                input,
            } => Cell::Code {
                execution_count: prompt_number,
                metadata,
                outputs: Vec::new(),
                source: input,
            },
            CellV3::Raw { metadata, source } => Cell::Raw { metadata, source },
        }
    }
}

/// Flatten the worksheets of a v3 notebook into a single v4 cell list.
fn upgrade_v3(value: Value) -> Result<Notebook, NotebookError> {
    let notebook: NotebookV3 = serde_json::from_value(value)?;

    let cells = notebook
        .worksheets
        .into_iter()
        .flat_map(|worksheet| worksheet.cells)
        .map(Cell::from)
        .collect();

    Ok(Notebook {
        cells,
        metadata: notebook.metadata,
        nbformat: NBFORMAT,
        nbformat_minor: NBFORMAT_MINOR,
    })
}

/// Parse notebook JSON.
///
/// Any 4.x notebook parses as is. A 3.x notebook is upgraded in memory to the v4 shape.
/// Every other major version is rejected.
pub fn parse_notebook(json: &str) -> Result<Notebook, NotebookError> {
    let value: Value = serde_json::from_str(json)?;
    let nbformat = value["nbformat"].as_i64().unwrap_or(0);
    let nbformat_minor = value["nbformat_minor"].as_i64().unwrap_or(0);

    match nbformat {
        NBFORMAT => Ok(serde_json::from_value(value)?),
        3 => upgrade_v3(value),
        _ => Err(NotebookError::UnsupportedVersion(nbformat, nbformat_minor)),
    }
}

/// Serialize a notebook as pretty-printed JSON with a trailing newline.
pub fn serialize_notebook(notebook: &Notebook) -> Result<String, NotebookError> {
    let mut json = serde_json::to_string_pretty(notebook)?;
    json.push('\n');
    Ok(json)
}
