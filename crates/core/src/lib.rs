//! Core library for nbmd
//!
//! This crate implements the **Functional Core** of the nbmd application,
//! following the Functional Core - Imperative Shell architectural pattern.
//!
//! # Architecture Overview
//!
//! The nbmd project uses a two-crate architecture to enforce separation of concerns:
//!
//! - **`nbmd_core`** (this crate): Pure transformation functions with zero I/O
//! - **`nbmd`**: File system access, the CLI and the MCP server (the Imperative Shell)
//!
//! Nothing in here touches the file system. Reading the source file, creating the
//! output directory and writing the result all happen in the shell, which hands this
//! crate strings and cell lists and gets strings and cell lists back.
//!
//! # Module Organization
//!
//! - [`notebook`]: The notebook data model and its JSON form (nbformat v4)
//! - [`convert`]: Notebook → Markdown rendering, Markdown → notebook parsing, and the
//!   result/count types both directions report
//!
//! # Example Usage
//!
//! ```rust
//! use nbmd_core::convert::{markdown_to_notebook, notebook_to_markdown};
//! use nbmd_core::notebook::Cell;
//!
//! let cells = vec![Cell::markdown("Intro"), Cell::markdown("More"), Cell::code("x=1")];
//!
//! let markdown = notebook_to_markdown(&cells);
//! assert_eq!(markdown.counts.total(), 3);
//!
//! let parsed = markdown_to_notebook(&markdown.content);
//! assert_eq!(parsed.notebook.cells, cells);
//! ```

pub mod convert;
pub mod notebook;
