//! Markdown format implementation
//!
//! Writes the graph as one CommonMark document by walking it from the root
//! page with [`export_node`]. Content blocks are copied through untouched, so
//! Roam-only syntax such as `__italic__` or `[[page refs]]` survives as is.
//! Use the `commonmark` format for normalized output.

use crate::error::PublishError;
use crate::export::export_node;
use crate::format::Format;
use crate::model::Graph;

/// Format implementation for Markdown
pub struct MarkdownFormat;

impl Format for MarkdownFormat {
    fn name(&self) -> &str {
        "markdown"
    }

    fn description(&self) -> &str {
        "Roam markdown flattened into one document"
    }

    fn file_extensions(&self) -> &[&str] {
        &["md", "markdown"]
    }

    fn supports_serialization(&self) -> bool {
        true
    }

    fn serialize(&self, graph: &Graph) -> Result<String, PublishError> {
        export_node(graph.root()?, graph)
    }
}
