//! Format trait definition
//!
//! Every input or output representation of a PageDump graph implements
//! [`Format`]. Formats that read documents override [`Format::parse`]; formats
//! that write them override [`Format::serialize`].

use crate::error::PublishError;
use crate::model::Graph;
use std::collections::HashMap;

/// Trait for document formats
///
/// # Examples
///
/// ```ignore
/// struct TitleFormat;
///
/// impl Format for TitleFormat {
///     fn name(&self) -> &str {
///         "title"
///     }
///
///     fn supports_serialization(&self) -> bool {
///         true
///     }
///
///     fn serialize(&self, graph: &Graph) -> Result<String, PublishError> {
///         Ok(graph.root_page().map(|p| p.title.clone()).unwrap_or_default())
///     }
/// }
/// ```
pub trait Format: Send + Sync {
    /// The name of this format (e.g., "markdown", "tokens")
    fn name(&self) -> &str;

    fn description(&self) -> &str {
        ""
    }

    /// File extensions associated with this format, without the leading dot.
    ///
    /// Used for automatic format detection from filenames.
    fn file_extensions(&self) -> &[&str] {
        &[]
    }

    fn supports_parsing(&self) -> bool {
        false
    }

    fn supports_serialization(&self) -> bool {
        false
    }

    /// Parse source text into a Graph
    fn parse(&self, _source: &str) -> Result<Graph, PublishError> {
        Err(PublishError::NotSupported(format!(
            "Format '{}' does not support parsing",
            self.name()
        )))
    }

    /// Serialize a Graph, starting at its root page
    fn serialize(&self, _graph: &Graph) -> Result<String, PublishError> {
        Err(PublishError::NotSupported(format!(
            "Format '{}' does not support serialization",
            self.name()
        )))
    }

    /// Serialize a Graph, optionally using extra parameters.
    ///
    /// The default implementation accepts no parameters and delegates to
    /// [`Format::serialize`].
    fn serialize_with_options(
        &self,
        graph: &Graph,
        options: &HashMap<String, String>,
    ) -> Result<String, PublishError> {
        if options.is_empty() {
            self.serialize(graph)
        } else {
            Err(PublishError::NotSupported(format!(
                "Format '{}' does not support extra parameters",
                self.name()
            )))
        }
    }
}
