//! Document publishing pipeline.
//!
//! One call that validates a graph, serializes it through the format registry
//! and optionally writes the result to disk. Use [`FormatRegistry`] directly
//! for more control.

use crate::error::PublishError;
use crate::model::Graph;
use crate::registry::FormatRegistry;
use crate::validation::validate;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Specifies how to publish a graph.
///
/// ```ignore
/// let spec = PublishSpec::new(&graph, "commonmark")
///     .with_output_path("doc.md")
///     .with_option("breaks", "false");
/// ```
#[derive(Debug)]
pub struct PublishSpec<'a> {
    pub graph: &'a Graph,
    /// Target format name (e.g., "markdown", "tokens").
    pub format: &'a str,
    /// When set, content is written here instead of returned.
    pub output: Option<PathBuf>,
    /// Format-specific options.
    pub options: HashMap<String, String>,
    /// Refuse to publish a graph that fails validation.
    pub validate: bool,
}

impl<'a> PublishSpec<'a> {
    pub fn new(graph: &'a Graph, format: &'a str) -> Self {
        Self {
            graph,
            format,
            output: None,
            options: HashMap::new(),
            validate: true,
        }
    }

    pub fn with_output_path(mut self, path: impl AsRef<Path>) -> Self {
        self.output = Some(path.as_ref().to_path_buf());
        self
    }

    pub fn with_option(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.options.insert(key.into(), value.into());
        self
    }

    pub fn with_options(mut self, options: HashMap<String, String>) -> Self {
        self.options.extend(options);
        self
    }

    pub fn with_validation(mut self, validate: bool) -> Self {
        self.validate = validate;
        self
    }
}

/// The output from a successful publish operation.
#[derive(Debug, Clone, PartialEq)]
pub enum PublishArtifact {
    InMemory(String),
    File(PathBuf),
}

/// Validate (unless disabled) and serialize a graph, then deliver the text.
///
/// # Errors
///
/// - [`PublishError::Invalid`] with every rule failure when validation is on
///   and the graph breaks an invariant
/// - any format lookup, walk or serialization error
/// - [`PublishError::Io`] when the output cannot be written
pub fn publish(spec: PublishSpec<'_>) -> Result<PublishArtifact, PublishError> {
    if spec.validate {
        if let Some(failures) = validate(spec.graph) {
            warn!(failures = failures.len(), "refusing to publish invalid graph");
            return Err(PublishError::Invalid(failures));
        }
    }

    let registry = FormatRegistry::with_defaults();
    let text = registry.serialize_with_options(spec.graph, spec.format, &spec.options)?;
    info!(format = spec.format, bytes = text.len(), "published");

    match spec.output {
        Some(path) => {
            fs::write(&path, text)
                .map_err(|err| PublishError::Io(format!("{}: {err}", path.display())))?;
            Ok(PublishArtifact::File(path))
        }
        None => Ok(PublishArtifact::InMemory(text)),
    }
}
