//! Format registry for format discovery and selection

use crate::error::PublishError;
use crate::format::Format;
use crate::model::Graph;
use std::collections::HashMap;

/// Registry of document formats, keyed by name.
///
/// # Examples
///
/// ```ignore
/// let registry = FormatRegistry::default();
/// let graph = registry.parse(&source, "pagedump")?;
/// let markdown = registry.serialize(&graph, "markdown")?;
/// ```
pub struct FormatRegistry {
    formats: HashMap<String, Box<dyn Format>>,
}

impl FormatRegistry {
    pub fn new() -> Self {
        FormatRegistry {
            formats: HashMap::new(),
        }
    }

    /// Register a format, replacing any format of the same name.
    pub fn register<F: Format + 'static>(&mut self, format: F) {
        self.formats.insert(format.name().to_string(), Box::new(format));
    }

    pub fn get(&self, name: &str) -> Result<&dyn Format, PublishError> {
        self.formats
            .get(name)
            .map(|f| f.as_ref())
            .ok_or_else(|| PublishError::FormatNotFound(name.to_string()))
    }

    pub fn has(&self, name: &str) -> bool {
        self.formats.contains_key(name)
    }

    /// List all available format names (sorted)
    pub fn list_formats(&self) -> Vec<String> {
        let mut names: Vec<_> = self.formats.keys().cloned().collect();
        names.sort();
        names
    }

    /// Detect format from filename based on file extension
    pub fn detect_format_from_filename(&self, filename: &str) -> Option<String> {
        let extension = std::path::Path::new(filename)
            .extension()
            .and_then(|ext| ext.to_str())?;

        self.formats
            .values()
            .find(|format| format.file_extensions().contains(&extension))
            .map(|format| format.name().to_string())
    }

    /// Parse source text using the specified format
    pub fn parse(&self, source: &str, format: &str) -> Result<Graph, PublishError> {
        let fmt = self.get(format)?;
        if !fmt.supports_parsing() {
            return Err(PublishError::NotSupported(format!(
                "Format '{format}' does not support parsing"
            )));
        }
        fmt.parse(source)
    }

    /// Serialize a graph using the specified format
    pub fn serialize(&self, graph: &Graph, format: &str) -> Result<String, PublishError> {
        self.serialize_with_options(graph, format, &HashMap::new())
    }

    /// Serialize a graph using the specified format and options
    pub fn serialize_with_options(
        &self,
        graph: &Graph,
        format: &str,
        options: &HashMap<String, String>,
    ) -> Result<String, PublishError> {
        let fmt = self.get(format)?;
        if !fmt.supports_serialization() {
            return Err(PublishError::NotSupported(format!(
                "Format '{format}' does not support serialization"
            )));
        }
        fmt.serialize_with_options(graph, options)
    }

    /// Create a registry with default formats
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();

        registry.register(crate::formats::pagedump::PageDumpFormat);
        registry.register(crate::formats::markdown::MarkdownFormat);
        registry.register(crate::formats::commonmark::CommonMarkFormat::default());
        registry.register(crate::formats::tokens::TokensFormat::default());

        registry
    }
}

impl Default for FormatRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::Format;

    struct TestFormat;
    impl Format for TestFormat {
        fn name(&self) -> &str {
            "test"
        }
        fn description(&self) -> &str {
            "Test format"
        }
        fn file_extensions(&self) -> &[&str] {
            &["tst"]
        }
        fn supports_parsing(&self) -> bool {
            true
        }
        fn supports_serialization(&self) -> bool {
            true
        }
        fn parse(&self, _source: &str) -> Result<Graph, PublishError> {
            Ok(Graph::new())
        }
        fn serialize(&self, graph: &Graph) -> Result<String, PublishError> {
            Ok(format!("{} vertices", graph.len()))
        }
    }

    #[test]
    fn test_registry_creation() {
        let registry = FormatRegistry::new();
        assert_eq!(registry.formats.len(), 0);
    }

    #[test]
    fn test_registry_register() {
        let mut registry = FormatRegistry::new();
        registry.register(TestFormat);

        assert!(registry.has("test"));
        assert!(!registry.has("nonexistent"));
        assert_eq!(registry.list_formats(), vec!["test"]);
    }

    #[test]
    fn test_registry_get_nonexistent() {
        let registry = FormatRegistry::new();
        match registry.get("nonexistent") {
            Err(PublishError::FormatNotFound(name)) => assert_eq!(name, "nonexistent"),
            _ => panic!("Expected FormatNotFound error"),
        }
    }

    #[test]
    fn test_registry_round_trip() {
        let mut registry = FormatRegistry::new();
        registry.register(TestFormat);

        let graph = registry.parse("input", "test").unwrap();
        assert_eq!(registry.serialize(&graph, "test").unwrap(), "0 vertices");
    }

    #[test]
    fn test_registry_rejects_unknown_options() {
        let mut registry = FormatRegistry::new();
        registry.register(TestFormat);

        let options = HashMap::from([("breaks".to_string(), "true".to_string())]);
        let result = registry.serialize_with_options(&Graph::new(), "test", &options);
        assert!(matches!(result, Err(PublishError::NotSupported(_))));
    }

    #[test]
    fn test_detect_format_from_filename() {
        let registry = FormatRegistry::default();
        assert_eq!(
            registry.detect_format_from_filename("dump.json"),
            Some("pagedump".to_string())
        );
        assert_eq!(
            registry.detect_format_from_filename("doc.md"),
            Some("markdown".to_string())
        );
        assert_eq!(registry.detect_format_from_filename("doc.unknown"), None);
    }

    #[test]
    fn test_default_formats() {
        let registry = FormatRegistry::default();
        assert_eq!(
            registry.list_formats(),
            vec!["commonmark", "markdown", "pagedump", "tokens"]
        );
    }

    #[test]
    fn test_markdown_does_not_parse() {
        let registry = FormatRegistry::default();
        assert!(matches!(
            registry.parse("# doc", "markdown"),
            Err(PublishError::NotSupported(_))
        ));
    }
}
