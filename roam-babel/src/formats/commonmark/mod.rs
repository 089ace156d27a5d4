//! CommonMark format implementation
//!
//! Tokenizes the graph from its root page and renders the token stream back
//! to text with comrak. Unlike the `markdown` format the output is normalized:
//! Roam italics become emphasis, block quotes keep their paragraphs and the
//! whole document is re-serialized in comrak's canonical style.

pub mod serializer;

pub use serializer::render_commonmark;

use crate::error::PublishError;
use crate::format::Format;
use crate::model::Graph;
use crate::tokenize::{tokenize_node_with, TokenizeOptions};
use std::collections::HashMap;

#[derive(Debug, Clone, Default)]
pub struct CommonMarkFormat {
    options: TokenizeOptions,
}

impl CommonMarkFormat {
    pub fn new(options: TokenizeOptions) -> Self {
        Self { options }
    }

    fn render(&self, graph: &Graph, options: &TokenizeOptions) -> Result<String, PublishError> {
        let tokens = tokenize_node_with(graph.root()?, graph, options)?;
        render_commonmark(&tokens)
    }
}

impl Format for CommonMarkFormat {
    fn name(&self) -> &str {
        "commonmark"
    }

    fn description(&self) -> &str {
        "Normalized CommonMark rendered from the token stream"
    }

    fn supports_serialization(&self) -> bool {
        true
    }

    fn serialize(&self, graph: &Graph) -> Result<String, PublishError> {
        self.render(graph, &self.options)
    }

    fn serialize_with_options(
        &self,
        graph: &Graph,
        options: &HashMap<String, String>,
    ) -> Result<String, PublishError> {
        let options = super::tokenize_options_from_params(self.options, options)?;
        self.render(graph, &options)
    }
}
