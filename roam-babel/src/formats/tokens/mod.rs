//! Token stream format implementation
//!
//! Emits the tokenized graph as a pretty-printed JSON array, one object per
//! token, for consumption by an external renderer.

use crate::error::PublishError;
use crate::format::Format;
use crate::model::Graph;
use crate::tokenize::{tokenize_node_with, TokenizeOptions};
use std::collections::HashMap;

#[derive(Debug, Clone, Default)]
pub struct TokensFormat {
    options: TokenizeOptions,
}

impl TokensFormat {
    pub fn new(options: TokenizeOptions) -> Self {
        Self { options }
    }

    fn render(&self, graph: &Graph, options: &TokenizeOptions) -> Result<String, PublishError> {
        let tokens = tokenize_node_with(graph.root()?, graph, options)?;
        let mut json = serde_json::to_string_pretty(&tokens)
            .map_err(|e| PublishError::Serialization(e.to_string()))?;
        json.push('\n');
        Ok(json)
    }
}

impl Format for TokensFormat {
    fn name(&self) -> &str {
        "tokens"
    }

    fn description(&self) -> &str {
        "Token stream as JSON"
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
