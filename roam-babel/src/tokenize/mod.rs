//! PageDump → token stream.
//!
//! Pages and block headings are turned into synthetic heading tokens. Content
//! blocks are optionally normalized from Roam markdown to CommonMark and then
//! handed to the [`CommonMarkTokenizer`]. Children follow their parent, so the
//! result is one flat stream in document order.

pub mod commonmark;
pub mod token;

pub use commonmark::{CommonMarkOptions, CommonMarkTokenizer};
pub use token::Token;

use crate::error::PublishError;
use crate::model::{Graph, Vertex};
use crate::normalize::normalize;
use crate::walk::Walk;
use tracing::trace;

/// How content blocks are tokenized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenizeOptions {
    /// Rewrite Roam markdown into CommonMark before parsing.
    pub normalize: bool,
    pub commonmark: CommonMarkOptions,
}

impl Default for TokenizeOptions {
    fn default() -> Self {
        Self {
            normalize: true,
            commonmark: CommonMarkOptions::default(),
        }
    }
}

/// Tokenize `node` and its descendants with the default parser switches.
pub fn tokenize_node(
    node: &Vertex,
    graph: &Graph,
    normalize_to_commonmark: bool,
) -> Result<Vec<Token>, PublishError> {
    let options = TokenizeOptions {
        normalize: normalize_to_commonmark,
        ..TokenizeOptions::default()
    };
    tokenize_node_with(node, graph, &options)
}

pub fn tokenize_node_with(
    node: &Vertex,
    graph: &Graph,
    options: &TokenizeOptions,
) -> Result<Vec<Token>, PublishError> {
    let tokenizer = CommonMarkTokenizer::new(options.commonmark);
    let mut walk = Walk::new(graph);
    tokenize_with(&mut walk, node, &tokenizer, options.normalize)
}

fn tokenize_with<'g>(
    walk: &mut Walk<'g>,
    node: &'g Vertex,
    tokenizer: &CommonMarkTokenizer,
    normalize_content: bool,
) -> Result<Vec<Token>, PublishError> {
    trace!(node = %node, "tokenizing");
    let mut tokens = match node {
        Vertex::Page(page) => Token::heading(1, page.title.trim()),
        Vertex::BlockHeading(heading) => Token::heading(heading.level, heading.heading.trim()),
        Vertex::BlockContent(block) if normalize_content => {
            tokenizer.parse(&normalize(&block.content))
        }
        Vertex::BlockContent(block) => tokenizer.parse(&block.content),
        Vertex::File(_) => {
            return Err(PublishError::TypeMismatch {
                uid: node.uid().to_string(),
                vertex_type: node.vertex_type(),
            })
        }
    };

    if !node.children().is_empty() {
        let children = walk.descend(node, |walk, child| {
            tokenize_with(walk, child, tokenizer, normalize_content)
        })?;
        tokens.extend(children.into_iter().flatten());
    }
    trace!(node = %node, tokens = tokens.len(), "tokenized");
    Ok(tokens)
}
