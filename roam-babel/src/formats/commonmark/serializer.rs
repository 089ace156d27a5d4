//! Token stream → CommonMark text.
//!
//! Pipeline: tokens → Comrak AST → CommonMark string. Block tokens open and
//! close container nodes; `inline` tokens expand their children in place.

use crate::error::PublishError;
use crate::tokenize::Token;
use comrak::nodes::{
    Ast, AstNode, ListDelimType, ListType, NodeCode, NodeCodeBlock, NodeHeading, NodeHtmlBlock,
    NodeLink, NodeList, NodeValue,
};
use comrak::{format_commonmark, Arena, ComrakOptions};
use std::cell::RefCell;

/// Render a token stream as CommonMark.
pub fn render_commonmark(tokens: &[Token]) -> Result<String, PublishError> {
    let arena = Arena::new();
    let root = build_comrak_ast(&arena, tokens)?;

    let mut output = Vec::new();
    format_commonmark(root, &ComrakOptions::default(), &mut output).map_err(|e| {
        PublishError::Serialization(format!("Comrak serialization failed: {e}"))
    })?;

    let markdown = String::from_utf8(output)
        .map_err(|e| PublishError::Serialization(format!("UTF-8 conversion failed: {e}")))?;

    // Comrak separates adjacent lists with an HTML comment; raw HTML is off here.
    Ok(markdown.replace("<!-- end list -->\n\n", ""))
}

fn node<'a>(arena: &'a Arena<AstNode<'a>>, value: NodeValue) -> &'a AstNode<'a> {
    arena.alloc(AstNode::new(RefCell::new(Ast::new(value, (0, 0).into()))))
}

fn build_comrak_ast<'a>(
    arena: &'a Arena<AstNode<'a>>,
    tokens: &[Token],
) -> Result<&'a AstNode<'a>, PublishError> {
    let root = node(arena, NodeValue::Document);
    let mut current_parent: &'a AstNode<'a> = root;
    let mut parent_stack: Vec<&'a AstNode<'a>> = vec![];
    let mut lists: Vec<NodeList> = vec![];

    for (index, token) in tokens.iter().enumerate() {
        if token.is_close() {
            if token.kind == "bullet_list_close" || token.kind == "ordered_list_close" {
                lists.pop();
            }
            current_parent = parent_stack.pop().ok_or_else(|| {
                PublishError::Serialization(format!("Unbalanced {}", token.kind))
            })?;
            continue;
        }

        let value = match token.kind.as_str() {
            "heading_open" => NodeValue::Heading(NodeHeading {
                level: heading_level(&token.tag)?,
                setext: false,
            }),
            "paragraph_open" => NodeValue::Paragraph,
            "blockquote_open" => NodeValue::BlockQuote,
            "bullet_list_open" | "ordered_list_open" => {
                let list = list_from_tokens(token, &tokens[index + 1..]);
                lists.push(list);
                NodeValue::List(list)
            }
            "list_item_open" => {
                let list = lists.last().copied().ok_or_else(|| {
                    PublishError::Serialization("list item outside a list".to_string())
                })?;
                NodeValue::Item(list)
            }
            "inline" => {
                add_inline_tokens(arena, current_parent, token.children.as_deref().unwrap_or(&[]))?;
                continue;
            }
            "fence" | "code_block" => NodeValue::CodeBlock(NodeCodeBlock {
                fenced: token.kind == "fence",
                fence_char: b'`',
                fence_length: 3,
                fence_offset: 0,
                info: token.info.clone(),
                literal: token.content.clone(),
            }),
            "hr" => NodeValue::ThematicBreak,
            "html_block" => NodeValue::HtmlBlock(NodeHtmlBlock {
                block_type: 0,
                literal: token.content.clone(),
            }),
            other => {
                return Err(PublishError::NotSupported(format!(
                    "block token `{other}`"
                )))
            }
        };

        let block = node(arena, value);
        current_parent.append(block);
        if token.is_open() {
            parent_stack.push(current_parent);
            current_parent = block;
        }
    }

    if !parent_stack.is_empty() {
        return Err(PublishError::Serialization(format!(
            "{} unclosed block token(s)",
            parent_stack.len()
        )));
    }
    Ok(root)
}

fn heading_level(tag: &str) -> Result<u8, PublishError> {
    tag.strip_prefix('h')
        .and_then(|level| level.parse::<u8>().ok())
        .filter(|level| (1..=6).contains(level))
        .ok_or_else(|| PublishError::Serialization(format!("invalid heading tag `{tag}`")))
}

/// A list is tight when the paragraphs of its own items are hidden.
fn list_from_tokens(open: &Token, rest: &[Token]) -> NodeList {
    let ordered = open.kind == "ordered_list_open";
    let tight = rest
        .iter()
        .take_while(|t| t.level > open.level)
        .find(|t| t.kind == "paragraph_open" && t.level == open.level + 2)
        .map_or(true, |paragraph| paragraph.hidden);

    NodeList {
        list_type: if ordered {
            ListType::Ordered
        } else {
            ListType::Bullet
        },
        marker_offset: 0,
        padding: 0,
        start: open
            .attr("start")
            .and_then(|start| start.parse().ok())
            .unwrap_or(1),
        delimiter: if open.markup == ")" {
            ListDelimType::Paren
        } else {
            ListDelimType::Period
        },
        bullet_char: open.markup.bytes().next().filter(|_| !ordered).unwrap_or(b'-'),
        tight,
    }
}

fn add_inline_tokens<'a>(
    arena: &'a Arena<AstNode<'a>>,
    parent: &'a AstNode<'a>,
    tokens: &[Token],
) -> Result<(), PublishError> {
    let mut current_parent = parent;
    let mut parent_stack: Vec<&'a AstNode<'a>> = vec![];

    for token in tokens {
        if token.is_close() {
            current_parent = parent_stack.pop().ok_or_else(|| {
                PublishError::Serialization(format!("Unbalanced {}", token.kind))
            })?;
            continue;
        }

        let value = match token.kind.as_str() {
            "text" => NodeValue::Text(token.content.clone()),
            "softbreak" => NodeValue::SoftBreak,
            "hardbreak" => NodeValue::LineBreak,
            "em_open" => NodeValue::Emph,
            "strong_open" => NodeValue::Strong,
            "code_inline" => NodeValue::Code(NodeCode {
                num_backticks: token.markup.len().max(1),
                literal: token.content.clone(),
            }),
            "link_open" => NodeValue::Link(NodeLink {
                url: token.attr("href").unwrap_or_default().to_string(),
                title: token.attr("title").unwrap_or_default().to_string(),
            }),
            "image" => NodeValue::Image(NodeLink {
                url: token.attr("src").unwrap_or_default().to_string(),
                title: token.attr("title").unwrap_or_default().to_string(),
            }),
            "html_inline" => NodeValue::HtmlInline(token.content.clone()),
            other => {
                return Err(PublishError::NotSupported(format!(
                    "inline token `{other}`"
                )))
            }
        };

        let inline = node(arena, value);
        current_parent.append(inline);
        if token.kind == "image" {
            add_inline_tokens(arena, inline, token.children.as_deref().unwrap_or(&[]))?;
        }
        if token.is_open() {
            parent_stack.push(current_parent);
            current_parent = inline;
        }
    }

    if !parent_stack.is_empty() {
        return Err(PublishError::Serialization(
            "unclosed inline token".to_string(),
        ));
    }
    Ok(())
}
