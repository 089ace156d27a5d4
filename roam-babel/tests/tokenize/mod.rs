//! Tokenize tests (PageDump → token stream)

use crate::common::creative_brief;
use roam_babel::tokenize::{tokenize_node, tokenize_node_with, CommonMarkOptions, TokenizeOptions};
use roam_babel::{FormatRegistry, Token};

fn kinds(tokens: &[Token]) -> Vec<&str> {
    tokens.iter().map(|t| t.kind.as_str()).collect()
}

#[test]
fn test_tokenize_creative_brief() {
    let graph = creative_brief();
    let root = graph.root().unwrap();
    let tokens = tokenize_node(root, &graph, true).unwrap();

    assert_eq!(
        kinds(&tokens),
        [
            "heading_open",
            "inline",
            "heading_close",
            "paragraph_open",
            "inline",
            "paragraph_close",
            "heading_open",
            "inline",
            "heading_close",
            "blockquote_open",
            "paragraph_open",
            "inline",
            "paragraph_close",
            "paragraph_open",
            "inline",
            "paragraph_close",
            "blockquote_close",
            "fence",
            "paragraph_open",
            "inline",
            "paragraph_close",
        ]
    );
    assert_eq!(tokens[0].tag, "h1");
    assert_eq!(tokens[6].tag, "h2");
    assert_eq!(tokens[6].markup, "##");
    assert_eq!(tokens[17].info, "javascript");
    assert_eq!(tokens[17].content, "__results__ = []\n");
}

#[test]
fn test_normalization_only_touches_content_outside_code() {
    let graph = creative_brief();
    let block = graph.get("hfm6NKq2c").unwrap();

    let normalized = tokenize_node(block, &graph, true).unwrap();
    let inline = normalized[1].children.as_ref().unwrap();
    assert!(kinds(inline).contains(&"em_open"));

    let raw = tokenize_node(block, &graph, false).unwrap();
    let inline = raw[1].children.as_ref().unwrap();
    assert!(kinds(inline).contains(&"strong_open"));
}

#[test]
fn test_without_normalization_quote_paragraph_escapes() {
    let graph = creative_brief();
    let quote = graph.get("6r7Q5nxw5").unwrap();
    let tokens = tokenize_node(quote, &graph, false).unwrap();
    assert_eq!(
        kinds(&tokens),
        [
            "blockquote_open",
            "paragraph_open",
            "inline",
            "paragraph_close",
            "blockquote_close",
            "paragraph_open",
            "inline",
            "paragraph_close",
        ]
    );
}

#[test]
fn test_soft_breaks_follow_options() {
    let graph = roam_babel::load_json_str(
        r#"[{"uid": "c", "vertex-type": "roam/block-content", "media-type": "text/plain",
             "text": "line one\nline two"}]"#,
    )
    .unwrap();
    let block = graph.get("c").unwrap();
    let options = TokenizeOptions {
        normalize: true,
        commonmark: CommonMarkOptions {
            breaks: false,
            html: false,
        },
    };
    let tokens = tokenize_node_with(block, &graph, &options).unwrap();
    let inline = tokens[1].children.as_ref().unwrap();
    assert_eq!(kinds(inline), ["text", "softbreak", "text"]);
}

#[test]
fn test_tokens_format_is_json() {
    let graph = creative_brief();
    let json = FormatRegistry::default().serialize(&graph, "tokens").unwrap();
    let tokens: Vec<Token> = serde_json::from_str(&json).unwrap();
    assert_eq!(tokens.len(), 21);
    assert_eq!(tokens[0].kind, "heading_open");
}
