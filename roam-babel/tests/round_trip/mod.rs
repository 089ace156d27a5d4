//! Tokenize → render must agree with export.
//!
//! Comparison is done on the HTML comrak produces for both sides, with the
//! exported content normalized the same way the tokenizer normalizes it.

use crate::common::creative_brief;
use comrak::{markdown_to_html, ComrakOptions};
use roam_babel::model::{BlockContent, Graph, Vertex};
use roam_babel::{export_node, normalize, render_commonmark, tokenize_node, FormatRegistry};

fn html(markdown: &str) -> String {
    markdown_to_html(markdown, &ComrakOptions::default())
}

fn normalized(graph: &Graph) -> Graph {
    graph
        .iter()
        .map(|vertex| match vertex {
            Vertex::BlockContent(block) => Vertex::BlockContent(BlockContent {
                content: normalize(&block.content),
                ..block.clone()
            }),
            other => other.clone(),
        })
        .collect()
}

#[test]
fn test_render_matches_export() {
    let graph = creative_brief();
    let root = graph.root().unwrap();

    let tokens = tokenize_node(root, &graph, true).unwrap();
    let rendered = render_commonmark(&tokens).unwrap();

    let expected_graph = normalized(&graph);
    let exported = export_node(expected_graph.root().unwrap(), &expected_graph).unwrap();

    assert_eq!(html(&rendered), html(&exported));
}

#[test]
fn test_commonmark_format_renders_emphasis() {
    let graph = creative_brief();
    let rendered = FormatRegistry::default()
        .serialize(&graph, "commonmark")
        .unwrap();
    assert!(rendered.starts_with("# Creative Brief\n"));
    assert!(rendered.contains("*before*"));
    assert!(!rendered.contains("__before__"));
    assert!(rendered.contains("__results__ = []"));
}

#[test]
fn test_plain_document_round_trips() {
    let graph = roam_babel::load_json_str(
        r#"[
            {"uid": "p", "vertex-type": "roam/page", "media-type": "text/plain",
             "text": "Title", "children": ["c"]},
            {"uid": "c", "vertex-type": "roam/block-content", "media-type": "text/plain",
             "text": "Some paragraph."}
        ]"#,
    )
    .unwrap();
    let root = graph.root().unwrap();
    let rendered = render_commonmark(&tokenize_node(root, &graph, true).unwrap()).unwrap();
    assert_eq!(rendered, export_node(root, &graph).unwrap());
}

#[test]
fn test_adjacent_lists_render_without_html_separator() {
    let graph = roam_babel::load_json_str(
        r#"[
            {"uid": "p", "vertex-type": "roam/page", "media-type": "text/plain",
             "text": "T", "children": ["a", "b"]},
            {"uid": "a", "vertex-type": "roam/block-content", "media-type": "text/markdown",
             "text": "- one"},
            {"uid": "b", "vertex-type": "roam/block-content", "media-type": "text/markdown",
             "text": "- two"}
        ]"#,
    )
    .unwrap();
    let rendered = FormatRegistry::default()
        .serialize(&graph, "commonmark")
        .unwrap();
    assert!(!rendered.contains("<!--"));
    assert!(rendered.contains("- one\n"));
    assert!(rendered.contains("- two\n"));
}
