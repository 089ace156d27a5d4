//! Export tests (PageDump → flattened Roam markdown)

use crate::common::creative_brief;
use insta::assert_snapshot;
use roam_babel::format::Format;
use roam_babel::formats::markdown::MarkdownFormat;
use roam_babel::{export_node, PublishError};

#[test]
fn test_export_creative_brief() {
    let graph = creative_brief();
    let md = MarkdownFormat.serialize(&graph).unwrap();
    assert_snapshot!(md, @r###"
    # Creative Brief

    The brief for [[Page 3]], written __before__ any code.

    ## solution 2 (hard to understand)

    > every programmer makes a decision

    each time they write some code

    ```javascript
    __results__ = []
    ```

    A picture of ((hfm6NKq2c)) ![flower](https://example.com/flower.jpeg)
    "###);
    assert!(md.ends_with(")\n"));
}

#[test]
fn test_export_subtree_has_no_trailing_newline() {
    let graph = creative_brief();
    let heading = graph.get("4jf3ZlLqF").unwrap();
    let md = export_node(heading, &graph).unwrap();
    assert!(md.starts_with("## solution 2"));
    assert!(md.ends_with("```"));
}

#[test]
fn test_export_file_is_a_type_mismatch() {
    let graph = creative_brief();
    let file = graph.get("9b673aae-8089-4a91-84df-9dac152a7f94").unwrap();
    assert!(matches!(
        export_node(file, &graph),
        Err(PublishError::TypeMismatch { .. })
    ));
}

#[test]
fn test_export_requires_root_page() {
    let graph = creative_brief().without("lALsKb-Dx");
    assert!(matches!(
        MarkdownFormat.serialize(&graph),
        Err(PublishError::TypeMismatch { .. })
    ));
}
