//! Validation scenarios against a realistic PageDump.

use crate::common::creative_brief;
use proptest::prelude::*;
use roam_babel::model::{Graph, LinkKind};
use roam_babel::validation::{validate, ALL_RULES, BLOCK_PARENTS_EXIST_RULE, ROOT_PAGE_RULE};

#[test]
fn test_fixture_is_valid() {
    let graph = creative_brief();
    assert_eq!(validate(&graph), None);
    for rule in ALL_RULES {
        assert_eq!(rule.validate(&graph), None, "{} failed", rule.name);
    }
}

#[test]
fn test_removing_root_page_fails_only_root_rule() {
    let graph = creative_brief().without("lALsKb-Dx");
    let failures = validate(&graph).unwrap();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].rule, &ROOT_PAGE_RULE);
}

#[test]
fn test_second_parent_fails_unique_parent_rule() {
    let graph = creative_brief();
    let heading = graph.get("4jf3ZlLqF").unwrap();
    let mut children = heading.children().to_vec();
    children.push("Mw66e2LRj".to_string());
    let graph = graph.with_vertex(heading.with_children(Some(children)));

    let failures = validate(&graph).unwrap();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].rule, &BLOCK_PARENTS_EXIST_RULE);
    assert!(failures[0].message.contains("Mw66e2LRj"));
}

#[test]
fn test_failures_display_rule_and_message() {
    let graph = creative_brief().without("hfm6NKq2c");
    let failures = validate(&graph).unwrap();
    let lines: Vec<String> = failures.iter().map(ToString::to_string).collect();
    assert!(lines[0].starts_with("ChildrenExistRule: "));
    assert!(lines.iter().any(|l| l.starts_with("ReferencesExistRule: ")));
}

#[test]
fn test_empty_graph_is_valid() {
    assert_eq!(validate(&Graph::new()), None);
}

proptest! {
    #[test]
    fn validate_is_none_iff_every_rule_passes(drop in 0usize..7) {
        let graph = creative_brief();
        let uid = graph.uids().nth(drop).unwrap().to_string();
        let graph = graph.without(&uid);

        let all_pass = ALL_RULES.iter().all(|rule| rule.validate(&graph).is_none());
        prop_assert_eq!(validate(&graph).is_none(), all_pass);
    }

    #[test]
    fn linked_children_follow_graph_order(drop in 0usize..7) {
        let graph = creative_brief();
        let uid = graph.uids().nth(drop).unwrap().to_string();
        let graph = graph.without(&uid);

        let expected: Vec<&String> = graph.iter().flat_map(|v| v.children()).collect();
        prop_assert_eq!(graph.all_linked_uids(LinkKind::Children), expected);
    }
}
