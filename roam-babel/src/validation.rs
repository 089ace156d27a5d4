//! Graph invariant checks.
//!
//! A PageDump graph is only as good as the exporter that produced it, so before
//! a graph is published it is run through a fixed, ordered list of
//! [`ValidationRule`]s. Each rule is a pure check over the whole [`Graph`];
//! rules never depend on one another and all of them always run, so a single
//! call to [`validate`] yields the complete diagnostic report.
//!
//! The rules, in order:
//!
//! | Rule                                | Invariant                                                        |
//! |-------------------------------------|------------------------------------------------------------------|
//! | `RootPageRule`                      | first vertex is a page                                           |
//! | `ChildrenExistRule`                 | every `children` uid is a vertex                                 |
//! | `ReferencesExistRule`               | every `references` uid is a vertex                               |
//! | `BlockParentsExistRule`             | every block uid is listed in exactly one `children`              |
//! | `ChildrenVertexTypesRule`           | no page or file is listed as a child                             |
//! | `PageNodeChildrenRule`              | page children are blocks                                         |
//! | `BlockHeadingChildrenRule`          | heading children are blocks                                      |
//! | `ChildrenAttributeAppearanceRule`   | only pages and blocks declare `children`                         |
//! | `ReferencesAttributeAppearanceRule` | only content blocks declare `references`                         |
//! | `ReferencesAppearInContentRule`     | each reference is written `[[uid]]`, `((uid))` or `<<uid>>`      |
//!
//! Checks that need to resolve a uid skip the ones that do not resolve; those
//! are reported by the `*ExistRule`s instead.

use crate::model::{Graph, LinkKind, Uid, Vertex, VertexType};
use std::collections::HashMap;
use std::fmt;
use tracing::{debug, info, trace};

/// Outcome of a rule: `None` when the graph satisfies it.
pub type ValidationResult = Option<Vec<ValidationFailure>>;

type Check = fn(&'static ValidationRule, &Graph) -> ValidationResult;

/// A named invariant check over a whole graph.
#[derive(Debug)]
pub struct ValidationRule {
    pub name: &'static str,
    pub description: &'static str,
    check: Check,
}

impl ValidationRule {
    pub fn validate(&'static self, graph: &Graph) -> ValidationResult {
        let result = (self.check)(self, graph);
        debug!(rule = self.name, passed = result.is_none(), "validated");
        result
    }

    fn fail(&'static self, message: String) -> ValidationResult {
        Some(vec![ValidationFailure {
            rule: self,
            message,
        }])
    }
}

impl PartialEq for ValidationRule {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for ValidationRule {}

/// One violated invariant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationFailure {
    pub rule: &'static ValidationRule,
    pub message: String,
}

impl fmt::Display for ValidationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.rule.name, self.message)
    }
}

pub static ROOT_PAGE_RULE: ValidationRule = ValidationRule {
    name: "RootPageRule",
    description: "first vertex in the graph is a page; the root of the document",
    check: validate_root_page,
};

pub static CHILDREN_EXIST_RULE: ValidationRule = ValidationRule {
    name: "ChildrenExistRule",
    description: "every uid appearing in `children` has a corresponding vertex",
    check: validate_children_exist,
};

pub static REFERENCES_EXIST_RULE: ValidationRule = ValidationRule {
    name: "ReferencesExistRule",
    description: "every uid appearing in `references` has a corresponding vertex",
    check: validate_references_exist,
};

pub static BLOCK_PARENTS_EXIST_RULE: ValidationRule = ValidationRule {
    name: "BlockParentsExistRule",
    description: "every block heading and block content uid appears in exactly one `children` list",
    check: validate_block_parents_exist,
};

pub static CHILDREN_VERTEX_TYPES_RULE: ValidationRule = ValidationRule {
    name: "ChildrenVertexTypesRule",
    description: "no page or file uid appears in any `children` list",
    check: validate_children_vertex_types,
};

pub static PAGE_NODE_CHILDREN_RULE: ValidationRule = ValidationRule {
    name: "PageNodeChildrenRule",
    description: "all `children` of a page are block headings or block contents",
    check: validate_page_node_children,
};

pub static BLOCK_HEADING_CHILDREN_RULE: ValidationRule = ValidationRule {
    name: "BlockHeadingChildrenRule",
    description: "all `children` of a block heading are block headings or block contents",
    check: validate_block_heading_children,
};

pub static CHILDREN_ATTRIBUTE_APPEARANCE_RULE: ValidationRule = ValidationRule {
    name: "ChildrenAttributeAppearanceRule",
    description: "`children` can only appear on pages, block headings and block contents",
    check: validate_children_attribute_appearance,
};

pub static REFERENCES_ATTRIBUTE_APPEARANCE_RULE: ValidationRule = ValidationRule {
    name: "ReferencesAttributeAppearanceRule",
    description: "`references` can only appear on block contents",
    check: validate_references_attribute_appearance,
};

pub static REFERENCES_APPEAR_IN_CONTENT_RULE: ValidationRule = ValidationRule {
    name: "ReferencesAppearInContentRule",
    description: "every reference of a block content appears in its content as [[uid]], ((uid)) or <<uid>>",
    check: validate_references_appear_in_content,
};

/// Every rule, in the order [`validate`] runs them.
pub static ALL_RULES: [&ValidationRule; 10] = [
    &ROOT_PAGE_RULE,
    &CHILDREN_EXIST_RULE,
    &REFERENCES_EXIST_RULE,
    &BLOCK_PARENTS_EXIST_RULE,
    &CHILDREN_VERTEX_TYPES_RULE,
    &PAGE_NODE_CHILDREN_RULE,
    &BLOCK_HEADING_CHILDREN_RULE,
    &CHILDREN_ATTRIBUTE_APPEARANCE_RULE,
    &REFERENCES_ATTRIBUTE_APPEARANCE_RULE,
    &REFERENCES_APPEAR_IN_CONTENT_RULE,
];

const BLOCK_TYPES: [VertexType; 2] = [VertexType::BlockHeading, VertexType::BlockContent];

/// Check every invariant of a PageDump graph.
///
/// Returns `None` when all rules pass, otherwise every failure, in rule order.
pub fn validate(graph: &Graph) -> ValidationResult {
    let failures: Vec<ValidationFailure> = ALL_RULES
        .into_iter()
        .filter_map(|rule| rule.validate(graph))
        .flatten()
        .collect();
    info!(
        vertices = graph.len(),
        failures = failures.len(),
        "graph validated"
    );

    if failures.is_empty() {
        None
    } else {
        Some(failures)
    }
}

fn validate_root_page(rule: &'static ValidationRule, graph: &Graph) -> ValidationResult {
    let first = graph.first()?;
    trace!(first = %first, "root candidate");
    if first.vertex_type() == VertexType::Page {
        return None;
    }
    rule.fail(format!(
        "is not {}; first vertex: {first}",
        VertexType::Page
    ))
}

fn dangling_links(graph: &Graph, kind: LinkKind) -> Vec<&Uid> {
    graph
        .all_linked_uids(kind)
        .into_iter()
        .filter(|uid| !graph.contains(uid))
        .collect()
}

fn validate_children_exist(rule: &'static ValidationRule, graph: &Graph) -> ValidationResult {
    let dangling = dangling_links(graph, LinkKind::Children);
    if dangling.is_empty() {
        return None;
    }
    rule.fail(format!(
        "uids found in `children` are not vertices of the graph; dangling children: {dangling:?}"
    ))
}

fn validate_references_exist(rule: &'static ValidationRule, graph: &Graph) -> ValidationResult {
    let dangling = dangling_links(graph, LinkKind::References);
    if dangling.is_empty() {
        return None;
    }
    rule.fail(format!(
        "uids found in `references` are not vertices of the graph; dangling references: {dangling:?}"
    ))
}

fn validate_block_parents_exist(rule: &'static ValidationRule, graph: &Graph) -> ValidationResult {
    let mut parent_counts: HashMap<&str, usize> = HashMap::new();
    for uid in graph.all_linked_uids(LinkKind::Children) {
        *parent_counts.entry(uid.as_str()).or_default() += 1;
    }

    // Orphans only mean something relative to a root page. Without one the
    // root page rule already reports the defect.
    let check_orphans = graph.root_page().is_some();
    let invalid: Vec<String> = graph
        .iter()
        .filter(|vertex| vertex.vertex_type().is_block())
        .filter_map(|vertex| {
            let count = parent_counts.get(vertex.uid()).copied().unwrap_or(0);
            let bad = count > 1 || (count == 0 && check_orphans);
            bad.then(|| format!("{}: {count}", vertex.uid()))
        })
        .collect();
    trace!(?invalid, "block parent counts");

    if invalid.is_empty() {
        return None;
    }
    rule.fail(format!(
        "block uids with invalid number of parents: {{{}}}",
        invalid.join(", ")
    ))
}

fn validate_children_vertex_types(
    rule: &'static ValidationRule,
    graph: &Graph,
) -> ValidationResult {
    let invalid: Vec<String> = graph
        .all_linked_uids(LinkKind::Children)
        .into_iter()
        .filter_map(|uid| graph.get(uid))
        .filter(|child| !child.vertex_type().is_block())
        .map(Vertex::to_string)
        .collect();
    if invalid.is_empty() {
        return None;
    }
    rule.fail(format!(
        "(page | file) vertices appearing as children: [{}]",
        invalid.join(", ")
    ))
}

/// Children of every `parent_type` vertex must resolve to one of `allowed`.
fn validate_node_children(
    rule: &'static ValidationRule,
    graph: &Graph,
    parent_type: VertexType,
    allowed: &[VertexType],
) -> ValidationResult {
    let invalid: Vec<&Uid> = graph
        .iter()
        .filter(|vertex| vertex.vertex_type() == parent_type)
        .flat_map(|vertex| vertex.children())
        .filter(|uid| {
            graph
                .get(uid)
                .is_some_and(|child| !allowed.contains(&child.vertex_type()))
        })
        .collect();
    trace!(%parent_type, ?invalid, "node children");
    if invalid.is_empty() {
        return None;
    }
    rule.fail(format!("invalid children: {invalid:?}"))
}

fn validate_page_node_children(rule: &'static ValidationRule, graph: &Graph) -> ValidationResult {
    validate_node_children(rule, graph, VertexType::Page, &BLOCK_TYPES)
}

fn validate_block_heading_children(
    rule: &'static ValidationRule,
    graph: &Graph,
) -> ValidationResult {
    validate_node_children(rule, graph, VertexType::BlockHeading, &BLOCK_TYPES)
}

/// Vertices declaring a non-empty `kind` link must be one of `carriers`.
fn validate_attribute_appearance(
    rule: &'static ValidationRule,
    graph: &Graph,
    kind: LinkKind,
    carriers: &[VertexType],
) -> ValidationResult {
    let invalid: Vec<String> = graph
        .iter()
        .filter(|vertex| kind.is_declared_on(vertex))
        .filter(|vertex| !carriers.contains(&vertex.vertex_type()))
        .map(Vertex::to_string)
        .collect();
    trace!(%kind, ?invalid, "attribute carriers");
    if invalid.is_empty() {
        return None;
    }
    rule.fail(format!("invalid {kind} carriers: [{}]", invalid.join(", ")))
}

fn validate_children_attribute_appearance(
    rule: &'static ValidationRule,
    graph: &Graph,
) -> ValidationResult {
    validate_attribute_appearance(
        rule,
        graph,
        LinkKind::Children,
        &[
            VertexType::Page,
            VertexType::BlockHeading,
            VertexType::BlockContent,
        ],
    )
}

fn validate_references_attribute_appearance(
    rule: &'static ValidationRule,
    graph: &Graph,
) -> ValidationResult {
    validate_attribute_appearance(
        rule,
        graph,
        LinkKind::References,
        &[VertexType::BlockContent],
    )
}

/// Whether `content` mentions `uid` as a page ref, block ref or alias ref.
///
/// This is a plain substring search, so a reference may be matched by text
/// that only happens to look like one.
pub fn content_contains_reference(content: &str, uid: &str) -> bool {
    [
        format!("[[{uid}]]"),
        format!("(({uid}))"),
        format!("<<{uid}>>"),
    ]
    .iter()
    .any(|form| content.contains(form.as_str()))
}

fn validate_references_appear_in_content(
    rule: &'static ValidationRule,
    graph: &Graph,
) -> ValidationResult {
    let danglers: Vec<String> = graph
        .iter()
        .filter_map(|vertex| match vertex {
            Vertex::BlockContent(block) => Some(block),
            _ => None,
        })
        .filter_map(|block| {
            let missing: Vec<&Uid> = block
                .links
                .references
                .iter()
                .flatten()
                .filter(|uid| !content_contains_reference(&block.content, uid))
                .collect();
            (!missing.is_empty()).then(|| format!("{}: {missing:?}", block.header.uid))
        })
        .collect();
    if danglers.is_empty() {
        return None;
    }
    rule.fail(format!(
        "references not appearing in content: {{{}}}",
        danglers.join(", ")
    ))
}
