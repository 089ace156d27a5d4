//! Flattens a PageDump tree into one CommonMark document.
//!
//! Every node is rendered as a block and joined to its descendants with a blank
//! line. Headings keep their level, content blocks are emitted verbatim (after
//! trimming) and the root page alone closes the document with a single newline,
//! whether or not it has children.

use crate::error::PublishError;
use crate::model::{Graph, Vertex};
use crate::walk::Walk;
use tracing::trace;

const BLOCK_SEPARATOR: &str = "\n\n";

/// Export `node` and its descendants as CommonMark text.
///
/// Files have no textual form and yield [`PublishError::TypeMismatch`]. A
/// missing child aborts the export with [`PublishError::Lookup`].
pub fn export_node(node: &Vertex, graph: &Graph) -> Result<String, PublishError> {
    export_with(&mut Walk::new(graph), node)
}

fn export_with<'g>(walk: &mut Walk<'g>, node: &'g Vertex) -> Result<String, PublishError> {
    trace!(node = %node, "exporting");
    let own = match node {
        Vertex::Page(page) => format!("# {}", page.title.trim()),
        Vertex::BlockHeading(heading) => {
            format!("{} {}", "#".repeat(heading.level), heading.heading.trim())
        }
        Vertex::BlockContent(block) => block.content.trim().to_string(),
        Vertex::File(_) => {
            return Err(PublishError::TypeMismatch {
                uid: node.uid().to_string(),
                vertex_type: node.vertex_type(),
            })
        }
    };

    let mut document = if node.children().is_empty() {
        own
    } else {
        let mut blocks = vec![own];
        blocks.extend(walk.descend(node, export_with)?);
        trace!(blocks = blocks.len(), "children exported");
        blocks.join(BLOCK_SEPARATOR)
    };
    if matches!(node, Vertex::Page(_)) {
        document.push('\n');
    }
    Ok(document)
}
