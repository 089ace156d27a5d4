//! Depth-first descent through `children` links.

use crate::error::PublishError;
use crate::model::{Graph, Vertex};

/// Tracks the chain of ancestors during a tree walk so a `children` link back
/// to an ancestor is reported instead of recursing forever.
pub(crate) struct Walk<'g> {
    graph: &'g Graph,
    ancestors: Vec<&'g str>,
}

impl<'g> Walk<'g> {
    pub(crate) fn new(graph: &'g Graph) -> Self {
        Self {
            graph,
            ancestors: Vec::new(),
        }
    }

    /// Visit `vertex`, then each of its children through `visit`, in order.
    ///
    /// `visit` receives the walk back so it can descend further.
    pub(crate) fn descend<T>(
        &mut self,
        vertex: &'g Vertex,
        mut visit: impl FnMut(&mut Self, &'g Vertex) -> Result<T, PublishError>,
    ) -> Result<Vec<T>, PublishError> {
        let uid = vertex.uid();
        if self.ancestors.contains(&uid) {
            return Err(PublishError::Cycle {
                uid: uid.to_string(),
            });
        }

        self.ancestors.push(uid);
        let visited = vertex
            .children()
            .iter()
            .map(|child_uid| {
                let child = self.graph.get(child_uid).ok_or_else(|| PublishError::Lookup {
                    uid: child_uid.clone(),
                })?;
                visit(self, child)
            })
            .collect::<Result<Vec<_>, _>>();
        self.ancestors.pop();
        visited
    }
}
