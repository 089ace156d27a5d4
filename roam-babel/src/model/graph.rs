//! The order-preserving vertex map every pipeline operates over.

use crate::error::PublishError;
use crate::model::record::Record;
use crate::model::vertex::{Page, Uid, Vertex, VertexType};
use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// The two kinds of link a node may declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LinkKind {
    Children,
    References,
}

impl LinkKind {
    pub fn field_name(&self) -> &'static str {
        match self {
            LinkKind::Children => "children",
            LinkKind::References => "references",
        }
    }

    /// The identifiers `vertex` declares under this link; empty when absent.
    pub fn of<'a>(&self, vertex: &'a Vertex) -> &'a [Uid] {
        match self {
            LinkKind::Children => vertex.children(),
            LinkKind::References => vertex.references(),
        }
    }

    /// Whether `vertex` declares this link with at least one identifier.
    pub fn is_declared_on(&self, vertex: &Vertex) -> bool {
        !self.of(vertex).is_empty()
    }
}

impl fmt::Display for LinkKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.field_name())
    }
}

/// Identifier → vertex map that remembers declaration order.
///
/// Iteration yields vertices in the order they appeared in the export, so the
/// first vertex is the document root. A graph is never mutated once built; the
/// `with_*`/`without` helpers return new graphs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Graph {
    vertices: Vec<Vertex>,
    index: HashMap<Uid, usize>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a graph from vertices in document order.
    ///
    /// A repeated uid keeps its first position and takes the later value.
    pub fn from_vertices<I>(vertices: I) -> Self
    where
        I: IntoIterator<Item = Vertex>,
    {
        let mut graph = Graph::new();
        for vertex in vertices {
            graph.insert(vertex);
        }
        graph
    }

    /// Shape every record into a vertex; the first malformed record aborts construction.
    pub fn from_records<I>(records: I) -> Result<Self, PublishError>
    where
        I: IntoIterator<Item = Record>,
    {
        let vertices = records
            .into_iter()
            .map(|record| Vertex::try_from_record(&record))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::from_vertices(vertices))
    }

    fn insert(&mut self, vertex: Vertex) {
        match self.index.get(vertex.uid()) {
            Some(&position) => self.vertices[position] = vertex,
            None => {
                self.index.insert(vertex.uid().to_string(), self.vertices.len());
                self.vertices.push(vertex);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn get(&self, uid: &str) -> Option<&Vertex> {
        self.index.get(uid).map(|&position| &self.vertices[position])
    }

    pub fn contains(&self, uid: &str) -> bool {
        self.index.contains_key(uid)
    }

    /// Vertices in document order.
    pub fn iter(&self) -> std::slice::Iter<'_, Vertex> {
        self.vertices.iter()
    }

    pub fn uids(&self) -> impl Iterator<Item = &str> {
        self.vertices.iter().map(Vertex::uid)
    }

    /// The first vertex; the document root of a valid graph.
    pub fn first(&self) -> Option<&Vertex> {
        self.vertices.first()
    }

    /// The first vertex, if it is a page.
    pub fn root_page(&self) -> Option<&Page> {
        match self.first() {
            Some(Vertex::Page(page)) => Some(page),
            _ => None,
        }
    }

    /// The root page as a vertex, ready to start a walk from.
    pub fn root(&self) -> Result<&Vertex, PublishError> {
        let first = self.first().ok_or(PublishError::EmptyGraph)?;
        match first {
            Vertex::Page(_) => Ok(first),
            _ => Err(PublishError::TypeMismatch {
                uid: first.uid().to_string(),
                vertex_type: first.vertex_type(),
            }),
        }
    }

    /// Every identifier listed under `kind`, across all vertices, in graph order.
    ///
    /// Duplicates are preserved: an identifier listed by two parents appears twice.
    pub fn all_linked_uids(&self, kind: LinkKind) -> Vec<&Uid> {
        self.vertices
            .iter()
            .flat_map(|vertex| kind.of(vertex).iter())
            .collect()
    }

    /// Number of vertices of each type. Types with no vertices report zero.
    pub fn vertex_type_counts(&self) -> BTreeMap<VertexType, usize> {
        let mut counts: BTreeMap<VertexType, usize> =
            VertexType::ALL.into_iter().map(|t| (t, 0)).collect();
        for vertex in &self.vertices {
            *counts.entry(vertex.vertex_type()).or_default() += 1;
        }
        counts
    }

    /// A sub-graph holding `uids`, in the order given.
    pub fn select(&self, uids: &[Uid]) -> Result<Graph, PublishError> {
        let vertices = uids
            .iter()
            .map(|uid| {
                self.get(uid)
                    .cloned()
                    .ok_or_else(|| PublishError::Lookup { uid: uid.clone() })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Graph::from_vertices(vertices))
    }

    /// A copy of this graph without `uid`. Links pointing at it are left dangling.
    pub fn without(&self, uid: &str) -> Graph {
        Graph::from_vertices(self.vertices.iter().filter(|v| v.uid() != uid).cloned())
    }

    /// A copy of this graph with `vertex` replacing the vertex of the same uid,
    /// or appended when the uid is new.
    pub fn with_vertex(&self, vertex: Vertex) -> Graph {
        let mut graph = self.clone();
        graph.insert(vertex);
        graph
    }
}

impl FromIterator<Vertex> for Graph {
    fn from_iter<I: IntoIterator<Item = Vertex>>(iter: I) -> Self {
        Graph::from_vertices(iter)
    }
}

impl<'a> IntoIterator for &'a Graph {
    type Item = &'a Vertex;
    type IntoIter = std::slice::Iter<'a, Vertex>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
