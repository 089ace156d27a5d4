//! The typed PageDump graph: vertex shapes, decoded records and the vertex map.

pub mod graph;
pub mod record;
pub mod vertex;

pub use graph::{Graph, LinkKind};
pub use record::Record;
pub use vertex::{
    BlockContent, BlockHeading, File, Links, MediaType, Page, Uid, Vertex, VertexHeader,
    VertexType, MAX_HEADING_LEVEL,
};
