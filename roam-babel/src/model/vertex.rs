//! Vertex shapes found in a PageDump export.
//!
//! A vertex is one element of the exported graph. The four shapes form a closed
//! set: [`Page`], [`BlockHeading`], [`BlockContent`] and [`File`]. The first three
//! are *nodes* and may link to other vertices through `children` (and, for
//! content blocks only, `references`). Files are leaves.
//!
//! The identifier and media type shared by every shape live in [`VertexHeader`],
//! which each variant embeds.

use crate::error::PublishError;
use crate::model::record::Record;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a vertex, unique within one graph.
///
/// Roam-backed vertices carry the uid Roam generated; vertices injected by the
/// exporter carry a synthetic GUID.
pub type Uid = String;

/// Deepest heading an ATX marker can express.
pub const MAX_HEADING_LEVEL: usize = 6;

/// The `vertex-type` literal of a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum VertexType {
    #[serde(rename = "roam/page")]
    Page,
    #[serde(rename = "roam/block-heading")]
    BlockHeading,
    #[serde(rename = "roam/block-content")]
    BlockContent,
    #[serde(rename = "roam/file")]
    File,
}

impl VertexType {
    pub const ALL: [VertexType; 4] = [
        VertexType::Page,
        VertexType::BlockHeading,
        VertexType::BlockContent,
        VertexType::File,
    ];

    /// The literal used in PageDump JSON.
    pub fn as_str(&self) -> &'static str {
        match self {
            VertexType::Page => "roam/page",
            VertexType::BlockHeading => "roam/block-heading",
            VertexType::BlockContent => "roam/block-content",
            VertexType::File => "roam/file",
        }
    }

    pub fn from_literal(literal: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == literal)
    }

    /// Whether vertices of this type may carry `children`/`references` links.
    pub fn is_node(&self) -> bool {
        !matches!(self, VertexType::File)
    }

    /// Heading and content blocks; the vertices that must hang off exactly one parent.
    pub fn is_block(&self) -> bool {
        matches!(self, VertexType::BlockHeading | VertexType::BlockContent)
    }
}

impl fmt::Display for VertexType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// MIME type of a vertex payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MediaType {
    #[serde(rename = "text/plain")]
    TextPlain,
    #[serde(rename = "text/markdown")]
    TextMarkdown,
    #[serde(rename = "image/jpeg")]
    ImageJpeg,
}

impl MediaType {
    pub const ALL: [MediaType; 3] = [
        MediaType::TextPlain,
        MediaType::TextMarkdown,
        MediaType::ImageJpeg,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MediaType::TextPlain => "text/plain",
            MediaType::TextMarkdown => "text/markdown",
            MediaType::ImageJpeg => "image/jpeg",
        }
    }

    /// Decode a MIME literal, failing on anything outside the known set.
    pub fn parse(literal: &str) -> Result<Self, PublishError> {
        Self::ALL
            .into_iter()
            .find(|m| m.as_str() == literal)
            .ok_or_else(|| PublishError::UnknownMediaType(literal.to_string()))
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fields every vertex carries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VertexHeader {
    pub uid: Uid,
    pub media_type: MediaType,
}

/// Outgoing links of a node. `None` means the record did not declare the field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Links {
    pub children: Option<Vec<Uid>>,
    pub references: Option<Vec<Uid>>,
}

impl Links {
    pub fn new(children: Option<Vec<Uid>>, references: Option<Vec<Uid>>) -> Self {
        Self {
            children,
            references,
        }
    }
}

/// The document root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub header: VertexHeader,
    pub title: String,
    pub links: Links,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockHeading {
    pub header: VertexHeader,
    pub heading: String,
    /// 1-based heading depth.
    pub level: usize,
    pub links: Links,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockContent {
    pub header: VertexHeader,
    pub content: String,
    pub links: Links,
}

/// An attachment.
///
/// Files are leaves. `links` only records what the source declared so that
/// validation can flag a file that claims children or references.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct File {
    pub header: VertexHeader,
    pub file_name: String,
    pub source: String,
    pub links: Links,
}

/// One element of a PageDump graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Vertex {
    Page(Page),
    BlockHeading(BlockHeading),
    BlockContent(BlockContent),
    File(File),
}

impl Vertex {
    pub fn header(&self) -> &VertexHeader {
        match self {
            Vertex::Page(v) => &v.header,
            Vertex::BlockHeading(v) => &v.header,
            Vertex::BlockContent(v) => &v.header,
            Vertex::File(v) => &v.header,
        }
    }

    pub fn uid(&self) -> &str {
        &self.header().uid
    }

    pub fn media_type(&self) -> MediaType {
        self.header().media_type
    }

    pub fn vertex_type(&self) -> VertexType {
        match self {
            Vertex::Page(_) => VertexType::Page,
            Vertex::BlockHeading(_) => VertexType::BlockHeading,
            Vertex::BlockContent(_) => VertexType::BlockContent,
            Vertex::File(_) => VertexType::File,
        }
    }

    /// Links as declared by the source record.
    pub fn links(&self) -> &Links {
        match self {
            Vertex::Page(v) => &v.links,
            Vertex::BlockHeading(v) => &v.links,
            Vertex::BlockContent(v) => &v.links,
            Vertex::File(v) => &v.links,
        }
    }

    /// Declared children, empty when absent.
    pub fn children(&self) -> &[Uid] {
        self.links().children.as_deref().unwrap_or(&[])
    }

    /// Declared references, empty when absent.
    pub fn references(&self) -> &[Uid] {
        self.links().references.as_deref().unwrap_or(&[])
    }

    /// Build a vertex of the `expected` shape from a decoded record.
    pub fn from_record(record: &Record, expected: VertexType) -> Result<Self, PublishError> {
        let uid = record.require(record.uid.as_ref(), "uid")?.clone();
        let literal = record.require(record.vertex_type.as_ref(), "vertex-type")?;
        if literal != expected.as_str() {
            return Err(PublishError::Shape {
                uid,
                expected,
                found: literal.clone(),
            });
        }
        let media_type =
            MediaType::parse(record.require(record.media_type.as_ref(), "media-type")?)?;
        let header = VertexHeader { uid, media_type };
        let links = Links::new(record.children.clone(), record.refs.clone());

        let vertex = match expected {
            VertexType::Page => {
                let title = record.require(record.text.as_ref().or(record.title.as_ref()), "text")?;
                Vertex::Page(Page {
                    header,
                    title: title.clone(),
                    links,
                })
            }
            VertexType::BlockHeading => {
                let heading =
                    record.require(record.heading.as_ref().or(record.text.as_ref()), "heading")?;
                let level = *record.require(record.level.as_ref(), "level")?;
                if !(1..=MAX_HEADING_LEVEL).contains(&level) {
                    return Err(PublishError::HeadingLevel {
                        uid: header.uid,
                        level,
                    });
                }
                Vertex::BlockHeading(BlockHeading {
                    header,
                    heading: heading.clone(),
                    level,
                    links,
                })
            }
            VertexType::BlockContent => {
                let content = record.require(record.text.as_ref(), "text")?;
                Vertex::BlockContent(BlockContent {
                    header,
                    content: content.clone(),
                    links,
                })
            }
            VertexType::File => {
                let file_name = record.require(record.file_name.as_ref(), "file-name")?;
                let source = record.require(record.source.as_ref(), "source")?;
                Vertex::File(File {
                    header,
                    file_name: file_name.clone(),
                    source: source.clone(),
                    links,
                })
            }
        };
        Ok(vertex)
    }

    /// Build a vertex of whatever shape the record declares.
    pub fn try_from_record(record: &Record) -> Result<Self, PublishError> {
        let literal = record.require(record.vertex_type.as_ref(), "vertex-type")?;
        let vertex_type = VertexType::from_literal(literal)
            .ok_or_else(|| PublishError::UnknownVertexType(literal.clone()))?;
        Self::from_record(record, vertex_type)
    }

    /// A copy of this vertex with its `children` replaced.
    pub fn with_children(&self, children: Option<Vec<Uid>>) -> Self {
        let mut vertex = self.clone();
        vertex.links_mut().children = children;
        vertex
    }

    /// A copy of this vertex with its `references` replaced.
    pub fn with_references(&self, references: Option<Vec<Uid>>) -> Self {
        let mut vertex = self.clone();
        vertex.links_mut().references = references;
        vertex
    }

    fn links_mut(&mut self) -> &mut Links {
        match self {
            Vertex::Page(v) => &mut v.links,
            Vertex::BlockHeading(v) => &mut v.links,
            Vertex::BlockContent(v) => &mut v.links,
            Vertex::File(v) => &mut v.links,
        }
    }
}

impl fmt::Display for Vertex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Long uids are abbreviated to their last nine characters.
        let uid = self.uid();
        let short = match uid.char_indices().rev().nth(8) {
            Some((idx, _)) if idx > 0 => &uid[idx..],
            _ => uid,
        };
        match self {
            Vertex::Page(v) => write!(
                f,
                "Page<{short}>({}, title: {:?}, children: {:?})",
                v.header.media_type,
                v.title,
                self.children()
            ),
            Vertex::BlockHeading(v) => write!(
                f,
                "BlockHeading<{short}>({}, heading: {:?}, level: {}, children: {:?})",
                v.header.media_type,
                v.heading,
                v.level,
                self.children()
            ),
            Vertex::BlockContent(v) => write!(
                f,
                "BlockContent<{short}>({}, content: {:?}, children: {:?}, references: {:?})",
                v.header.media_type,
                v.content,
                self.children(),
                self.references()
            ),
            Vertex::File(v) => write!(
                f,
                "File<{short}>({}, file_name: {:?}, source: {:?})",
                v.header.media_type, v.file_name, v.source
            ),
        }
    }
}
