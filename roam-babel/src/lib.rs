//! Publishing for Roam PageDump exports
//!
//!     A PageDump is the JSON export of one Roam page: an ordered list of vertex records, the
//!     first being the page itself, followed by the blocks and files it links to. This crate
//!     turns that export into publishable text.
//!
//!     This is a pure lib, that is, it powers roam-cli but is shell agnostic: no code should be
//!     written that supposes a shell environment, be it printing to std streams, env vars etc.
//!
//! Architecture
//!
//!     Loading builds an immutable, order-preserving Graph of Vertex values. Every pipeline
//!     after that is a pure function over the graph:
//!
//!     - validation: the fixed, ordered rule set a graph must satisfy before publishing. Failures
//!       are collected, never raised.
//!     - normalize: rewrites Roam flavoured markdown into CommonMark, one rule at a time.
//!     - export: flattens the tree under a node into one CommonMark document.
//!     - tokenize: flattens the tree under a node into a token stream, parsing content blocks
//!       with comrak.
//!
//!     The file structure :
//!     .
//!     ├── error.rs
//!     ├── model                   # Vertex, Record, Graph
//!     ├── loader.rs               # PageDump JSON → Graph
//!     ├── validation.rs
//!     ├── normalize.rs
//!     ├── export.rs
//!     ├── tokenize                # Token, CommonMark tokenizer
//!     ├── walk.rs                 # children traversal shared by export and tokenize
//!     ├── format.rs               # Format trait definition
//!     ├── registry.rs             # FormatRegistry for discovery and selection
//!     ├── publish.rs              # validate + serialize + write in one call
//!     └── formats
//!         └── <format>/mod.rs
//!
//! Testing
//!     tests
//!     ├── lib.rs
//!     └── <area>.rs
//!
//!     Note that rust does not by default discover tests in subdirectories, so these are
//!     aggregated in tests/lib.rs.
//!
//! Library Choices
//!
//!     We never write a markdown parser or serializer: comrak does both. The tokenizer adapts the
//!     comrak AST to tokens and the commonmark format adapts tokens back to a comrak AST.
//!
pub mod error;
pub mod export;
pub mod format;
pub mod formats;
pub mod loader;
pub mod model;
pub mod normalize;
pub mod publish;
pub mod registry;
pub mod tokenize;
pub mod validation;

mod walk;

pub use error::PublishError;
pub use export::export_node;
pub use format::Format;
pub use formats::commonmark::render_commonmark;
pub use loader::{load_json_dump, load_json_str};
pub use model::{Graph, LinkKind, Record, Uid, Vertex, VertexType};
pub use normalize::normalize;
pub use publish::{publish, PublishArtifact, PublishSpec};
pub use registry::FormatRegistry;
pub use tokenize::{tokenize_node, tokenize_node_with, Token, TokenizeOptions};
pub use validation::{validate, ValidationFailure, ValidationResult, ValidationRule};
