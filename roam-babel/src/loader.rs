//! Reading PageDump JSON exports.

use crate::error::PublishError;
use crate::model::{Graph, Record};
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// Decode the records of a PageDump JSON array, in document order.
pub fn read_records(source: &str) -> Result<Vec<Record>, PublishError> {
    let records: Vec<Record> = serde_json::from_str(source)?;
    debug!(records = records.len(), "decoded PageDump records");
    Ok(records)
}

/// Decode a PageDump JSON array into a graph.
pub fn load_json_str(source: &str) -> Result<Graph, PublishError> {
    let graph = Graph::from_records(read_records(source)?)?;
    info!(vertices = graph.len(), "loaded PageDump graph");
    Ok(graph)
}

/// Read and decode the PageDump JSON file at `path`.
pub fn load_json_dump(path: impl AsRef<Path>) -> Result<Graph, PublishError> {
    let path = path.as_ref();
    info!(path = %path.display(), "reading PageDump");
    let source = fs::read_to_string(path)
        .map_err(|e| PublishError::Io(format!("{}: {e}", path.display())))?;
    load_json_str(&source)
}
