//! PageDump format implementation
//!
//! Reads the JSON array of vertex records exported by the Roam extension.

use crate::error::PublishError;
use crate::format::Format;
use crate::loader::load_json_str;
use crate::model::Graph;

pub struct PageDumpFormat;

impl Format for PageDumpFormat {
    fn name(&self) -> &str {
        "pagedump"
    }

    fn description(&self) -> &str {
        "Roam PageDump JSON export"
    }

    fn file_extensions(&self) -> &[&str] {
        &["json"]
    }

    fn supports_parsing(&self) -> bool {
        true
    }

    fn parse(&self, source: &str) -> Result<Graph, PublishError> {
        load_json_str(source)
    }
}
