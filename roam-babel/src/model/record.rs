//! Decoded PageDump records.

use crate::error::PublishError;
use crate::model::vertex::Uid;
use serde::{Deserialize, Serialize};

/// One entry of a PageDump JSON array, before it is shaped into a [`Vertex`].
///
/// Every field is optional here; required-ness depends on the vertex type and is
/// checked by [`Vertex::from_record`].
///
/// [`Vertex`]: crate::model::Vertex
/// [`Vertex::from_record`]: crate::model::Vertex::from_record
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Record {
    pub uid: Option<Uid>,
    pub vertex_type: Option<String>,
    pub media_type: Option<String>,
    pub text: Option<String>,
    pub title: Option<String>,
    pub heading: Option<String>,
    pub level: Option<usize>,
    pub file_name: Option<String>,
    pub source: Option<String>,
    pub children: Option<Vec<Uid>>,
    pub refs: Option<Vec<Uid>>,
}

impl Record {
    /// Unwrap a required field, naming it (and the record's uid) on failure.
    pub(crate) fn require<'a, T>(
        &self,
        value: Option<&'a T>,
        field: &'static str,
    ) -> Result<&'a T, PublishError> {
        value.ok_or_else(|| PublishError::MissingField {
            uid: self.uid.clone(),
            field,
        })
    }
}
