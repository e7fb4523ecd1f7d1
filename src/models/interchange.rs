//! Structured interchange form
//!
//! The persistence layer stores a note as an ordered JSON list of
//! `{ "text": ..., "formats": [...] }` records. Format names are
//! `bold`, `italic`, `underline` and `strike`.

use serde::{Deserialize, Serialize};

use super::document::Document;
use super::format::{FormatKind, FormatSet};
use super::fragment::Fragment;
use crate::error::InterchangeError;

/// One fragment as it appears in the interchange form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FragmentRecord {
    pub text: String,
    pub formats: Vec<String>,
}

impl From<&Fragment> for FragmentRecord {
    fn from(frag: &Fragment) -> Self {
        Self {
            text: frag.text.clone(),
            formats: frag.formats.iter().map(|k| k.name().to_string()).collect(),
        }
    }
}

impl TryFrom<FragmentRecord> for Fragment {
    type Error = InterchangeError;

    fn try_from(record: FragmentRecord) -> Result<Self, Self::Error> {
        let kinds = record
            .formats
            .iter()
            .map(|name| name.parse::<FormatKind>())
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Fragment::new(record.text, FormatSet::from_kinds(kinds)))
    }
}

/// Records for a fragment sequence, in order
pub fn to_records(fragments: &[Fragment]) -> Vec<FragmentRecord> {
    fragments.iter().map(FragmentRecord::from).collect()
}

/// Serialize a document to its interchange JSON string
pub fn to_json(document: &Document) -> Result<String, InterchangeError> {
    Ok(serde_json::to_string(&to_records(document.fragments()))?)
}

/// Parse interchange JSON into a normalized document
pub fn from_json(input: &str) -> Result<Document, InterchangeError> {
    let value: serde_json::Value = serde_json::from_str(input)?;
    if !value.is_array() {
        return Err(InterchangeError::NotAList);
    }
    let records: Vec<FragmentRecord> = serde_json::from_value(value)?;
    let fragments = records
        .into_iter()
        .map(Fragment::try_from)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Document::from_fragments(fragments))
}
