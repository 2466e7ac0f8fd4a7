use serde::Deserialize;
use thiserror::Error;

use crate::row::StockEntry;

/// One record of the prefilled stock resource.
///
/// Missing identifiers import as empty fields; the row is then flagged by
/// the validation that runs on start.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PrefilledStock {
    #[serde(default)]
    pub isin: String,
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub name: Option<String>,
}

impl PrefilledStock {
    /// Fresh row carrying this record's identifiers.
    pub fn into_row(self) -> StockEntry {
        let mut row = StockEntry::empty();
        row.isin = self.isin;
        row.code = self.code;
        row.name = self.name.unwrap_or_default();
        row
    }
}

#[derive(Debug, Error)]
pub enum PrefilledError {
    #[error("malformed prefilled data: {0}")]
    Json(#[from] serde_json::Error),
}

/// Parse a JSON array of `{isin, code, name?}` records.
pub fn parse_prefilled(text: &str) -> Result<Vec<PrefilledStock>, PrefilledError> {
    Ok(serde_json::from_str(text)?)
}
