//! Dataset reader: loads the evaluation rows from a CSV file.

use std::path::Path;

use serde::Deserialize;
use tracing::info;

use crate::errors::HarnessError;

pub const CHAT_HISTORY_COLUMN: &str = "chat_history";
pub const EXPECTED_ATTRIBUTES_COLUMN: &str = "expected_attributes";

/// One dataset row. Columns other than the two below are ignored.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct InputRecord {
    pub chat_history: String,
    pub expected_attributes: String,
}

/// Loads every row of the input table, in file order.
///
/// Both required columns are checked against the header before any row is
/// read, so a malformed table never reaches the remote client.
pub fn load_dataset(path: &Path) -> Result<Vec<InputRecord>, HarnessError> {
    let mut reader = csv::Reader::from_path(path).map_err(|e| {
        HarnessError::Config(format!("Cannot open input file {}: {e}", path.display()))
    })?;

    let headers = reader.headers()?.clone();

    let missing: Vec<String> = [CHAT_HISTORY_COLUMN, EXPECTED_ATTRIBUTES_COLUMN]
        .iter()
        .filter(|required| !headers.iter().any(|h| h == **required))
        .map(|required| required.to_string())
        .collect();

    if !missing.is_empty() {
        return Err(HarnessError::MissingColumns {
            path: path.to_path_buf(),
            missing,
        });
    }

    let records = reader
        .deserialize::<InputRecord>()
        .collect::<Result<Vec<_>, _>>()?;

    info!("Loaded {} rows from {}", records.len(), path.display());

    Ok(records)
}
