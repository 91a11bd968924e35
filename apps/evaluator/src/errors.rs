use std::path::PathBuf;

use thiserror::Error;

use crate::llm_client::LlmError;

/// Harness-level error type.
/// `Config` and `MissingColumns` are raised before the first remote call.
#[derive(Debug, Error)]
pub enum HarnessError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Input file {} is missing required column(s): {}", .path.display(), .missing.join(", "))]
    MissingColumns { path: PathBuf, missing: Vec<String> },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Extraction request for row {row} failed: {source}")]
    Transport {
        row: usize,
        #[source]
        source: LlmError,
    },
}

impl HarnessError {
    /// True for errors the operator fixes by changing configuration or inputs.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            HarnessError::Config(_) | HarnessError::MissingColumns { .. }
        )
    }
}
