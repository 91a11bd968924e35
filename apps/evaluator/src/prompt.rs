//! System prompt loading. The file is read once and sent verbatim with every row.

use std::path::Path;

use tracing::{info, warn};

use crate::errors::HarnessError;

pub fn load_prompt(path: &Path) -> Result<String, HarnessError> {
    let prompt = std::fs::read_to_string(path).map_err(|e| {
        HarnessError::Config(format!(
            "Cannot read prompt file {}: {e}",
            path.display()
        ))
    })?;

    if prompt.trim().is_empty() {
        warn!("Prompt file {} is empty", path.display());
    }
    info!("Loaded system prompt ({} bytes)", prompt.len());

    Ok(prompt)
}
