use std::path::PathBuf;

use crate::errors::HarnessError;
use crate::evaluator::TransportErrorPolicy;
use crate::report::OutputNaming;

const DEFAULT_INPUT_FILE: &str = "test_input/input.csv";
const DEFAULT_PROMPT_FILE: &str = "test_input/prompt.txt";
const DEFAULT_OUTPUT_DIR: &str = "test_results";

/// Run configuration resolved once at startup from environment variables.
/// Fails before any row is processed if the credential or a setting is invalid.
#[derive(Debug, Clone)]
pub struct Config {
    pub openai_api_key: String,
    pub input_file: PathBuf,
    pub prompt_file: PathBuf,
    pub output_dir: PathBuf,
    pub output_naming: OutputNaming,
    pub on_transport_error: TransportErrorPolicy,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self, HarnessError> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, HarnessError> {
        let openai_api_key = lookup("OPENAI_API_KEY")
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                HarnessError::Config(
                    "Required environment variable 'OPENAI_API_KEY' is not set".to_string(),
                )
            })?;

        let output_naming = match lookup("OUTPUT_NAMING") {
            Some(value) => value
                .parse::<OutputNaming>()
                .map_err(|e| invalid("OUTPUT_NAMING", e))?,
            None => OutputNaming::Timestamped,
        };

        let on_transport_error = match lookup("ON_TRANSPORT_ERROR") {
            Some(value) => value
                .parse::<TransportErrorPolicy>()
                .map_err(|e| invalid("ON_TRANSPORT_ERROR", e))?,
            None => TransportErrorPolicy::FailFast,
        };

        Ok(Config {
            openai_api_key,
            input_file: path_or(&lookup, "INPUT_FILE", DEFAULT_INPUT_FILE),
            prompt_file: path_or(&lookup, "PROMPT_FILE", DEFAULT_PROMPT_FILE),
            output_dir: path_or(&lookup, "OUTPUT_DIR", DEFAULT_OUTPUT_DIR),
            output_naming,
            on_transport_error,
            rust_log: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }
}

fn path_or(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: &str) -> PathBuf {
    PathBuf::from(lookup(key).unwrap_or_else(|| default.to_string()))
}

fn invalid(key: &str, reason: String) -> HarnessError {
    HarnessError::Config(format!("Environment variable '{key}' is invalid: {reason}"))
}
