mod attributes;
mod comparator;
mod config;
mod dataset;
mod errors;
mod evaluator;
mod llm_client;
mod prompt;
mod report;

use anyhow::Result;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use std::sync::Arc;

use crate::config::Config;
use crate::dataset::load_dataset;
use crate::errors::HarnessError;
use crate::evaluator::Evaluator;
use crate::llm_client::OpenAiClient;
use crate::prompt::load_prompt;
use crate::report::{output_path, write_report, RunSummary};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on a missing credential or invalid setting)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting evaluator v{}", env!("CARGO_PKG_VERSION"));

    if let Err(e) = run(&config).await {
        if e.is_configuration() {
            error!("Aborted before any row was evaluated: {e}");
        } else {
            error!("Evaluation run failed: {e}");
        }
        return Err(e.into());
    }

    Ok(())
}

async fn run(config: &Config) -> Result<(), HarnessError> {
    // Inputs are validated before the first remote call
    let prompt = load_prompt(&config.prompt_file)?;
    let records = load_dataset(&config.input_file)?;

    let client = OpenAiClient::new(config.openai_api_key.clone())
        .map_err(|e| HarnessError::Config(format!("Cannot build HTTP client: {e}")))?;
    info!("LLM client initialized (model: {})", llm_client::MODEL);

    let evaluator = Evaluator::new(Arc::new(client), prompt, config.on_transport_error);
    let results = evaluator.run(&records).await?;

    let path = output_path(
        &config.output_dir,
        config.output_naming,
        chrono::Local::now().naive_local(),
    );
    write_report(&path, &results, config.output_naming)?;

    let summary = RunSummary::from_records(&results);
    info!(
        "Evaluated {} rows: {} passed, {} failed ({} invalid format), pass rate {:.1}%",
        summary.total,
        summary.passed,
        summary.failed,
        summary.invalid_format,
        summary.pass_rate()
    );

    println!("Test results saved to {}", path.display());

    Ok(())
}
