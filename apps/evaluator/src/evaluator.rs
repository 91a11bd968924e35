//! Evaluator: runs every dataset row through the extraction client,
//! the attribute normalizer and the comparator, strictly in input order.

use std::str::FromStr;
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::attributes::normalize_response;
use crate::comparator::{evaluate, Verdict};
use crate::dataset::InputRecord;
use crate::errors::HarnessError;
use crate::llm_client::ExtractionClient;

/// What to do when the completion request for a row fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportErrorPolicy {
    /// Abort the whole run on the first failed request.
    FailFast,
    /// Record the failure in that row's output and keep going.
    RecordRow,
}

impl FromStr for TransportErrorPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fail_fast" => Ok(TransportErrorPolicy::FailFast),
            "record" => Ok(TransportErrorPolicy::RecordRow),
            other => Err(format!("expected 'fail_fast' or 'record', got '{other}'")),
        }
    }
}

/// One output row. Field order is the report's column order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvaluationRecord {
    pub chat_history: String,
    pub expected_attributes: String,
    pub actual_attributes: String,
    pub status: Verdict,
}

pub struct Evaluator {
    client: Arc<dyn ExtractionClient>,
    system_prompt: String,
    policy: TransportErrorPolicy,
}

impl Evaluator {
    pub fn new(
        client: Arc<dyn ExtractionClient>,
        system_prompt: String,
        policy: TransportErrorPolicy,
    ) -> Self {
        Self {
            client,
            system_prompt,
            policy,
        }
    }

    /// Evaluates all rows sequentially. Returns one record per input row, in order.
    pub async fn run(&self, records: &[InputRecord]) -> Result<Vec<EvaluationRecord>, HarnessError> {
        info!("Evaluating {} rows", records.len());

        let mut results = Vec::with_capacity(records.len());

        for (idx, record) in records.iter().enumerate() {
            let row = idx + 1;

            let actual_attributes = match self
                .client
                .send(&self.system_prompt, &record.chat_history)
                .await
            {
                Ok(raw) => normalize_response(&raw),
                Err(source) => match self.policy {
                    TransportErrorPolicy::FailFast => {
                        return Err(HarnessError::Transport { row, source })
                    }
                    TransportErrorPolicy::RecordRow => {
                        warn!("Row {row}: extraction request failed: {source}");
                        results.push(EvaluationRecord {
                            chat_history: record.chat_history.clone(),
                            expected_attributes: record.expected_attributes.clone(),
                            actual_attributes: format!("Request failed: {source}"),
                            status: Verdict::Fail,
                        });
                        continue;
                    }
                },
            };

            let status = evaluate(&record.expected_attributes, &actual_attributes);
            debug!("Row {row}: {status} ({actual_attributes})");

            results.push(EvaluationRecord {
                chat_history: record.chat_history.clone(),
                expected_attributes: record.expected_attributes.clone(),
                actual_attributes,
                status,
            });
        }

        Ok(results)
    }
}
