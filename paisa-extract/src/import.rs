//! Two-stage import policy: try the remote classifier over the whole batch,
//! fall back to the local regex pipeline on any failure or empty result.
//!
//! The fallback is silent toward the caller; the only caller-visible
//! "failure" is an empty batch from both stages.

use anyhow::Result;
use chrono::NaiveDate;
use tracing::{debug, warn};

use paisa_ingest::types::RawMessage;

use crate::pipeline::{ParsedBatch, SmsEngine};
use crate::remote::RemoteClassifier;

pub struct Importer {
    engine: SmsEngine,
    remote: Option<RemoteClassifier>,
}

impl Importer {
    /// Regex pipeline only; the remote stage is skipped entirely.
    pub fn local_only() -> Result<Self> {
        Ok(Self {
            engine: SmsEngine::new()?,
            remote: None,
        })
    }

    pub fn new(remote: Option<RemoteClassifier>) -> Result<Self> {
        Ok(Self {
            engine: SmsEngine::new()?,
            remote,
        })
    }

    pub fn with_engine(engine: SmsEngine, remote: Option<RemoteClassifier>) -> Self {
        Self { engine, remote }
    }

    /// Run one import. Results may originate from either stage; callers
    /// cannot tell and must not care.
    pub async fn run(&self, messages: &[RawMessage], today: NaiveDate) -> ParsedBatch {
        match &self.remote {
            Some(remote) => {
                let outcome = remote.classify(messages, today).await;
                self.resolve(outcome, messages, today)
            }
            None => self.engine.parse(messages, today),
        }
    }

    /// The fallback decision, split out from the network call so the
    /// contract is testable with a canned remote outcome.
    pub fn resolve(
        &self,
        outcome: Result<ParsedBatch>,
        messages: &[RawMessage],
        today: NaiveDate,
    ) -> ParsedBatch {
        match outcome {
            Ok(batch) if !batch.transactions.is_empty() => batch,
            Ok(_) => {
                debug!("remote classifier returned no transactions, running local pipeline");
                self.engine.parse(messages, today)
            }
            Err(err) => {
                warn!("remote classifier failed ({err:#}), running local pipeline");
                self.engine.parse(messages, today)
            }
        }
    }
}
