use std::time::Duration;

use chrono::Utc;
use rand::Rng;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::models::ApplicationForm;

use super::{Ack, SubmitError, Submitter};

/// Address applications are meant for.
pub const DEFAULT_RECIPIENT: &str = "membership@28thodiham.org.uk";

/// Simulated time the send takes, in milliseconds.
pub const DEFAULT_LATENCY_MS: u64 = 2_000;

/// Upper bound (exclusive) of the random part of a reference
const REFERENCE_SUFFIX_RANGE: u32 = 0x100_0000;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Outcome {
    Acknowledge,
    Fail(String),
}

/// Submitter that does not transmit anything.
///
/// Waits out its latency, logs the application, and returns the configured
/// outcome.
#[derive(Debug, Clone)]
pub struct SimulatedSubmitter {
    recipient: String,
    latency: Duration,
    outcome: Outcome,
}

impl Default for SimulatedSubmitter {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulatedSubmitter {
    pub fn new() -> Self {
        Self {
            recipient: DEFAULT_RECIPIENT.to_string(),
            latency: Duration::from_millis(DEFAULT_LATENCY_MS),
            outcome: Outcome::Acknowledge,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        let submitter = Self::new()
            .with_recipient(config.recipient.clone())
            .with_latency(config.simulated_latency());
        if config.simulate_failure {
            submitter.failing("simulated failure")
        } else {
            submitter
        }
    }

    pub fn with_recipient(mut self, recipient: impl Into<String>) -> Self {
        self.recipient = recipient.into();
        self
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Make every submission fail with `reason`
    pub fn failing(mut self, reason: impl Into<String>) -> Self {
        self.outcome = Outcome::Fail(reason.into());
        self
    }

    pub fn recipient(&self) -> &str {
        &self.recipient
    }

    pub fn latency(&self) -> Duration {
        self.latency
    }
}

impl Submitter for SimulatedSubmitter {
    async fn submit(&self, application: &ApplicationForm) -> Result<Ack, SubmitError> {
        tokio::time::sleep(self.latency).await;

        let payload = serde_json::to_string(application)?;

        if let Outcome::Fail(reason) = &self.outcome {
            warn!(recipient = %self.recipient, reason = %reason, "Simulated submission failed");
            return Err(SubmitError::unavailable(reason));
        }

        let received_at = Utc::now();
        info!(
            recipient = %self.recipient,
            fields = application.len(),
            "Membership application submitted"
        );
        debug!(payload = %payload, "Membership application payload");

        Ok(Ack {
            recipient: self.recipient.clone(),
            reference: format!(
                "ODH-{}-{:06X}",
                received_at.timestamp_millis(),
                rand::thread_rng().gen_range(0..REFERENCE_SUFFIX_RANGE)
            ),
            received_at,
        })
    }
}
