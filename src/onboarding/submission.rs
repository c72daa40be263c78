//! Profile submission capability

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;
use uuid::Uuid;

use super::profile::UserProfile;
use crate::error::SubmissionError;

/// Simulated submission latency
pub const DEFAULT_SUBMIT_DELAY_MS: u64 = 2000;

/// Acknowledgement of a completed onboarding
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionReceipt {
    pub submission_id: Uuid,
    pub submitted_at: DateTime<Utc>,
}

/// Capability that accepts a finished profile
#[async_trait]
pub trait ProfileSink: Send + Sync {
    async fn submit(&self, profile: &UserProfile) -> Result<SubmissionReceipt, SubmissionError>;
}

/// Submission stand-in that waits a fixed delay and then settles
#[derive(Debug, Clone)]
pub struct SimulatedSubmission {
    delay: Duration,
    failure: Option<String>,
}

impl Default for SimulatedSubmission {
    fn default() -> Self {
        Self::new(Duration::from_millis(DEFAULT_SUBMIT_DELAY_MS))
    }
}

impl SimulatedSubmission {
    pub fn new(delay: Duration) -> Self {
        Self { delay, failure: None }
    }

    pub fn immediate() -> Self {
        Self::new(Duration::ZERO)
    }

    pub fn failing(mut self, reason: impl Into<String>) -> Self {
        self.failure = Some(reason.into());
        self
    }
}

#[async_trait]
impl ProfileSink for SimulatedSubmission {
    async fn submit(&self, _profile: &UserProfile) -> Result<SubmissionReceipt, SubmissionError> {
        debug!(delay_ms = self.delay.as_millis() as u64, "Simulating submission");
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        match &self.failure {
            Some(reason) => Err(SubmissionError(reason.clone())),
            None => Ok(SubmissionReceipt {
                submission_id: Uuid::new_v4(),
                submitted_at: Utc::now(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_immediate_submission_issues_unique_receipts() {
        let sink = SimulatedSubmission::immediate();
        let profile = UserProfile::default();

        let a = sink.submit(&profile).await.unwrap();
        let b = sink.submit(&profile).await.unwrap();
        assert_ne!(a.submission_id, b.submission_id);
    }

    #[tokio::test]
    async fn test_failing_submission() {
        let sink = SimulatedSubmission::immediate().failing("offline");
        let err = sink.submit(&UserProfile::default()).await.unwrap_err();
        assert_eq!(err, SubmissionError("offline".to_string()));
    }
}
