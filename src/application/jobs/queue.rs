use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::payload::JobPayload;

/// Identifier assigned to a job by the queue that accepted it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobHandle(String);

impl JobHandle {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn id(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JobHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Error)]
pub enum SubmissionError {
    #[error("job rejected by queue: {message}")]
    Rejected { message: String },
    #[error("failed to encode job payload: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("job queue backend error: {message}")]
    Backend { message: String },
}

impl SubmissionError {
    pub fn rejected(message: impl Into<String>) -> Self {
        Self::Rejected {
            message: message.into(),
        }
    }

    pub fn backend(err: impl fmt::Display) -> Self {
        Self::Backend {
            message: err.to_string(),
        }
    }
}

/// Asynchronous execution queue that accepts static cache jobs.
///
/// Whether `queue_job` returns once the job is durably recorded or as soon as
/// it is accepted is up to the implementation.
#[async_trait]
pub trait JobQueue: Send + Sync {
    async fn queue_job(&self, payload: JobPayload) -> Result<JobHandle, SubmissionError>;
}
