use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::domain::types::JobAction;

/// Unit of work handed to the job queue: one batch of URLs plus a label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobPayload {
    pub action: JobAction,
    /// URLs in ascending order.
    pub urls: Vec<String>,
    /// Human readable description shown in job listings and logs.
    pub label: String,
    /// Hex SHA-256 over the action and the ordered URLs.
    pub signature: String,
}

impl JobPayload {
    /// Build the payload for an already ordered batch.
    pub fn new(action: JobAction, urls: Vec<String>) -> Self {
        let label = format!("{} URLs: [{}]", action.label_verb(), urls.join(", "));
        let signature = payload_signature(action, &urls);
        Self {
            action,
            urls,
            label,
            signature,
        }
    }

    pub fn len(&self) -> usize {
        self.urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }
}

fn payload_signature(action: JobAction, urls: &[String]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(action.as_str().as_bytes());
    for url in urls {
        hasher.update(b"\n");
        hasher.update(url.as_bytes());
    }
    hex::encode(hasher.finalize())
}
