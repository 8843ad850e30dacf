//! Publishing engine configuration.
//!
//! Built from the validated `[publishing]` settings; see [`crate::config`].

use std::time::Duration;

use super::budget::BudgetRequest;

/// Job batching and collection budget for one engine.
#[derive(Debug, Clone)]
pub struct PublishConfig {
    /// Collect and queue jobs on lifecycle events.
    pub enabled: bool,
    /// Maximum URLs per update job; 0 puts every URL of an item in one job.
    pub max_urls_per_job: usize,
    /// Memory ceiling requested before collecting; `None` asks for no ceiling.
    pub collect_memory_limit_bytes: Option<u64>,
    /// Time ceiling requested before collecting; `None` asks for no ceiling.
    pub collect_time_limit: Option<Duration>,
}

impl Default for PublishConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_urls_per_job: 0,
            collect_memory_limit_bytes: None,
            collect_time_limit: None,
        }
    }
}

impl From<&crate::config::PublishingSettings> for PublishConfig {
    fn from(settings: &crate::config::PublishingSettings) -> Self {
        Self {
            enabled: settings.enabled,
            max_urls_per_job: settings.max_urls_per_job,
            collect_memory_limit_bytes: settings.collect_memory_limit_bytes,
            collect_time_limit: settings.collect_time_limit,
        }
    }
}

impl PublishConfig {
    /// The request handed to the resource budget before each collection.
    pub fn budget_request(&self) -> BudgetRequest {
        BudgetRequest {
            memory_bytes: self.collect_memory_limit_bytes,
            time: self.collect_time_limit,
        }
    }
}
