//! Shared wiring of configuration, dispatcher and resource budget.

use std::sync::Arc;

use crate::application::jobs::JobQueue;

use super::batcher::JobBatcher;
use super::budget::{NoopBudget, ResourceBudget};
use super::capability::ContentNode;
use super::config::PublishConfig;
use super::dispatcher::JobDispatcher;
use super::handler::PublishingEventHandler;

/// Cheap to clone; hand one to every request that publishes content.
#[derive(Clone)]
pub struct PublishEngine {
    config: PublishConfig,
    dispatcher: JobDispatcher,
    budget: Arc<dyn ResourceBudget>,
}

impl PublishEngine {
    pub fn new(
        config: PublishConfig,
        queue: Arc<dyn JobQueue>,
        budget: Arc<dyn ResourceBudget>,
    ) -> Self {
        let dispatcher = JobDispatcher::new(queue, JobBatcher::new(config.max_urls_per_job));
        Self {
            config,
            dispatcher,
            budget,
        }
    }

    /// Engine for hosts without per-operation resource ceilings.
    pub fn with_queue(config: PublishConfig, queue: Arc<dyn JobQueue>) -> Self {
        Self::new(config, queue, Arc::new(NoopBudget))
    }

    /// Handler bound to `node` for one logical operation.
    pub fn handler_for<'a, N>(&self, node: &'a N) -> PublishingEventHandler<'a, N>
    where
        N: ContentNode + ?Sized,
    {
        PublishingEventHandler::new(node, self.clone())
    }

    pub fn config(&self) -> &PublishConfig {
        &self.config
    }

    pub fn dispatcher(&self) -> &JobDispatcher {
        &self.dispatcher
    }

    pub(crate) fn request_budget(&self) {
        self.budget.request(&self.config.budget_request());
    }
}
