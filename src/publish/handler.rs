//! Lifecycle binding between content events and the collect/flush protocol.

use tracing::{debug, info};

use super::capability::{ActionContext, ContentNode, has_moved};
use super::collector::ChangeCollector;
use super::dispatcher::FlushReport;
use super::engine::PublishEngine;
use super::error::PublishError;
use super::pending::PendingChangeSet;

/// Reacts to publish and unpublish events of one node.
///
/// A handler owns the pending change set for a single logical operation and
/// must not be shared between concurrent operations on the same node.
///
/// # Usage
///
/// ```ignore
/// let mut handler = engine.handler_for(&page);
/// handler.on_before_unpublish().await?;
/// store.unpublish(page.id()).await?;
/// handler.on_after_unpublish().await?;
/// ```
pub struct PublishingEventHandler<'a, N: ContentNode + ?Sized> {
    node: &'a N,
    engine: PublishEngine,
    collector: ChangeCollector,
}

impl<'a, N: ContentNode + ?Sized> PublishingEventHandler<'a, N> {
    pub fn new(node: &'a N, engine: PublishEngine) -> Self {
        Self {
            node,
            engine,
            collector: ChangeCollector::new(),
        }
    }

    pub fn node(&self) -> &'a N {
        self.node
    }

    /// Queue jobs after the node was published.
    ///
    /// When `original` sits at a different address, the old address is
    /// unpublished and flushed first, so its purge jobs precede every job for
    /// the new address.
    pub async fn on_after_publish(
        &mut self,
        original: Option<&N>,
    ) -> Result<FlushReport, PublishError> {
        if !self.engine.config().enabled {
            debug!(
                target = "publish::handler",
                segment = self.node.url_segment(),
                "publish hook skipped: publishing disabled"
            );
            return Ok(FlushReport::default());
        }

        let mut report = FlushReport::default();

        if let Some(original) = original.filter(|original| has_moved(*original, self.node)) {
            info!(
                target = "publish::handler",
                from_parent = ?original.parent_id(),
                from_segment = original.url_segment(),
                to_parent = ?self.node.parent_id(),
                to_segment = self.node.url_segment(),
                "node moved; unpublishing previous address"
            );

            let mut previous = ChangeCollector::new();
            self.engine.request_budget();
            previous
                .collect_changes(original, &ActionContext::unpublish())
                .await?;
            report.absorb(
                self.engine
                    .dispatcher()
                    .flush_changes(previous.pending_mut())
                    .await?,
            );
        }

        self.collect_changes(&ActionContext::publish()).await?;
        report.absorb(self.flush_changes().await?);

        Ok(report)
    }

    /// Collect what unpublishing affects while the node is still published.
    pub async fn on_before_unpublish(&mut self) -> Result<(), PublishError> {
        if !self.engine.config().enabled {
            debug!(
                target = "publish::handler",
                segment = self.node.url_segment(),
                "unpublish hook skipped: publishing disabled"
            );
            return Ok(());
        }

        self.collect_changes(&ActionContext::unpublish()).await
    }

    /// Queue the jobs collected by [`Self::on_before_unpublish`].
    pub async fn on_after_unpublish(&mut self) -> Result<FlushReport, PublishError> {
        if !self.engine.config().enabled {
            return Ok(FlushReport::default());
        }

        self.flush_changes().await
    }

    /// Replace the pending set with the bound node's answer for `context`.
    pub async fn collect_changes(&mut self, context: &ActionContext) -> Result<(), PublishError> {
        self.engine.request_budget();
        self.collector.collect_changes(self.node, context).await
    }

    /// Submit jobs for the pending set and clear it.
    pub async fn flush_changes(&mut self) -> Result<FlushReport, PublishError> {
        self.engine
            .dispatcher()
            .flush_changes(self.collector.pending_mut())
            .await
    }

    pub fn pending(&self) -> &PendingChangeSet {
        self.collector.pending()
    }

    pub fn pending_mut(&mut self) -> &mut PendingChangeSet {
        self.collector.pending_mut()
    }
}
