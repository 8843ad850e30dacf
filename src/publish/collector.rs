//! Single collection pass against a node's change provider.

use metrics::counter;
use tracing::{debug, info};

use super::capability::{ActionContext, ContentNode};
use super::error::PublishError;
use super::pending::PendingChangeSet;

/// Owns the pending change set of one node for one logical operation.
#[derive(Debug, Default)]
pub struct ChangeCollector {
    pending: PendingChangeSet,
}

impl ChangeCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask `node` which items the action affects and store the answer.
    ///
    /// The previous pending state is overwritten only when both provider calls
    /// succeed. Nodes without a change provider leave it untouched.
    pub async fn collect_changes<N>(
        &mut self,
        node: &N,
        context: &ActionContext,
    ) -> Result<(), PublishError>
    where
        N: ContentNode + ?Sized,
    {
        let Some(provider) = node.change_provider() else {
            debug!(
                target = "publish::collector",
                action = context.action().as_str(),
                segment = node.url_segment(),
                "node has no change provider; nothing to collect"
            );
            return Ok(());
        };

        let to_update = provider.objects_to_update(context).await?;
        let to_delete = provider.objects_to_delete(context).await?;

        counter!("static_publish_collect_total", "action" => context.action().as_str())
            .increment(1);

        info!(
            target = "publish::collector",
            action = context.action().as_str(),
            segment = node.url_segment(),
            to_update = to_update.len(),
            to_delete = to_delete.len(),
            "changes collected"
        );

        self.pending.replace(to_update, to_delete);
        Ok(())
    }

    pub fn pending(&self) -> &PendingChangeSet {
        &self.pending
    }

    pub fn pending_mut(&mut self) -> &mut PendingChangeSet {
        &mut self.pending
    }
}
