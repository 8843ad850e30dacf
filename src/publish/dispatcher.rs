//! Turns a pending change set into queued jobs.

use std::sync::Arc;
use std::time::Instant;

use metrics::{counter, histogram};
use tracing::{debug, info, warn};

use crate::application::jobs::{JobHandle, JobPayload, JobQueue, SubmissionError};
use crate::domain::types::JobAction;

use super::batcher::{Batch, JobBatcher};
use super::error::PublishError;
use super::pending::PendingChangeSet;

/// What a flush put on the queue.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlushReport {
    /// Handles in submission order.
    pub handles: Vec<JobHandle>,
    pub update_jobs: usize,
    pub delete_jobs: usize,
    pub update_urls: usize,
    pub delete_urls: usize,
}

impl FlushReport {
    pub fn job_count(&self) -> usize {
        self.update_jobs + self.delete_jobs
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Append a later flush, keeping submission order.
    pub fn absorb(&mut self, other: FlushReport) {
        self.handles.extend(other.handles);
        self.update_jobs += other.update_jobs;
        self.delete_jobs += other.delete_jobs;
        self.update_urls += other.update_urls;
        self.delete_urls += other.delete_urls;
    }

    fn record(&mut self, action: JobAction, urls: usize, handle: JobHandle) {
        match action {
            JobAction::Update => {
                self.update_jobs += 1;
                self.update_urls += urls;
            }
            JobAction::Delete => {
                self.delete_jobs += 1;
                self.delete_urls += urls;
            }
        }
        self.handles.push(handle);
    }
}

/// Builds one job per batch and submits them to the queue in order.
#[derive(Clone)]
pub struct JobDispatcher {
    queue: Arc<dyn JobQueue>,
    batcher: JobBatcher,
}

impl JobDispatcher {
    pub fn new(queue: Arc<dyn JobQueue>, batcher: JobBatcher) -> Self {
        Self { queue, batcher }
    }

    pub fn batcher(&self) -> &JobBatcher {
        &self.batcher
    }

    /// Submit jobs for everything pending, then clear it.
    ///
    /// Update items are processed before delete items. Each list is cleared
    /// only once all of its jobs were accepted, so a failure leaves the
    /// failing list pending and a retry re-submits its earlier jobs.
    pub async fn flush_changes(
        &self,
        pending: &mut PendingChangeSet,
    ) -> Result<FlushReport, PublishError> {
        let mut report = FlushReport::default();

        if pending.is_empty() {
            pending.settle();
            debug!(target = "publish::dispatcher", "nothing pending; flush skipped");
            return Ok(report);
        }

        let started = Instant::now();

        for item in pending.to_update() {
            for batch in self.batcher.update_batches(item.urls_to_cache()) {
                self.submit(batch, &mut report).await?;
            }
        }
        pending.clear_updates();

        for item in pending.to_delete() {
            let batch = self.batcher.delete_batch(item.urls_to_cache());
            self.submit(batch, &mut report).await?;
        }
        pending.clear_deletes();

        histogram!("static_publish_flush_ms").record(started.elapsed().as_secs_f64() * 1000.0);

        info!(
            target = "publish::dispatcher",
            update_jobs = report.update_jobs,
            update_urls = report.update_urls,
            delete_jobs = report.delete_jobs,
            delete_urls = report.delete_urls,
            "static cache jobs queued"
        );

        Ok(report)
    }

    async fn submit(&self, batch: Batch, report: &mut FlushReport) -> Result<(), SubmissionError> {
        let action = batch.action;
        let payload = JobPayload::new(action, batch.urls);
        let url_count = payload.len();

        let handle = match self.queue.queue_job(payload).await {
            Ok(handle) => handle,
            Err(err) => {
                counter!("static_publish_submit_failed_total", "action" => action.as_str())
                    .increment(1);
                warn!(
                    target = "publish::dispatcher",
                    action = action.as_str(),
                    urls = url_count,
                    error = %err,
                    "job submission failed"
                );
                return Err(err);
            }
        };

        counter!("static_publish_jobs_enqueued_total", "action" => action.as_str()).increment(1);
        counter!("static_publish_urls_enqueued_total", "action" => action.as_str())
            .increment(url_count as u64);

        debug!(
            target = "publish::dispatcher",
            job_id = %handle,
            action = action.as_str(),
            urls = url_count,
            "job queued"
        );

        report.record(action, url_count, handle);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use serde_json::Value;

    use super::*;
    use crate::application::jobs::InMemoryJobQueue;
    use crate::publish::capability::{CacheableItem, CacheableItems, UrlSet};
    use crate::publish::pending::ChangeSetState;

    struct Urls(Vec<&'static str>);

    impl CacheableItem for Urls {
        fn urls_to_cache(&self) -> UrlSet {
            self.0
                .iter()
                .map(|url| (url.to_string(), Value::from(0)))
                .collect()
        }
    }

    fn items(sets: &[&[&'static str]]) -> CacheableItems {
        sets.iter()
            .map(|urls| Arc::new(Urls(urls.to_vec())) as Arc<dyn CacheableItem>)
            .collect()
    }

    /// Accepts `limit` jobs, then rejects everything.
    struct FlakyQueue {
        inner: InMemoryJobQueue,
        limit: usize,
        attempts: AtomicUsize,
    }

    #[async_trait]
    impl JobQueue for FlakyQueue {
        async fn queue_job(&self, payload: JobPayload) -> Result<JobHandle, SubmissionError> {
            if self.attempts.fetch_add(1, Ordering::SeqCst) >= self.limit {
                return Err(SubmissionError::rejected("queue full"));
            }
            self.inner.queue_job(payload).await
        }
    }

    fn dispatcher(queue: Arc<InMemoryJobQueue>, limit: usize) -> JobDispatcher {
        JobDispatcher::new(queue, JobBatcher::new(limit))
    }

    #[tokio::test]
    async fn update_items_are_batched_in_order() {
        let queue = Arc::new(InMemoryJobQueue::new());
        let mut pending = PendingChangeSet::new();
        pending.replace(items(&[&["b", "a", "c"], &["z"]]), Vec::new());

        let report = dispatcher(queue.clone(), 2)
            .flush_changes(&mut pending)
            .await
            .expect("flush succeeds");

        let urls: Vec<Vec<String>> = queue.payloads().into_iter().map(|p| p.urls).collect();
        assert_eq!(urls, vec![vec!["a", "b"], vec!["c"], vec!["z"]]);
        assert_eq!(report.update_jobs, 3);
        assert_eq!(report.update_urls, 4);
        assert_eq!(report.handles.len(), 3);
    }

    #[tokio::test]
    async fn delete_items_are_never_split() {
        let queue = Arc::new(InMemoryJobQueue::new());
        let mut pending = PendingChangeSet::new();
        pending.replace(Vec::new(), items(&[&["c", "a", "b"], &["d"]]));

        let report = dispatcher(queue.clone(), 1)
            .flush_changes(&mut pending)
            .await
            .expect("flush succeeds");

        let payloads = queue.payloads();
        assert_eq!(payloads.len(), 2);
        assert_eq!(payloads[0].urls, vec!["a", "b", "c"]);
        assert_eq!(payloads[0].action, JobAction::Delete);
        assert_eq!(payloads[0].label, "Purging URLs: [a, b, c]");
        assert_eq!(report.delete_jobs, 2);
    }

    #[tokio::test]
    async fn updates_are_queued_before_deletes() {
        let queue = Arc::new(InMemoryJobQueue::new());
        let mut pending = PendingChangeSet::new();
        pending.replace(items(&[&["/parent/"]]), items(&[&["/child/"]]));

        dispatcher(queue.clone(), 0)
            .flush_changes(&mut pending)
            .await
            .expect("flush succeeds");

        let actions: Vec<JobAction> = queue.payloads().iter().map(|p| p.action).collect();
        assert_eq!(actions, vec![JobAction::Update, JobAction::Delete]);
    }

    #[tokio::test]
    async fn flush_clears_pending_and_second_flush_is_a_no_op() {
        let queue = Arc::new(InMemoryJobQueue::new());
        let dispatcher = dispatcher(queue.clone(), 0);
        let mut pending = PendingChangeSet::new();
        pending.replace(items(&[&["a"]]), items(&[&["b"]]));

        dispatcher.flush_changes(&mut pending).await.expect("first flush");
        assert!(pending.is_empty());
        assert_eq!(pending.state(), ChangeSetState::Idle);

        let report = dispatcher
            .flush_changes(&mut pending)
            .await
            .expect("second flush");
        assert!(report.is_empty());
        assert_eq!(queue.len(), 2);
    }

    #[tokio::test]
    async fn flushing_idle_set_submits_nothing() {
        let queue = Arc::new(InMemoryJobQueue::new());
        let mut pending = PendingChangeSet::new();

        let report = dispatcher(queue.clone(), 5)
            .flush_changes(&mut pending)
            .await
            .expect("idle flush");

        assert_eq!(report.job_count(), 0);
        assert!(queue.is_empty());
    }

    #[tokio::test]
    async fn empty_collection_flush_returns_to_idle() {
        let queue = Arc::new(InMemoryJobQueue::new());
        let mut pending = PendingChangeSet::new();
        pending.replace(Vec::new(), Vec::new());
        assert_eq!(pending.state(), ChangeSetState::Collected);

        let report = dispatcher(queue.clone(), 0)
            .flush_changes(&mut pending)
            .await
            .expect("empty flush");

        assert!(report.is_empty());
        assert!(queue.is_empty());
        assert_eq!(pending.state(), ChangeSetState::Idle);
    }

    #[tokio::test]
    async fn lists_set_through_mutators_are_flushed() {
        let queue = Arc::new(InMemoryJobQueue::new());
        let mut pending = PendingChangeSet::new();
        pending.set_to_update(items(&[&["/b/", "/a/"]]));
        pending.set_to_delete(items(&[&["/gone/"]]));
        assert_eq!(pending.state(), ChangeSetState::Collected);

        let report = dispatcher(queue.clone(), 0)
            .flush_changes(&mut pending)
            .await
            .expect("flush succeeds");

        let summary: Vec<(JobAction, Vec<String>)> = queue
            .payloads()
            .into_iter()
            .map(|p| (p.action, p.urls))
            .collect();
        assert_eq!(
            summary,
            vec![
                (JobAction::Update, vec!["/a/".to_string(), "/b/".to_string()]),
                (JobAction::Delete, vec!["/gone/".to_string()]),
            ]
        );
        assert_eq!(report.job_count(), 2);
        assert!(pending.is_empty());
        assert_eq!(pending.state(), ChangeSetState::Idle);
    }

    #[tokio::test]
    async fn failure_in_update_loop_keeps_everything_pending() {
        let queue = Arc::new(FlakyQueue {
            inner: InMemoryJobQueue::new(),
            limit: 1,
            attempts: AtomicUsize::new(0),
        });
        let dispatcher = JobDispatcher::new(queue.clone(), JobBatcher::new(1));
        let mut pending = PendingChangeSet::new();
        pending.replace(items(&[&["a", "b"]]), items(&[&["c"]]));

        let err = dispatcher
            .flush_changes(&mut pending)
            .await
            .expect_err("second job is rejected");

        assert!(matches!(err, PublishError::Submission(_)));
        assert_eq!(queue.inner.len(), 1);
        assert_eq!(pending.to_update().len(), 1);
        assert_eq!(pending.to_delete().len(), 1);
        assert_eq!(pending.state(), ChangeSetState::Collected);
    }

    #[tokio::test]
    async fn failure_in_delete_loop_keeps_only_deletes_pending() {
        let queue = Arc::new(FlakyQueue {
            inner: InMemoryJobQueue::new(),
            limit: 1,
            attempts: AtomicUsize::new(0),
        });
        let dispatcher = JobDispatcher::new(queue.clone(), JobBatcher::new(0));
        let mut pending = PendingChangeSet::new();
        pending.replace(items(&[&["a"]]), items(&[&["b"]]));

        dispatcher
            .flush_changes(&mut pending)
            .await
            .expect_err("delete job is rejected");

        assert!(pending.to_update().is_empty());
        assert_eq!(pending.to_delete().len(), 1);
    }

    #[test]
    fn absorb_appends_in_order() {
        let mut first = FlushReport::default();
        first.record(JobAction::Delete, 2, JobHandle::new("1"));
        let mut second = FlushReport::default();
        second.record(JobAction::Update, 3, JobHandle::new("2"));

        first.absorb(second);

        assert_eq!(
            first.handles,
            vec![JobHandle::new("1"), JobHandle::new("2")]
        );
        assert_eq!(first.job_count(), 2);
        assert_eq!(first.update_urls, 3);
        assert_eq!(first.delete_urls, 2);
    }
}
