//! In-process job queue that records submissions instead of running them.
//!
//! Backs dry runs of the CLI and the engine tests.

use std::sync::Mutex;

use async_trait::async_trait;
use time::OffsetDateTime;
use tracing::debug;
use uuid::Uuid;

use crate::util::lock::mutex_lock;

use super::payload::JobPayload;
use super::queue::{JobHandle, JobQueue, SubmissionError};

const SOURCE: &str = "application::jobs::memory";

/// A job accepted by [`InMemoryJobQueue`].
#[derive(Debug, Clone)]
pub struct QueuedJob {
    pub handle: JobHandle,
    pub payload: JobPayload,
    pub queued_at: OffsetDateTime,
}

/// Records every submitted job in FIFO order.
#[derive(Default)]
pub struct InMemoryJobQueue {
    jobs: Mutex<Vec<QueuedJob>>,
}

impl InMemoryJobQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the recorded jobs in submission order.
    pub fn jobs(&self) -> Vec<QueuedJob> {
        mutex_lock(&self.jobs, SOURCE, "jobs").clone()
    }

    /// Snapshot of the recorded payloads in submission order.
    pub fn payloads(&self) -> Vec<JobPayload> {
        mutex_lock(&self.jobs, SOURCE, "payloads")
            .iter()
            .map(|job| job.payload.clone())
            .collect()
    }

    /// Remove and return every recorded job.
    pub fn drain(&self) -> Vec<QueuedJob> {
        mutex_lock(&self.jobs, SOURCE, "drain").drain(..).collect()
    }

    pub fn len(&self) -> usize {
        mutex_lock(&self.jobs, SOURCE, "len").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl JobQueue for InMemoryJobQueue {
    async fn queue_job(&self, payload: JobPayload) -> Result<JobHandle, SubmissionError> {
        let handle = JobHandle::new(Uuid::new_v4().to_string());

        debug!(
            target = "application::jobs::memory",
            job_id = %handle,
            action = payload.action.as_str(),
            urls = payload.len(),
            "job recorded"
        );

        mutex_lock(&self.jobs, SOURCE, "queue_job").push(QueuedJob {
            handle: handle.clone(),
            payload,
            queued_at: OffsetDateTime::now_utc(),
        });

        Ok(handle)
    }
}

#[cfg(test)]
mod tests {
    use std::panic::{AssertUnwindSafe, catch_unwind};

    use super::*;
    use crate::domain::types::JobAction;

    fn payload(url: &str) -> JobPayload {
        JobPayload::new(JobAction::Update, vec![url.to_string()])
    }

    #[tokio::test]
    async fn records_jobs_in_submission_order() {
        let queue = InMemoryJobQueue::new();

        let first = queue.queue_job(payload("/a/")).await.expect("queued");
        let second = queue.queue_job(payload("/b/")).await.expect("queued");

        assert_ne!(first, second);
        let jobs = queue.jobs();
        assert_eq!(jobs.len(), 2);
        assert_eq!(jobs[0].handle, first);
        assert_eq!(jobs[0].payload.urls, vec!["/a/".to_string()]);
        assert_eq!(jobs[1].payload.urls, vec!["/b/".to_string()]);
    }

    #[tokio::test]
    async fn drain_empties_queue() {
        let queue = InMemoryJobQueue::new();
        queue.queue_job(payload("/a/")).await.expect("queued");

        assert_eq!(queue.drain().len(), 1);
        assert!(queue.is_empty());
    }

    #[tokio::test]
    async fn queue_recovers_from_poisoned_lock() {
        let queue = InMemoryJobQueue::new();

        let _ = catch_unwind(AssertUnwindSafe(|| {
            let _guard = queue.jobs.lock().expect("queue lock should be acquired");
            panic!("poison queue lock");
        }));

        queue.queue_job(payload("/a/")).await.expect("queued");
        assert_eq!(queue.len(), 1);
    }
}
