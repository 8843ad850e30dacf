use async_trait::async_trait;
use sqlx::PgPool;
use time::OffsetDateTime;
use tracing::debug;

use crate::application::jobs::{JobHandle, JobPayload, JobQueue, SubmissionError};
use crate::config::JobsSettings;

const PENDING_STATE: &str = "Pending";

/// Pushes static cache jobs into the `apalis.jobs` table for the worker pool.
#[derive(Clone)]
pub struct PostgresJobQueue {
    pool: PgPool,
    max_attempts: i32,
    priority: i32,
}

impl PostgresJobQueue {
    pub fn new(pool: PgPool, jobs: &JobsSettings) -> Self {
        Self {
            pool,
            max_attempts: jobs.max_attempts,
            priority: jobs.priority,
        }
    }
}

#[async_trait]
impl JobQueue for PostgresJobQueue {
    async fn queue_job(&self, payload: JobPayload) -> Result<JobHandle, SubmissionError> {
        let job_type = payload.action.job_type();
        let body = serde_json::to_value(&payload)?;

        let id: String = sqlx::query_scalar(
            r#"
            SELECT (apalis.push_job($1, $2::json, $3, $4, $5, $6)).id
            "#,
        )
        .bind(job_type)
        .bind(body)
        .bind(PENDING_STATE)
        .bind(OffsetDateTime::now_utc())
        .bind(self.max_attempts)
        .bind(self.priority)
        .fetch_one(&self.pool)
        .await
        .map_err(SubmissionError::backend)?;

        debug!(
            target = "infra::db::jobs",
            job_id = %id,
            job_type,
            urls = payload.len(),
            "job pushed"
        );

        Ok(JobHandle::new(id))
    }
}
