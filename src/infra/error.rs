use thiserror::Error;

/// Failures while wiring the job queue and runtime around the engine.
#[derive(Debug, Error)]
pub enum InfraError {
    #[error("database.url is required to queue jobs (pass --dry-run to preview them)")]
    MissingDatabaseUrl,
    #[error("failed to connect to the job database")]
    Connect(#[source] sqlx::Error),
    #[error("telemetry initialization failed: {message}")]
    Telemetry { message: String },
}

impl InfraError {
    pub fn telemetry(message: impl Into<String>) -> Self {
        Self::Telemetry {
            message: message.into(),
        }
    }
}
