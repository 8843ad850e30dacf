//! Postgres-backed adapters.

mod jobs;

pub use jobs::PostgresJobQueue;

use sqlx::postgres::{PgPool, PgPoolOptions};

use crate::config::DatabaseSettings;

use super::error::InfraError;

/// Open a pool for the configured database.
pub async fn connect(settings: &DatabaseSettings) -> Result<PgPool, InfraError> {
    let url = settings
        .url
        .as_deref()
        .ok_or(InfraError::MissingDatabaseUrl)?;

    PgPoolOptions::new()
        .max_connections(settings.max_connections.get())
        .connect(url)
        .await
        .map_err(InfraError::Connect)
}
