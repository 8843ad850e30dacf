//! Static cache publishing engine.
//!
//! Reacts to content lifecycle events and turns them into static cache jobs:
//!
//! - **Collect**: ask the node's [`ChangeProvider`] which [`CacheableItem`]s a
//!   publish or unpublish affects and keep them as a [`PendingChangeSet`].
//! - **Flush**: sort each item's URLs, split update sets into batches of at
//!   most `max_urls_per_job` and submit one job per batch to a
//!   [`JobQueue`](crate::application::jobs::JobQueue).
//!
//! Moving a node (new parent or URL segment) unpublishes its previous address
//! before the new one is published.
//!
//! ## Configuration
//!
//! ```toml
//! [publishing]
//! enabled = true
//! max_urls_per_job = 20
//! collect_time_limit_seconds = 300
//! ```

mod batcher;
mod budget;
mod capability;
mod collector;
mod config;
mod dispatcher;
mod engine;
mod error;
mod handler;
mod pending;

pub use batcher::{Batch, JobBatcher};
pub use budget::{BudgetRequest, NoopBudget, ResourceBudget};
pub use capability::{
    ActionContext, CacheableItem, CacheableItems, ChangeProvider, ContentNode, ProviderError,
    UrlSet, has_moved,
};
pub use collector::ChangeCollector;
pub use config::PublishConfig;
pub use dispatcher::{FlushReport, JobDispatcher};
pub use engine::PublishEngine;
pub use error::PublishError;
pub use handler::PublishingEventHandler;
pub use pending::{ChangeSetState, PendingChangeSet};
