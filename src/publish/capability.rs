//! Capabilities the engine consumes from the content model.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use crate::domain::types::{ActionKind, NodeId};

/// URLs owned by a cacheable item, mapped to opaque metadata.
pub type UrlSet = HashMap<String, Value>;

/// Something that owns rendered URLs in the static cache.
pub trait CacheableItem: Send + Sync {
    fn urls_to_cache(&self) -> UrlSet;
}

/// Items a change provider reports as affected.
pub type CacheableItems = Vec<Arc<dyn CacheableItem>>;

/// Immutable description of the lifecycle action being processed.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionContext {
    action: ActionKind,
    extra: BTreeMap<String, Value>,
}

impl ActionContext {
    pub fn new(action: ActionKind) -> Self {
        Self {
            action,
            extra: BTreeMap::new(),
        }
    }

    pub fn publish() -> Self {
        Self::new(ActionKind::Publish)
    }

    pub fn unpublish() -> Self {
        Self::new(ActionKind::Unpublish)
    }

    /// Attach an extra key/value pair for providers that understand it.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    pub fn action(&self) -> ActionKind {
        self.action
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.extra.get(key)
    }
}

#[derive(Debug, Error)]
#[error("change provider failed: {message}")]
pub struct ProviderError {
    message: String,
}

impl ProviderError {
    pub fn new(message: impl fmt::Display) -> Self {
        Self {
            message: message.to_string(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Reports which cacheable items a publish or unpublish affects.
#[async_trait]
pub trait ChangeProvider: Send + Sync {
    async fn objects_to_update(
        &self,
        context: &ActionContext,
    ) -> Result<CacheableItems, ProviderError>;

    async fn objects_to_delete(
        &self,
        context: &ActionContext,
    ) -> Result<CacheableItems, ProviderError>;
}

/// A node of the content tree as seen by the publishing engine.
pub trait ContentNode: Send + Sync {
    fn parent_id(&self) -> Option<NodeId>;

    fn url_segment(&self) -> &str;

    /// Nodes that do not take part in static caching return `None`.
    fn change_provider(&self) -> Option<&dyn ChangeProvider> {
        None
    }
}

/// True when the node's address changed between `original` and `current`.
pub fn has_moved<N>(original: &N, current: &N) -> bool
where
    N: ContentNode + ?Sized,
{
    original.parent_id() != current.parent_id() || original.url_segment() != current.url_segment()
}
