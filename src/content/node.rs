//! Default change policy for pages of a [`ContentTree`].
//!
//! - publish: refresh the page, its parent and every mirror of the page
//! - unpublish: refresh the parent, purge the page and its mirrors

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;

use crate::domain::types::{ActionKind, NodeId};
use crate::publish::{
    ActionContext, CacheableItem, CacheableItems, ChangeProvider, ContentNode, ProviderError,
    UrlSet,
};

use super::tree::{ContentTree, NodeRecord};

/// A node viewed through the tree it belongs to.
#[derive(Debug, Clone, Copy)]
pub struct TreeNode<'t> {
    tree: &'t ContentTree,
    record: &'t NodeRecord,
}

/// The rendered page of a single node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageUrls {
    pub node: NodeId,
    pub url: String,
}

impl CacheableItem for PageUrls {
    fn urls_to_cache(&self) -> UrlSet {
        UrlSet::from([(self.url.clone(), json!({ "node": self.node.get() }))])
    }
}

impl<'t> TreeNode<'t> {
    pub(crate) fn new(tree: &'t ContentTree, record: &'t NodeRecord) -> Self {
        Self { tree, record }
    }

    pub fn id(&self) -> NodeId {
        self.record.id
    }

    fn page(&self, record: &NodeRecord) -> Result<Arc<dyn CacheableItem>, ProviderError> {
        let url = self
            .tree
            .absolute_url(record.id)
            .map_err(ProviderError::new)?;
        Ok(Arc::new(PageUrls {
            node: record.id,
            url: url.to_string(),
        }))
    }

    fn parent_page(&self) -> Result<Option<Arc<dyn CacheableItem>>, ProviderError> {
        let Some(parent_id) = self.record.parent else {
            return Ok(None);
        };
        let parent = self
            .tree
            .get(parent_id)
            .ok_or_else(|| ProviderError::new(format!("unknown parent {parent_id}")))?;
        if !parent.cacheable {
            return Ok(None);
        }
        self.page(parent).map(Some)
    }

    fn mirror_pages(&self) -> Result<CacheableItems, ProviderError> {
        self.tree
            .mirrors_of(self.record.id)
            .filter(|mirror| mirror.cacheable)
            .map(|mirror| self.page(mirror))
            .collect()
    }
}

#[async_trait]
impl<'t> ChangeProvider for TreeNode<'t> {
    async fn objects_to_update(
        &self,
        context: &ActionContext,
    ) -> Result<CacheableItems, ProviderError> {
        let mut items = Vec::new();
        match context.action() {
            ActionKind::Publish => {
                items.push(self.page(self.record)?);
                items.extend(self.parent_page()?);
                items.extend(self.mirror_pages()?);
            }
            ActionKind::Unpublish => {
                items.extend(self.parent_page()?);
            }
        }
        Ok(items)
    }

    async fn objects_to_delete(
        &self,
        context: &ActionContext,
    ) -> Result<CacheableItems, ProviderError> {
        let mut items = Vec::new();
        if context.action() == ActionKind::Unpublish {
            items.push(self.page(self.record)?);
            items.extend(self.mirror_pages()?);
        }
        Ok(items)
    }
}

impl ContentNode for TreeNode<'_> {
    fn parent_id(&self) -> Option<NodeId> {
        self.record.parent
    }

    fn url_segment(&self) -> &str {
        &self.record.segment
    }

    fn change_provider(&self) -> Option<&dyn ChangeProvider> {
        if self.record.cacheable {
            Some(self)
        } else {
            None
        }
    }
}
