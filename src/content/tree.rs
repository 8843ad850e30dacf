//! Page tree loaded from a TOML site manifest.
//!
//! ```toml
//! base_url = "https://example.com/"
//!
//! [[nodes]]
//! id = 1
//! segment = "home"
//!
//! [[nodes]]
//! id = 2
//! segment = "about"
//!
//! [[nodes]]
//! id = 3
//! parent = 2
//! segment = "team"
//!
//! [[nodes]]
//! id = 4
//! segment = "crew"
//! mirror_of = 3
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;
use url::Url;

use crate::domain::slug::derive_segment;
use crate::domain::types::NodeId;

use super::error::ContentError;
use super::node::TreeNode;

/// Segment that makes a root-level page the site's front page.
pub const HOME_SEGMENT: &str = "home";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeRecord {
    pub id: NodeId,
    pub parent: Option<NodeId>,
    pub segment: String,
    /// Nodes with `cacheable = false` do not take part in static caching.
    pub cacheable: bool,
    /// Source page of a mirror (virtual) page.
    pub mirror_of: Option<NodeId>,
}

#[derive(Debug, Clone)]
pub struct ContentTree {
    base_url: Url,
    nodes: BTreeMap<NodeId, NodeRecord>,
}

#[derive(Debug, Deserialize)]
struct RawManifest {
    base_url: String,
    #[serde(default)]
    nodes: Vec<RawNode>,
}

#[derive(Debug, Deserialize)]
struct RawNode {
    id: NodeId,
    #[serde(default)]
    parent: Option<NodeId>,
    segment: String,
    #[serde(default = "default_cacheable")]
    cacheable: bool,
    #[serde(default)]
    mirror_of: Option<NodeId>,
}

fn default_cacheable() -> bool {
    true
}

impl ContentTree {
    pub fn new(
        base_url: Url,
        records: impl IntoIterator<Item = NodeRecord>,
    ) -> Result<Self, ContentError> {
        let mut nodes = BTreeMap::new();
        for mut record in records {
            record.segment = derive_segment(&record.segment).map_err(|source| {
                ContentError::Segment {
                    node: record.id,
                    source,
                }
            })?;
            let id = record.id;
            if nodes.insert(id, record).is_some() {
                return Err(ContentError::DuplicateNode(id));
            }
        }

        let tree = Self {
            base_url: with_trailing_slash(base_url),
            nodes,
        };
        tree.validate()?;
        Ok(tree)
    }

    pub fn from_toml_str(manifest: &str) -> Result<Self, ContentError> {
        let raw: RawManifest = toml::from_str(manifest)?;
        let base_url = Url::parse(&raw.base_url).map_err(|source| ContentError::BaseUrl {
            url: raw.base_url.clone(),
            source,
        })?;

        let records = raw.nodes.into_iter().map(|node| NodeRecord {
            id: node.id,
            parent: node.parent,
            segment: node.segment,
            cacheable: node.cacheable,
            mirror_of: node.mirror_of,
        });

        Self::new(base_url, records)
    }

    pub async fn load(path: &Path) -> Result<Self, ContentError> {
        let manifest =
            tokio::fs::read_to_string(path)
                .await
                .map_err(|source| ContentError::Read {
                    path: path.to_path_buf(),
                    source,
                })?;
        Self::from_toml_str(&manifest)
    }

    pub fn get(&self, id: NodeId) -> Option<&NodeRecord> {
        self.nodes.get(&id)
    }

    pub fn node(&self, id: NodeId) -> Result<TreeNode<'_>, ContentError> {
        self.get(id)
            .map(|record| TreeNode::new(self, record))
            .ok_or(ContentError::UnknownNode(id))
    }

    /// Mirror pages whose source is `id`, in id order.
    pub fn mirrors_of(&self, id: NodeId) -> impl Iterator<Item = &NodeRecord> + '_ {
        self.nodes
            .values()
            .filter(move |record| record.mirror_of == Some(id))
    }

    /// Site-relative link of a node, e.g. `/about/team/`.
    pub fn link(&self, id: NodeId) -> Result<String, ContentError> {
        let mut segments = Vec::new();
        let mut current = Some(id);
        while let Some(node_id) = current {
            let record = self.get(node_id).ok_or(ContentError::UnknownNode(node_id))?;
            if segments.len() > self.nodes.len() {
                return Err(ContentError::Cycle(id));
            }
            segments.push(record.segment.as_str());
            current = record.parent;
        }
        segments.reverse();

        if segments == [HOME_SEGMENT] {
            return Ok("/".to_string());
        }

        Ok(format!("/{}/", segments.join("/")))
    }

    pub fn absolute_url(&self, id: NodeId) -> Result<Url, ContentError> {
        let link = self.link(id)?;
        self.base_url
            .join(link.trim_start_matches('/'))
            .map_err(|source| ContentError::Url { node: id, source })
    }

    /// Copy of the tree with `id` placed under `parent` with `segment`.
    ///
    /// Describes where a node lived before it was moved.
    pub fn relocated(
        &self,
        id: NodeId,
        parent: Option<NodeId>,
        segment: Option<&str>,
    ) -> Result<Self, ContentError> {
        let mut tree = self.clone();
        let record = tree
            .nodes
            .get_mut(&id)
            .ok_or(ContentError::UnknownNode(id))?;
        record.parent = parent;
        if let Some(segment) = segment {
            record.segment = derive_segment(segment)
                .map_err(|source| ContentError::Segment { node: id, source })?;
        }
        tree.validate()?;
        Ok(tree)
    }

    fn validate(&self) -> Result<(), ContentError> {
        for record in self.nodes.values() {
            if let Some(parent) = record.parent {
                if !self.nodes.contains_key(&parent) {
                    return Err(ContentError::UnknownParent {
                        node: record.id,
                        parent,
                    });
                }
            }
            if let Some(target) = record.mirror_of {
                if !self.nodes.contains_key(&target) {
                    return Err(ContentError::UnknownMirror {
                        node: record.id,
                        target,
                    });
                }
            }
            self.link(record.id)?;
        }
        Ok(())
    }
}

fn with_trailing_slash(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}
