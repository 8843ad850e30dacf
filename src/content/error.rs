use std::path::PathBuf;

use thiserror::Error;

use crate::domain::slug::SlugError;
use crate::domain::types::NodeId;

#[derive(Debug, Error)]
pub enum ContentError {
    #[error("failed to read site manifest `{path}`: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse site manifest: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid base url `{url}`: {source}")]
    BaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("duplicate node id {0}")]
    DuplicateNode(NodeId),
    #[error("node {node} references unknown parent {parent}")]
    UnknownParent { node: NodeId, parent: NodeId },
    #[error("node {node} mirrors unknown node {target}")]
    UnknownMirror { node: NodeId, target: NodeId },
    #[error("node {0} is part of a parent cycle")]
    Cycle(NodeId),
    #[error("unknown node {0}")]
    UnknownNode(NodeId),
    #[error("invalid url segment for node {node}: {source}")]
    Segment {
        node: NodeId,
        #[source]
        source: SlugError,
    },
    #[error("failed to build url for node {node}: {source}")]
    Url {
        node: NodeId,
        #[source]
        source: url::ParseError,
    },
}
