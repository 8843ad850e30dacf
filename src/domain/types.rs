//! Shared domain enumerations and identifiers.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Identifier of a node in the content tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub u64);

impl NodeId {
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for NodeId {
    type Err = std::num::ParseIntError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        value.trim().parse().map(NodeId)
    }
}

/// Lifecycle action a change provider is asked about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    Publish,
    Unpublish,
}

impl ActionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ActionKind::Publish => "publish",
            ActionKind::Unpublish => "unpublish",
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a queued job does with its URLs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobAction {
    /// Regenerate the cached artifact for each URL.
    Update,
    /// Remove the cached artifact for each URL.
    Delete,
}

impl JobAction {
    pub fn as_str(self) -> &'static str {
        match self {
            JobAction::Update => "update",
            JobAction::Delete => "delete",
        }
    }

    /// Job type name used by the persistent job table.
    pub fn job_type(self) -> &'static str {
        match self {
            JobAction::Update => "static_cache_build",
            JobAction::Delete => "static_cache_purge",
        }
    }

    pub(crate) fn label_verb(self) -> &'static str {
        match self {
            JobAction::Update => "Building",
            JobAction::Delete => "Purging",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn node_id_parses_with_whitespace() {
        assert_eq!(" 42 ".parse::<NodeId>().expect("numeric id"), NodeId(42));
        assert!("root".parse::<NodeId>().is_err());
    }

    #[test]
    fn job_action_maps_to_job_types() {
        assert_eq!(JobAction::Update.job_type(), "static_cache_build");
        assert_eq!(JobAction::Delete.job_type(), "static_cache_purge");
    }

    #[test]
    fn action_kind_serializes_snake_case() {
        let json = serde_json::to_string(&ActionKind::Unpublish).expect("serialize");
        assert_eq!(json, "\"unpublish\"");
    }
}
