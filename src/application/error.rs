use std::error::Error as StdError;

use thiserror::Error;

use crate::{
    config::LoadError, content::ContentError, infra::error::InfraError, publish::PublishError,
};

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] LoadError),
    #[error(transparent)]
    Infra(#[from] InfraError),
    #[error(transparent)]
    Content(#[from] ContentError),
    #[error(transparent)]
    Publish(#[from] PublishError),
    #[error("failed to write command output: {0}")]
    Output(#[from] serde_json::Error),
}

impl AppError {
    /// Messages of this error and every source below it, outermost first.
    pub fn chain(&self) -> Vec<String> {
        let mut messages = vec![self.to_string()];
        let mut current = self.source();
        while let Some(inner) = current {
            messages.push(inner.to_string());
            current = inner.source();
        }
        messages.dedup();
        messages
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::NodeId;

    #[test]
    fn chain_skips_transparent_duplicates() {
        let error = AppError::from(ContentError::UnknownNode(NodeId(4)));
        assert_eq!(error.chain(), vec!["unknown node 4".to_string()]);
    }
}
