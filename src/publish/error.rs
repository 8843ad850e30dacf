use thiserror::Error;

use crate::application::jobs::SubmissionError;

use super::capability::ProviderError;

#[derive(Debug, Error)]
pub enum PublishError {
    #[error(transparent)]
    Provider(#[from] ProviderError),
    #[error(transparent)]
    Submission(#[from] SubmissionError),
}
