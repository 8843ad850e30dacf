//! URL segment normalisation for content nodes.
//!
//! Segments come from hand-written site manifests, so they are run through
//! `slug` to get the lower-case, dash separated form the rendered URLs use.

use slug::slugify;
use thiserror::Error;

/// Errors that can occur while normalising a URL segment.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SlugError {
    #[error("url segment is empty")]
    EmptyInput,
    #[error("failed to derive url segment from `{input}`")]
    Unrepresentable { input: String },
}

/// Derive the URL segment for the provided text.
pub fn derive_segment(input: &str) -> Result<String, SlugError> {
    if input.trim().is_empty() {
        return Err(SlugError::EmptyInput);
    }

    let candidate = slugify(input);

    if candidate.is_empty() {
        return Err(SlugError::Unrepresentable {
            input: input.to_string(),
        });
    }

    Ok(candidate)
}
