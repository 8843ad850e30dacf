//! Manifest-backed content tree implementing the publishing capabilities.

mod error;
mod node;
mod tree;

pub use error::ContentError;
pub use node::{PageUrls, TreeNode};
pub use tree::{ContentTree, HOME_SEGMENT, NodeRecord};
