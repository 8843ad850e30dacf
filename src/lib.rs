//! Keeps a static page cache in sync with a content tree.
//!
//! Publishing, unpublishing or moving a node collects the URLs it affects
//! from pluggable capability providers and queues bounded batches of rebuild
//! and purge jobs for background workers. See [`publish`] for the engine.

pub mod application;
pub mod config;
pub mod content;
pub mod domain;
pub mod infra;
pub mod publish;
mod util;
