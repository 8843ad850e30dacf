//! Application services layer: job contracts and the command runner.

pub mod error;
pub mod jobs;
pub mod runner;
