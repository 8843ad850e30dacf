mod memory;
mod payload;
mod queue;

pub use memory::{InMemoryJobQueue, QueuedJob};
pub use payload::JobPayload;
pub use queue::{JobHandle, JobQueue, SubmissionError};
