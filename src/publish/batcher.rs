//! Splits an item's URL set into ordered, bounded batches.

use crate::domain::types::JobAction;

use super::capability::UrlSet;

/// Ordered URLs destined for a single job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Batch {
    pub action: JobAction,
    pub urls: Vec<String>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct JobBatcher {
    max_urls_per_job: usize,
}

impl JobBatcher {
    /// `max_urls_per_job == 0` disables splitting.
    pub fn new(max_urls_per_job: usize) -> Self {
        Self { max_urls_per_job }
    }

    pub fn max_urls_per_job(&self) -> usize {
        self.max_urls_per_job
    }

    /// Batches for regenerating `urls`: `ceil(n / limit)` when bounded, one otherwise.
    pub fn update_batches(&self, urls: UrlSet) -> Vec<Batch> {
        let sorted = sorted_urls(urls);

        if self.max_urls_per_job == 0 {
            return vec![Batch {
                action: JobAction::Update,
                urls: sorted,
            }];
        }

        sorted
            .chunks(self.max_urls_per_job)
            .map(|chunk| Batch {
                action: JobAction::Update,
                urls: chunk.to_vec(),
            })
            .collect()
    }

    /// A purge always covers every URL of the item in one batch.
    pub fn delete_batch(&self, urls: UrlSet) -> Batch {
        Batch {
            action: JobAction::Delete,
            urls: sorted_urls(urls),
        }
    }
}

fn sorted_urls(urls: UrlSet) -> Vec<String> {
    let mut keys: Vec<String> = urls.into_keys().collect();
    keys.sort_unstable();
    keys
}
