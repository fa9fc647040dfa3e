//! In-memory index builders.
//!
//! Each ingestion pass folds parsed records into one of these aggregates and
//! then persists it through an [`crate::IndexStore`] passed in by the caller.
//! Every update is a last-write-wins point assignment, so the result depends
//! only on the input lines.

mod authors;
mod coauthors;

use std::sync::atomic::{AtomicUsize, Ordering};

pub use authors::AuthorIndex;
pub use coauthors::CoauthorIndex;

/// `try_for_each_concurrent` limit; 0 means unbounded.
pub(crate) fn concurrency_limit(limit: usize) -> Option<usize> {
    (limit > 0).then_some(limit)
}

/// Periodic progress logging for long passes.
pub(crate) struct Progress {
    stage: &'static str,
    interval: usize,
    total: Option<usize>,
    done: AtomicUsize,
}

impl Progress {
    pub(crate) fn new(stage: &'static str, interval: usize, total: Option<usize>) -> Self {
        Self {
            stage,
            interval,
            total,
            done: AtomicUsize::new(0),
        }
    }

    pub(crate) fn tick(&self) {
        let done = self.done.fetch_add(1, Ordering::Relaxed) + 1;
        if self.interval > 0 && done % self.interval == 0 {
            match self.total {
                Some(total) => {
                    tracing::info!(stage = self.stage, done, total, "Ingestion progress");
                }
                None => tracing::info!(stage = self.stage, done, "Ingestion progress"),
            }
        }
    }

    pub(crate) fn done(&self) -> usize {
        self.done.load(Ordering::Relaxed)
    }
}
