//! Sequential/parallel dispatch of per-image work.
//!
//! Every image of a batch is augmented, predicted and merged independently, so
//! the work can be spread over rayon's workers. Results are always returned in
//! input order.

use rayon::prelude::*;
use tracing::debug;

use crate::core::{ParallelPolicy, TtaError};

/// Strategy for processing the images of a batch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessingStrategy {
    /// Always process sequentially
    Sequential,
    /// Always process in parallel
    Parallel,
    /// Process in parallel when the item count exceeds the threshold
    Auto(usize),
}

impl ProcessingStrategy {
    /// Determine if parallel processing should be used for the given item count
    pub fn should_use_parallel(&self, item_count: usize) -> bool {
        match self {
            ProcessingStrategy::Sequential => false,
            ProcessingStrategy::Parallel => true,
            ProcessingStrategy::Auto(threshold) => item_count > *threshold,
        }
    }

    /// Strategy matching the image threshold of a [`ParallelPolicy`].
    pub fn from_policy(policy: &ParallelPolicy) -> Self {
        ProcessingStrategy::Auto(policy.image_threshold)
    }
}

/// Runs `process` on every `(index, item)` pair and returns the outputs in index order.
///
/// The first error aborts the run; no partial results are returned.
pub fn process_indexed<I, O, F>(
    inputs: Vec<I>,
    strategy: ProcessingStrategy,
    pool: Option<&rayon::ThreadPool>,
    process: F,
) -> Result<Vec<O>, TtaError>
where
    I: Send,
    O: Send,
    F: Fn(usize, I) -> Result<O, TtaError> + Send + Sync,
{
    let item_count = inputs.len();

    let results: Result<Vec<(usize, O)>, TtaError> = if strategy.should_use_parallel(item_count)
    {
        debug!("Using parallel processing for {} images", item_count);
        let run = || -> Result<Vec<(usize, O)>, TtaError> {
            inputs
                .into_par_iter()
                .enumerate()
                .map(|(index, input)| process(index, input).map(|out| (index, out)))
                .collect()
        };
        match pool {
            Some(pool) => pool.install(run),
            None => run(),
        }
    } else {
        debug!("Using sequential processing for {} images", item_count);
        inputs
            .into_iter()
            .enumerate()
            .map(|(index, input)| process(index, input).map(|out| (index, out)))
            .collect()
    };

    // Sort results by original index and extract final results
    let mut indexed_results = results?;
    indexed_results.sort_by_key(|(index, _)| *index);
    Ok(indexed_results.into_iter().map(|(_, out)| out).collect())
}
