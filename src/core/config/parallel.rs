//! Parallel processing configuration for batch orchestration.

use serde::{Deserialize, Serialize};

use super::errors::{ConfigError, ConfigValidator};

/// Configuration for how the images of a batch are spread across threads.
///
/// Each image of a batch is augmented, predicted and merged independently, so
/// images can be processed in parallel without changing the result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParallelPolicy {
    /// Maximum number of threads to use for parallel processing.
    /// If None, rayon's global thread pool is used.
    /// Default: None
    #[serde(default)]
    pub max_threads: Option<usize>,

    /// Threshold for number of images to process sequentially (<= this uses sequential)
    /// Default: 1 (process single images sequentially, use parallel for multiple images)
    #[serde(default = "ParallelPolicy::default_image_threshold")]
    pub image_threshold: usize,
}

impl ParallelPolicy {
    /// Create a new ParallelPolicy with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// A policy that never uses more than the calling thread.
    pub fn sequential() -> Self {
        Self {
            max_threads: None,
            image_threshold: usize::MAX,
        }
    }

    /// Set the maximum number of threads.
    pub fn with_max_threads(mut self, max_threads: Option<usize>) -> Self {
        self.max_threads = max_threads;
        self
    }

    /// Set the image processing threshold.
    pub fn with_image_threshold(mut self, threshold: usize) -> Self {
        self.image_threshold = threshold;
        self
    }

    /// Default value for image threshold.
    fn default_image_threshold() -> usize {
        1
    }
}

impl Default for ParallelPolicy {
    fn default() -> Self {
        Self {
            max_threads: None,
            image_threshold: Self::default_image_threshold(),
        }
    }
}

impl ConfigValidator for ParallelPolicy {
    fn validate(&self) -> Result<(), ConfigError> {
        if let Some(threads) = self.max_threads {
            self.validate_thread_count(threads)?;
        }
        Ok(())
    }

    fn get_defaults() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_empty_json() {
        let policy: ParallelPolicy = serde_json::from_str("{}").unwrap();
        assert_eq!(policy, ParallelPolicy::default());
        assert_eq!(policy.image_threshold, 1);
        assert!(policy.max_threads.is_none());
    }

    #[test]
    fn test_zero_threads_rejected() {
        let policy = ParallelPolicy::new().with_max_threads(Some(0));
        assert!(policy.validate().is_err());
    }
}
