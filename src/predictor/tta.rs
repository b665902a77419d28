//! The TTA wrapper around an image prediction model.
//!
//! For every image of a batch the wrapper:
//!
//! 1. builds the augmented stack (identity, hflip, hflip+vflip, vflip),
//! 2. runs the wrapped model once on the four variants,
//! 3. optionally applies a sigmoid to the raw outputs,
//! 4. maps every output back to the orientation of the original image,
//! 5. merges the four aligned predictions and divides the result by the
//!    number of images in the batch.
//!
//! The per-image division uses the batch size, not the number of
//! augmentations, so a batch of `N` identical images run through an identity
//! model in `mean` mode yields `4 * x / N` for every image.
//!
//! # Example
//!
//! ```
//! use flip_tta::prelude::*;
//! use ndarray::Array4;
//!
//! let tta = TtaPredictorBuilder::new()
//!     .merge_mode("mean")
//!     .build(IdentityPredictor)?;
//!
//! let images = Array4::from_elem((2, 1, 4, 4), 1.0_f32);
//! let merged = tta.predict_batch(images.view())?;
//! assert!(merged.iter().all(|&v| v == 2.0));
//! # Ok::<(), TtaError>(())
//! ```

use std::time::Instant;

use ndarray::{ArrayView3, ArrayView4, Axis};
use tracing::{debug, info, warn};

use super::orchestration::{ProcessingStrategy, process_indexed};
use crate::core::config::{ConfigValidatorExt, ParallelPolicy, TtaConfig};
use crate::core::validation::{
    count_non_finite, validate_batch_size, validate_non_empty, validate_same_shapes,
};
use crate::core::{ImagePredictor, ProcessingStage, Tensor3D, Tensor4D, TtaError};
use crate::processors::flip::{augment, deaugment_batch};
use crate::processors::merge::{MergeMode, scale_by_batch_size, sigmoid_inplace};
use crate::processors::types::ChannelOrder;

/// Wraps a model with flip test-time augmentation.
#[derive(Debug)]
pub struct TtaPredictor<P> {
    model: P,
    name: String,
    merge_mode: MergeMode,
    activate: bool,
    channel_order: ChannelOrder,
    strategy: ProcessingStrategy,
    pool: Option<rayon::ThreadPool>,
}

impl<P: ImagePredictor> TtaPredictor<P> {
    /// Creates a wrapper from a model and a configuration.
    ///
    /// # Errors
    ///
    /// Returns `TtaError::ConfigError` if the merge mode is not `mean` or
    /// `tsharpen` (the message names the rejected value), if the tsharpen
    /// temperature is not finite, or if the thread pool cannot be created.
    pub fn new(model: P, config: TtaConfig) -> Result<Self, TtaError> {
        let config = config.validate_and_wrap_tta_error()?;
        let merge_mode = config.resolve_merge_mode()?;
        let pool = build_pool(&config.parallel)?;
        let name = format!("tta({})", model.name());

        debug!(
            "Created {} with merge={}, activate={}, order={}",
            name, merge_mode, config.activate, config.channel_order
        );

        Ok(Self {
            model,
            name,
            merge_mode,
            activate: config.activate,
            channel_order: config.channel_order,
            strategy: ProcessingStrategy::from_policy(&config.parallel),
            pool,
        })
    }

    /// The wrapped model.
    pub fn model(&self) -> &P {
        &self.model
    }

    /// The resolved merge mode.
    pub fn merge_mode(&self) -> MergeMode {
        self.merge_mode
    }

    /// Whether raw outputs go through a sigmoid before merging.
    pub fn activate(&self) -> bool {
        self.activate
    }

    /// Axis layout of images and predictions.
    pub fn channel_order(&self) -> ChannelOrder {
        self.channel_order
    }

    /// Overrides the sequential/parallel decision made from the configuration.
    pub fn with_strategy(mut self, strategy: ProcessingStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Predicts a batch stacked along the first axis.
    ///
    /// Returns one merged prediction per image, stacked in input order.
    ///
    /// # Errors
    ///
    /// Fails on an empty batch, on model errors (returned unchanged) and on
    /// model outputs that do not hold one prediction per augmented variant.
    pub fn predict_batch(&self, images: ArrayView4<'_, f32>) -> Result<Tensor4D, TtaError> {
        let batch_size = validate_batch_size(images.shape(), "images")?;
        let views: Vec<ArrayView3<'_, f32>> = images.outer_iter().collect();

        let merged = self.run(views, batch_size)?;
        stack_predictions(&merged)
    }

    /// Predicts a batch given as separate images of identical shape.
    ///
    /// # Errors
    ///
    /// Same as [`TtaPredictor::predict_batch`], plus a shape error when the
    /// images do not all share one shape.
    pub fn predict_images(&self, images: &[Tensor3D]) -> Result<Vec<Tensor3D>, TtaError> {
        validate_non_empty(images, "images")?;
        validate_same_shapes(images, "images")?;

        let views: Vec<ArrayView3<'_, f32>> = images.iter().map(|image| image.view()).collect();
        self.run(views, images.len())
    }

    /// Runs the full augmentation pipeline for one image.
    ///
    /// `batch_size` is the number of images in the batch the image belongs to;
    /// the merged prediction is divided by it.
    pub fn predict_single(
        &self,
        image: ArrayView3<'_, f32>,
        batch_size: usize,
    ) -> Result<Tensor3D, TtaError> {
        if batch_size == 0 {
            return Err(TtaError::invalid_input("Batch size must be greater than 0"));
        }

        let stack = augment(image, self.channel_order);
        let augmented = stack.to_batch()?;

        let mut raw = self.model.predict(augmented.view())?;
        if self.activate {
            sigmoid_inplace(&mut raw);
        }

        let non_finite = count_non_finite(&raw);
        if non_finite > 0 {
            warn!(
                "Model {} returned {} non-finite values for input shape {:?}",
                self.model.name(),
                non_finite,
                augmented.shape()
            );
        }

        let aligned = deaugment_batch(raw.view(), self.channel_order)?;
        let merged = self.merge_mode.merge(&aligned)?;
        Ok(scale_by_batch_size(merged, batch_size))
    }

    fn run(
        &self,
        images: Vec<ArrayView3<'_, f32>>,
        batch_size: usize,
    ) -> Result<Vec<Tensor3D>, TtaError> {
        let start = Instant::now();
        debug!(
            "Processing {} images with {} ({} merge)",
            batch_size, self.name, self.merge_mode
        );

        let merged = process_indexed(images, self.strategy, self.pool.as_ref(), |index, image| {
            debug!("Augmenting image {}/{}", index + 1, batch_size);
            self.predict_single(image, batch_size).inspect_err(|e| {
                warn!("TTA failed on image {}/{}: {}", index + 1, batch_size, e);
            })
        })?;

        info!(
            "TTA completed for {} images in {:?}",
            merged.len(),
            start.elapsed()
        );
        Ok(merged)
    }
}

impl<P: ImagePredictor> ImagePredictor for TtaPredictor<P> {
    fn predict(&self, batch: ArrayView4<'_, f32>) -> Result<Tensor4D, TtaError> {
        self.predict_batch(batch)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

fn build_pool(policy: &ParallelPolicy) -> Result<Option<rayon::ThreadPool>, TtaError> {
    policy
        .max_threads
        .map(|threads| {
            rayon::ThreadPoolBuilder::new()
                .num_threads(threads)
                .build()
                .map_err(|e| {
                    TtaError::config_error(format!(
                        "Failed to build a thread pool with {threads} threads: {e}"
                    ))
                })
        })
        .transpose()
}

fn stack_predictions(predictions: &[Tensor3D]) -> Result<Tensor4D, TtaError> {
    let views: Vec<_> = predictions.iter().map(|p| p.view()).collect();
    ndarray::stack(Axis(0), &views)
        .map_err(|e| {
            TtaError::processing_error(
                ProcessingStage::BatchProcessing,
                "Failed to stack merged predictions",
                e,
            )
        })
}

/// Builder for [`TtaPredictor`].
#[derive(Debug, Clone, Default)]
pub struct TtaPredictorBuilder {
    config: TtaConfig,
}

impl TtaPredictorBuilder {
    /// Creates a builder with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts from an existing configuration.
    pub fn from_config(config: TtaConfig) -> Self {
        Self { config }
    }

    /// Sets the merge mode by name (`mean` or `tsharpen`).
    pub fn merge_mode(mut self, merge_mode: impl Into<String>) -> Self {
        self.config.merge_mode = merge_mode.into();
        self
    }

    /// Enables the sigmoid activation of raw model outputs.
    pub fn activate(mut self, activate: bool) -> Self {
        self.config.activate = activate;
        self
    }

    /// Sets the tsharpen temperature.
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.config.temperature = temperature;
        self
    }

    /// Sets the axis layout of images and predictions.
    pub fn channel_order(mut self, channel_order: ChannelOrder) -> Self {
        self.config.channel_order = channel_order;
        self
    }

    /// Sets the parallel processing policy.
    pub fn parallel(mut self, parallel: ParallelPolicy) -> Self {
        self.config.parallel = parallel;
        self
    }

    /// The configuration collected so far.
    pub fn config(&self) -> &TtaConfig {
        &self.config
    }

    /// Wraps `model` with the collected configuration.
    pub fn build<P: ImagePredictor>(self, model: P) -> Result<TtaPredictor<P>, TtaError> {
        TtaPredictor::new(model, self.config)
    }
}
