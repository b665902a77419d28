//! # Flip TTA
//!
//! Test-time augmentation for image prediction models based on flips.
//!
//! Every input image is expanded into four variants (identity, horizontal flip,
//! horizontal plus vertical flip, vertical flip). The wrapped model predicts
//! all four, each prediction is flipped back into the orientation of the
//! original image, and the aligned predictions are merged into one.
//!
//! ## Features
//!
//! - Works with any model implementing [`core::ImagePredictor`]
//! - `mean` and `tsharpen` merge modes, with optional sigmoid activation
//! - CHW and HWC layouts
//! - Parallel processing of the images of a batch with rayon
//! - TOML and JSON configuration files
//!
//! ## Modules
//!
//! * [`core`] - Model trait, configuration, error handling and validation
//! * [`processors`] - Flip augmentation, inverse augmentation and merging
//! * [`predictor`] - The TTA wrapper and its batch orchestration
//! * [`utils`] - Image conversion and logging setup
//!
//! ## Quick Start
//!
//! ```rust
//! use flip_tta::prelude::*;
//! use ndarray::{Array3, ArrayView4};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let model = FnPredictor::new("scaled", |batch: ArrayView4<'_, f32>| {
//!     Ok::<_, std::io::Error>(batch.mapv(|v| v * 0.5))
//! });
//!
//! let tta = TtaPredictorBuilder::new()
//!     .merge_mode("tsharpen")
//!     .temperature(0.5)
//!     .build(model)?;
//!
//! let images = vec![Array3::from_elem((3, 8, 8), 0.5_f32)];
//! let merged = tta.predict_images(&images)?;
//! assert_eq!(merged[0].shape(), &[3, 8, 8]);
//! # Ok(())
//! # }
//! ```
//!
//! ### Configuration files
//!
//! ```rust,no_run
//! use flip_tta::prelude::*;
//! use std::path::Path;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ConfigLoader::load_from_file(Path::new("tta.toml"))?;
//! let tta = TtaPredictor::new(IdentityPredictor, config)?;
//! # Ok(())
//! # }
//! ```

pub mod core;
pub mod predictor;
pub mod processors;
pub mod utils;

/// Prelude module for convenient imports.
///
/// ```rust
/// use flip_tta::prelude::*;
/// ```
///
/// Includes the wrapper and its configuration, the model trait with its
/// ready-made implementations, and the error types. Lower level pieces such
/// as [`processors::augment`] are imported from their modules.
pub mod prelude {
    pub use crate::core::{
        ConfigLoader, FnPredictor, IdentityPredictor, ImagePredictor, ParallelPolicy, TtaConfig,
        TtaError, TtaResult,
    };
    pub use crate::predictor::{TtaPredictor, TtaPredictorBuilder};
    pub use crate::processors::{ChannelOrder, MergeMode};
}
