//! The core module of the TTA wrapper.
//!
//! This module contains the fundamental components shared by the processors
//! and the predictor:
//! - Tensor type aliases
//! - Configuration management
//! - Error handling
//! - Input validation
//! - The model trait
//!
//! It also provides re-exports of commonly used types for convenience.

pub mod config;
pub mod errors;
pub mod traits;
pub mod validation;

pub use config::{ConfigError, ConfigLoader, ParallelPolicy, TtaConfig};
pub use errors::{ProcessingStage, TtaError, TtaResult};
pub use traits::{FnPredictor, IdentityPredictor, ImagePredictor};

/// A 3-dimensional tensor holding one image or one prediction.
pub type Tensor3D = ndarray::Array3<f32>;

/// A 4-dimensional tensor holding a batch of images or predictions.
pub type Tensor4D = ndarray::Array4<f32>;
