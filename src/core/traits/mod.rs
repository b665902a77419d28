//! Trait definitions for the TTA wrapper.
//!
//! The only seam is the model boundary: anything that maps a batch of images
//! to a batch of predictions can be wrapped.

pub mod model;

pub use model::{FnPredictor, IdentityPredictor, ImagePredictor};
