//! Prediction-time wrappers.
//!
//! [`TtaPredictor`] wraps any [`ImagePredictor`](crate::core::ImagePredictor)
//! with flip test-time augmentation. The per-image work is dispatched by
//! [`orchestration`].

pub mod orchestration;
pub mod tta;

pub use orchestration::{ProcessingStrategy, process_indexed};
pub use tta::{TtaPredictor, TtaPredictorBuilder};
