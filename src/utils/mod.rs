//! Utility functions for the TTA wrapper.
//!
//! Image-to-tensor conversion and logging setup.

pub mod image;

pub use self::image::{gray_to_tensor, rgb_batch_to_tensors, rgb_to_tensor};

/// Initializes the tracing subscriber for logging.
///
/// This function sets up the tracing subscriber with environment filter and formatting layer.
/// It's typically called at the start of an application to enable logging.
pub fn init_tracing() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .init();
}
