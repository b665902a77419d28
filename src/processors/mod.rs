//! Tensor processing for test-time augmentation.
//!
//! # Modules
//!
//! * `flip` - The augmentation stack and its inverse
//! * `merge` - Reduction of aligned predictions
//! * `types` - Type definitions used across the processors module

pub mod flip;
pub mod merge;
pub mod types;

pub use flip::{
    AUGMENTATION_COUNT, AugmentedStack, TRANSFORM_ORDER, Transform, augment, deaugment,
    deaugment_batch, flip_horizontal, flip_vertical,
};
pub use merge::{MergeMode, scale_by_batch_size, sigmoid_inplace};
pub use types::ChannelOrder;
