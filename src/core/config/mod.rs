//! Configuration management for the TTA wrapper.
//!
//! This module provides configuration types, validation traits, and file
//! loading for the wrapper settings.

pub mod errors;
pub mod loader;
pub mod parallel;
pub mod tta;

// Re-export commonly used types
pub use errors::{ConfigError, ConfigValidator, ConfigValidatorExt};
pub use loader::{ConfigFormat, ConfigLoader};
pub use parallel::ParallelPolicy;
pub use tta::TtaConfig;
