//! Configuration error types and validation traits.

use thiserror::Error;

/// Errors that can occur during configuration validation.
///
/// This enum represents the errors that can occur when validating the
/// parameters of the TTA wrapper.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The requested merge mode is not one of the supported modes.
    #[error("unsupported merge mode `{mode}`, expected one of: mean, tsharpen")]
    InvalidMergeMode { mode: String },

    /// Error indicating that a configuration is invalid.
    #[error("invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// Error indicating that a resource limit has been exceeded.
    #[error("resource limit exceeded: {message}")]
    ResourceLimitExceeded { message: String },
}

/// A trait for validating configuration parameters.
///
/// Implementors provide `validate` and `get_defaults`; the remaining methods
/// are shared checks for individual fields.
pub trait ConfigValidator {
    /// Validates the configuration.
    ///
    /// # Returns
    ///
    /// A Result indicating success or a ConfigError if validation fails.
    fn validate(&self) -> Result<(), ConfigError>;

    /// Returns the default configuration.
    fn get_defaults() -> Self
    where
        Self: Sized;

    /// Validates a thread count.
    ///
    /// This method checks that the thread count is greater than 0 and does not
    /// exceed a reasonable maximum.
    ///
    /// # Arguments
    ///
    /// * `thread_count` - The thread count to validate.
    fn validate_thread_count(&self, thread_count: usize) -> Result<(), ConfigError> {
        const MAX_REASONABLE_THREADS: usize = 256;

        if thread_count == 0 {
            Err(ConfigError::InvalidConfig {
                message: "Thread count must be greater than 0".to_string(),
            })
        } else if thread_count > MAX_REASONABLE_THREADS {
            Err(ConfigError::ResourceLimitExceeded {
                message: format!(
                    "Thread count {} exceeds reasonable maximum of {}",
                    thread_count, MAX_REASONABLE_THREADS
                ),
            })
        } else {
            Ok(())
        }
    }

    /// Validates a float value is finite.
    ///
    /// # Arguments
    ///
    /// * `value` - The value to validate.
    /// * `field_name` - The name of the field being validated.
    fn validate_finite_f32(&self, value: f32, field_name: &str) -> Result<(), ConfigError> {
        if value.is_finite() {
            Ok(())
        } else {
            Err(ConfigError::InvalidConfig {
                message: format!("{} must be finite, got {}", field_name, value),
            })
        }
    }
}

/// Extension trait for ConfigValidator that wraps validation failures into `TtaError`.
pub trait ConfigValidatorExt: ConfigValidator {
    /// Validates configuration and wraps any errors into `TtaError::ConfigError`.
    fn validate_and_wrap_tta_error(self) -> Result<Self, crate::core::errors::TtaError>
    where
        Self: Sized,
    {
        self.validate()?;
        Ok(self)
    }
}

// Blanket implementation for all ConfigValidator types
impl<T: ConfigValidator> ConfigValidatorExt for T {}
