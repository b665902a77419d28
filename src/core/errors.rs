//! Error types for the TTA wrapper.
//!
//! This module defines the errors that can occur while augmenting images,
//! running the wrapped model, inverting the augmentations and merging the
//! results. It also provides helper constructors for creating these errors
//! with appropriate context.

use thiserror::Error;

/// Enum representing different stages of processing in the TTA wrapper.
///
/// This enum is used to identify which stage an error occurred in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessingStage {
    /// Error occurred during tensor operations.
    TensorOperation,
    /// Error occurred while assembling the merged predictions of a batch.
    BatchProcessing,
}

impl std::fmt::Display for ProcessingStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProcessingStage::TensorOperation => write!(f, "tensor operation"),
            ProcessingStage::BatchProcessing => write!(f, "batch processing"),
        }
    }
}

/// Enum representing the errors that can occur in the TTA wrapper.
#[derive(Error, Debug)]
pub enum TtaError {
    /// Error occurred during processing.
    #[error("{kind} failed: {context}")]
    Processing {
        /// The stage of processing where the error occurred.
        kind: ProcessingStage,
        /// Additional context about the error.
        context: String,
        /// The underlying error that caused this error.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Error raised by the wrapped model.
    #[error("inference with model '{model_name}' failed: {context}")]
    Inference {
        /// Name of the model that failed.
        model_name: String,
        /// Additional context about the failure (image index, input shape).
        context: String,
        /// The error returned by the model.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Error indicating invalid input, such as a shape mismatch.
    #[error("invalid input: {message}")]
    InvalidInput {
        /// A message describing the invalid input.
        message: String,
    },

    /// Error indicating a configuration problem.
    #[error("configuration: {message}")]
    ConfigError {
        /// A message describing the configuration error.
        message: String,
    },
}

/// Convenient result alias for TTA operations.
pub type TtaResult<T> = Result<T, TtaError>;

impl TtaError {
    /// Creates a TtaError for tensor operations.
    ///
    /// # Arguments
    ///
    /// * `context` - Additional context about the error.
    /// * `error` - The underlying error that caused this error.
    pub fn tensor_operation(
        context: &str,
        error: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::processing_error(ProcessingStage::TensorOperation, context, error)
    }

    /// Creates a TtaError for the given processing stage.
    ///
    /// # Arguments
    ///
    /// * `kind` - The stage of processing where the error occurred.
    /// * `context` - Additional context about the error.
    /// * `error` - The underlying error that caused this error.
    pub fn processing_error(
        kind: ProcessingStage,
        context: &str,
        error: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Processing {
            kind,
            context: context.to_string(),
            source: Box::new(error),
        }
    }

    /// Wraps an error returned by the wrapped model.
    ///
    /// # Arguments
    ///
    /// * `model_name` - Name of the model that failed.
    /// * `context` - Where in the batch the failure happened.
    /// * `error` - The error returned by the model.
    pub fn inference_error(
        model_name: impl Into<String>,
        context: impl Into<String>,
        error: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Inference {
            model_name: model_name.into(),
            context: context.into(),
            source: Box::new(error),
        }
    }

    /// Creates a TtaError for invalid input.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// Creates a TtaError for configuration errors.
    pub fn config_error(message: impl Into<String>) -> Self {
        Self::ConfigError {
            message: message.into(),
        }
    }

    /// Creates a TtaError describing a shape that does not match what a stage expects.
    ///
    /// # Arguments
    ///
    /// * `component` - The component that rejected the shape.
    /// * `expected` - Description of the expected shape.
    /// * `actual` - The shape that was received.
    pub fn shape_mismatch(component: &str, expected: &str, actual: &[usize]) -> Self {
        Self::InvalidInput {
            message: format!(
                "Shape mismatch in {}: expected {}, got {:?}",
                component, expected, actual
            ),
        }
    }
}

/// Implementation of From<crate::core::config::ConfigError> for TtaError.
///
/// This allows configuration validation failures to surface through `?`.
impl From<crate::core::config::ConfigError> for TtaError {
    fn from(error: crate::core::config::ConfigError) -> Self {
        Self::ConfigError {
            message: error.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::ConfigError;

    #[test]
    fn test_processing_error_display() {
        let err = TtaError::processing_error(
            ProcessingStage::BatchProcessing,
            "stacking 3 predictions",
            std::io::Error::other("incompatible shapes"),
        );
        assert_eq!(
            err.to_string(),
            "batch processing failed: stacking 3 predictions"
        );
    }

    #[test]
    fn test_inference_error_keeps_source() {
        let err = TtaError::inference_error(
            "unet",
            "image 2 of 5",
            std::io::Error::other("device lost"),
        );
        assert!(err.to_string().contains("unet"));
        assert!(err.to_string().contains("image 2 of 5"));
        let source = std::error::Error::source(&err).unwrap();
        assert_eq!(source.to_string(), "device lost");
    }

    #[test]
    fn test_config_error_conversion() {
        let err: TtaError = ConfigError::InvalidMergeMode {
            mode: "median".to_string(),
        }
        .into();
        assert!(matches!(err, TtaError::ConfigError { .. }));
        assert!(err.to_string().contains("median"));
    }

    #[test]
    fn test_shape_mismatch_message() {
        let err = TtaError::shape_mismatch("merge", "4 predictions", &[3, 1, 4, 4]);
        assert_eq!(
            err.to_string(),
            "invalid input: Shape mismatch in merge: expected 4 predictions, got [3, 1, 4, 4]"
        );
    }
}
