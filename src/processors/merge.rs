//! Merging of aligned predictions.
//!
//! After the inverse augmentation, the four predictions of an image share the
//! orientation of the original image and are reduced into one tensor. The
//! reduction is a sum over the stack; normalisation by the batch size happens
//! in the orchestration, see [`scale_by_batch_size`].

use ndarray::{Array, Dimension};

use crate::core::config::ConfigError;
use crate::core::{Tensor3D, TtaError};
use crate::processors::flip::AUGMENTATION_COUNT;

/// Name accepted for [`MergeMode::Mean`].
pub const MEAN_MODE: &str = "mean";
/// Name accepted for [`MergeMode::TSharpen`].
pub const TSHARPEN_MODE: &str = "tsharpen";

/// How the aligned predictions of one image are reduced.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MergeMode {
    /// Elementwise sum of the predictions.
    Mean,
    /// Elementwise sum of `max(p, 0) ^ temperature`.
    TSharpen {
        /// Exponent applied to every clamped prediction.
        temperature: f32,
    },
}

impl MergeMode {
    /// Resolves a merge mode from its configuration name.
    ///
    /// `temperature` is only used by `tsharpen`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidMergeMode` naming `name` when it is neither
    /// `mean` nor `tsharpen`.
    pub fn from_name(name: &str, temperature: f32) -> Result<Self, ConfigError> {
        match name {
            MEAN_MODE => Ok(MergeMode::Mean),
            TSHARPEN_MODE => Ok(MergeMode::TSharpen { temperature }),
            other => Err(ConfigError::InvalidMergeMode {
                mode: other.to_string(),
            }),
        }
    }

    /// Configuration name of this mode.
    pub fn name(&self) -> &'static str {
        match self {
            MergeMode::Mean => MEAN_MODE,
            MergeMode::TSharpen { .. } => TSHARPEN_MODE,
        }
    }

    /// Contribution of a single prediction to the merged sum.
    fn contribution(&self, prediction: &Tensor3D) -> Tensor3D {
        match *self {
            MergeMode::Mean => prediction.clone(),
            // Negatives are floored so fractional powers stay defined. NaN is kept as is.
            MergeMode::TSharpen { temperature } => prediction.mapv(|v| {
                let clamped = if v < 0.0 { 0.0 } else { v };
                clamped.powf(temperature)
            }),
        }
    }

    /// Reduces the aligned predictions of one image into a single tensor.
    ///
    /// The result is the sum over the stack; it is not divided by the number
    /// of augmentations.
    ///
    /// # Errors
    ///
    /// Returns `TtaError::InvalidInput` if the predictions do not share a shape.
    pub fn merge(&self, predictions: &[Tensor3D; AUGMENTATION_COUNT]) -> Result<Tensor3D, TtaError> {
        let (first, rest) = predictions.split_first().ok_or_else(|| {
            TtaError::invalid_input("Cannot merge an empty prediction stack")
        })?;
        let expected_shape = first.shape();

        rest.iter()
            .enumerate()
            .try_fold(self.contribution(first), |acc, (offset, prediction)| {
                if prediction.shape() != expected_shape {
                    return Err(TtaError::InvalidInput {
                        message: format!(
                            "Prediction {} has shape {:?}, expected {:?} like prediction 0",
                            offset + 1,
                            prediction.shape(),
                            expected_shape
                        ),
                    });
                }
                Ok(acc + &self.contribution(prediction))
            })
    }
}

impl std::fmt::Display for MergeMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MergeMode::Mean => write!(f, "{MEAN_MODE}"),
            MergeMode::TSharpen { temperature } => {
                write!(f, "{TSHARPEN_MODE}(temperature={temperature})")
            }
        }
    }
}

/// Applies the logistic sigmoid to every element in place.
pub fn sigmoid_inplace<D: Dimension>(tensor: &mut Array<f32, D>) {
    tensor.mapv_inplace(|v| 1.0 / (1.0 + (-v).exp()));
}

/// Divides a merged prediction by the number of images in the batch.
pub fn scale_by_batch_size(merged: Tensor3D, batch_size: usize) -> Tensor3D {
    merged / batch_size as f32
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array3;

    fn filled(value: f32) -> Tensor3D {
        Array3::from_elem((1, 2, 2), value)
    }

    fn stack_of(values: [f32; 4]) -> [Tensor3D; 4] {
        values.map(filled)
    }

    #[test]
    fn test_from_name() {
        assert_eq!(MergeMode::from_name("mean", 0.5).unwrap(), MergeMode::Mean);
        assert_eq!(
            MergeMode::from_name("tsharpen", 0.5).unwrap(),
            MergeMode::TSharpen { temperature: 0.5 }
        );
    }

    #[test]
    fn test_unknown_mode_names_offending_value() {
        let err = MergeMode::from_name("median", 0.5).unwrap_err();
        assert!(err.to_string().contains("median"));
        assert!(matches!(err, ConfigError::InvalidMergeMode { ref mode } if mode == "median"));
    }

    #[test]
    fn test_mode_names_are_case_sensitive() {
        assert!(MergeMode::from_name("Mean", 0.5).is_err());
        assert!(MergeMode::from_name("TSHARPEN", 0.5).is_err());
    }

    #[test]
    fn test_mean_sums_without_dividing_by_four() {
        let merged = MergeMode::Mean.merge(&stack_of([1.0, 2.0, 3.0, 4.0])).unwrap();
        assert!(merged.iter().all(|&v| v == 10.0));
    }

    #[test]
    fn test_tsharpen_power_sum() {
        let mode = MergeMode::TSharpen { temperature: 2.0 };
        let merged = mode.merge(&stack_of([1.0, 2.0, 3.0, 0.0])).unwrap();
        assert!(merged.iter().all(|&v| (v - 14.0).abs() < 1e-6));
    }

    #[test]
    fn test_tsharpen_clamps_negatives() {
        let mode = MergeMode::TSharpen { temperature: 0.5 };
        let merged = mode.merge(&stack_of([-4.0, 4.0, -1.0, 9.0])).unwrap();
        assert!(merged.iter().all(|v| !v.is_nan()));
        assert!(merged.iter().all(|&v| (v - 5.0).abs() < 1e-6));
    }

    #[test]
    fn test_merge_rejects_mismatched_shapes() {
        let mut stack = stack_of([1.0; 4]);
        stack[2] = Array3::zeros((1, 3, 2));
        let err = MergeMode::Mean.merge(&stack).unwrap_err();
        assert!(err.to_string().contains("Prediction 2"));
    }

    #[test]
    fn test_sigmoid_inplace() {
        let mut tensor = Array3::from_elem((1, 1, 2), 0.0_f32);
        tensor[[0, 0, 1]] = 100.0;
        sigmoid_inplace(&mut tensor);
        assert!((tensor[[0, 0, 0]] - 0.5).abs() < 1e-6);
        assert!((tensor[[0, 0, 1]] - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_scale_by_batch_size() {
        let scaled = scale_by_batch_size(filled(8.0), 4);
        assert!(scaled.iter().all(|&v| v == 2.0));
    }

    #[test]
    fn test_display() {
        assert_eq!(MergeMode::Mean.to_string(), "mean");
        assert_eq!(
            MergeMode::TSharpen { temperature: 0.5 }.to_string(),
            "tsharpen(temperature=0.5)"
        );
    }
}
