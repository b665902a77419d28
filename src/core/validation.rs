//! Input Validation Utilities
//!
//! Checks applied to batches before they reach the augmentation stage, so shape
//! problems surface as `TtaError::InvalidInput` instead of panics.

use ndarray::{ArrayBase, Data, Dimension};

use crate::core::TtaError;

/// Validates that a collection is not empty.
#[inline]
pub fn validate_non_empty<T>(items: &[T], param_name: &str) -> Result<(), TtaError> {
    if items.is_empty() {
        return Err(TtaError::InvalidInput {
            message: format!("Parameter '{}' cannot be empty", param_name),
        });
    }
    Ok(())
}

/// Validates tensor shape dimensions.
pub fn validate_tensor_shape(
    shape: &[usize],
    expected_dims: usize,
    tensor_name: &str,
) -> Result<(), TtaError> {
    if shape.len() != expected_dims {
        return Err(TtaError::InvalidInput {
            message: format!(
                "Tensor '{}' expected {}D shape, got {}D: {:?}",
                tensor_name,
                expected_dims,
                shape.len(),
                shape
            ),
        });
    }
    Ok(())
}

/// Validates that tensor batch size is positive and returns it.
pub fn validate_batch_size(shape: &[usize], tensor_name: &str) -> Result<usize, TtaError> {
    validate_tensor_shape(shape, 4, tensor_name)?;

    let batch_size = shape[0];
    if batch_size == 0 {
        return Err(TtaError::InvalidInput {
            message: format!(
                "Tensor '{}' has zero batch size. Shape: {:?}",
                tensor_name, shape
            ),
        });
    }

    Ok(batch_size)
}

/// Validates that every tensor has the same shape as the first one.
pub fn validate_same_shapes<S, D>(
    tensors: &[ArrayBase<S, D>],
    param_name: &str,
) -> Result<(), TtaError>
where
    S: Data,
    D: Dimension,
{
    let Some(first) = tensors.first() else {
        return Ok(());
    };

    for (i, tensor) in tensors.iter().enumerate().skip(1) {
        if tensor.shape() != first.shape() {
            return Err(TtaError::InvalidInput {
                message: format!(
                    "All entries of '{}' must share one shape. Entry 0 has shape {:?}, entry {} has shape {:?}",
                    param_name,
                    first.shape(),
                    i,
                    tensor.shape()
                ),
            });
        }
    }
    Ok(())
}

/// Counts NaN and infinite values in a tensor.
pub fn count_non_finite<S, D>(tensor: &ArrayBase<S, D>) -> usize
where
    S: Data<Elem = f32>,
    D: Dimension,
{
    tensor.iter().filter(|v| !v.is_finite()).count()
}
