//! The model boundary of the TTA wrapper.
//!
//! The wrapped model is an external collaborator. All the wrapper needs from it
//! is the ability to map a batch of images to a batch of predictions, which is
//! captured by [`ImagePredictor`].

use std::fmt::Debug;
use std::sync::Arc;

use ndarray::ArrayView4;

use crate::core::{Tensor4D, TtaError};

/// Trait for models that map a batch of images to a batch of predictions.
///
/// The input batch has shape `[N, ..]` where every entry is one image; the
/// output must have shape `[N, ..]` with one prediction per input image, in the
/// same order. The TTA wrapper calls this with `N = 4`, one entry per
/// augmented variant.
pub trait ImagePredictor: Send + Sync + Debug {
    /// Runs inference on a batch of images.
    ///
    /// # Arguments
    ///
    /// * `batch` - Images stacked along the first axis
    ///
    /// # Returns
    ///
    /// Predictions stacked along the first axis or an error
    fn predict(&self, batch: ArrayView4<'_, f32>) -> Result<Tensor4D, TtaError>;

    /// Name of the model, used in logs and error messages.
    fn name(&self) -> &str {
        "model"
    }
}

impl<P: ImagePredictor + ?Sized> ImagePredictor for Box<P> {
    fn predict(&self, batch: ArrayView4<'_, f32>) -> Result<Tensor4D, TtaError> {
        (**self).predict(batch)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

impl<P: ImagePredictor + ?Sized> ImagePredictor for Arc<P> {
    fn predict(&self, batch: ArrayView4<'_, f32>) -> Result<Tensor4D, TtaError> {
        (**self).predict(batch)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

/// A model that returns its input unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityPredictor;

impl ImagePredictor for IdentityPredictor {
    fn predict(&self, batch: ArrayView4<'_, f32>) -> Result<Tensor4D, TtaError> {
        Ok(batch.to_owned())
    }

    fn name(&self) -> &str {
        "identity"
    }
}

/// Adapts a closure into an [`ImagePredictor`].
///
/// Errors returned by the closure are wrapped into `TtaError::Inference`
/// carrying the predictor name.
///
/// ```
/// use flip_tta::core::traits::{FnPredictor, ImagePredictor};
/// use ndarray::Array4;
///
/// let doubler = FnPredictor::new("doubler", |batch: ndarray::ArrayView4<'_, f32>| {
///     Ok::<_, std::io::Error>(batch.mapv(|v| v * 2.0))
/// });
/// let out = doubler.predict(Array4::ones((4, 1, 2, 2)).view()).unwrap();
/// assert_eq!(out[[0, 0, 0, 0]], 2.0);
/// ```
pub struct FnPredictor<F> {
    name: String,
    func: F,
}

impl<F, E> FnPredictor<F>
where
    F: Fn(ArrayView4<'_, f32>) -> Result<Tensor4D, E> + Send + Sync,
    E: std::error::Error + Send + Sync + 'static,
{
    /// Creates a new predictor from a name and a closure.
    pub fn new(name: impl Into<String>, func: F) -> Self {
        Self {
            name: name.into(),
            func,
        }
    }
}

impl<F> Debug for FnPredictor<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnPredictor")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

impl<F, E> ImagePredictor for FnPredictor<F>
where
    F: Fn(ArrayView4<'_, f32>) -> Result<Tensor4D, E> + Send + Sync,
    E: std::error::Error + Send + Sync + 'static,
{
    fn predict(&self, batch: ArrayView4<'_, f32>) -> Result<Tensor4D, TtaError> {
        let shape = batch.shape().to_vec();
        (self.func)(batch).map_err(|e| {
            TtaError::inference_error(&self.name, format!("input shape {shape:?}"), e)
        })
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array4;

    #[test]
    fn test_identity_predictor_returns_input() {
        let batch = Array4::from_shape_fn((4, 1, 2, 3), |(n, _, h, w)| (n * 6 + h * 3 + w) as f32);
        let out = IdentityPredictor.predict(batch.view()).unwrap();
        assert_eq!(out, batch);
        assert_eq!(IdentityPredictor.name(), "identity");
    }

    #[test]
    fn test_fn_predictor_wraps_errors() {
        let failing = FnPredictor::new("broken", |_batch: ArrayView4<'_, f32>| {
            Err::<Tensor4D, _>(std::io::Error::other("out of memory"))
        });
        let err = failing
            .predict(Array4::zeros((4, 1, 1, 1)).view())
            .unwrap_err();
        assert!(matches!(err, TtaError::Inference { ref model_name, .. } if model_name == "broken"));
        assert!(err.to_string().contains("[4, 1, 1, 1]"));
    }

    #[test]
    fn test_boxed_and_shared_predictors() {
        let boxed: Box<dyn ImagePredictor> = Box::new(IdentityPredictor);
        let shared = Arc::new(IdentityPredictor);
        let batch = Array4::ones((4, 1, 1, 1));
        assert_eq!(boxed.predict(batch.view()).unwrap(), batch);
        assert_eq!(shared.predict(batch.view()).unwrap(), batch);
        assert_eq!(boxed.name(), "identity");
    }
}
