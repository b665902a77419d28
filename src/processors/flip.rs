//! Flip augmentations and their inverses.
//!
//! An image is expanded into a fixed stack of four variants, in this order:
//!
//! | index | variant                                | derivation          |
//! |-------|----------------------------------------|---------------------|
//! | 0     | [`Transform::Identity`]                | `x`                 |
//! | 1     | [`Transform::HorizontalFlip`]          | `flip_h(x)`         |
//! | 2     | [`Transform::HorizontalVerticalFlip`]  | `flip_v(flip_h(x))` |
//! | 3     | [`Transform::VerticalFlip`]            | `flip_v(x)`         |
//!
//! Model outputs for the stack are mapped back to the orientation of the
//! original image with [`deaugment`], which applies the inverse of the
//! transform used at the same index.

use ndarray::{ArrayView3, ArrayView4, Axis};

use crate::core::{Tensor3D, Tensor4D, TtaError};
use crate::processors::types::ChannelOrder;

/// Number of variants produced for every image.
pub const AUGMENTATION_COUNT: usize = 4;

/// One geometric variant of the augmentation stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Transform {
    /// The input unchanged.
    Identity,
    /// Mirror along the width axis.
    HorizontalFlip,
    /// Horizontal flip followed by a vertical flip.
    HorizontalVerticalFlip,
    /// Mirror along the height axis.
    VerticalFlip,
}

/// Stack order of the transforms. Index `i` of an augmented stack (and of the
/// matching prediction stack) was produced by `TRANSFORM_ORDER[i]`.
pub const TRANSFORM_ORDER: [Transform; AUGMENTATION_COUNT] = [
    Transform::Identity,
    Transform::HorizontalFlip,
    Transform::HorizontalVerticalFlip,
    Transform::VerticalFlip,
];

impl Transform {
    /// Applies the forward transform.
    pub fn apply(self, image: ArrayView3<'_, f32>, order: ChannelOrder) -> Tensor3D {
        match self {
            Transform::Identity => image.to_owned(),
            Transform::HorizontalFlip => flip_horizontal(image, order),
            Transform::HorizontalVerticalFlip => {
                flip_vertical(flip_horizontal(image, order).view(), order)
            }
            Transform::VerticalFlip => flip_vertical(image, order),
        }
    }

    /// Undoes [`Transform::apply`], so `t.invert(t.apply(x)) == x`.
    pub fn invert(self, prediction: ArrayView3<'_, f32>, order: ChannelOrder) -> Tensor3D {
        match self {
            Transform::Identity => prediction.to_owned(),
            Transform::HorizontalFlip => flip_horizontal(prediction, order),
            Transform::HorizontalVerticalFlip => {
                flip_horizontal(flip_vertical(prediction, order).view(), order)
            }
            Transform::VerticalFlip => flip_vertical(prediction, order),
        }
    }

    /// Short name used in logs.
    pub fn name(self) -> &'static str {
        match self {
            Transform::Identity => "identity",
            Transform::HorizontalFlip => "hflip",
            Transform::HorizontalVerticalFlip => "hflip+vflip",
            Transform::VerticalFlip => "vflip",
        }
    }
}

/// Returns a copy of `tensor` with `axis` reversed.
fn reverse_axis(tensor: ArrayView3<'_, f32>, axis: Axis) -> Tensor3D {
    let mut view = tensor;
    view.invert_axis(axis);
    view.as_standard_layout().into_owned()
}

/// Mirrors an image along its width axis.
pub fn flip_horizontal(image: ArrayView3<'_, f32>, order: ChannelOrder) -> Tensor3D {
    reverse_axis(image, order.width_axis())
}

/// Mirrors an image along its height axis.
pub fn flip_vertical(image: ArrayView3<'_, f32>, order: ChannelOrder) -> Tensor3D {
    reverse_axis(image, order.height_axis())
}

/// The four augmented variants of one image, ordered as [`TRANSFORM_ORDER`].
#[derive(Debug, Clone, PartialEq)]
pub struct AugmentedStack {
    variants: [Tensor3D; AUGMENTATION_COUNT],
}

impl AugmentedStack {
    /// Borrows the variants.
    pub fn variants(&self) -> &[Tensor3D; AUGMENTATION_COUNT] {
        &self.variants
    }

    /// Stacks the variants into a single `[4, ..]` batch for the model.
    pub fn to_batch(&self) -> Result<Tensor4D, TtaError> {
        let views: Vec<_> = self.variants.iter().map(|v| v.view()).collect();
        ndarray::stack(Axis(0), &views)
            .map_err(|e| TtaError::tensor_operation("Failed to stack augmented variants", e))
    }
}

/// Builds the augmented stack of one image.
///
/// With `a = flip_h(x)` the stack is `[x, a, flip_v(a), flip_v(x)]`.
pub fn augment(image: ArrayView3<'_, f32>, order: ChannelOrder) -> AugmentedStack {
    let hflipped = flip_horizontal(image, order);
    let hvflipped = flip_vertical(hflipped.view(), order);
    let vflipped = flip_vertical(image, order);

    AugmentedStack {
        variants: [image.to_owned(), hflipped, hvflipped, vflipped],
    }
}

/// Maps predictions for an augmented stack back into the original orientation.
///
/// Returns a new stack; the input is left untouched.
pub fn deaugment(
    predictions: &[Tensor3D; AUGMENTATION_COUNT],
    order: ChannelOrder,
) -> [Tensor3D; AUGMENTATION_COUNT] {
    std::array::from_fn(|i| TRANSFORM_ORDER[i].invert(predictions[i].view(), order))
}

/// Splits a `[4, ..]` model output and maps every entry back into the original orientation.
///
/// # Errors
///
/// Returns `TtaError::InvalidInput` when the leading dimension is not 4.
pub fn deaugment_batch(
    predictions: ArrayView4<'_, f32>,
    order: ChannelOrder,
) -> Result<[Tensor3D; AUGMENTATION_COUNT], TtaError> {
    if predictions.len_of(Axis(0)) != AUGMENTATION_COUNT {
        return Err(TtaError::shape_mismatch(
            "inverse augmentation",
            "a leading dimension of 4 (one prediction per augmented variant)",
            predictions.shape(),
        ));
    }

    Ok(std::array::from_fn(|i| {
        TRANSFORM_ORDER[i].invert(predictions.index_axis(Axis(0), i), order)
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{Array3, array};

    fn ramp(shape: (usize, usize, usize)) -> Tensor3D {
        let total = shape.0 * shape.1 * shape.2;
        Array3::from_shape_vec(shape, (0..total).map(|v| v as f32).collect()).unwrap()
    }

    #[test]
    fn test_flip_horizontal_chw() {
        let image: Tensor3D = array![[[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]]];
        let expected: Tensor3D = array![[[3.0, 2.0, 1.0], [6.0, 5.0, 4.0]]];
        assert_eq!(flip_horizontal(image.view(), ChannelOrder::CHW), expected);
    }

    #[test]
    fn test_flip_vertical_chw() {
        let image: Tensor3D = array![[[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]]];
        let expected: Tensor3D = array![[[4.0, 5.0, 6.0], [1.0, 2.0, 3.0]]];
        assert_eq!(flip_vertical(image.view(), ChannelOrder::CHW), expected);
    }

    #[test]
    fn test_flip_hwc_keeps_channels_together() {
        // 1x2 image with two channels per pixel
        let image: Tensor3D = array![[[1.0, 10.0], [2.0, 20.0]]];
        let expected: Tensor3D = array![[[2.0, 20.0], [1.0, 10.0]]];
        assert_eq!(flip_horizontal(image.view(), ChannelOrder::HWC), expected);

        let unchanged = flip_vertical(image.view(), ChannelOrder::HWC);
        assert_eq!(unchanged, image);
    }

    #[test]
    fn test_augment_order_matches_derivation() {
        let x = ramp((2, 3, 4));
        let order = ChannelOrder::CHW;
        let stack = augment(x.view(), order);
        let [orig, h, hv, v] = stack.variants();

        assert_eq!(stack.variants().len(), AUGMENTATION_COUNT);
        assert_eq!(orig, &x);
        assert_eq!(h, &flip_horizontal(x.view(), order));
        assert_eq!(hv, &flip_vertical(flip_horizontal(x.view(), order).view(), order));
        assert_eq!(v, &flip_vertical(x.view(), order));
    }

    #[test]
    fn test_augment_agrees_with_transform_order() {
        let x = ramp((3, 4, 2));
        for order in [ChannelOrder::CHW, ChannelOrder::HWC] {
            let stack = augment(x.view(), order);
            for (variant, transform) in stack.variants().iter().zip(TRANSFORM_ORDER) {
                assert_eq!(variant, &transform.apply(x.view(), order), "{}", transform.name());
            }
        }
    }

    #[test]
    fn test_identity_branch_survives_round_trip() {
        let x = ramp((1, 5, 3));
        let stack = augment(x.view(), ChannelOrder::CHW);
        let restored = deaugment(stack.variants(), ChannelOrder::CHW);
        assert_eq!(restored[0], x);
    }

    #[test]
    fn test_round_trip_restores_every_variant() {
        let x = ramp((2, 3, 5));
        for order in [ChannelOrder::CHW, ChannelOrder::HWC] {
            let stack = augment(x.view(), order);
            let restored = deaugment(stack.variants(), order);
            for (i, entry) in restored.iter().enumerate() {
                assert_eq!(entry, &x, "entry {i} with {order}");
            }
        }
    }

    #[test]
    fn test_deaugment_does_not_touch_input() {
        let x = ramp((1, 2, 2));
        let stack = augment(x.view(), ChannelOrder::CHW);
        let before = stack.clone();
        let _ = deaugment(stack.variants(), ChannelOrder::CHW);
        assert_eq!(stack, before);
    }

    #[test]
    fn test_deaugment_batch_round_trip() {
        let x = ramp((1, 4, 4));
        let stack = augment(x.view(), ChannelOrder::CHW);
        let batch = stack.to_batch().unwrap();
        assert_eq!(batch.shape(), &[4, 1, 4, 4]);

        let restored = deaugment_batch(batch.view(), ChannelOrder::CHW).unwrap();
        assert!(restored.iter().all(|entry| entry == &x));
    }

    #[test]
    fn test_deaugment_batch_rejects_wrong_leading_dim() {
        let batch = Tensor4D::zeros((3, 1, 2, 2));
        let err = deaugment_batch(batch.view(), ChannelOrder::CHW).unwrap_err();
        assert!(matches!(err, TtaError::InvalidInput { .. }));
        assert!(err.to_string().contains("[3, 1, 2, 2]"));
    }
}
