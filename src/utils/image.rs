//! Conversion of decoded 8-bit images into float tensors.
//!
//! Pixel values are scaled into `[0, 1]`. The axis layout follows the
//! [`ChannelOrder`] the wrapper is configured with.

use image::{GrayImage, RgbImage};
use ndarray::Array3;

use crate::core::Tensor3D;
use crate::processors::types::ChannelOrder;

const PIXEL_SCALE: f32 = 1.0 / 255.0;

/// Converts an RGB image into a `[3, H, W]` or `[H, W, 3]` tensor.
pub fn rgb_to_tensor(img: &RgbImage, order: ChannelOrder) -> Tensor3D {
    let (width, height) = img.dimensions();
    let (width, height) = (width as usize, height as usize);

    let shape = match order {
        ChannelOrder::CHW => (3, height, width),
        ChannelOrder::HWC => (height, width, 3),
    };

    Array3::from_shape_fn(shape, |(a, b, c)| {
        let (channel, y, x) = match order {
            ChannelOrder::CHW => (a, b, c),
            ChannelOrder::HWC => (c, a, b),
        };
        img.get_pixel(x as u32, y as u32)[channel] as f32 * PIXEL_SCALE
    })
}

/// Converts a grayscale image into a single-channel tensor.
pub fn gray_to_tensor(img: &GrayImage, order: ChannelOrder) -> Tensor3D {
    let (width, height) = img.dimensions();
    let (width, height) = (width as usize, height as usize);

    let shape = match order {
        ChannelOrder::CHW => (1, height, width),
        ChannelOrder::HWC => (height, width, 1),
    };

    Array3::from_shape_fn(shape, |(a, b, c)| {
        let (y, x) = match order {
            ChannelOrder::CHW => (b, c),
            ChannelOrder::HWC => (a, b),
        };
        img.get_pixel(x as u32, y as u32)[0] as f32 * PIXEL_SCALE
    })
}

/// Converts a batch of RGB images; all images must share one size for the
/// result to be usable as a TTA batch.
pub fn rgb_batch_to_tensors(images: &[RgbImage], order: ChannelOrder) -> Vec<Tensor3D> {
    images
        .iter()
        .map(|img| rgb_to_tensor(img, order))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Luma, Rgb};

    #[test]
    fn test_rgb_to_tensor_chw() {
        let mut img = RgbImage::new(3, 2);
        img.put_pixel(2, 1, Rgb([255, 0, 51]));

        let tensor = rgb_to_tensor(&img, ChannelOrder::CHW);
        assert_eq!(tensor.shape(), &[3, 2, 3]);
        assert_eq!(tensor[[0, 1, 2]], 1.0);
        assert_eq!(tensor[[1, 1, 2]], 0.0);
        assert!((tensor[[2, 1, 2]] - 0.2).abs() < 1e-6);
        assert_eq!(tensor[[0, 0, 0]], 0.0);
    }

    #[test]
    fn test_rgb_to_tensor_hwc_matches_chw() {
        let img = RgbImage::from_fn(4, 3, |x, y| Rgb([x as u8 * 10, y as u8 * 20, 7]));
        let chw = rgb_to_tensor(&img, ChannelOrder::CHW);
        let hwc = rgb_to_tensor(&img, ChannelOrder::HWC);

        assert_eq!(hwc.shape(), &[3, 4, 3]);
        for c in 0..3 {
            for y in 0..3 {
                for x in 0..4 {
                    assert_eq!(chw[[c, y, x]], hwc[[y, x, c]]);
                }
            }
        }
    }

    #[test]
    fn test_gray_to_tensor() {
        let img = GrayImage::from_fn(2, 2, |x, y| Luma([if x == 1 && y == 0 { 255 } else { 0 }]));
        let chw = gray_to_tensor(&img, ChannelOrder::CHW);
        assert_eq!(chw.shape(), &[1, 2, 2]);
        assert_eq!(chw[[0, 0, 1]], 1.0);

        let hwc = gray_to_tensor(&img, ChannelOrder::HWC);
        assert_eq!(hwc.shape(), &[2, 2, 1]);
        assert_eq!(hwc[[0, 1, 0]], 1.0);
    }

    #[test]
    fn test_batch_conversion() {
        let images = vec![RgbImage::new(2, 2), RgbImage::new(2, 2)];
        let tensors = rgb_batch_to_tensors(&images, ChannelOrder::CHW);
        assert_eq!(tensors.len(), 2);
        assert!(tensors.iter().all(|t| t.shape() == [3, 2, 2]));
    }
}
