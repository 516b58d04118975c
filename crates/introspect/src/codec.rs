//! Float tensor to displayable bytes.

use image::{DynamicImage, GrayImage, RgbImage, RgbaImage};
use ml::Tensor;

use crate::IntrospectError;

/// Lower bound on the value range, so constant inputs map to zero.
pub const EPSILON: f64 = 1e-7;

/// Byte image with the same shape as the tensor it was made from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImageBytes {
    pub shape: Vec<usize>,
    pub data: Vec<u8>,
}

/// Stretches `x` so its minimum maps to 0 and its maximum to 255.
///
/// Logs the mean, standard deviation, minimum and maximum of `x` before
/// converting. The stretch runs in `f64` and multiplies before dividing, so
/// the maximum lands on exactly 255; results are clipped to `[0, 255]` and
/// truncated to `u8`.
pub fn to_image(x: &Tensor) -> ImageBytes {
    let (mean, std) = (x.mean(), x.std());
    let min = x.min();
    let max = x.max();
    tracing::info!("mean: {mean}, std: {std}, min: {min}, max: {max}");

    let (min, max) = (f64::from(min), f64::from(max));
    let range = (max - min).max(EPSILON);
    let data = x
        .data
        .iter()
        .map(|&v| ((f64::from(v) - min) * 255.0 / range).clamp(0.0, 255.0) as u8)
        .collect();
    ImageBytes {
        shape: x.shape.clone(),
        data,
    }
}

impl ImageBytes {
    /// Converts an `[height, width, channels]` image for encoding.
    ///
    /// One, three and four channels map to gray, RGB and RGBA. Any other
    /// channel count keeps the first three channels, zero-filling missing ones.
    pub fn to_dynamic_image(&self) -> Result<DynamicImage, IntrospectError> {
        let &[h, w, c] = self.shape.as_slice() else {
            return Err(IntrospectError::ImageShape(self.shape.clone()));
        };
        let (width, height) = (w as u32, h as u32);
        let bad_shape = || IntrospectError::ImageShape(self.shape.clone());
        let img = match c {
            1 => DynamicImage::ImageLuma8(
                GrayImage::from_raw(width, height, self.data.clone()).ok_or_else(bad_shape)?,
            ),
            3 => DynamicImage::ImageRgb8(
                RgbImage::from_raw(width, height, self.data.clone()).ok_or_else(bad_shape)?,
            ),
            4 => DynamicImage::ImageRgba8(
                RgbaImage::from_raw(width, height, self.data.clone()).ok_or_else(bad_shape)?,
            ),
            0 => return Err(bad_shape()),
            _ => {
                let rgb = self
                    .data
                    .chunks(c)
                    .flat_map(|px| [0, 1, 2].map(|i| px.get(i).copied().unwrap_or(0)))
                    .collect();
                DynamicImage::ImageRgb8(RgbImage::from_raw(width, height, rgb).ok_or_else(bad_shape)?)
            }
        };
        Ok(img)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn two_channel_images_are_padded_to_rgb() {
        let img = ImageBytes {
            shape: vec![1, 2, 2],
            data: vec![10, 20, 30, 40],
        };
        let rgb = img.to_dynamic_image().unwrap().to_rgb8();
        assert_eq!(rgb.into_raw(), vec![10, 20, 0, 30, 40, 0]);
    }

    #[test]
    fn non_3d_shape_is_rejected() {
        let img = ImageBytes {
            shape: vec![4],
            data: vec![0; 4],
        };
        assert!(matches!(
            img.to_dynamic_image(),
            Err(IntrospectError::ImageShape(_))
        ));
    }
}
