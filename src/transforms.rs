//! # Image Transforms Module
//!
//! Decoding, the three photo effects the bot offers (pixelate, invert,
//! reflect) and JPEG encoding of the result. All heavy lifting is done by
//! the `image` crate; these functions only fix the parameters.

use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat, ImageOutputFormat};
use std::io::Cursor;
use tracing::debug;

use crate::errors::BotError;

/// Minimum number of bytes needed to sniff an image format
pub const MIN_FORMAT_BYTES: usize = 8;

/// Mirror axis of the reflect effect
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    /// Mirror left-right
    Horizontal,
    /// Mirror top-bottom
    Vertical,
}

/// A photo-to-photo effect offered by the menu
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhotoEffect {
    /// Block size in pixels
    Pixelate(u32),
    Invert,
    Reflect(Axis),
}

impl PhotoEffect {
    pub fn apply(self, image: &DynamicImage) -> DynamicImage {
        match self {
            PhotoEffect::Pixelate(pixel_size) => pixelate(image, pixel_size),
            PhotoEffect::Invert => invert(image),
            PhotoEffect::Reflect(axis) => reflect(image, axis),
        }
    }
}

/// Decode `bytes`, apply `effect` and encode the result as JPEG
pub fn apply_to_bytes(bytes: &[u8], effect: PhotoEffect, quality: u8) -> Result<Vec<u8>, BotError> {
    let image = decode(bytes)?;
    encode_jpeg(&effect.apply(&image), quality)
}

/// Detect the image format from its leading bytes
pub fn detect_format(bytes: &[u8]) -> Result<ImageFormat, BotError> {
    if bytes.len() < MIN_FORMAT_BYTES {
        return Err(BotError::TransformFailure(format!(
            "not enough bytes to determine image format (read {}, need at least {MIN_FORMAT_BYTES})",
            bytes.len()
        )));
    }

    let format = image::guess_format(bytes)?;
    let supported = matches!(
        format,
        ImageFormat::Png
            | ImageFormat::Jpeg
            | ImageFormat::Gif
            | ImageFormat::Bmp
            | ImageFormat::WebP
            | ImageFormat::Tiff
    );

    if supported {
        debug!(format = ?format, "Detected supported image format");
        Ok(format)
    } else {
        Err(BotError::TransformFailure(format!("unsupported image format: {format:?}")))
    }
}

/// Decode raw image bytes
pub fn decode(bytes: &[u8]) -> Result<DynamicImage, BotError> {
    let format = detect_format(bytes)?;
    Ok(image::load_from_memory_with_format(bytes, format)?)
}

/// Encode an image as JPEG; alpha is dropped
pub fn encode_jpeg(image: &DynamicImage, quality: u8) -> Result<Vec<u8>, BotError> {
    let rgb = DynamicImage::ImageRgb8(image.to_rgb8());
    let mut buffer = Cursor::new(Vec::new());
    rgb.write_to(&mut buffer, ImageOutputFormat::Jpeg(quality))?;
    Ok(buffer.into_inner())
}

/// Coarsen an image into square blocks of `pixel_size` pixels.
///
/// The image is shrunk by `pixel_size` with nearest-neighbour sampling and
/// blown back up by the same factor, so the result dimensions are the
/// original ones rounded down to a multiple of `pixel_size` (at least one
/// block in each direction).
pub fn pixelate(image: &DynamicImage, pixel_size: u32) -> DynamicImage {
    let pixel_size = pixel_size.max(1);
    let small_width = (image.width() / pixel_size).max(1);
    let small_height = (image.height() / pixel_size).max(1);

    let small = image.resize_exact(small_width, small_height, FilterType::Nearest);
    small.resize_exact(
        small_width * pixel_size,
        small_height * pixel_size,
        FilterType::Nearest,
    )
}

/// Invert every color channel, leaving alpha untouched
pub fn invert(image: &DynamicImage) -> DynamicImage {
    let mut inverted = image.clone();
    inverted.invert();
    inverted
}

/// Mirror an image on the given axis
pub fn reflect(image: &DynamicImage, axis: Axis) -> DynamicImage {
    match axis {
        Axis::Horizontal => image.fliph(),
        Axis::Vertical => image.flipv(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    #[test]
    fn test_detect_format_rejects_short_input() {
        assert!(matches!(
            detect_format(b"\x89PNG"),
            Err(BotError::TransformFailure(_))
        ));
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(decode(b"definitely not an image at all").is_err());
    }

    #[test]
    fn test_pixelate_never_collapses_to_zero() {
        let image = DynamicImage::ImageRgb8(RgbImage::from_pixel(5, 3, Rgb([1, 2, 3])));
        let pixelated = pixelate(&image, 20);
        assert_eq!((pixelated.width(), pixelated.height()), (20, 20));
    }

    #[test]
    fn test_encode_jpeg_produces_jpeg() {
        let image = DynamicImage::ImageRgb8(RgbImage::from_pixel(16, 16, Rgb([200, 10, 10])));
        let bytes = encode_jpeg(&image, 90).unwrap();
        assert_eq!(image::guess_format(&bytes).unwrap(), ImageFormat::Jpeg);
    }
}
