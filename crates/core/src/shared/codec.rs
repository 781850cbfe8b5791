use image::codecs::jpeg::JpegEncoder;
use image::{ExtendedColorType, ImageError};

use crate::shared::image::Image;

/// Decode raw image bytes into an RGB [`Image`] using the `image` crate.
///
/// The input format is sniffed from the bytes; anything the `image` crate
/// supports (JPEG, PNG, WebP, ...) is accepted and converted to RGB8.
pub fn decode(bytes: &[u8]) -> Result<Image, ImageError> {
    let decoded = image::load_from_memory(bytes)?.to_rgb8();
    let (width, height) = decoded.dimensions();
    Ok(Image::new(decoded.into_raw(), width, height, 3))
}

/// Encode an [`Image`] as JPEG at the given quality (1-100).
pub fn encode_jpeg(image: &Image, quality: u8) -> Result<Vec<u8>, ImageError> {
    let mut bytes = Vec::new();
    let mut encoder = JpegEncoder::new_with_quality(&mut bytes, quality);
    encoder.encode(
        image.data(),
        image.width(),
        image.height(),
        ExtendedColorType::Rgb8,
    )?;
    Ok(bytes)
}
