//! JPEG detour for the conversion path that mirrors a compress/decompress
//! round trip through a platform codec

use std::io::Cursor;

use image::codecs::jpeg::JpegEncoder;
use image::{ColorType, ImageFormat, RgbImage};

use crate::error::FormatError;

/// Highest JPEG quality setting
pub const MAX_QUALITY: u8 = 100;

/// Encode `image` as JPEG at `quality` (clamped to 1-100)
pub fn encode_jpeg(image: &RgbImage, quality: u8) -> Result<Vec<u8>, FormatError> {
    let mut out = Cursor::new(Vec::new());
    let mut encoder = JpegEncoder::new_with_quality(&mut out, quality.clamp(1, MAX_QUALITY));
    encoder.encode(
        image.as_raw(),
        image.width(),
        image.height(),
        ColorType::Rgb8,
    )?;
    Ok(out.into_inner())
}

/// Decode JPEG bytes to an RGB buffer
pub fn decode_jpeg(bytes: &[u8]) -> Result<RgbImage, FormatError> {
    let decoded = image::load_from_memory_with_format(bytes, ImageFormat::Jpeg)?;
    Ok(decoded.to_rgb8())
}

/// Encode then decode; dimensions are preserved, pixels change by
/// quantisation only
pub fn round_trip(image: &RgbImage, quality: u8) -> Result<RgbImage, FormatError> {
    let bytes = encode_jpeg(image, quality)?;
    tracing::trace!(
        width = image.width(),
        height = image.height(),
        compressed = bytes.len(),
        "jpeg intermediate"
    );
    decode_jpeg(&bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn test_round_trip_keeps_size_and_is_close() {
        let img = RgbImage::from_pixel(16, 8, Rgb([120, 120, 120]));
        let back = round_trip(&img, MAX_QUALITY).unwrap();
        assert_eq!(back.dimensions(), (16, 8));
        for (a, b) in back.as_raw().iter().zip(img.as_raw()) {
            assert!((*a as i32 - *b as i32).abs() <= 3);
        }
    }

    #[test]
    fn test_garbage_is_intermediate_error() {
        let err = decode_jpeg(&[0x00, 0x01, 0x02]).unwrap_err();
        assert!(matches!(err, FormatError::Intermediate(_)));
    }

    #[test]
    fn test_round_trip_is_deterministic() {
        let img = RgbImage::from_fn(9, 7, |x, y| Rgb([(x * 20) as u8, (y * 30) as u8, 64]));
        let a = round_trip(&img, 90).unwrap();
        let b = round_trip(&img, 90).unwrap();
        assert_eq!(a, b);
    }
}
