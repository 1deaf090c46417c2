//! Quarter-turn rotation of raster images
//!
//! Rotation is about the image centre with no cropping: 90 and 270 swap
//! width and height, 180 keeps them.

use image::imageops;

use crate::models::{RasterImage, Rotation, RotationCandidate};

/// Produce a rotated copy of `image` (clockwise)
pub fn rotate(image: &RasterImage, rotation: Rotation) -> RasterImage {
    let src = image.as_rgb_image();
    let rotated = match rotation {
        Rotation::Deg0 => src.clone(),
        Rotation::Deg90 => imageops::rotate90(src),
        Rotation::Deg180 => imageops::rotate180(src),
        Rotation::Deg270 => imageops::rotate270(src),
    };
    RasterImage::from_rgb(rotated)
}

/// Rotate and pair the result with its rotation
pub fn candidate(image: &RasterImage, rotation: Rotation) -> RotationCandidate {
    RotationCandidate {
        rotation,
        image: rotate(image, rotation),
    }
}
