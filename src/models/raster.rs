use image::{Rgb, RgbImage};

/// Fully opaque alpha in the ARGB pixel encoding
const OPAQUE: u32 = 0xFF00_0000;

/// Interleaved RGB bitmap produced from a camera frame
///
/// Pixels are exposed one `u32` per pixel in `0xAARRGGBB` order, row-major.
/// Alpha is always opaque.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterImage {
    buffer: RgbImage,
}

impl RasterImage {
    /// Wrap an RGB buffer
    pub fn from_rgb(buffer: RgbImage) -> Self {
        Self { buffer }
    }

    /// Build from packed RGB bytes (3 bytes per pixel)
    ///
    /// Returns `None` if `rgb` does not hold exactly `width * height * 3` bytes.
    pub fn from_raw_rgb(width: u32, height: u32, rgb: Vec<u8>) -> Option<Self> {
        RgbImage::from_raw(width, height, rgb).map(Self::from_rgb)
    }

    /// Build from ARGB pixels; alpha is discarded
    ///
    /// Returns `None` if `pixels` does not hold exactly `width * height` values.
    pub fn from_argb(width: u32, height: u32, pixels: &[u32]) -> Option<Self> {
        if pixels.len() != width as usize * height as usize {
            return None;
        }
        let mut rgb = Vec::with_capacity(pixels.len() * 3);
        for &p in pixels {
            rgb.push((p >> 16) as u8);
            rgb.push((p >> 8) as u8);
            rgb.push(p as u8);
        }
        Self::from_raw_rgb(width, height, rgb)
    }

    /// Width in pixels
    pub fn width(&self) -> u32 {
        self.buffer.width()
    }

    /// Height in pixels
    pub fn height(&self) -> u32 {
        self.buffer.height()
    }

    /// Number of pixels
    pub fn len(&self) -> usize {
        self.width() as usize * self.height() as usize
    }

    /// True for a zero-area image
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Single pixel as ARGB
    pub fn pixel(&self, x: u32, y: u32) -> u32 {
        pack_argb(self.buffer.get_pixel(x, y))
    }

    /// All pixels as ARGB, row-major
    pub fn argb_pixels(&self) -> Vec<u32> {
        self.buffer.pixels().map(pack_argb).collect()
    }

    /// Packed RGB bytes, row-major
    pub fn as_rgb_bytes(&self) -> &[u8] {
        self.buffer.as_raw()
    }

    /// Borrow the backing `image` buffer
    pub fn as_rgb_image(&self) -> &RgbImage {
        &self.buffer
    }

    /// Take the backing `image` buffer
    pub fn into_rgb_image(self) -> RgbImage {
        self.buffer
    }
}

#[inline]
fn pack_argb(p: &Rgb<u8>) -> u32 {
    OPAQUE | (p[0] as u32) << 16 | (p[1] as u32) << 8 | p[2] as u32
}
