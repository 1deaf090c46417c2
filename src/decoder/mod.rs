//! Symbol decoding
//!
//! - [`SymbolDecoder`]: the decode capability, one call per image
//! - [`LuminanceSource`]: the grey image a decoder binarizes
//! - [`multi::MultiFormatDecoder`]: 1D and 2D symbologies backed by `rxing`
//! - [`qr::QrDecoder`]: QR-only implementation backed by `rqrr`
//! - [`rotation_retry::RotationRetryDecoder`]: tries a list of orientations

pub mod multi;
pub mod qr;
pub mod rotation_retry;

use crate::error::DecodeError;
use crate::models::{RasterImage, Symbol};
use crate::utils::luminance::{argb_to_luminance, argb_to_luminance_parallel};

/// 8-bit luminance view of a raster, row-major
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LuminanceSource {
    width: usize,
    height: usize,
    luma: Vec<u8>,
}

impl LuminanceSource {
    /// Wrap a grey buffer; `None` if its length is not `width * height`
    pub fn new(width: usize, height: usize, luma: Vec<u8>) -> Option<Self> {
        (luma.len() == width * height).then_some(Self { width, height, luma })
    }

    /// Compute luminance from ARGB pixels
    pub fn from_argb(width: usize, height: usize, argb: &[u32]) -> Self {
        Self {
            width,
            height,
            luma: argb_to_luminance(argb, width, height),
        }
    }

    /// Compute luminance from a raster image
    pub fn from_raster(image: &RasterImage) -> Self {
        Self::from_argb(
            image.width() as usize,
            image.height() as usize,
            &image.argb_pixels(),
        )
    }

    /// Row-parallel variant of [`LuminanceSource::from_raster`]
    pub fn from_raster_parallel(image: &RasterImage) -> Self {
        let (width, height) = (image.width() as usize, image.height() as usize);
        Self {
            width,
            height,
            luma: argb_to_luminance_parallel(&image.argb_pixels(), width, height),
        }
    }

    /// Width in pixels
    pub fn width(&self) -> usize {
        self.width
    }

    /// Height in pixels
    pub fn height(&self) -> usize {
        self.height
    }

    /// Luminance at (x, y)
    pub fn get(&self, x: usize, y: usize) -> u8 {
        self.luma[y * self.width + x]
    }

    /// One row of luminance values
    pub fn row(&self, y: usize) -> &[u8] {
        &self.luma[y * self.width..(y + 1) * self.width]
    }

    /// All luminance values
    pub fn as_bytes(&self) -> &[u8] {
        &self.luma
    }
}

/// A barcode decoding capability
///
/// Returns [`DecodeError::NotFound`] when the image holds no symbol and
/// [`DecodeError::Fault`] for anything else that went wrong.
pub trait SymbolDecoder {
    /// Decode at most one symbol from `source`
    fn decode(&self, source: &LuminanceSource) -> Result<Symbol, DecodeError>;
}

impl<F> SymbolDecoder for F
where
    F: Fn(&LuminanceSource) -> Result<Symbol, DecodeError>,
{
    fn decode(&self, source: &LuminanceSource) -> Result<Symbol, DecodeError> {
        self(source)
    }
}
